use super::*;

#[test]
fn bayer_matrix_is_a_permutation() {
    let mut seen: Vec<u8> = BAYER4.iter().flatten().copied().collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..16).collect::<Vec<u8>>());
}

#[test]
fn full_dither_only_emits_palette_colors() {
    let mut overlay = Vec::new();
    for i in 0..64u32 {
        overlay.extend_from_slice(&[(i * 4) as u8, (255 - i * 3) as u8, 90, 255]);
    }
    dither_overlay(&mut overlay, 8, DitherPalette::Gameboy, 1.0);
    for px in overlay.chunks_exact(4) {
        let c = Rgb8::new(px[0], px[1], px[2]);
        assert!(DitherPalette::Gameboy.colors().contains(&c), "{c:?}");
    }
}

#[test]
fn mid_gray_dithers_into_a_pattern() {
    let mut overlay = [128u8, 128, 128, 255].repeat(16);
    dither_overlay(&mut overlay, 4, DitherPalette::Grayscale, 1.0);
    let distinct: std::collections::BTreeSet<u8> = overlay.chunks_exact(4).map(|p| p[0]).collect();
    assert!(distinct.len() >= 2);
}

#[test]
fn none_palette_and_zero_amount_are_no_ops() {
    let orig = [10u8, 200, 30, 255, 0, 0, 0, 0].to_vec();
    let mut a = orig.clone();
    dither_overlay(&mut a, 2, DitherPalette::None, 1.0);
    assert_eq!(a, orig);
    let mut b = orig.clone();
    dither_overlay(&mut b, 2, DitherPalette::Pico8, 0.0);
    assert_eq!(b, orig);
}

#[test]
fn transparent_pixels_stay_transparent() {
    let mut overlay = vec![0u8; 16];
    dither_overlay(&mut overlay, 2, DitherPalette::Cga, 1.0);
    assert!(overlay.iter().all(|b| *b == 0));
}
