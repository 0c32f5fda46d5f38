use super::*;

fn gradient(w: u32, h: u32) -> FrameRGBA {
    let mut f = FrameRGBA::transparent(w, h);
    for y in 0..h {
        for x in 0..w {
            f.set_pixel(x, y, [(x * 17 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8, 255]);
        }
    }
    f
}

#[test]
fn zero_intensity_is_identity() {
    let src = gradient(16, 12);
    let out = apply(&src, &TapeGlitchOptions::default(), 0.0, 3, Phase::wrapping(0.3));
    assert_eq!(out, src);
}

#[test]
fn wave_is_periodic_in_phase() {
    let src = gradient(24, 16);
    let opts = TapeGlitchOptions {
        tracking_noise: 0.0,
        ..TapeGlitchOptions::default()
    };
    let a = apply(&src, &opts, 1.0, 0, Phase::ZERO);
    let b = apply(&src, &opts, 1.0, 0, Phase::wrapping(1.0));
    assert_eq!(a, b);
    let mid = apply(&src, &opts, 1.0, 0, Phase::wrapping(0.25));
    assert_ne!(a, mid);
}

#[test]
fn full_tracking_noise_replaces_every_band_with_gray() {
    let src = gradient(8, 8);
    let opts = TapeGlitchOptions {
        tracking_noise: 1.0,
        ..TapeGlitchOptions::default()
    };
    let out = apply(&src, &opts, 1.0, 5, Phase::ZERO);
    for y in 0..8 {
        for x in 0..8 {
            let [r, g, b, a] = out.pixel(x, y);
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert_eq!(a, 255);
        }
    }
}

#[test]
fn invalid_values_are_sanitized() {
    let o = TapeGlitchOptions {
        distortion: -1.0,
        wave_frequency: 0.0,
        line_thickness: 0,
        tracking_noise: 3.0,
        ..TapeGlitchOptions::default()
    }
    .sanitized();
    assert_eq!(o, TapeGlitchOptions::default());
}

#[test]
fn huge_distortion_clamps_to_the_edge_columns() {
    let src = gradient(10, 6);
    let opts = TapeGlitchOptions {
        distortion: 1.0e30,
        bleed_red: 0,
        bleed_blue: 0,
        tracking_noise: 0.0,
        ..TapeGlitchOptions::default()
    };
    let out = apply(&src, &opts, 1.0, 0, Phase::wrapping(0.1));
    assert!(out.same_dimensions(&src));
    for y in 0..6 {
        let first = out.pixel(0, y);
        assert!(first == src.pixel(0, y) || first == src.pixel(9, y), "row {y}");
        assert!((0..10).all(|x| out.pixel(x, y) == first), "row {y}");
    }
}
