use super::*;

#[test]
fn noise_stays_within_magnitude() {
    let src = FrameRGBA::solid(16, 16, [128, 128, 128, 255]);
    let out = apply(&src, &NoiseOptions::default(), 1.0, 0);
    assert_ne!(out, src);
    for px in out.data.chunks_exact(4) {
        assert!((i32::from(px[0]) - 128).abs() <= 50);
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
        assert_eq!(px[3], 255);
    }
}

#[test]
fn same_frame_same_grain() {
    let src = FrameRGBA::solid(8, 8, [90, 90, 90, 255]);
    assert_eq!(
        apply(&src, &NoiseOptions::default(), 0.6, 4),
        apply(&src, &NoiseOptions::default(), 0.6, 4)
    );
    assert_ne!(
        apply(&src, &NoiseOptions::default(), 0.6, 4),
        apply(&src, &NoiseOptions::default(), 0.6, 5)
    );
}

#[test]
fn grain_size_shares_samples_across_blocks() {
    let src = FrameRGBA::solid(4, 4, [128, 128, 128, 255]);
    let out = apply(&src, &NoiseOptions { grain_size: 2 }, 1.0, 1);
    assert_eq!(out.pixel(0, 0), out.pixel(1, 1));
    assert_eq!(out.pixel(2, 2), out.pixel(3, 3));
}

#[test]
fn zero_grain_size_falls_back() {
    let src = FrameRGBA::solid(4, 4, [128, 128, 128, 255]);
    assert_eq!(
        apply(&src, &NoiseOptions { grain_size: 0 }, 1.0, 2),
        apply(&src, &NoiseOptions::default(), 1.0, 2)
    );
}
