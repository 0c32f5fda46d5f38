use super::*;

#[test]
fn attenuates_red_blue_and_boosts_green() {
    let src = FrameRGBA::solid(2, 2, [200, 100, 200, 255]);
    let out = apply(&src, &PhosphorOptions::default(), 1.0, Phase::wrapping(0.25));
    let [r, g, b, a] = out.pixel(1, 1);
    assert_eq!(r, 170);
    assert_eq!(b, 170);
    assert_eq!(g, 135);
    assert_eq!(a, 255);
}

#[test]
fn glow_envelope_closes_the_loop() {
    let src = FrameRGBA::solid(2, 2, [50, 120, 50, 255]);
    let first = apply(&src, &PhosphorOptions::default(), 1.0, Phase::ZERO);
    let last = apply(&src, &PhosphorOptions::default(), 1.0, Phase::of(59, 60).unwrap());
    for (a, b) in first.data.iter().zip(&last.data) {
        assert!((i32::from(*a) - i32::from(*b)).abs() <= 2);
    }
}

#[test]
fn out_of_range_decay_uses_default() {
    let o = PhosphorOptions {
        decay: 4.0,
        glow: -1.0,
    };
    assert_eq!(o.sanitized(), PhosphorOptions::default());
}
