use super::*;

fn stripes() -> FrameRGBA {
    let mut f = FrameRGBA::solid(12, 12, [0, 0, 0, 255]);
    for y in 0..12 {
        for x in 0..12 {
            let v = if (x + y) % 3 == 0 { 255 } else { 0 };
            f.set_pixel(x, y, [v, 100, v, 255]);
        }
    }
    f
}

#[test]
fn green_and_alpha_never_move() {
    let src = stripes();
    for dir in [
        SplitDirection::Horizontal,
        SplitDirection::Vertical,
        SplitDirection::Diagonal,
    ] {
        let opts = ChannelSplitOptions {
            direction: dir,
            amount: 6.0,
        };
        let out = apply(&src, &opts, 1.0, Phase::wrapping(0.125));
        assert_ne!(out, src);
        for (o, s) in out.data.chunks_exact(4).zip(src.data.chunks_exact(4)) {
            assert_eq!(o[1], s[1]);
            assert_eq!(o[3], s[3]);
        }
    }
}

#[test]
fn horizontal_shift_reads_left_neighbour() {
    let src = stripes();
    let opts = ChannelSplitOptions::default();
    // Phase 0.25: red shifted by +6, blue by 0.
    let out = apply(&src, &opts, 1.0, Phase::wrapping(0.25));
    assert_eq!(out.pixel(8, 0)[0], src.pixel(2, 0)[0]);
    assert_eq!(out.pixel(8, 0)[2], src.pixel(8, 0)[2]);
}

#[test]
fn direction_parses_from_keyword() {
    let mut o = ChannelSplitOptions::default();
    o.set("direction", &OptionValue::from("diagonal")).unwrap();
    assert_eq!(o.direction, SplitDirection::Diagonal);
    assert!(o.set("direction", &OptionValue::from("sideways")).is_err());
}

#[test]
fn huge_amount_samples_the_far_edges() {
    let src = stripes();
    let opts = ChannelSplitOptions {
        direction: SplitDirection::Horizontal,
        amount: 1.0e30,
    };
    // Phase 0.75: red offset is negative, blue offset positive.
    let out = apply(&src, &opts, 1.0, Phase::wrapping(0.75));
    for y in 0..12 {
        for x in 0..12 {
            assert_eq!(out.pixel(x, y)[0], src.pixel(11, y)[0]);
            assert_eq!(out.pixel(x, y)[2], src.pixel(0, y)[2]);
        }
    }
}
