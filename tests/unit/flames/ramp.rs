use super::*;

#[test]
fn red_ramp_never_has_more_blue_than_red() {
    let ramp = HeatRamp::new(FlameColor::Red);
    for i in 0..=1000 {
        let c = ramp.color(i as f32 / 1000.0);
        assert!(c.b <= c.r, "{c:?}");
    }
}

#[test]
fn ramps_go_from_dark_to_bright() {
    for color in [
        FlameColor::Red,
        FlameColor::Blue,
        FlameColor::Green,
        FlameColor::Purple,
        FlameColor::Rainbow,
        FlameColor::Custom(Rgb8::new(10, 200, 180)),
        FlameColor::Gradient(Rgb8::new(255, 0, 0), Rgb8::new(255, 255, 0)),
    ] {
        let ramp = HeatRamp::new(color);
        let lum = |c: Rgb8| u32::from(c.r) + u32::from(c.g) + u32::from(c.b);
        assert_eq!(lum(ramp.color(0.0)), 0, "{color}");
        assert!(lum(ramp.color(1.0)) > 300, "{color}");
        assert_eq!(ramp.rgba(0.0)[3], 0);
        assert_eq!(ramp.rgba(1.0)[3], 255);
    }
}

#[test]
fn color_text_forms_roundtrip() {
    for text in ["red", "rainbow", "#11aa22", "gradient:#ff0000,#0000ff"] {
        let c: FlameColor = text.parse().unwrap();
        assert_eq!(c.to_string(), text);
    }
    assert_eq!(
        "custom:#ABC".parse::<FlameColor>().unwrap(),
        FlameColor::Custom(Rgb8::new(0xaa, 0xbb, 0xcc))
    );
    assert!("gradient:#ff0000".parse::<FlameColor>().is_err());
    assert!("lava".parse::<FlameColor>().is_err());
}

#[test]
fn lut_matches_direct_lookup() {
    let ramp = HeatRamp::new(FlameColor::Blue);
    let lut = ramp.lut();
    assert_eq!(lut.len(), 256);
    assert_eq!(lut[255], ramp.rgba(1.0));
    assert_eq!(lut[0], ramp.rgba(0.0));
}

#[test]
fn non_finite_heat_is_cold() {
    assert_eq!(HeatRamp::new(FlameColor::Red).rgba(f32::NAN), [0, 0, 0, 0]);
}
