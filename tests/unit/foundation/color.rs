use super::*;

#[test]
fn parse_hex_forms() {
    assert_eq!(Rgb8::parse_hex("#ff8000").unwrap(), Rgb8::new(255, 128, 0));
    assert_eq!(Rgb8::parse_hex("0f0").unwrap(), Rgb8::new(0, 255, 0));
    assert!(Rgb8::parse_hex("#12345").is_err());
    assert!(Rgb8::parse_hex("#zzzzzz").is_err());
}

#[test]
fn serde_uses_hex_strings() {
    let c = Rgb8::new(1, 2, 255);
    let json = serde_json::to_string(&c).unwrap();
    assert_eq!(json, "\"#0102ff\"");
    let back: Rgb8 = serde_json::from_str(&json).unwrap();
    assert_eq!(back, c);
}

#[test]
fn hsv_primaries() {
    assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb8::new(255, 0, 0));
    assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb8::new(0, 255, 0));
    assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Rgb8::new(0, 0, 255));
}
