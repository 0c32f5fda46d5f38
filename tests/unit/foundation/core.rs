use super::*;

#[test]
fn new_rejects_length_mismatch() {
    assert!(FrameRGBA::new(2, 2, vec![0; 15]).is_err());
    assert!(FrameRGBA::new(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn pixel_roundtrip_and_clamped_sampling() {
    let mut f = FrameRGBA::transparent(3, 2);
    f.set_pixel(2, 1, [1, 2, 3, 4]);
    assert_eq!(f.pixel(2, 1), [1, 2, 3, 4]);
    assert_eq!(f.sample_clamped(10, 10), [1, 2, 3, 4]);
    assert_eq!(f.sample_clamped(-4, 0), [0, 0, 0, 0]);
}

#[test]
fn frame_rate_validation_and_duration() {
    assert!(FrameRate::new(0.0).is_err());
    assert!(FrameRate::new(f32::NAN).is_err());
    assert_eq!(FrameRate::new(10.0).unwrap().frame_duration_ms(), 100);
    assert_eq!(FrameRate::new(30.0).unwrap().frame_duration_ms(), 33);
    assert_eq!(FrameRate::new(5000.0).unwrap().frame_duration_ms(), 1);
}

#[test]
fn frame_rate_deserialize_goes_through_validation() {
    let ok: FrameRate = serde_json::from_str("12.5").unwrap();
    assert_eq!(ok.fps(), 12.5);
    assert!(serde_json::from_str::<FrameRate>("0").is_err());
    assert!(serde_json::from_str::<FrameRate>("-3.0").is_err());
    assert_eq!(serde_json::to_string(&ok).unwrap(), "12.5");
}
