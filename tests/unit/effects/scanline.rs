use super::*;

#[test]
fn white_four_by_four_darkens_even_rows() {
    let src = FrameRGBA::solid(4, 4, [255, 255, 255, 255]);
    let out = apply(&src, &ScanlineOptions::default(), 1.0, 0);
    for y in 0..4 {
        let px = out.pixel(0, y);
        if y % 2 == 0 {
            assert_eq!(px, [77, 77, 77, 255]);
        } else {
            assert_eq!(px, [255, 255, 255, 255]);
        }
    }
}

#[test]
fn offset_cycles_with_frame_index() {
    let src = FrameRGBA::solid(1, 4, [255, 255, 255, 255]);
    let out = apply(&src, &ScanlineOptions::default(), 1.0, 1);
    assert_eq!(out.pixel(0, 0), [255, 255, 255, 255]);
    assert_eq!(out.pixel(0, 1), [77, 77, 77, 255]);
}

#[test]
fn zero_spacing_falls_back_to_default() {
    let src = FrameRGBA::solid(2, 4, [200, 200, 200, 255]);
    let broken = ScanlineOptions {
        thickness: 1,
        spacing: 0,
    };
    assert_eq!(
        apply(&src, &broken, 1.0, 3),
        apply(&src, &ScanlineOptions::default(), 1.0, 3)
    );
}

#[test]
fn zero_intensity_is_identity() {
    let src = FrameRGBA::solid(3, 3, [10, 20, 30, 255]);
    assert_eq!(apply(&src, &ScanlineOptions::default(), 0.0, 0), src);
}

#[test]
fn set_rejects_unknown_keys() {
    let mut o = ScanlineOptions::default();
    o.set("spacing", &OptionValue::Int(4)).unwrap();
    assert_eq!(o.spacing, 4);
    assert!(o.set("wobble", &OptionValue::Int(1)).is_err());
    o.set("spacing", &OptionValue::Int(-3)).unwrap();
    assert_eq!(o.sanitized().spacing, 2);
}
