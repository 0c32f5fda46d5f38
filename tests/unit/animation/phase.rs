use super::*;

#[test]
fn zero_frame_count_is_rejected() {
    assert!(Phase::of(0, 0).is_err());
}

#[test]
fn index_past_end_is_rejected() {
    assert!(Phase::of(4, 4).is_err());
    assert!(Phase::of(3, 4).is_ok());
}

#[test]
fn phases_stay_in_half_open_unit_interval() {
    for n in [1u32, 2, 3, 7, 60, 1000, u32::MAX] {
        for i in [0, n / 2, n - 1] {
            let p = Phase::of(i, n).unwrap().value();
            assert!((0.0..1.0).contains(&p), "phase {p} for {i}/{n}");
        }
    }
}

#[test]
fn wrapping_folds_one_onto_zero() {
    assert_eq!(Phase::wrapping(1.0), Phase::ZERO);
    assert_eq!(Phase::wrapping(2.25).value(), 0.25);
    assert_eq!(Phase::wrapping(-0.25).value(), 0.75);
    assert_eq!(Phase::wrapping(f32::NAN), Phase::ZERO);
}

#[test]
fn integer_cycles_close_the_loop() {
    let last = Phase::of(239, 240).unwrap();
    for k in 1..4 {
        assert!((last.sin_cycles(k) - Phase::ZERO.sin_cycles(k)).abs() < 0.1);
        assert!((last.cos_cycles(k) - Phase::ZERO.cos_cycles(k)).abs() < 0.1);
    }
}
