use super::*;

#[test]
fn mul_div255_rounds() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(0, 255), 0);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(255, 128), 128);
}

#[test]
fn hash01_is_deterministic_and_in_range() {
    for i in 0..512u32 {
        let a = hash01(7, i, i * 3);
        assert_eq!(a, hash01(7, i, i * 3));
        assert!((0.0..1.0).contains(&a));
    }
    assert_ne!(hash01(1, 2, 3), hash01(2, 2, 3));
}

#[test]
fn fingerprint_differs_for_different_bytes() {
    assert_ne!(fingerprint_bytes(b"abc"), fingerprint_bytes(b"abd"));
    assert_eq!(fingerprint_bytes(b"abc"), fingerprint_bytes(b"abc"));
}
