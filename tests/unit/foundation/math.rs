use super::*;

#[test]
fn mul_div255_identity_edges() {
    assert_eq!(mul_div255_u16(255, 255), 255);
    assert_eq!(mul_div255_u16(0, 255), 0);
    assert_eq!(mul_div255_u16(255, 0), 0);
}

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u16(128, 128), 64);
    assert_eq!(mul_div255_u8(128, 255), 128);
}
