use super::*;

fn key_one(r: u8, g: u8, b: u8) -> u8 {
    let mut px = [r, g, b, 255];
    key_out_green(&mut px);
    px[3]
}

#[test]
fn solid_green_is_keyed_out() {
    assert_eq!(key_one(10, 220, 10), 0);
}

#[test]
fn gray_is_left_untouched() {
    assert_eq!(key_one(200, 200, 200), 255);
}

#[test]
fn green_floor_is_exclusive() {
    assert_eq!(key_one(0, 100, 0), 255);
    assert_eq!(key_one(0, 101, 0), 0);
}

#[test]
fn dominance_ratio_is_exclusive() {
    // 140 is exactly 1.4 * 100: not dominant enough.
    assert_eq!(key_one(100, 140, 0), 255);
    assert_eq!(key_one(100, 141, 0), 0);
    // Blue holds the pixel even when red passes.
    assert_eq!(key_one(0, 141, 101), 255);
}

#[test]
fn non_green_pixels_are_never_keyed() {
    // Sampled sweep of the classifier's complement: low green, or green not
    // dominating either channel.
    for r in (0u16..=255).step_by(15) {
        for g in (0u16..=255).step_by(15) {
            for b in (0u16..=255).step_by(15) {
                let dominated = g > 100
                    && f32::from(g as u8) > GREEN_DOMINANCE * r as f32
                    && f32::from(g as u8) > GREEN_DOMINANCE * b as f32;
                if !dominated {
                    assert_eq!(
                        key_one(r as u8, g as u8, b as u8),
                        255,
                        "pixel ({r},{g},{b}) must not be keyed"
                    );
                }
            }
        }
    }
}

#[test]
fn buffer_is_processed_per_pixel_in_place() {
    let mut buf = vec![
        10, 220, 10, 255, // green
        200, 200, 200, 255, // gray
        0, 130, 40, 200, // green, partial alpha
    ];
    key_out_green(&mut buf);
    assert_eq!(buf[3], 0);
    assert_eq!(buf[7], 255);
    assert_eq!(buf[11], 0);
    // Color channels stay untouched either way.
    assert_eq!(&buf[0..3], &[10, 220, 10]);
    assert_eq!(&buf[4..7], &[200, 200, 200]);
}
