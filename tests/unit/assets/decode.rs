use super::*;

#[test]
fn from_straight_rgba8_premultiplies() {
    let img = PreparedImage::from_straight_rgba8(1, 2, vec![255, 255, 255, 128, 10, 20, 30, 0]);
    assert_eq!(&img.rgba8_premul[0..4], &[128, 128, 128, 128]);
    // Fully transparent pixels zero their color channels.
    assert_eq!(&img.rgba8_premul[4..8], &[0, 0, 0, 0]);
}

#[test]
fn opaque_pixels_pass_through_unchanged() {
    let img = PreparedImage::from_straight_rgba8(1, 1, vec![10, 20, 30, 255]);
    assert_eq!(&img.rgba8_premul[..], &[10, 20, 30, 255]);
}

#[test]
fn decode_image_accepts_png_bytes() {
    let mut png = Vec::new();
    let rgba = image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]));
    rgba.write_to(
        &mut std::io::Cursor::new(&mut png),
        image::ImageFormat::Png,
    )
    .unwrap();

    let img = decode_image(&png).unwrap();
    assert_eq!(img.width, 3);
    assert_eq!(img.height, 2);
    assert_eq!(&img.rgba8_premul[0..4], &[255, 0, 0, 255]);
}

#[test]
fn decode_image_rejects_garbage() {
    assert!(decode_image(&[0u8, 1, 2, 3]).is_err());
}
