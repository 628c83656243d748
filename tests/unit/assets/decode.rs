use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_pixels() {
    let buf = png_bytes(2, 3, [100, 50, 200, 255]);
    let decoded = decode_image(&buf).unwrap();
    assert_eq!(decoded.width, 2);
    assert_eq!(decoded.height, 3);
    assert_eq!(decoded.rgba8.len(), 2 * 3 * 4);
    assert!(
        decoded
            .rgba8
            .chunks_exact(4)
            .all(|px| px == [100, 50, 200, 255])
    );
}

#[test]
fn decode_image_rejects_garbage() {
    let err = decode_image(b"not an image").unwrap_err();
    assert!(matches!(err, ShowreelError::InvalidImage(_)));
}

#[test]
fn load_image_reports_path_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"junk").unwrap();
    let err = load_image(&path).unwrap_err();
    assert!(err.to_string().contains("broken.png"));
}
