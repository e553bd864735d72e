use base::Vec2;
use image::{Image, ImageError, PixelFormat};

#[test]
fn test_bgr_to_rgb_swaps_channels() {
    let image = Image::new(Vec2::new(2, 1), vec![1, 2, 3, 4, 5, 6], PixelFormat::Bgr8);
    let rgb = image.to_rgb().unwrap();
    assert_eq!(rgb.format, PixelFormat::Rgb8);
    assert_eq!(rgb.data, vec![3, 2, 1, 6, 5, 4]);
}

#[test]
fn test_rgb_to_bgr_round_trip_is_identity() {
    let image = Image::new(Vec2::new(1, 1), vec![10, 20, 30], PixelFormat::Rgb8);
    let bgr = image.to_bgr().unwrap();
    assert_eq!(bgr.data, vec![30, 20, 10]);
    assert_eq!(bgr.to_rgb().unwrap(), image);
}

#[test]
fn test_yuyv_to_rgb_gray() {
    // Y=128, U=V=128 is mid gray for both pixels
    let image = Image::new(Vec2::new(2, 1), vec![128, 128, 128, 128], PixelFormat::Yuyv);
    let rgb = image.to_rgb().unwrap();
    assert_eq!(rgb.data, vec![128; 6]);
}

#[test]
fn test_yuyv_to_luma_takes_y_samples() {
    let image = Image::new(Vec2::new(2, 1), vec![10, 99, 200, 77], PixelFormat::Yuyv);
    let luma = image.to_luma().unwrap();
    assert_eq!(luma.format, PixelFormat::Luma8);
    assert_eq!(luma.data, vec![10, 200]);
}

#[test]
fn test_rgb_to_luma_extremes() {
    let image = Image::new(
        Vec2::new(2, 1),
        vec![0, 0, 0, 255, 255, 255],
        PixelFormat::Rgb8,
    );
    let luma = image.to_luma().unwrap();
    assert_eq!(luma.data[0], 0);
    assert!(luma.data[1] >= 254);
}

#[test]
fn test_validate_rejects_short_buffer() {
    let image = Image::new(Vec2::new(4, 4), vec![0; 10], PixelFormat::Rgb8);
    match image.to_rgb() {
        Err(ImageError::Size { expected, got }) => {
            assert_eq!(expected, 48);
            assert_eq!(got, 10);
        }
        other => panic!("Expected ImageError::Size, got {:?}", other),
    }
}

#[test]
fn test_crop_clamps_to_bounds() {
    let data: Vec<u8> = (0..16).collect();
    let image = Image::new(Vec2::new(4, 4), data, PixelFormat::Luma8);
    let crop = image.crop(Vec2::new(2, 2), Vec2::new(10, 10)).unwrap();
    assert_eq!(crop.size, Vec2::new(2, 2));
    assert_eq!(crop.data, vec![10, 11, 14, 15]);
}

#[test]
fn test_crop_rejects_yuyv() {
    let image = Image::new(Vec2::new(2, 1), vec![0; 4], PixelFormat::Yuyv);
    assert!(image.crop(Vec2::new(0, 0), Vec2::new(1, 1)).is_err());
}

#[test]
fn test_fourcc_round_trip() {
    for format in [
        PixelFormat::Rgb8,
        PixelFormat::Bgr8,
        PixelFormat::Luma8,
        PixelFormat::Yuyv,
        PixelFormat::Jpeg,
    ] {
        assert_eq!(PixelFormat::from_fourcc(format.as_fourcc()).unwrap(), format);
    }
    assert!(PixelFormat::from_fourcc(u32::from_le_bytes(*b"NV12")).is_err());
}
