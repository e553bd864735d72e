use {
    crate::*,
    base::Vec2,
    crates_image::ImageEncoder,
    std::path::{Path, PathBuf},
};

fn encode(
    size: Vec2<usize>,
    data: &[u8],
    color: crates_image::ExtendedColorType,
    quality: u8,
) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    let encoder = crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(data, size.x as u32, size.y as u32, color)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

pub fn rgb_to_jpeg(size: Vec2<usize>, data: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
    encode(size, data, crates_image::ExtendedColorType::Rgb8, quality)
}

pub fn luma_to_jpeg(size: Vec2<usize>, data: &[u8], quality: u8) -> Result<Vec<u8>, ImageError> {
    encode(size, data, crates_image::ExtendedColorType::L8, quality)
}

/// Encode any [`Image`] as JPEG.
///
/// JPEG input is decoded and encoded again: camera MJPG frames often omit
/// their Huffman tables, which many viewers refuse to open.
pub fn encode_jpeg(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    match image.format {
        PixelFormat::Jpeg => {
            let rgb = jpeg_to_rgb(image)?;
            rgb_to_jpeg(rgb.size, &rgb.data, quality)
        }
        PixelFormat::Luma8 => {
            image.validate()?;
            luma_to_jpeg(image.size, &image.data, quality)
        }
        _ => {
            let rgb = image.to_rgb()?;
            rgb_to_jpeg(rgb.size, &rgb.data, quality)
        }
    }
}

fn write_jpeg_inner(image: &Image, path: &Path, quality: u8) -> Result<(), ImageError> {
    let jpeg = encode_jpeg(image, quality)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, jpeg)?;
    Ok(())
}

/// Encode `image` as JPEG and write it to `path`, replacing any previous file.
///
/// Missing parent directories are created. The CPU-bound encoding runs on
/// tokio's blocking thread pool.
pub async fn write_jpeg(image: Image, path: PathBuf, quality: u8) -> Result<(), ImageError> {
    tokio::task::spawn_blocking(move || write_jpeg_inner(&image, &path, quality))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}
