use {crate::*, base::Vec2};

pub fn yuyv_to_rgb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(size.area() * 3);

    for chunk in data.chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        rgb.extend_from_slice(&[r0, g0, b0, r1, g1, b1]);
    }

    rgb
}

/// Swap the first and third channel of packed 3-channel data (RGB <-> BGR).
pub fn swap_red_blue(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(3)
        .flat_map(|c| [c[2], c[1], c[0]])
        .collect()
}

pub fn luma_to_rgb(data: &[u8]) -> Vec<u8> {
    data.iter().flat_map(|&y| [y, y, y]).collect()
}

pub fn rgb_to_luma(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(3)
        .map(|c| rgb_to_y(c[0], c[1], c[2]))
        .collect()
}

pub fn jpeg_to_rgb(image: &Image) -> Result<Image, ImageError> {
    let decoded = crates_image::load_from_memory(&image.data)
        .map_err(|e| ImageError::Decode(format!("Failed to decode JPEG: {}", e)))?;

    let rgb_image = decoded.to_rgb8();
    let (width, height) = rgb_image.dimensions();
    let size = Vec2::new(width as usize, height as usize);

    Ok(Image::new(size, rgb_image.into_raw(), PixelFormat::Rgb8))
}

pub fn jpeg_to_luma(image: &Image) -> Result<Image, ImageError> {
    let decoded = crates_image::load_from_memory(&image.data)
        .map_err(|e| ImageError::Decode(format!("Failed to decode JPEG: {}", e)))?;

    let luma_image = decoded.to_luma8();
    let (width, height) = luma_image.dimensions();
    let size = Vec2::new(width as usize, height as usize);

    Ok(Image::new(size, luma_image.into_raw(), PixelFormat::Luma8))
}
