// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use fast_image_resize as fr;
use fast_image_resize::{FilterType, PixelType, images::Image};

use crate::error::SorrelError;

/// Resampling filter used when resizing RGB buffers
///
/// Nearest-neighbor must be used for RGB-encoded label masks since any
/// interpolating filter produces pixel triples outside the label schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFilter {
    Bilinear,
    Nearest,
}

/// Resize a raw RGB buffer using the SIMD-accelerated fast-image-resize crate
///
/// # Arguments
///
/// * `buffer` - Input RGB buffer in row-major order (width * height * 3)
/// * `width` - Current width of the image
/// * `height` - Current height of the image
/// * `new_width` - New width following resizing
/// * `new_height` - New height following resizing
/// * `filter` - Bilinear or nearest-neighbor resampling
pub fn resize_rgb(
    buffer: &[u8],
    width: u32,
    height: u32,
    new_width: u32,
    new_height: u32,
    filter: ResizeFilter,
) -> Result<Vec<u8>, SorrelError> {
    let source = Image::from_vec_u8(width, height, buffer.to_vec(), PixelType::U8x3)
        .map_err(|_| SorrelError::BufferSizeError)?;

    let mut destination = Image::new(new_width, new_height, PixelType::U8x3);

    let algorithm = match filter {
        ResizeFilter::Bilinear => fr::ResizeAlg::Convolution(FilterType::Bilinear),
        ResizeFilter::Nearest => fr::ResizeAlg::Nearest,
    };

    let mut resizer = fr::Resizer::new();
    let option = fr::ResizeOptions {
        algorithm,
        cropping: fr::SrcCropping::None,
        mul_div_alpha: false,
    };

    resizer
        .resize(&source, &mut destination, &option)
        .map_err(|_| SorrelError::OtherError("Failed to resize RGB buffer".to_string()))?;

    Ok(destination.into_vec())
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_resize_nearest_preserves_colors() {
        // A 2x1 buffer with two label colors; nearest-neighbor upscaling
        // must only ever emit those two triples
        let buffer = [128u8, 64, 128, 0, 0, 192];
        let resized = resize_rgb(&buffer, 2, 1, 4, 2, ResizeFilter::Nearest).unwrap();

        assert_eq!(resized.len(), 4 * 2 * 3);

        for pixel in resized.chunks_exact(3) {
            assert!(pixel == [128, 64, 128] || pixel == [0, 0, 192]);
        }
    }

    #[test]
    fn test_resize_bilinear_shape() {
        let buffer = vec![100u8; 4 * 4 * 3];
        let resized = resize_rgb(&buffer, 4, 4, 2, 2, ResizeFilter::Bilinear).unwrap();

        assert_eq!(resized.len(), 2 * 2 * 3);
    }

    #[test]
    fn test_resize_invalid_buffer() {
        let buffer = vec![0u8; 5];
        assert!(resize_rgb(&buffer, 4, 4, 2, 2, ResizeFilter::Bilinear).is_err());
    }
}
