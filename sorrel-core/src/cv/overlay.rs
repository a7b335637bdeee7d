// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use crate::error::SorrelError;
use crate::im::SorrelImage;

/// Blend a decoded mask over an image for visualization
///
/// Computes the saturating weighted sum `image + alpha * mask` per
/// subpixel, clamped to the u8 range. The image keeps its full weight so
/// scene structure stays visible under the label colors.
///
/// # Arguments
///
/// * `image` - The photograph the mask belongs to
/// * `mask` - A decoded RGB mask of the same shape
/// * `alpha` - Mask weight between 0 and 1
///
/// # Examples
///
/// ```
/// use sorrel_core::cv::blend;
/// use sorrel_core::im::SorrelImage;
///
/// let image = SorrelImage::new(1, 1, 3, vec![100, 100, 100]).unwrap();
/// let mask = SorrelImage::new(1, 1, 3, vec![128, 64, 128]).unwrap();
///
/// let blended = blend(&image, &mask, 0.5).unwrap();
/// assert_eq!(blended.as_raw(), &[164, 132, 164]);
/// ```
pub fn blend(
    image: &SorrelImage,
    mask: &SorrelImage,
    alpha: f32,
) -> Result<SorrelImage, SorrelError> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(SorrelError::OtherError(
            "Overlay alpha must be between 0 and 1".to_string(),
        ));
    }

    if image.shape() != mask.shape() {
        return Err(SorrelError::ShapeError(format!(
            "Image shape {:?} does not match mask shape {:?}",
            image.shape(),
            mask.shape()
        )));
    }

    let blended = image
        .iter()
        .zip(mask.iter())
        .map(|(i, m)| (*i as f32 + alpha * *m as f32).round().clamp(0.0, 255.0) as u8)
        .collect();

    SorrelImage::new(image.width(), image.height(), 3, blended)
}
