// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use num::{FromPrimitive, ToPrimitive};
use rayon::prelude::*;

use crate::error::SorrelError;
use crate::im::{ColorMap, OneHotMask, SorrelBuffer, SorrelImage};

/// One-hot encode an RGB-encoded segmentation mask
///
/// For each class index i with color c_i, output channel i is set to 1 at
/// every pixel whose RGB triple equals c_i exactly. Pixels whose color
/// matches no class encode to the all-zero vector; this is silent by
/// design and mirrors how unlabelled pixels are treated during training.
///
/// Rows are processed in parallel; per-pixel results are identical to a
/// scalar pass.
///
/// # Arguments
///
/// * `mask` - An (H, W, 3) RGB mask
/// * `colormap` - The label schema mapping class indices to colors
///
/// # Examples
///
/// ```
/// use sorrel_core::cv::encode_mask;
/// use sorrel_core::im::{ClassEntry, ColorMap, OneHotMask, SorrelImage};
///
/// let colormap = ColorMap::new(vec![
///     ClassEntry { name: "Void".to_string(), color: [0, 0, 0] },
///     ClassEntry { name: "Car".to_string(), color: [64, 0, 128] },
/// ])
/// .unwrap();
///
/// let mask = SorrelImage::new(1, 1, 3, vec![64, 0, 128]).unwrap();
/// let onehot = encode_mask(&mask, &colormap).unwrap();
///
/// match onehot {
///     OneHotMask::U8(buffer) => assert_eq!(buffer.as_raw(), &[0, 1]),
///     OneHotMask::F32(_) => unreachable!(),
/// }
/// ```
pub fn encode_mask(mask: &SorrelImage, colormap: &ColorMap) -> Result<OneHotMask, SorrelError> {
    if mask.channels() != 3 {
        return Err(SorrelError::ShapeError(format!(
            "RGB masks must have 3 channels, found {}",
            mask.channels()
        )));
    }

    let w = mask.width() as usize;
    let h = mask.height() as usize;
    let k = colormap.len();

    let mut encoded = vec![0u8; w * h * k];

    encoded
        .par_chunks_exact_mut(w * k)
        .zip(mask.as_raw().par_chunks_exact(w * 3))
        .for_each(|(encoded_row, mask_row)| {
            for (encoded_pixel, mask_pixel) in encoded_row
                .chunks_exact_mut(k)
                .zip(mask_row.chunks_exact(3))
            {
                let color = [mask_pixel[0], mask_pixel[1], mask_pixel[2]];

                if let Some(index) = colormap.index_of(&color) {
                    encoded_pixel[index] = 1;
                }
            }
        });

    Ok(OneHotMask::U8(SorrelBuffer::new(
        w as u32, h as u32, k as u32, encoded,
    )?))
}

/// Decode a one-hot or class-probability tensor to an RGB mask
///
/// Each pixel takes the color of its arg-max channel, with ties broken by
/// the lowest class index. An all-zero pixel therefore decodes to class
/// 0's color even though it was never labelled; encode and decode are only
/// inverses for masks composed entirely of in-schema colors.
///
/// # Arguments
///
/// * `onehot` - An (H, W, K) one-hot or probability tensor
/// * `colormap` - The label schema; its length must equal K
///
/// # Examples
///
/// ```
/// use sorrel_core::cv::decode_mask;
/// use sorrel_core::im::{ClassEntry, ColorMap, OneHotMask, SorrelBuffer};
///
/// let colormap = ColorMap::new(vec![
///     ClassEntry { name: "Void".to_string(), color: [0, 0, 0] },
///     ClassEntry { name: "Car".to_string(), color: [64, 0, 128] },
/// ])
/// .unwrap();
///
/// let onehot = OneHotMask::U8(SorrelBuffer::new(1, 1, 2, vec![0, 1]).unwrap());
/// let mask = decode_mask(&onehot, &colormap).unwrap();
///
/// assert_eq!(mask.as_raw(), &[64, 0, 128]);
/// ```
pub fn decode_mask(onehot: &OneHotMask, colormap: &ColorMap) -> Result<SorrelImage, SorrelError> {
    if onehot.classes() as usize != colormap.len() {
        return Err(SorrelError::ShapeError(format!(
            "Tensor has {} channels but the colormap defines {} classes",
            onehot.classes(),
            colormap.len()
        )));
    }

    match onehot {
        OneHotMask::U8(buffer) => decode_buffer(buffer, colormap),
        OneHotMask::F32(buffer) => decode_buffer(buffer, colormap),
    }
}

fn decode_buffer<T>(
    onehot: &SorrelBuffer<T, Vec<T>>,
    colormap: &ColorMap,
) -> Result<SorrelImage, SorrelError>
where
    T: ToPrimitive + FromPrimitive + PartialOrd + Send + Sync,
{
    let w = onehot.width() as usize;
    let h = onehot.height() as usize;
    let k = onehot.channels() as usize;

    // Checked against the tensor channel count by the caller
    let colors: Vec<[u8; 3]> = colormap.iter().map(|entry| entry.color).collect();

    let mut decoded = vec![0u8; w * h * 3];

    decoded
        .par_chunks_exact_mut(w * 3)
        .zip(onehot.as_raw().par_chunks_exact(w * k))
        .for_each(|(decoded_row, onehot_row)| {
            for (decoded_pixel, onehot_pixel) in decoded_row
                .chunks_exact_mut(3)
                .zip(onehot_row.chunks_exact(k))
            {
                let mut best = 0;

                for (index, value) in onehot_pixel.iter().enumerate().skip(1) {
                    if *value > onehot_pixel[best] {
                        best = index;
                    }
                }

                decoded_pixel.copy_from_slice(&colors[best]);
            }
        });

    SorrelImage::new(w as u32, h as u32, 3, decoded)
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::im::ClassEntry;

    fn colormap() -> ColorMap {
        ColorMap::new(vec![
            ClassEntry {
                name: "Void".to_string(),
                color: [0, 0, 0],
            },
            ClassEntry {
                name: "Red".to_string(),
                color: [255, 0, 0],
            },
        ])
        .unwrap()
    }

    fn raw(onehot: &OneHotMask) -> &[u8] {
        match onehot {
            OneHotMask::U8(buffer) => buffer.as_raw(),
            OneHotMask::F32(_) => panic!("expected a u8 tensor"),
        }
    }

    #[test]
    fn test_encode_checkerboard() {
        let mask = SorrelImage::new(
            2,
            2,
            3,
            vec![0, 0, 0, 255, 0, 0, 255, 0, 0, 0, 0, 0],
        )
        .unwrap();

        let onehot = encode_mask(&mask, &colormap()).unwrap();

        // Channel 0 active at (0, 0) and (1, 1), channel 1 at (0, 1) and (1, 0)
        assert_eq!(raw(&onehot), &[1, 0, 0, 1, 0, 1, 1, 0]);
    }

    #[test]
    fn test_encode_one_hot_invariant() {
        let mask = SorrelImage::new(
            2,
            2,
            3,
            vec![0, 0, 0, 255, 0, 0, 1, 2, 3, 0, 0, 0],
        )
        .unwrap();

        let onehot = encode_mask(&mask, &colormap()).unwrap();

        let sums: Vec<u8> = raw(&onehot).chunks_exact(2).map(|p| p[0] + p[1]).collect();

        // Channel sums are 1 for in-schema pixels and 0 for the unknown pixel
        assert_eq!(sums, [1, 1, 0, 1]);
    }

    #[test]
    fn test_encode_unknown_color_all_zero() {
        let mask = SorrelImage::new(1, 1, 3, vec![1, 2, 3]).unwrap();
        let onehot = encode_mask(&mask, &colormap()).unwrap();

        assert_eq!(raw(&onehot), &[0, 0]);

        // Decoding the all-zero vector falls through to class 0's color
        let decoded = decode_mask(&onehot, &colormap()).unwrap();
        assert_eq!(decoded.as_raw(), &[0, 0, 0]);
    }

    #[test]
    fn test_round_trip() {
        let pixels = vec![0, 0, 0, 255, 0, 0, 255, 0, 0, 0, 0, 0];
        let mask = SorrelImage::new(2, 2, 3, pixels.clone()).unwrap();

        let onehot = encode_mask(&mask, &colormap()).unwrap();
        let decoded = decode_mask(&onehot, &colormap()).unwrap();

        assert_eq!(decoded.as_raw(), &pixels);
    }

    #[test]
    fn test_decode_tie_break_lowest_index() {
        let onehot = OneHotMask::U8(SorrelBuffer::new(1, 1, 2, vec![1, 1]).unwrap());
        let decoded = decode_mask(&onehot, &colormap()).unwrap();

        assert_eq!(decoded.as_raw(), &[0, 0, 0]);
    }

    #[test]
    fn test_decode_probabilities() {
        let onehot = OneHotMask::F32(SorrelBuffer::new(2, 1, 2, vec![0.9, 0.1, 0.3, 0.7]).unwrap());
        let decoded = decode_mask(&onehot, &colormap()).unwrap();

        assert_eq!(decoded.as_raw(), &[0, 0, 0, 255, 0, 0]);
    }

    #[test]
    fn test_encode_channel_mismatch() {
        let mask = SorrelImage::new(1, 1, 4, vec![0, 0, 0, 255]).unwrap();
        assert!(encode_mask(&mask, &colormap()).is_err());
    }

    #[test]
    fn test_decode_channel_mismatch() {
        let onehot = OneHotMask::U8(SorrelBuffer::new(1, 1, 3, vec![1, 0, 0]).unwrap());
        assert!(decode_mask(&onehot, &colormap()).is_err());
    }

    #[test]
    fn test_encode_large_parallel_matches_scalar() {
        // A mask large enough for rayon to split across threads
        let w = 64;
        let h = 48;

        let mut pixels = Vec::with_capacity(w * h * 3);
        for i in 0..(w * h) {
            if i % 3 == 0 {
                pixels.extend_from_slice(&[255, 0, 0]);
            } else {
                pixels.extend_from_slice(&[0, 0, 0]);
            }
        }

        let mask = SorrelImage::new(w as u32, h as u32, 3, pixels).unwrap();
        let onehot = encode_mask(&mask, &colormap()).unwrap();

        for (i, pixel) in raw(&onehot).chunks_exact(2).enumerate() {
            if i % 3 == 0 {
                assert_eq!(pixel, [0, 1]);
            } else {
                assert_eq!(pixel, [1, 0]);
            }
        }
    }
}
