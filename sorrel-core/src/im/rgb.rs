// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Rgb, open as open_dynamic};
use npyz::{self, DType, NpyFile, TypeChar};

use crate::constant;
use crate::cv::transform::{ResizeFilter, resize_rgb};
use crate::error::SorrelError;
use crate::im::SorrelBuffer;
use crate::io::write_numpy;

/// A row-major container storing 8-bit RGB pixels
///
/// Photographs and RGB-encoded segmentation masks share this type; a mask
/// is simply an RGB image whose pixel triples come from a label schema.
/// The length of the container must equal `w` * `h` * 3.
///
/// # Examples
///
/// ```
/// use sorrel_core::im::SorrelImage;
///
/// let width = 10;
/// let height = 10;
/// let buffer = vec![0u8; (width * height * 3) as usize];
/// let image = SorrelImage::new(width, height, 3, buffer);
///
/// assert_eq!(image.unwrap().len(), (width * height * 3) as usize);
/// ```
pub type SorrelImage = SorrelBuffer<u8, Vec<u8>>;

// >>> I/O METHODS

impl SorrelImage {
    /// Open a new RGB image from a provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path to an image with a valid extension
    ///
    /// ```no_run
    /// use sorrel_core::im::SorrelImage;
    /// let image = SorrelImage::open("image.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SorrelImage, SorrelError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if ext == "npy" {
                if let Ok(bytes) = std::fs::read(&path) {
                    if let Ok(npy) = NpyFile::new(&bytes[..]) {
                        return Self::new_from_numpy(npy);
                    }
                }

                return Err(SorrelError::ImageReadError);
            }

            if constant::IMAGE_DYNAMIC_FORMATS.iter().any(|e| e == &ext) {
                if let Ok(image) = open_dynamic(&path) {
                    return Self::new_from_dynamic(image);
                }

                return Err(SorrelError::ImageReadError);
            }
        }

        Err(SorrelError::ImageExtensionError)
    }

    /// Initialize a new RGB image from a DynamicImage
    ///
    /// Grayscale and alpha-carrying images are normalized to 3-channel RGB
    /// so the rest of the pipeline only ever sees (H, W, 3) u8 buffers.
    ///
    /// # Arguments
    ///
    /// * `image` - An 8-bit RGB, RGBA, or grayscale DynamicImage
    ///
    /// # Examples
    ///
    /// ```
    /// use image::{RgbImage, DynamicImage};
    /// use sorrel_core::im::SorrelImage;
    ///
    /// let rgb = RgbImage::new(10, 10);
    /// let dynamic = DynamicImage::ImageRgb8(rgb);
    /// let image = SorrelImage::new_from_dynamic(dynamic);
    /// ```
    pub fn new_from_dynamic(image: DynamicImage) -> Result<SorrelImage, SorrelError> {
        let width = image.width();
        let height = image.height();

        match image {
            DynamicImage::ImageRgb8(buffer) => {
                Ok(SorrelImage::new(width, height, 3, buffer.into_raw())?)
            }
            DynamicImage::ImageRgba8(buffer) => Ok(SorrelImage::new(
                width,
                height,
                3,
                buffer
                    .into_raw()
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect(),
            )?),
            DynamicImage::ImageLuma8(buffer) => Ok(SorrelImage::new(
                width,
                height,
                3,
                buffer
                    .into_raw()
                    .into_iter()
                    .flat_map(|pixel| [pixel, pixel, pixel])
                    .collect(),
            )?),
            _ => Err(SorrelError::ImageFormatError),
        }
    }

    /// Initialize a new RGB image from a numpy array buffer
    ///
    /// # Arguments
    ///
    /// * `npy` - A (height, width, 3) shaped u8 numpy array buffer
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use npyz::NpyFile;
    /// use sorrel_core::im::SorrelImage;
    ///
    /// let bytes = std::fs::read("mask.npy").unwrap();
    /// let npy = NpyFile::new(&bytes[..]).unwrap();
    /// let image = SorrelImage::new_from_numpy(npy);
    /// ```
    pub fn new_from_numpy(npy: NpyFile<&[u8]>) -> Result<SorrelImage, SorrelError> {
        let shape = npy.shape().to_vec();

        if shape.len() != 3 || shape[2] != 3 {
            return Err(SorrelError::ImageFormatError);
        }

        let (h, w) = (shape[0] as u32, shape[1] as u32);

        match npy.dtype() {
            DType::Plain(x) => match (x.type_char(), x.size_field()) {
                (TypeChar::Uint, 1) => {
                    let buffer = npy
                        .into_vec::<u8>()
                        .map_err(|_| SorrelError::ImageReadError)?;
                    Ok(SorrelImage::new(w, h, 3, buffer)?)
                }
                _ => Err(SorrelError::ImageFormatError),
            },
            _ => Err(SorrelError::ImageFormatError),
        }
    }

    /// Save the image to a provided path
    ///
    /// # Arguments
    ///
    /// * `path` - A path with a valid image extension or .npy
    ///
    /// ```no_run
    /// use sorrel_core::im::SorrelImage;
    ///
    /// let image = SorrelImage::new(2, 2, 3, vec![0u8; 12]).unwrap();
    /// image.save("image.png").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SorrelError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if ext == "npy" {
                return write_numpy(
                    path,
                    self.as_raw().clone(),
                    vec![self.height() as u64, self.width() as u64, 3],
                );
            }

            if constant::IMAGE_DYNAMIC_FORMATS.iter().any(|e| e == &ext) {
                return ImageBuffer::<Rgb<u8>, Vec<u8>>::from_raw(
                    self.width(),
                    self.height(),
                    self.as_raw().clone(),
                )
                .ok_or(SorrelError::ImageWriteError)?
                .save(path)
                .map_err(|_| SorrelError::ImageWriteError);
            }
        }

        Err(SorrelError::ImageExtensionError)
    }
}

// <<< I/O METHODS

// >>> TRANSFORM METHODS

impl SorrelImage {
    /// Resize the image to a new (width, height)
    ///
    /// Photographs should use `ResizeFilter::Bilinear`. RGB-encoded masks
    /// must use `ResizeFilter::Nearest` as interpolation would generate
    /// colors that exist in no label schema.
    ///
    /// # Arguments
    ///
    /// * `new_width` - New width following resizing
    /// * `new_height` - New height following resizing
    /// * `filter` - Bilinear or nearest-neighbor resampling
    pub fn resize(
        &self,
        new_width: u32,
        new_height: u32,
        filter: ResizeFilter,
    ) -> Result<SorrelImage, SorrelError> {
        if new_width == self.width() && new_height == self.height() {
            return Ok(self.clone());
        }

        let buffer = resize_rgb(
            self.as_raw(),
            self.width(),
            self.height(),
            new_width,
            new_height,
            filter,
        )?;

        SorrelImage::new(new_width, new_height, 3, buffer)
    }
}

// <<< TRANSFORM METHODS
