// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use std::path::Path;

use npyz::{self, DType, NpyFile, TypeChar};

use crate::error::SorrelError;
use crate::im::SorrelBuffer;
use crate::io::write_numpy;

/// A per-pixel class tensor with one channel per class
///
/// Encoded ground-truth masks are u8 tensors where each pixel has at most
/// one channel set to 1. Model predictions are f32 tensors of per-class
/// probabilities with the same (H, W, K) layout; both decode through the
/// same arg-max rule.
///
/// # Examples
///
/// ```
/// use sorrel_core::im::{OneHotMask, SorrelBuffer};
///
/// let onehot = OneHotMask::U8(SorrelBuffer::new(2, 2, 4, vec![0u8; 16]).unwrap());
///
/// assert_eq!(onehot.classes(), 4);
/// assert_eq!(onehot.shape(), (2, 2, 4));
/// ```
#[derive(Debug, Clone)]
pub enum OneHotMask {
    U8(SorrelBuffer<u8, Vec<u8>>),
    F32(SorrelBuffer<f32, Vec<f32>>),
}

// >>> PROPERTY METHODS

impl OneHotMask {
    /// Width of the tensor
    pub fn width(&self) -> u32 {
        match self {
            OneHotMask::U8(buffer) => buffer.width(),
            OneHotMask::F32(buffer) => buffer.width(),
        }
    }

    /// Height of the tensor
    pub fn height(&self) -> u32 {
        match self {
            OneHotMask::U8(buffer) => buffer.height(),
            OneHotMask::F32(buffer) => buffer.height(),
        }
    }

    /// Number of class channels K
    pub fn classes(&self) -> u32 {
        match self {
            OneHotMask::U8(buffer) => buffer.channels(),
            OneHotMask::F32(buffer) => buffer.channels(),
        }
    }

    /// Shape/dimensions of the tensor
    pub fn shape(&self) -> (u32, u32, u32) {
        match self {
            OneHotMask::U8(buffer) => buffer.shape(),
            OneHotMask::F32(buffer) => buffer.shape(),
        }
    }
}

// <<< PROPERTY METHODS

// >>> I/O METHODS

impl OneHotMask {
    /// Open a one-hot or class-probability tensor from a .npy file
    ///
    /// # Arguments
    ///
    /// * `path` - A path to a (height, width, classes) shaped .npy file
    ///
    /// ```no_run
    /// use sorrel_core::im::OneHotMask;
    /// let onehot = OneHotMask::open("encoded.npy");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<OneHotMask, SorrelError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if extension.as_deref() != Some("npy") {
            return Err(SorrelError::ImageExtensionError);
        }

        let bytes = std::fs::read(&path).map_err(|_| SorrelError::ImageReadError)?;
        let npy = NpyFile::new(&bytes[..]).map_err(|_| SorrelError::ImageReadError)?;

        Self::new_from_numpy(npy)
    }

    /// Initialize a tensor from a numpy array buffer
    ///
    /// Accepts u8 and i8 integer tensors (i8 for compatibility with
    /// encoders that write int8 one-hot arrays) and f32/f64 float tensors.
    ///
    /// # Arguments
    ///
    /// * `npy` - A (height, width, classes) shaped numpy array buffer
    pub fn new_from_numpy(npy: NpyFile<&[u8]>) -> Result<OneHotMask, SorrelError> {
        let shape = npy.shape().to_vec();

        if shape.len() != 3 {
            return Err(SorrelError::ShapeError(
                "One-hot tensors must have an (H, W, K) shape".to_string(),
            ));
        }

        let (h, w, k) = (shape[0] as u32, shape[1] as u32, shape[2] as u32);

        match npy.dtype() {
            DType::Plain(x) => match (x.type_char(), x.size_field()) {
                (TypeChar::Uint, 1) => {
                    let buffer = npy
                        .into_vec::<u8>()
                        .map_err(|_| SorrelError::ImageReadError)?;
                    Ok(OneHotMask::U8(SorrelBuffer::new(w, h, k, buffer)?))
                }
                (TypeChar::Int, 1) => {
                    let buffer = npy
                        .into_vec::<i8>()
                        .map_err(|_| SorrelError::ImageReadError)?
                        .into_iter()
                        .map(|value| value as u8)
                        .collect();
                    Ok(OneHotMask::U8(SorrelBuffer::new(w, h, k, buffer)?))
                }
                (TypeChar::Float, 4) => {
                    let buffer = npy
                        .into_vec::<f32>()
                        .map_err(|_| SorrelError::ImageReadError)?;
                    Ok(OneHotMask::F32(SorrelBuffer::new(w, h, k, buffer)?))
                }
                (TypeChar::Float, 8) => {
                    let buffer = npy
                        .into_vec::<f64>()
                        .map_err(|_| SorrelError::ImageReadError)?
                        .into_iter()
                        .map(|value| value as f32)
                        .collect();
                    Ok(OneHotMask::F32(SorrelBuffer::new(w, h, k, buffer)?))
                }
                _ => Err(SorrelError::ImageFormatError),
            },
            _ => Err(SorrelError::ImageFormatError),
        }
    }

    /// Save the tensor to a .npy file
    ///
    /// # Arguments
    ///
    /// * `path` - A path ending in .npy
    ///
    /// ```no_run
    /// use sorrel_core::im::{OneHotMask, SorrelBuffer};
    ///
    /// let onehot = OneHotMask::U8(SorrelBuffer::new(2, 2, 4, vec![0u8; 16]).unwrap());
    /// onehot.save("encoded.npy").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SorrelError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if extension.as_deref() != Some("npy") {
            return Err(SorrelError::ImageExtensionError);
        }

        let shape = vec![
            self.height() as u64,
            self.width() as u64,
            self.classes() as u64,
        ];

        match self {
            OneHotMask::U8(buffer) => write_numpy(path, buffer.as_raw().clone(), shape),
            OneHotMask::F32(buffer) => write_numpy(path, buffer.as_raw().clone(), shape),
        }
    }
}

// <<< I/O METHODS
