// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use std::iter::Iterator;
use std::marker::PhantomData;
use std::ops::Deref;
use std::slice::ChunksExact;

use num::{FromPrimitive, ToPrimitive};

use crate::error::SorrelError;

/// A row-major container storing a grid of pixels.
///
/// The struct is generic over the subpixel type `T` and over the container
/// that holds raw pixel data as a slice (`[T]`) or vector (`Vec<T>`). The
/// container holding the pixel data must implement `Deref<Target = [T]>`
/// to allow for slice-like access to the data. The length of the container
/// must be equal to the product of `w` * `h` * `c`.
///
/// # Examples
///
/// ```
/// use sorrel_core::im::SorrelBuffer;
///
/// let width = 10;
/// let height = 10;
/// let channels = 3; // RGB
/// let data = vec![0u8; (width * height * channels) as usize];
///
/// let buffer = SorrelBuffer::new(width, height, channels, data);
///
/// assert_eq!(buffer.unwrap().len(), (width * height * channels) as usize);
/// ```
///
/// ```
/// use sorrel_core::im::SorrelBuffer;
///
/// let width = 10;
/// let height = 10;
/// let channels = 3; // RGB
/// let data = vec![0u8; (width * height * 2 * channels) as usize];
///
/// let buffer = SorrelBuffer::new(width, height, channels, data);
///
/// assert!(buffer.is_err()); // Buffer size does not match dimensions
/// ```
#[derive(Debug, Clone)]
pub struct SorrelBuffer<T, Container> {
    w: u32,                   // Width
    h: u32,                   // Height
    c: u32,                   // Channels
    pub buffer: Container,    // Slice
    _phantom: PhantomData<T>, // Pixel
}

impl<T, Container> SorrelBuffer<T, Container>
where
    T: ToPrimitive + FromPrimitive,
    Container: Deref<Target = [T]>,
{
    /// Initializes a buffer from a generic data container
    ///
    /// # Arguments
    ///
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `channels` - Number of channels (e.g. 3 for RGB, K for one-hot)
    /// * `buffer` - A generic container (e.g. `Vec` or slice)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sorrel_core::im::SorrelBuffer;
    /// let buffer = [0, 1, 2, 3];
    /// let buffer = SorrelBuffer::new(2, 2, 1, buffer.as_slice());
    /// ```
    pub fn new(
        width: u32,
        height: u32,
        channels: u32,
        buffer: Container,
    ) -> Result<SorrelBuffer<T, Container>, SorrelError> {
        if width * height * channels == buffer.len() as u32 {
            Ok(SorrelBuffer {
                w: width,
                h: height,
                c: channels,
                buffer,
                _phantom: PhantomData,
            })
        } else {
            Err(SorrelError::BufferSizeError)
        }
    }
}

// >>> PROPERTY METHODS

impl<T, Container> SorrelBuffer<T, Container>
where
    T: ToPrimitive + FromPrimitive,
    Container: Deref<Target = [T]>,
{
    /// Width of the buffer
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height of the buffer
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Number of channels in the buffer
    pub fn channels(&self) -> u32 {
        self.c
    }

    /// Shape/dimensions of the buffer
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.h, self.w, self.c)
    }

    /// Length of the raw buffer
    pub fn len(&self) -> usize {
        (self.w * self.h * self.c) as usize
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl<T, Container> SorrelBuffer<T, Container>
where
    T: ToPrimitive + FromPrimitive,
    Container: Deref<Target = [T]>,
{
    /// Returns the raw buffer
    pub fn into_raw(self) -> Container {
        self.buffer
    }

    /// Returns a reference to the raw buffer
    pub fn as_raw(&self) -> &Container {
        &self.buffer
    }

    /// Cast subpixels to u8 and return the buffer
    pub fn to_u8(&self) -> Vec<u8> {
        self.buffer
            .iter()
            .map(|x| x.to_u8().unwrap_or(0u8))
            .collect()
    }

    /// Cast subpixels to f32 and return the buffer
    pub fn to_f32(&self) -> Vec<f32> {
        self.buffer
            .iter()
            .map(|x| x.to_f32().unwrap_or(0f32))
            .collect()
    }

    // An iterator over the raw buffer
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    // An iterator over a raw channel buffer
    pub fn iter_channel(&self, channel: u32) -> Result<impl Iterator<Item = &T>, SorrelError>
    where
        Container: Deref<Target = [T]>,
    {
        if channel >= self.channels() {
            return Err(SorrelError::ChannelBoundsError);
        }

        Ok(self
            .iter()
            .skip(channel as usize)
            .step_by(self.channels() as usize))
    }

    // An iterator over pixel-level chunks of the raw buffer
    pub fn iter_pixels(&self) -> ChunksExact<T> {
        self.buffer.chunks_exact(self.channels() as usize)
    }
}

// <<< CONVERSION METHODS

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_buffer_new_success() {
        let buffer = SorrelBuffer::new(1, 3, 2, [1, 2, 3, 4, 5, 6].as_slice());
        assert!(buffer.is_ok());
    }

    #[test]
    fn test_buffer_new_error() {
        let buffer = SorrelBuffer::new(2, 3, 2, [1, 2, 3, 4, 5, 6].as_slice());
        assert!(buffer.is_err());
    }

    #[test]
    fn test_buffer_properties() {
        let buffer = SorrelBuffer::new(1, 3, 2, [1, 2, 3, 4, 5, 6].as_slice()).unwrap();
        assert_eq!(buffer.width(), 1);
        assert_eq!(buffer.height(), 3);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.shape(), (3, 1, 2));
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_buffer_as_raw() {
        let buffer = SorrelBuffer::new(1, 3, 2, [1, 2, 3, 4, 5, 6].as_slice());
        assert_eq!(buffer.unwrap().as_raw(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_buffer_to_u8() {
        let buffer = SorrelBuffer::new(1, 2, 2, [2.5, 3.9, 4.8, 2.2].as_slice()).unwrap();
        assert_eq!(buffer.to_u8(), [2, 3, 4, 2]);
    }

    #[test]
    fn test_iter_channel() {
        let buffer = SorrelBuffer::new(2, 1, 3, [1, 2, 3, 4, 5, 6].as_slice()).unwrap();

        for (a, b) in buffer.iter_channel(0).unwrap().zip([1, 4]) {
            assert_eq!(a, &b)
        }

        for (a, b) in buffer.iter_channel(2).unwrap().zip([3, 6]) {
            assert_eq!(a, &b)
        }

        assert!(buffer.iter_channel(3).is_err());
    }

    #[test]
    fn test_iter_pixels() {
        let buffer = SorrelBuffer::new(1, 4, 2, [1, 2, 3, 4, 5, 6, 7, 8].as_slice()).unwrap();

        for (a, b) in buffer.iter_pixels().zip([[1, 2], [3, 4], [5, 6], [7, 8]]) {
            assert_eq!(a[0], b[0]);
            assert_eq!(a[1], b[1]);
        }
    }
}
