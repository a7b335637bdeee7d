// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use std::fmt;

#[derive(Debug, Clone)]
pub enum SorrelError {
    BufferSizeError,
    ChannelBoundsError,
    ColorMapError(&'static str),
    ShapeError(String),
    ImageReadError,
    ImageWriteError,
    ImageFormatError,
    ImageExtensionError,
    TableError(String),
    NoFileError(String),
    DirError(String),
    OtherError(String),
}

impl fmt::Display for SorrelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SorrelError::BufferSizeError => {
                write!(
                    f,
                    "[sorrel::BufferSizeError] The buffer does not match provided size."
                )
            }
            SorrelError::ChannelBoundsError => {
                write!(
                    f,
                    "[sorrel::ChannelBoundsError] The indexed channel is out of bounds."
                )
            }
            SorrelError::ColorMapError(message) => {
                write!(
                    f,
                    "[sorrel::ColorMapError] Invalid class definition table. {}",
                    message
                )
            }
            SorrelError::ShapeError(message) => {
                write!(f, "[sorrel::ShapeError] Shape mismatch. {}", message)
            }
            SorrelError::ImageReadError => {
                write!(f, "[sorrel::ImageReadError] Failed to read image.")
            }
            SorrelError::ImageWriteError => {
                write!(f, "[sorrel::ImageWriteError] Failed to write image.")
            }
            SorrelError::ImageFormatError => {
                write!(
                    f,
                    "[sorrel::ImageFormatError] Only 3-channel u8 RGB images are currently supported."
                )
            }
            SorrelError::ImageExtensionError => {
                write!(
                    f,
                    "[sorrel::ImageExtensionError] Could not detect a valid image extension for input."
                )
            }
            SorrelError::TableError(message) => {
                write!(
                    f,
                    "[sorrel::TableError] Failed to read or write table. {}",
                    message
                )
            }
            SorrelError::NoFileError(message) => {
                write!(
                    f,
                    "[sorrel::NoFileError] File could not be found. {}.",
                    message
                )
            }
            SorrelError::DirError(message) => {
                write!(
                    f,
                    "[sorrel::DirError] Directory could not be read. {}.",
                    message
                )
            }
            SorrelError::OtherError(message) => {
                write!(f, "[sorrel::OtherError] Error: {}.", message)
            }
        }
    }
}

impl std::error::Error for SorrelError {}
