// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use std::path::Path;

use npyz::{self, WriterBuilder};

use crate::error::SorrelError;

/// Write a numpy file from a vector of specified shape
///
/// # Arguments
///
/// * `path` - Path to output numpy file
/// * `data` - Vector of numeric type
/// * `shape` - Shape of the vector (shape product must equal length of data)
pub fn write_numpy<T, P: AsRef<Path>>(
    path: P,
    data: Vec<T>,
    shape: Vec<u64>,
) -> Result<(), SorrelError>
where
    T: npyz::Serialize + npyz::AutoSerialize,
{
    let mut buffer = vec![];
    let mut writer = npyz::WriteOptions::<T>::new()
        .default_dtype()
        .shape(&shape)
        .writer(&mut buffer)
        .begin_nd()
        .map_err(|_| SorrelError::ImageWriteError)?;

    for d in data {
        writer.push(&d).map_err(|_| SorrelError::ImageWriteError)?;
    }

    writer.finish().map_err(|_| SorrelError::ImageWriteError)?;
    std::fs::write(path, buffer).map_err(|_| SorrelError::ImageWriteError)?;
    Ok(())
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_write_numpy_roundtrip() {
        const TEST_NUMPY: &str = "TEST_WRITE_NUMPY.npy";

        write_numpy(TEST_NUMPY, vec![0u8, 1, 2, 3, 4, 5], vec![1, 2, 3]).unwrap();

        let bytes = std::fs::read(TEST_NUMPY).unwrap();
        let npy = npyz::NpyFile::new(&bytes[..]).unwrap();

        assert_eq!(npy.shape(), &[1, 2, 3]);
        assert_eq!(npy.into_vec::<u8>().unwrap(), vec![0, 1, 2, 3, 4, 5]);

        std::fs::remove_file(TEST_NUMPY).unwrap();
    }

    #[test]
    fn test_write_numpy_shape_mismatch() {
        const TEST_NUMPY: &str = "TEST_WRITE_NUMPY_MISMATCH.npy";

        assert!(write_numpy(TEST_NUMPY, vec![0u8, 1, 2, 3], vec![1, 2, 3]).is_err());

        let _ = std::fs::remove_file(TEST_NUMPY);
    }
}
