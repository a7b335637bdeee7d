// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::constant;
use crate::cv::{ResizeFilter, encode_mask};
use crate::error::SorrelError;
use crate::im::{ColorMap, OneHotMask, SorrelImage};
use crate::ut::path::collect_file_paths;

/// A paired (image, encoded mask) dataset built from two directories
///
/// Both directories are listed with the same extension filter and sorted
/// identically; pairs are formed by position. A listing length mismatch is
/// rejected at construction so misaligned directories fail up front rather
/// than silently pairing the wrong files.
///
/// # Examples
///
/// ```no_run
/// use sorrel_core::ds::PairedDataset;
/// use sorrel_core::im::ColorMap;
///
/// let dataset = PairedDataset::new("train/images", "train/labels", ColorMap::camvid())
///     .unwrap()
///     .with_target_size(512, 512);
///
/// for pair in dataset.iter() {
///     let (image, onehot) = pair.unwrap();
///     assert_eq!(image.width(), onehot.width());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PairedDataset {
    pairs: Vec<(PathBuf, PathBuf)>,
    colormap: ColorMap,
    target_size: Option<(u32, u32)>,
}

impl PairedDataset {
    /// Build a dataset from an image directory and a mask directory
    ///
    /// # Arguments
    ///
    /// * `image_dir` - Directory of photographs
    /// * `mask_dir` - Directory of RGB-encoded masks, listed in the same order
    /// * `colormap` - Label schema used to encode masks on load
    pub fn new<P, Q>(image_dir: P, mask_dir: Q, colormap: ColorMap) -> Result<Self, SorrelError>
    where
        P: AsRef<Path> + ToString,
        Q: AsRef<Path> + ToString,
    {
        let images = collect_file_paths(image_dir, constant::SUPPORTED_IMAGE_FORMATS.as_slice())?;
        let masks = collect_file_paths(mask_dir, constant::SUPPORTED_IMAGE_FORMATS.as_slice())?;

        if images.is_empty() {
            return Err(SorrelError::OtherError(
                "No image files were detected in the image directory".to_string(),
            ));
        }

        if images.len() != masks.len() {
            return Err(SorrelError::ShapeError(format!(
                "Found {} images but {} masks; directories must pair one-to-one",
                images.len(),
                masks.len()
            )));
        }

        let pairs = images.into_iter().zip(masks).collect();

        Ok(PairedDataset {
            pairs,
            colormap,
            target_size: None,
        })
    }

    /// Resize every pair to (width, height) on load
    ///
    /// Photographs are resized bilinearly and masks with nearest-neighbor
    /// so mask colors stay within the label schema.
    pub fn with_target_size(mut self, width: u32, height: u32) -> Self {
        self.target_size = Some((width, height));
        self
    }

    /// Resize every pair to the default 512 x 512 training size on load
    pub fn with_default_target_size(self) -> Self {
        let (width, height) = constant::DEFAULT_TARGET_SIZE;
        self.with_target_size(width, height)
    }

    /// Number of pairs in the dataset
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// A constructed dataset always holds at least one pair
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The paired file paths in iteration order
    pub fn pairs(&self) -> &[(PathBuf, PathBuf)] {
        &self.pairs
    }

    /// The label schema masks are encoded with
    pub fn colormap(&self) -> &ColorMap {
        &self.colormap
    }

    /// Load and encode a single (image, one-hot mask) pair
    ///
    /// # Arguments
    ///
    /// * `index` - Pair index in sorted order
    pub fn get(&self, index: usize) -> Result<(SorrelImage, OneHotMask), SorrelError> {
        let (image_path, mask_path) = self.pairs.get(index).ok_or_else(|| {
            SorrelError::OtherError(format!(
                "Pair index {} is out of bounds for a dataset of {} pairs",
                index,
                self.pairs.len()
            ))
        })?;

        let mut image = SorrelImage::open(image_path)?;
        let mut mask = SorrelImage::open(mask_path)?;

        if let Some((width, height)) = self.target_size {
            image = image.resize(width, height, ResizeFilter::Bilinear)?;
            mask = mask.resize(width, height, ResizeFilter::Nearest)?;
        } else if image.shape() != mask.shape() {
            return Err(SorrelError::ShapeError(format!(
                "Image {} and mask {} have different shapes and no target size is set",
                image_path.display(),
                mask_path.display()
            )));
        }

        let onehot = encode_mask(&mask, &self.colormap)?;

        Ok((image, onehot))
    }

    /// An iterator over all loaded and encoded pairs
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = Result<(SorrelImage, OneHotMask), SorrelError>> + '_ {
        (0..self.len()).map(move |index| self.get(index))
    }

    /// An iterator over fixed-size batches of loaded pairs
    ///
    /// The final batch holds the remainder when the dataset size is not a
    /// multiple of the batch size. Members of each batch are loaded in
    /// parallel.
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Number of pairs per batch; must be positive
    pub fn batches(&self, batch_size: usize) -> Result<Batches<'_>, SorrelError> {
        if batch_size == 0 {
            return Err(SorrelError::OtherError(
                "Batch size must be a positive integer".to_string(),
            ));
        }

        Ok(Batches {
            dataset: self,
            batch_size,
            cursor: 0,
        })
    }
}

/// Iterator over parallel-loaded batches of a [`PairedDataset`]
pub struct Batches<'a> {
    dataset: &'a PairedDataset,
    batch_size: usize,
    cursor: usize,
}

impl Iterator for Batches<'_> {
    type Item = Result<Vec<(SorrelImage, OneHotMask)>, SorrelError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.dataset.len() {
            return None;
        }

        let end = (self.cursor + self.batch_size).min(self.dataset.len());

        let batch = (self.cursor..end)
            .into_par_iter()
            .map(|index| self.dataset.get(index))
            .collect();

        self.cursor = end;

        Some(batch)
    }
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

    fn write_fixture(root: &str, n: usize) {
        std::fs::create_dir_all(format!("{}/images", root)).unwrap();
        std::fs::create_dir_all(format!("{}/labels", root)).unwrap();

        for i in 0..n {
            let image = SorrelImage::new(2, 2, 3, vec![50u8; 12]).unwrap();
            image.save(format!("{}/images/{:03}.png", root, i)).unwrap();

            let mask = SorrelImage::new(
                2,
                2,
                3,
                vec![0, 0, 0, 255, 0, 0, 255, 0, 0, 0, 0, 0],
            )
            .unwrap();
            mask.save(format!("{}/labels/{:03}_L.png", root, i)).unwrap();
        }
    }

    #[test]
    fn test_paired_dataset_get() {
        const ROOT: &str = "TEST_PAIRED_DATASET_GET";
        write_fixture(ROOT, 3);

        let dataset = PairedDataset::new(
            format!("{}/images", ROOT),
            format!("{}/labels", ROOT),
            colormap(),
        )
        .unwrap();

        assert_eq!(dataset.len(), 3);

        let (image, onehot) = dataset.get(0).unwrap();
        assert_eq!(image.shape(), (2, 2, 3));
        assert_eq!(onehot.shape(), (2, 2, 2));

        std::fs::remove_dir_all(ROOT).unwrap();
    }

    #[test]
    fn test_paired_dataset_batches() {
        const ROOT: &str = "TEST_PAIRED_DATASET_BATCHES";
        write_fixture(ROOT, 5);

        let dataset = PairedDataset::new(
            format!("{}/images", ROOT),
            format!("{}/labels", ROOT),
            colormap(),
        )
        .unwrap();

        let sizes: Vec<usize> = dataset
            .batches(2)
            .unwrap()
            .map(|batch| batch.unwrap().len())
            .collect();

        // The final partial batch is included
        assert_eq!(sizes, [2, 2, 1]);

        assert!(dataset.batches(0).is_err());

        std::fs::remove_dir_all(ROOT).unwrap();
    }

    #[test]
    fn test_paired_dataset_length_mismatch() {
        const ROOT: &str = "TEST_PAIRED_DATASET_MISMATCH";
        write_fixture(ROOT, 2);

        std::fs::remove_file(format!("{}/labels/001_L.png", ROOT)).unwrap();

        let dataset = PairedDataset::new(
            format!("{}/images", ROOT),
            format!("{}/labels", ROOT),
            colormap(),
        );

        assert!(dataset.is_err());

        std::fs::remove_dir_all(ROOT).unwrap();
    }

    #[test]
    fn test_paired_dataset_target_size() {
        const ROOT: &str = "TEST_PAIRED_DATASET_TARGET";
        write_fixture(ROOT, 1);

        let dataset = PairedDataset::new(
            format!("{}/images", ROOT),
            format!("{}/labels", ROOT),
            colormap(),
        )
        .unwrap()
        .with_target_size(4, 4);

        let (image, onehot) = dataset.get(0).unwrap();
        assert_eq!(image.shape(), (4, 4, 3));
        assert_eq!(onehot.shape(), (4, 4, 2));

        std::fs::remove_dir_all(ROOT).unwrap();
    }
}
