// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constant;
use crate::error::SorrelError;
use crate::io::{read_class_table, read_class_table_json};

/// A single row of a class definition table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntry {
    pub name: String,
    pub color: [u8; 3],
}

/// An ordered class index to RGB triple mapping defining a label schema
///
/// Class indices are assigned by row order, starting at zero. Colors must
/// be unique across classes so that decoding is unambiguous; the table
/// must contain at least one class. Both invariants are enforced at
/// construction, so codec operations never observe a degenerate schema.
///
/// # Examples
///
/// ```
/// use sorrel_core::im::{ClassEntry, ColorMap};
///
/// let colormap = ColorMap::new(vec![
///     ClassEntry { name: "Void".to_string(), color: [0, 0, 0] },
///     ClassEntry { name: "Road".to_string(), color: [128, 64, 128] },
/// ])
/// .unwrap();
///
/// assert_eq!(colormap.len(), 2);
/// assert_eq!(colormap.index_of(&[128, 64, 128]), Some(1));
/// assert_eq!(colormap.index_of(&[1, 2, 3]), None);
/// ```
///
/// ```
/// use sorrel_core::im::ColorMap;
///
/// let colormap = ColorMap::new(vec![]);
/// assert!(colormap.is_err()); // At least one class is required
/// ```
#[derive(Debug, Clone)]
pub struct ColorMap {
    entries: Vec<ClassEntry>,
    lookup: HashMap<[u8; 3], usize>,
}

impl ColorMap {
    /// Build a colormap from class entries in index order
    ///
    /// # Arguments
    ///
    /// * `entries` - Class entries; row position becomes the class index
    pub fn new(entries: Vec<ClassEntry>) -> Result<ColorMap, SorrelError> {
        if entries.is_empty() {
            return Err(SorrelError::ColorMapError(
                "The table must define at least one class.",
            ));
        }

        let mut lookup = HashMap::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            if lookup.insert(entry.color, index).is_some() {
                return Err(SorrelError::ColorMapError(
                    "Two classes share the same color, making decoding ambiguous.",
                ));
            }
        }

        Ok(ColorMap { entries, lookup })
    }

    /// Build a colormap from a class definition table on disk
    ///
    /// Tabular tables (.csv, .tsv, .txt) must carry name, r, g, and b
    /// columns. JSON tables must be an array of `{"name", "color"}`
    /// objects.
    ///
    /// # Arguments
    ///
    /// * `path` - A path to a class definition table
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sorrel_core::im::ColorMap;
    /// let colormap = ColorMap::open("class_dict.csv");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<ColorMap, SorrelError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        let entries = match extension.as_deref() {
            Some("csv") => read_class_table(&path, b',')?,
            Some("tsv") | Some("txt") => read_class_table(&path, b'\t')?,
            Some("json") => read_class_table_json(&path)?,
            _ => {
                return Err(SorrelError::TableError(format!(
                    "Class tables must have one of the following extensions: {}.",
                    constant::SUPPORTED_TABLE_FORMATS.join(", ")
                )));
            }
        };

        Self::new(entries)
    }

    /// The built-in 32-class CamVid label schema
    ///
    /// # Examples
    ///
    /// ```
    /// use sorrel_core::im::ColorMap;
    ///
    /// let colormap = ColorMap::camvid();
    /// assert_eq!(colormap.len(), 32);
    /// ```
    pub fn camvid() -> ColorMap {
        let entries = constant::CAMVID_CLASSES
            .iter()
            .map(|(name, color)| ClassEntry {
                name: name.to_string(),
                color: *color,
            })
            .collect();

        // The built-in table is checked by test, so new cannot fail here
        Self::new(entries).unwrap()
    }

    /// Number of classes in the schema
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A validated colormap always has at least one class
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// RGB triple for a class index
    pub fn color(&self, index: usize) -> Option<[u8; 3]> {
        self.entries.get(index).map(|entry| entry.color)
    }

    /// Class name for a class index
    pub fn name(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.name.as_str())
    }

    /// Class index for an RGB triple, if the color is in the schema
    pub fn index_of(&self, color: &[u8; 3]) -> Option<usize> {
        self.lookup.get(color).copied()
    }

    /// An iterator over class entries in index order
    pub fn iter(&self) -> impl Iterator<Item = &ClassEntry> {
        self.entries.iter()
    }
}
