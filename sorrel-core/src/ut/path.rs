// Copyright (c) 2026, the sorrel developers
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use crate::error::SorrelError;

/// Ensures a new directory is created with an incrementing suffix if necessary.
///
/// # Arguments
///
/// * `directory` - Path to new directory - no overwrites allowed
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sorrel_core::ut::path::create_directory;
///
/// let base = Path::new("TEST_CREATE_DIRECTORY");
///
/// std::fs::create_dir(base).unwrap();
/// assert!(base.exists());
///
/// let increment_0 = Path::new("TEST_CREATE_DIRECTORY_0/");
///
/// create_directory(base);
///
/// assert!(increment_0.exists());
///
/// std::fs::remove_dir(base);
/// std::fs::remove_dir(increment_0);
/// ```
pub fn create_directory<P: AsRef<Path>>(directory: P) -> Result<PathBuf, SorrelError> {
    let directory = directory.as_ref();

    if !directory.exists() {
        std::fs::create_dir(directory).map_err(|err| SorrelError::DirError(err.to_string()))?;
        return Ok(directory.to_path_buf());
    }

    let parent = directory.parent().unwrap_or_else(|| Path::new("."));
    let base_name = directory
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SorrelError::DirError("Invalid directory name".to_string()))?;

    for index in 0..30 {
        let new_dir = parent.join(format!("{}_{}", base_name, index));

        if !new_dir.exists() {
            std::fs::create_dir(&new_dir).map_err(|err| SorrelError::DirError(err.to_string()))?;
            return Ok(new_dir);
        }
    }

    Err(SorrelError::DirError(format!(
        "Could not create a directory in alotted increments. Check the directory path: {}",
        directory.display()
    )))
}

/// Collect sorted file paths from a directory with an extension filter
///
/// Paths are always returned sorted so that two directory listings made
/// with the same filter can be paired positionally.
///
/// # Arguments
///
/// * `directory` - Path to directory containing files
/// * `valid_ext` - Only include files with one of these extensions
///
/// # Examples
///
/// ```no_run
/// use sorrel_core::constant::SUPPORTED_IMAGE_FORMATS;
/// use sorrel_core::ut::path::collect_file_paths;
///
/// let files = collect_file_paths("directory/", SUPPORTED_IMAGE_FORMATS.as_slice());
/// ```
pub fn collect_file_paths<P>(directory: P, valid_ext: &[&str]) -> Result<Vec<PathBuf>, SorrelError>
where
    P: AsRef<Path> + ToString,
{
    let message = directory.to_string();

    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)
        .map_err(|_| SorrelError::DirError(message))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.to_lowercase())
                    .is_some_and(|ext| valid_ext.contains(&ext.as_str()))
        })
        .collect();

    files.sort_unstable();

    Ok(files)
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_collect_file_paths_sorted() {
        const TEST_DIR: &str = "TEST_COLLECT_FILE_PATHS";

        std::fs::create_dir(TEST_DIR).unwrap();
        std::fs::write(format!("{}/b.png", TEST_DIR), []).unwrap();
        std::fs::write(format!("{}/a.png", TEST_DIR), []).unwrap();
        std::fs::write(format!("{}/c.txt", TEST_DIR), []).unwrap();

        let files = collect_file_paths(TEST_DIR, &["png"]).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.png"));
        assert!(files[1].ends_with("b.png"));

        std::fs::remove_dir_all(TEST_DIR).unwrap();
    }

    #[test]
    fn test_collect_file_paths_missing_directory() {
        assert!(collect_file_paths("TEST_NO_SUCH_DIRECTORY", &["png"]).is_err());
    }
}
