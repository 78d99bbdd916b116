//! Live filesystem adapter using `std::fs`.

use std::path::Path;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let reports = dir.path().join("out").join("reports");

        let fs = LiveFileSystem;
        assert!(!fs.exists(&reports));
        fs.create_dir_all(&reports).unwrap();
        assert!(fs.exists(&reports));
        fs.create_dir_all(&reports).unwrap();
    }

    #[test]
    fn creating_under_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("report.json");
        std::fs::write(&file, "{}").unwrap();
        assert!(LiveFileSystem.create_dir_all(&file.join("nested")).is_err());
    }
}
