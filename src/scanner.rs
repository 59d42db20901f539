// Folder scanning
// Recursively collects the supported images below a folder

use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions the viewer shows, compared case-insensitively
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Whether the path has one of the supported image extensions
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// List every supported image below `root`, sorted by full path.
///
/// Unreadable entries are logged and skipped; whatever was found is returned.
pub fn list_images(root: &Path) -> Vec<PathBuf> {
    let mut images = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry while scanning {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_supported_image(entry.path()) {
            images.push(entry.into_path());
        }
    }
    // Plain string order on the full path, not component-wise
    images.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    debug!("Found {} image(s) under {}", images.len(), root.display());
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn matches_extensions_case_insensitively() {
        assert!(is_supported_image(Path::new("C:\\b\\pic.JPG")));
        assert!(is_supported_image(Path::new("/x/y.Jpeg")));
        assert!(is_supported_image(Path::new("z.bmp")));
        assert!(!is_supported_image(Path::new("C:\\a\\photo.TXT")));
        assert!(!is_supported_image(Path::new("png")));
        assert!(!is_supported_image(Path::new("archive.png.zip")));
    }

    #[test]
    fn lists_sorted_images_only() {
        let dir = tempdir().unwrap();
        for name in ["b.png", "a.PNG", "c.txt"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        assert_eq!(
            list_images(dir.path()),
            vec![dir.path().join("a.PNG"), dir.path().join("b.png")]
        );
    }

    #[test]
    fn descends_into_subfolders() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("2024").join("summer");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("beach.jpeg"), b"").unwrap();
        fs::write(dir.path().join("cover.bmp"), b"").unwrap();
        fs::create_dir(dir.path().join("empty.png")).unwrap();

        assert_eq!(
            list_images(dir.path()),
            vec![nested.join("beach.jpeg"), dir.path().join("cover.bmp")]
        );
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = tempdir().unwrap();
        assert!(list_images(&dir.path().join("gone")).is_empty());
    }
}
