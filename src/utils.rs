/// Utility functions for common operations
///
/// This module contains helper functions that are used across multiple modules
/// to reduce code duplication and improve maintainability.
use crate::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically replace the contents of `target` with `data`
///
/// The bytes are written to a temporary file in the same directory which is
/// then renamed over `target`, so readers see either the old or the new
/// content and a failed write leaves `target` untouched. When `permissions_from`
/// exists its permissions are applied to the new file.
///
/// # Arguments
/// * `target` - The file to create or replace
/// * `data` - The new content
/// * `permissions_from` - File whose mode the result should carry
pub fn write_atomically(target: &Path, data: &[u8], permissions_from: &Path) -> Result<()> {
    let dir = target
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(permissions_from) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

/// Build the sibling artifact path `<path>.<extension>`
///
/// # Example
/// ```
/// use std::path::{Path, PathBuf};
/// use asset_squeeze::utils::artifact_path;
///
/// assert_eq!(artifact_path(Path::new("css/site.css"), "br"), PathBuf::from("css/site.css.br"));
/// ```
pub fn artifact_path(path: &Path, extension: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Calculate compression ratio as a percentage
///
/// # Returns
/// * Size reduction as percentage (positive means reduction, negative means increase)
pub fn calculate_compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - compressed_size as f64) / original_size as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1024), "1.0 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_file_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_calculate_compression_ratio() {
        assert_eq!(calculate_compression_ratio(1000, 800), 20.0);
        assert_eq!(calculate_compression_ratio(1000, 1200), -20.0);
        assert_eq!(calculate_compression_ratio(1000, 1000), 0.0);
        assert_eq!(calculate_compression_ratio(0, 500), 0.0);
    }

    #[test]
    fn test_artifact_path_appends_extension() {
        assert_eq!(
            artifact_path(Path::new("/srv/www/app.min.js"), "gz"),
            PathBuf::from("/srv/www/app.min.js.gz")
        );
        assert_eq!(artifact_path(Path::new("LICENSE"), "br"), PathBuf::from("LICENSE.br"));
    }

    #[test]
    fn test_write_atomically_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("site.css");
        fs::write(&target, b"body { color: red; }").unwrap();

        write_atomically(&target, b"body{color:red}", &target).unwrap();

        assert_eq!(fs::read(&target).unwrap(), b"body{color:red}");
        // No temp files left behind.
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomically_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("app.js");
        fs::write(&source, b"let a = 1;").unwrap();
        fs::set_permissions(&source, fs::Permissions::from_mode(0o644)).unwrap();

        let artifact = artifact_path(&source, "gz");
        write_atomically(&artifact, b"compressed", &source).unwrap();

        let mode = fs::metadata(&artifact).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_write_atomically_fails_without_touching_target() {
        let temp_dir = TempDir::new().unwrap();
        let blocked = temp_dir.path().join("index.html.br");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), b"x").unwrap();

        let result = write_atomically(&blocked, b"data", &blocked);
        assert!(result.is_err());
        assert!(blocked.is_dir());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }
}
