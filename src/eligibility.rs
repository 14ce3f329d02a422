use crate::config::PipelineConfig;
use crate::constants::{COMPRESSIBLE_MIME_PREFIXES, SNIFF_LEN, WASM_MAGIC};
use crate::error::Result;
use crate::formats::{AssetKind, ImageKind};
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Classifies `path`, returning `None` for anything the pipeline must not touch.
///
/// A file is eligible when it is a non-empty regular file (symlinks are not
/// followed) whose extension, or failing that its content type, is in the
/// compressible set. Images only qualify while image optimization is enabled.
///
/// # Returns
/// * `Ok(Some(kind))` - The file is eligible
/// * `Ok(None)` - The file is ineligible
/// * `Err(SqueezeError)` - The file's metadata or header could not be read
pub fn classify(path: &Path, config: &PipelineConfig) -> Result<Option<AssetKind>> {
    let metadata = fs::symlink_metadata(path)?;
    if !metadata.file_type().is_file() || metadata.len() == 0 {
        return Ok(None);
    }

    let kind = match path.extension() {
        Some(ext) => {
            let ext = ext.to_string_lossy();
            AssetKind::from_extension(&ext).or_else(|| kind_from_mime(path))
        }
        None => sniff_content(path, config.optimize_images)?,
    };

    Ok(kind.filter(|kind| config.optimize_images || !matches!(kind, AssetKind::Image(_))))
}

/// Convenience predicate over [`classify`]; unreadable files are ineligible.
pub fn is_eligible(path: &Path, config: &PipelineConfig) -> bool {
    matches!(classify(path, config), Ok(Some(_)))
}

/// Extension-based MIME lookup for extensions missing from the asset table.
fn kind_from_mime(path: &Path) -> Option<AssetKind> {
    let mime = mime_guess::from_path(path).first()?;
    let essence = mime.essence_str();
    if !COMPRESSIBLE_MIME_PREFIXES
        .iter()
        .any(|prefix| essence.starts_with(prefix))
    {
        return None;
    }

    Some(if essence == "application/wasm" {
        AssetKind::Binary
    } else {
        AssetKind::Text
    })
}

/// Guesses the kind of an extension-less file from its first bytes.
///
/// Never yields an [`AssetKind::Image`]: only files with an image extension
/// are re-encoded, so a sniffed image is compressed as opaque binary.
fn sniff_content(path: &Path, images: bool) -> Result<Option<AssetKind>> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;

    if head.starts_with(WASM_MAGIC) {
        return Ok(Some(AssetKind::Binary));
    }

    if image::guess_format(&head)
        .ok()
        .and_then(ImageKind::from_image_format)
        .is_some()
    {
        return Ok(images.then_some(AssetKind::Binary));
    }

    Ok(looks_like_text(&head).then_some(AssetKind::Text))
}

fn looks_like_text(head: &[u8]) -> bool {
    if head.contains(&0) {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // A multi-byte character may be cut at the sniff boundary.
        Err(e) => e.error_len().is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(data).unwrap();
        path
    }

    fn config(dir: &Path, images: bool) -> PipelineConfig {
        PipelineConfig::builder(dir)
            .optimize_images(images)
            .build()
            .unwrap()
    }

    #[test]
    fn test_recognized_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), true);

        let html = write(temp_dir.path(), "index.html", b"<p>hi</p>");
        let css = write(temp_dir.path(), "site.CSS", b"a{}");
        let font = write(temp_dir.path(), "font.woff", b"wOFF");

        assert_eq!(classify(&html, &config).unwrap(), Some(AssetKind::Html));
        assert_eq!(classify(&css, &config).unwrap(), Some(AssetKind::Css));
        assert_eq!(classify(&font, &config).unwrap(), Some(AssetKind::Binary));
    }

    #[test]
    fn test_empty_file_is_ineligible() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), true);
        let empty = write(temp_dir.path(), "empty.js", b"");
        assert!(!is_eligible(&empty, &config));
    }

    #[test]
    fn test_directory_is_ineligible() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), true);
        let dir = temp_dir.path().join("styles.css");
        fs::create_dir(&dir).unwrap();
        assert!(!is_eligible(&dir, &config));
    }

    #[test]
    fn test_unknown_binary_is_ineligible() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), true);
        let bin = write(temp_dir.path(), "c.bin", &[0u8, 1, 2, 3, 255]);
        assert!(!is_eligible(&bin, &config));
    }

    #[test]
    fn test_artifacts_are_ineligible() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), true);
        let br = write(temp_dir.path(), "app.js.br", b"\x1b\x00\x00");
        let gz = write(temp_dir.path(), "app.js.gz", b"\x1f\x8b\x08");
        assert!(!is_eligible(&br, &config));
        assert!(!is_eligible(&gz, &config));
    }

    #[test]
    fn test_images_follow_optimize_flag() {
        let temp_dir = TempDir::new().unwrap();
        let png = write(temp_dir.path(), "b.png", b"\x89PNG\r\n\x1a\nrest");

        assert_eq!(
            classify(&png, &config(temp_dir.path(), true)).unwrap(),
            Some(AssetKind::Image(ImageKind::Png))
        );
        assert_eq!(classify(&png, &config(temp_dir.path(), false)).unwrap(), None);
    }

    #[test]
    fn test_mime_fallback_for_unlisted_extension() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), true);
        let yaml = write(temp_dir.path(), "data.yaml", b"key: value\n");
        let zip = write(temp_dir.path(), "bundle.zip", b"PK\x03\x04");

        assert_eq!(classify(&yaml, &config).unwrap(), Some(AssetKind::Text));
        assert_eq!(classify(&zip, &config).unwrap(), None);
    }

    #[test]
    fn test_sniffing_extensionless_files() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), true);

        let wasm = write(temp_dir.path(), "module", b"\0asm\x01\0\0\0");
        let text = write(temp_dir.path(), "LICENSE", b"MIT License\n\nPermission is hereby granted");
        let png = write(temp_dir.path(), "logo", b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR");
        let binary = write(temp_dir.path(), "blob", &[0xde, 0xad, 0x00, 0xbe, 0xef]);

        assert_eq!(classify(&wasm, &config).unwrap(), Some(AssetKind::Binary));
        assert_eq!(classify(&text, &config).unwrap(), Some(AssetKind::Text));
        assert_eq!(classify(&png, &config).unwrap(), Some(AssetKind::Binary));
        assert_eq!(classify(&binary, &config).unwrap(), None);
    }

    #[test]
    fn test_sniffed_image_follows_image_flag() {
        let temp_dir = TempDir::new().unwrap();
        let png = write(temp_dir.path(), "logo", b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR");

        let kind = classify(&png, &config(temp_dir.path(), true)).unwrap();
        assert!(kind.unwrap().transforms().is_empty());
        assert_eq!(classify(&png, &config(temp_dir.path(), false)).unwrap(), None);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let config = config(temp_dir.path(), true);
        let missing = temp_dir.path().join("gone.css");
        assert!(classify(&missing, &config).is_err());
        assert!(!is_eligible(&missing, &config));
    }

    #[test]
    fn test_looks_like_text() {
        assert!(looks_like_text(b"hello"));
        assert!(looks_like_text("caf\u{e9}".as_bytes()));
        // Truncated multi-byte sequence at the end of the sniff window.
        assert!(looks_like_text(&[b'a', 0xc3]));
        assert!(!looks_like_text(&[b'a', 0x00, b'b']));
        assert!(!looks_like_text(&[0xff, 0xfe, b'a']));
    }
}
