//! Asset kinds and the stage table derived from them.
//!
//! Every eligible file is classified exactly once into an [`AssetKind`]; the
//! kind alone decides which transform stages may touch the file.

use crate::constants::{
    BINARY_EXTENSIONS, CSS_EXTENSIONS, FONT_EXTENSIONS, HTML_EXTENSIONS, JS_EXTENSIONS,
    MANIFEST_EXTENSIONS, TEXT_EXTENSIONS,
};
use image::ImageFormat;
use std::fmt;
use std::path::Path;

/// Raster formats the image optimizer can re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Png,
    Jpeg,
    WebP,
}

impl ImageKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "png" => Some(ImageKind::Png),
            "jpg" | "jpeg" => Some(ImageKind::Jpeg),
            "webp" => Some(ImageKind::WebP),
            _ => None,
        }
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(ImageKind::Png),
            ImageFormat::Jpeg => Some(ImageKind::Jpeg),
            ImageFormat::WebP => Some(ImageKind::WebP),
            _ => None,
        }
    }

    /// Convert to the image crate's ImageFormat
    pub fn to_image_format(self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::WebP => ImageFormat::WebP,
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Png => "PNG",
            ImageKind::Jpeg => "JPEG",
            ImageKind::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

/// What an eligible file is, as far as the pipeline cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Html,
    Css,
    Js,
    /// Compress-only text: XHTML, modules, JSON, XML, SVG, source maps, manifests.
    Text,
    /// Compress-only binary: WebAssembly, web fonts and extension-less images.
    Binary,
    Image(ImageKind),
}

/// The per-file steps a result can report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Minify,
    OptimizeImage,
    Brotli,
    Gzip,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Minify => "minify",
            Stage::OptimizeImage => "optimize-image",
            Stage::Brotli => "brotli",
            Stage::Gzip => "gzip",
        };
        write!(f, "{}", name)
    }
}

impl AssetKind {
    /// Looks up the kind for a (case-insensitive) extension.
    ///
    /// Image extensions always map to [`AssetKind::Image`]; whether images are
    /// eligible at all is decided by the eligibility filter.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.to_lowercase();
        let ext = ext.as_str();

        if HTML_EXTENSIONS.contains(&ext) {
            Some(AssetKind::Html)
        } else if CSS_EXTENSIONS.contains(&ext) {
            Some(AssetKind::Css)
        } else if JS_EXTENSIONS.contains(&ext) {
            Some(AssetKind::Js)
        } else if TEXT_EXTENSIONS.contains(&ext) || MANIFEST_EXTENSIONS.contains(&ext) {
            Some(AssetKind::Text)
        } else if BINARY_EXTENSIONS.contains(&ext) || FONT_EXTENSIONS.contains(&ext) {
            Some(AssetKind::Binary)
        } else {
            ImageKind::from_extension(ext).map(AssetKind::Image)
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(AssetKind::from_extension)
    }

    /// Transform stages that may run on this kind, in execution order.
    pub fn transforms(self) -> &'static [Stage] {
        match self {
            AssetKind::Html | AssetKind::Css | AssetKind::Js => &[Stage::Minify],
            AssetKind::Image(_) => &[Stage::OptimizeImage],
            AssetKind::Text | AssetKind::Binary => &[],
        }
    }

    pub fn image_kind(self) -> Option<ImageKind> {
        match self {
            AssetKind::Image(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Html => write!(f, "HTML"),
            AssetKind::Css => write!(f, "CSS"),
            AssetKind::Js => write!(f, "JavaScript"),
            AssetKind::Text => write!(f, "text"),
            AssetKind::Binary => write!(f, "binary"),
            AssetKind::Image(kind) => write!(f, "{} image", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_from_extension() {
        assert_eq!(AssetKind::from_extension("html"), Some(AssetKind::Html));
        assert_eq!(AssetKind::from_extension("HTML"), Some(AssetKind::Html));
        assert_eq!(AssetKind::from_extension("css"), Some(AssetKind::Css));
        assert_eq!(AssetKind::from_extension("js"), Some(AssetKind::Js));
        assert_eq!(AssetKind::from_extension("htm"), Some(AssetKind::Text));
        assert_eq!(AssetKind::from_extension("xhtml"), Some(AssetKind::Text));
        assert_eq!(AssetKind::from_extension("mjs"), Some(AssetKind::Text));
        assert_eq!(AssetKind::from_extension("cjs"), Some(AssetKind::Text));
        assert_eq!(AssetKind::from_extension("svg"), Some(AssetKind::Text));
        assert_eq!(AssetKind::from_extension("webmanifest"), Some(AssetKind::Text));
        assert_eq!(AssetKind::from_extension("wasm"), Some(AssetKind::Binary));
        assert_eq!(AssetKind::from_extension("woff"), Some(AssetKind::Binary));
        assert_eq!(
            AssetKind::from_extension("JPEG"),
            Some(AssetKind::Image(ImageKind::Jpeg))
        );

        assert_eq!(AssetKind::from_extension("bin"), None);
        assert_eq!(AssetKind::from_extension("br"), None);
        assert_eq!(AssetKind::from_extension("gz"), None);
    }

    #[test]
    fn test_transform_table() {
        assert_eq!(AssetKind::Html.transforms(), &[Stage::Minify]);
        assert_eq!(AssetKind::Js.transforms(), &[Stage::Minify]);
        assert_eq!(
            AssetKind::Image(ImageKind::WebP).transforms(),
            &[Stage::OptimizeImage]
        );
        assert!(AssetKind::Text.transforms().is_empty());
        assert!(AssetKind::Binary.transforms().is_empty());
    }

    #[test]
    fn test_from_path_without_extension() {
        assert_eq!(AssetKind::from_path(Path::new("LICENSE")), None);
        assert_eq!(
            AssetKind::from_path(Path::new("dist/app.min.js")),
            Some(AssetKind::Js)
        );
    }

    #[test]
    fn test_image_kind_round_trip_with_image_format() {
        for kind in [ImageKind::Png, ImageKind::Jpeg, ImageKind::WebP] {
            assert_eq!(ImageKind::from_image_format(kind.to_image_format()), Some(kind));
        }
        assert_eq!(ImageKind::from_image_format(ImageFormat::Gif), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(AssetKind::Image(ImageKind::WebP).to_string(), "WebP image");
        assert_eq!(Stage::OptimizeImage.to_string(), "optimize-image");
    }
}
