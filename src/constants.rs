pub const DEFAULT_BROTLI_LEVEL: u32 = 11;
pub const MAX_BROTLI_LEVEL: u32 = 11;
pub const DEFAULT_GZIP_LEVEL: u32 = 9;
pub const MAX_GZIP_LEVEL: u32 = 9;
pub const DEFAULT_ALGORITHMS: &str = "br,gz";

/// Brotli sliding window (log2), same as the reference encoder default.
pub const BROTLI_WINDOW: u32 = 22;

pub const PNG_QUALITY: u8 = 85;
pub const JPEG_QUALITY: u8 = 85;
pub const WEBP_QUALITY: f32 = 80.0;

pub const OXIPNG_PRESET: u8 = 4;
pub const ZOPFLI_ITERATIONS: u8 = 15;
pub const LIBDEFLATER_HIGH_LEVEL: u8 = 12;
pub const LIBDEFLATER_LOW_LEVEL: u8 = 8;

/// Images larger than this are not decoded.
pub const MAX_IMAGE_FILE_SIZE: u64 = 100 * 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 16384;

/// Bytes read when sniffing the content type of an extension-less file.
pub const SNIFF_LEN: usize = 512;

pub const BROTLI_EXTENSION: &str = "br";
pub const GZIP_EXTENSION: &str = "gz";

/// Only these three extensions are ever minified.
pub const HTML_EXTENSIONS: &[&str] = &["html"];
pub const CSS_EXTENSIONS: &[&str] = &["css"];
pub const JS_EXTENSIONS: &[&str] = &["js"];

/// Compressed but never rewritten. `xhtml` must stay well-formed XML.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "htm", "xhtml", "mjs", "cjs", "txt", "csv", "md", "ics", "vtt", "json", "map", "jsonld",
    "xml", "rss", "atom", "svg",
];
pub const BINARY_EXTENSIONS: &[&str] = &["wasm"];
pub const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "eot", "woff"];
pub const MANIFEST_EXTENSIONS: &[&str] = &["webmanifest", "manifest", "appcache"];

/// MIME prefixes accepted when the extension alone is not recognized.
pub const COMPRESSIBLE_MIME_PREFIXES: &[&str] = &[
    "text/",
    "application/javascript",
    "application/json",
    "application/xml",
    "image/svg+xml",
    "application/wasm",
];

pub const WASM_MAGIC: &[u8] = b"\0asm";

pub const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Summary output prefixes
pub const SUMMARY_PREFIX: &str = "📊";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
