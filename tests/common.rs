#![allow(dead_code)]

use flate2::read::GzDecoder;
use image::{Rgb, RgbImage};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>  Fixture page  </title>
    <style>
      body   {   margin: 0px;   font-family: sans-serif;   }
    </style>
  </head>
  <body>
    <!-- site header -->
    <header>
      <h1>   Welcome   to   the   fixture   </h1>
    </header>
    <main>
      <p>This    paragraph    has    a    lot    of    extra    whitespace.</p>
      <p>So    does    this    one,    for    good    measure.</p>
    </main>
  </body>
</html>
"#;

pub const SAMPLE_CSS: &str = "/* theme */\nbody {\n  color: #ff0000;\n  margin: 0px 0px 0px 0px;\n}\n\n.card   {\n  padding: 10px;\n}\n";

pub const SAMPLE_JS: &str = "// bootstrap the page\nfunction greet(name) {\n    var message = 'Hello, ' + name;\n    return message;\n}\n\ngreet('world');\n";

pub fn write_file(path: &Path, data: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(data).unwrap();
    path.to_path_buf()
}

/// Writes a small gradient PNG.
pub fn create_png(path: &Path, width: u32, height: u32) -> PathBuf {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 5 % 256) as u8, (y * 3 % 256) as u8, 128])
    });
    img.save(path).unwrap();
    path.to_path_buf()
}

/// a.html (markup), b.png (image) and c.bin (opaque binary).
pub fn create_mixed_site(root: &Path) {
    write_file(&root.join("a.html"), SAMPLE_HTML.as_bytes());
    create_png(&root.join("b.png"), 32, 32);
    write_file(&root.join("c.bin"), &[0xAB; 100]);
}

/// A nested tree with every text kind the minifier handles plus data files.
pub fn create_nested_site(root: &Path) {
    write_file(&root.join("index.html"), SAMPLE_HTML.as_bytes());
    write_file(&root.join("css/site.css"), SAMPLE_CSS.as_bytes());
    write_file(&root.join("js/app.js"), SAMPLE_JS.as_bytes());
    write_file(
        &root.join("data/feed.json"),
        br#"{ "items": [ { "id": 1 }, { "id": 2 }, { "id": 3 } ] }"#,
    );
    write_file(&root.join("img/logo.svg"), b"<svg xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"10\" height=\"10\"/></svg>");
    create_png(&root.join("img/hero.png"), 48, 24);
    write_file(&root.join("bin/archive.dat"), &[0u8, 159, 146, 150, 0, 1]);
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn decompress_brotli(path: &Path) -> Vec<u8> {
    let data = fs::read(path).unwrap();
    let mut out = Vec::new();
    brotli::Decompressor::new(data.as_slice(), 4096)
        .read_to_end(&mut out)
        .unwrap();
    out
}

pub fn decompress_gzip(path: &Path) -> Vec<u8> {
    let data = fs::read(path).unwrap();
    let mut out = Vec::new();
    GzDecoder::new(data.as_slice()).read_to_end(&mut out).unwrap();
    out
}

/// Every file under `root` with the given artifact extension.
pub fn artifacts(root: &Path, extension: &str) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().map(|e| e == extension).unwrap_or(false))
        .collect()
}
