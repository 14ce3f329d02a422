//! Minification for HTML, CSS and JavaScript files.
//!
//! Uses minify-html for markup, lightningcss for CSS and oxc for JavaScript.

use crate::error::{Result, SqueezeError};
use crate::formats::{AssetKind, Stage};
use crate::pipeline::Transform;
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::path::Path;

/// Minify an HTML document.
///
/// Comments and bang-directives are dropped, whitespace is collapsed and
/// inline `<style>`/`<script>` content is minified. Closing tags and the
/// `<html>`/`<head>` opening tags are kept so the output stays valid input.
pub fn minify_html(source: &str) -> Result<String> {
    let cfg = minify_html::Cfg {
        keep_closing_tags: true,
        keep_html_and_head_opening_tags: true,
        keep_comments: false,
        remove_bangs: true,
        minify_css: true,
        minify_js: true,
        ..minify_html::Cfg::default()
    };

    let minified = minify_html::minify(source.as_bytes(), &cfg);
    String::from_utf8(minified)
        .map_err(|_| SqueezeError::Minify("HTML minification produced invalid UTF-8".to_string()))
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String> {
    let stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| SqueezeError::Minify(format!("CSS parse error: {}", e)))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| SqueezeError::Minify(format!("CSS print error: {}", e)))?;
    Ok(result.code)
}

/// Minify JavaScript source code.
///
/// Only whitespace and comments are removed; identifiers are neither mangled
/// nor tree-shaken, so globals referenced from markup keep working. Sources
/// that do not parse as a module are retried as a classic script.
pub fn minify_js(source: &str) -> Result<String> {
    print_js(source, SourceType::mjs())
        .or_else(|_| print_js(source, SourceType::cjs()))
}

fn print_js(source: &str, source_type: SourceType) -> Result<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let reason = ret
            .errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "parser aborted".to_string());
        return Err(SqueezeError::Minify(format!("JavaScript parse error: {}", reason)));
    }

    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .build(&ret.program)
        .code;
    Ok(code)
}

/// Minify `source` according to its kind. Other kinds are returned as-is.
pub fn minify(kind: AssetKind, source: &str) -> Result<String> {
    match kind {
        AssetKind::Html => minify_html(source),
        AssetKind::Css => minify_css(source),
        AssetKind::Js => minify_js(source),
        _ => Ok(source.to_string()),
    }
}

/// True for `*.min.js`-style names, which are shipped already minified.
pub fn is_preminified(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_lowercase().ends_with(".min"))
        .unwrap_or(false)
}

/// The minify stage: text in, minified text out.
#[derive(Debug, Default, Clone, Copy)]
pub struct Minifier;

impl Transform for Minifier {
    fn stage(&self) -> Stage {
        Stage::Minify
    }

    fn apply(&self, path: &Path, kind: AssetKind, input: &[u8]) -> Result<Vec<u8>> {
        if is_preminified(path) {
            return Ok(input.to_vec());
        }
        let source =
            std::str::from_utf8(input).map_err(|_| SqueezeError::InvalidUtf8(path.to_path_buf()))?;
        Ok(minify(kind, source)?.into_bytes())
    }
}
