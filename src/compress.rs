//! Brotli and gzip codecs and the sibling artifacts they produce.

use crate::config::Algorithm;
use crate::constants::BROTLI_WINDOW;
use crate::error::{Result, SqueezeError};
use crate::utils::{artifact_path, write_atomically};
use brotli::enc::BrotliEncoderParams;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Cursor, Write};
use std::path::Path;

/// Compresses `data` in memory with `algorithm` at `level`.
///
/// Levels above the algorithm's maximum are clamped.
pub fn compress_bytes(algorithm: Algorithm, data: &[u8], level: u32) -> Result<Vec<u8>> {
    let level = level.min(algorithm.max_level());
    match algorithm {
        Algorithm::Brotli => {
            let mut output = Vec::new();
            let params = BrotliEncoderParams {
                quality: level as i32,
                lgwin: BROTLI_WINDOW as i32,
                size_hint: data.len(),
                ..Default::default()
            };
            brotli::BrotliCompress(&mut Cursor::new(data), &mut output, &params).map_err(|e| {
                SqueezeError::Compression {
                    algorithm: algorithm.name(),
                    reason: e.to_string(),
                }
            })?;
            Ok(output)
        }
        Algorithm::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
            encoder.write_all(data)?;
            encoder.finish().map_err(|e| SqueezeError::Compression {
                algorithm: algorithm.name(),
                reason: e.to_string(),
            })
        }
    }
}

/// Writes the `<source>.<ext>` artifact for `algorithm` and returns its length.
///
/// `data` is the source content as it is on disk right now; any earlier
/// artifact at the same path is replaced.
pub fn write_artifact(source: &Path, data: &[u8], algorithm: Algorithm, level: u32) -> Result<u64> {
    let compressed = compress_bytes(algorithm, data, level)?;
    let target = artifact_path(source, algorithm.extension());
    write_atomically(&target, &compressed, source)?;
    Ok(compressed.len() as u64)
}
