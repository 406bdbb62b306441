//! Raw byte acquisition for a dataset source.

use std::io::Read as _;

use crate::LoadError;
use crate::config::{Compression, DatasetConfig, DatasetSource};

/// Reads the raw CSV bytes for `config`, decompressing them if needed.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read, the download fails, or
/// decompression fails.
pub async fn fetch_bytes(config: &DatasetConfig) -> Result<Vec<u8>, LoadError> {
    let raw = match &config.source {
        DatasetSource::File { path } => {
            log::info!("[{}] Reading {}", config.id, path.display());
            tokio::fs::read(path).await?
        }
        DatasetSource::Url { url } => {
            log::info!("[{}] Downloading {url}", config.id);
            let response = reqwest::get(url).await?.error_for_status()?;
            response.bytes().await?.to_vec()
        }
    };

    log::debug!("[{}] Read {} bytes", config.id, raw.len());

    decompress(raw, config.compressed)
}

/// Applies the configured decompression to `raw`.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the body is not valid for the compression
/// format.
pub fn decompress(raw: Vec<u8>, compression: Option<Compression>) -> Result<Vec<u8>, LoadError> {
    match compression {
        None => Ok(raw),
        Some(Compression::Gzip) => {
            let mut decoder = flate2::read::GzDecoder::new(raw.as_slice());
            let mut decompressed = Vec::new();
            decoder.read_to_end(&mut decompressed)?;
            log::debug!("Decompressed to {} bytes", decompressed.len());
            Ok(decompressed)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn uncompressed_bytes_pass_through() {
        let raw = b"iyear\n2001\n".to_vec();
        assert_eq!(decompress(raw.clone(), None).unwrap(), raw);
    }

    #[test]
    fn gzip_round_trips() {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(b"iyear\n2001\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let out = decompress(compressed, Some(Compression::Gzip)).unwrap();
        assert_eq!(out, b"iyear\n2001\n");
    }

    #[test]
    fn invalid_gzip_is_an_error() {
        let result = decompress(b"not gzip".to_vec(), Some(Compression::Gzip));
        assert!(matches!(result, Err(LoadError::Io(_))));
    }
}
