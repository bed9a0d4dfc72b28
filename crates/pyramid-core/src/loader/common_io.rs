// crates/pyramid-core/src/loader/common_io.rs
use crate::error::{PyramidError, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::{Path, PathBuf};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Opens a file, buffers it, and wraps it in a Gzip decoder when the content
/// starts with the gzip magic bytes. Callers never care about compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            PyramidError::NotFound(format!("Dataset not found at {}", path.display()))
        }
        _ => PyramidError::Io(e),
    })?;

    let mut reader = BufReader::new(file);
    let gzipped = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    if !gzipped {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    {
        use flate2::bufread::GzDecoder;
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Err(PyramidError::InvalidData(format!(
            "{} is gzip compressed but the 'compact' feature is disabled",
            path.display()
        )))
    }
}

/// `<dir>/<stem>.json`, else `<dir>/<stem>.json.gz`.
pub fn resolve_dataset(dir: &Path, stem: &str) -> Option<PathBuf> {
    let plain = dir.join(format!("{stem}.json"));
    if plain.is_file() {
        return Some(plain);
    }
    let gz = dir.join(format!("{stem}.json.gz"));
    gz.is_file().then_some(gz)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let reader = open_stream(path)?;
    Ok(serde_json::from_reader(reader)?)
}
