// crates/pyramid-core/src/loader/builder.rs
#![cfg(feature = "builder")]

use super::{bincode_options, common_io, COUNTRIES_INDEX, STATES_INDEX};
use crate::db::PopDb;
use crate::error::Result;
use crate::model::DbStats;
use crate::traits::PopSearch;
use bincode::Options;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::SystemTime;
use tracing::{info, warn};

#[cfg(feature = "compact")]
use flate2::{write::GzEncoder, Compression};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Gzip,
    None,
}

impl Default for CompressionMode {
    fn default() -> Self {
        #[cfg(feature = "compact")]
        return CompressionMode::Gzip;
        #[cfg(not(feature = "compact"))]
        return CompressionMode::None;
    }
}

/// Reads a data directory and writes it as a single snapshot file.
pub fn build_snapshot(
    source_dir: &Path,
    out_path: &Path,
    compression: CompressionMode,
) -> Result<DbStats> {
    info!(
        source = %source_dir.display(),
        out = %out_path.display(),
        ?compression,
        "building snapshot"
    );
    let db = PopDb::load_dir(source_dir)?;
    write_generic(out_path, &db, compression)?;
    Ok(db.stats())
}

impl PopDb {
    /// Uses `<dir>/popdb.bin` when it is newer than every source file,
    /// otherwise reads the JSON and refreshes the snapshot on a best-effort
    /// basis.
    pub(super) fn load_via_builder(dir: &Path) -> Result<Self> {
        let cache_path = dir.join(Self::default_snapshot_filename());

        if is_cache_fresh(dir, &cache_path) {
            match Self::load_snapshot(&cache_path) {
                Ok(db) => return Ok(db),
                Err(e) => {
                    warn!(path = %cache_path.display(), error = %e, "stale or corrupt snapshot")
                }
            }
        }

        let db = Self::load_dir(dir)?;
        if let Err(e) = write_generic(&cache_path, &db, CompressionMode::default()) {
            warn!(path = %cache_path.display(), error = %e, "could not write snapshot");
        }
        Ok(db)
    }

    pub fn save_as(&self, path: impl AsRef<Path>) -> Result<()> {
        write_generic(path.as_ref(), self, CompressionMode::default())
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Newest modification time below `dir`, one level of subdirectories deep.
fn newest_source(dir: &Path, cache_path: &Path) -> Option<SystemTime> {
    let mut newest: Option<SystemTime> = None;
    let mut bump = |t: Option<SystemTime>| {
        if let Some(t) = t {
            newest = Some(newest.map_or(t, |n| n.max(t)));
        }
    };

    for stem in [COUNTRIES_INDEX, STATES_INDEX] {
        if let Some(p) = common_io::resolve_dataset(dir, stem) {
            bump(modified(&p));
        }
    }

    let entries = fs::read_dir(dir).ok()?;
    for entry in entries.flatten() {
        let path = entry.path();
        if path == cache_path || !path.is_dir() {
            continue;
        }
        bump(modified(&path));
        if let Ok(files) = fs::read_dir(&path) {
            for f in files.flatten() {
                bump(modified(&f.path()));
            }
        }
    }
    newest
}

fn is_cache_fresh(dir: &Path, cache_path: &Path) -> bool {
    let Some(cache_time) = modified(cache_path) else {
        return false;
    };
    match newest_source(dir, cache_path) {
        Some(src) => src <= cache_time,
        None => true,
    }
}

/// Writes any serializable value as bincode, optionally gzip compressed.
fn write_generic<T: Serialize>(path: &Path, value: &T, compression: CompressionMode) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);

    match compression {
        CompressionMode::Gzip => {
            #[cfg(feature = "compact")]
            {
                let mut encoder = GzEncoder::new(writer, Compression::default());
                bincode_options().serialize_into(&mut encoder, value)?;
                encoder.finish()?.flush()?;
            }
            #[cfg(not(feature = "compact"))]
            {
                drop(writer);
                return Err(crate::error::PyramidError::InvalidData(
                    "Gzip requested but 'compact' disabled".into(),
                ));
            }
        }
        CompressionMode::None => {
            let mut writer = writer;
            bincode_options().serialize_into(&mut writer, value)?;
            writer.flush()?;
        }
    }
    Ok(())
}
