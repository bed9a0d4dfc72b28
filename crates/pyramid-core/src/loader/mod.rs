// crates/pyramid-core/src/loader/mod.rs

//! # Data Loader
//!
//! Handles the physical layer (I/O, decompression) for both the JSON data
//! directory and the bincode snapshot built from it.

use crate::db::PopDb;
use crate::error::{PyramidError, Result};
use bincode::Options;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use tracing::debug;

pub mod common_io;
mod dir;

#[cfg(feature = "builder")]
pub mod builder;

pub use dir::{COUNTRIES_INDEX, FERTILITY_DIR, POPULATION_DIR, STATES_DIR, STATES_INDEX};

// Single in-process cache so we only deserialize once per process.
static POP_DB_CACHE: OnceCell<PopDb> = OnceCell::new();

/// Overrides [`PopDb::default_data_dir`].
pub const DATA_DIR_ENV: &str = "PYRAMID_DATA_DIR";

/// Snapshots larger than this are rejected instead of allocated.
const SNAPSHOT_LIMIT: u64 = 512 * 1024 * 1024;

pub(crate) fn bincode_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(SNAPSHOT_LIMIT)
        .allow_trailing_bytes()
}

impl PopDb {
    /// `$PYRAMID_DATA_DIR`, else `data/` next to this crate.
    pub fn default_data_dir() -> PathBuf {
        std::env::var_os(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn default_snapshot_filename() -> &'static str {
        "popdb.bin"
    }

    /// Loads the default data directory once per process.
    ///
    /// With the `builder` feature a fresh `popdb.bin` snapshot is preferred and
    /// rewritten when stale; otherwise the JSON files are read directly.
    pub fn load() -> Result<&'static PopDb> {
        POP_DB_CACHE.get_or_try_init(|| Self::load_from_path(Self::default_data_dir()))
    }

    /// A directory is read as a data directory, a file as a snapshot.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            #[cfg(feature = "builder")]
            return Self::load_via_builder(path);

            #[cfg(not(feature = "builder"))]
            return Self::load_dir(path);
        }
        Self::load_snapshot(path)
    }

    /// Reads a bincode snapshot, gzip compressed or not.
    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading snapshot");
        let reader = common_io::open_stream(path)?;
        bincode_options()
            .deserialize_from(reader)
            .map_err(|e| PyramidError::InvalidData(format!("{}: {e}", path.display())))
    }
}
