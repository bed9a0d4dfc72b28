//! # pyramid-cli
//!
//! Command-line interface and JSON API for
//! [`pyramid-core`](https://docs.rs/pyramid-core).
//!
//! ```bash
//! cargo install pyramid-cli
//!
//! pyramid stats
//! pyramid country japan
//! pyramid pyramid japan 2024 --percent
//! pyramid compare japan nigeria 2024
//! pyramid metrics california 2023
//! pyramid growth 2000 2024 -n 5
//! pyramid --data ./data build data/popdb.bin
//! pyramid serve --port 8080
//! ```
//!
//! Settings are read from `pyramid.toml` (or `--config FILE`):
//!
//! ```toml
//! [data]
//! dir = "data"
//! # snapshot = "data/popdb.bin"
//!
//! [server]
//! host = "127.0.0.1"
//! port = 3000
//! ```
//!
//! The library half exposes the config loader and the axum router so the
//! API can be mounted or tested without the binary.

pub mod config;
pub mod server;
