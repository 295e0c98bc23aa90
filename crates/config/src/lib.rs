//! Configuration loading and schema for the cowork bridge.
//!
//! Config file: `cowork.toml`, searched in `./` then `~/.config/cowork/`.
//! Every field has a default, so an empty (or missing) file is valid.

pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{config_dir, discover_and_load, load_from_path, save_starter_config},
    schema::{BridgeConfig, CoworkConfig, RoutingConfig},
};
