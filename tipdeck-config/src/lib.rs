//! Configuration loading for tipdeck.
//!
//! Timing settings come from a layered lookup (environment, config file,
//! defaults) and are checked by [`apply_guard_rails`] before use. The tips
//! catalog is read from its own TOML or JSON file, with a bundled catalog as
//! the fallback.
#![allow(missing_docs)]

pub mod catalog;
pub mod models;
pub mod validation;

pub use catalog::{CatalogFile, builtin_catalog, load_catalog, parse_catalog};
pub use models::{CarouselSection, ConfigSource, DeckSection, TipdeckConfig};
pub use validation::{
    ConfigGuardRailError, ConfigWarning, ConfigWarnings, apply_guard_rails,
};
