//! Core data model definitions shared across tipdeck crates.
#![allow(missing_docs)]

pub mod catalog;
pub mod category;
pub mod error;
pub mod feature;
pub mod media;
pub mod slide;

pub use catalog::{Catalog, ContentItem, TipLink};
pub use category::CategoryKey;
pub use error::{ModelError, Result as ModelResult};
pub use feature::{FEATURES, FeaturePoint};
pub use media::{MediaKind, MediaRef};
pub use slide::{SlideId, UnknownSlide};
