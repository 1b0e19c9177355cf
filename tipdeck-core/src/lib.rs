//! # Tipdeck Core
//!
//! Scheduling and playback control for the tipdeck talk deck.
//!
//! ## Overview
//!
//! - **Rounds**: [`RoundBuilder`] shuffles the catalog into category-balanced
//!   passes that avoid showing two items of one category back to back
//! - **Playback**: [`CarouselController`] walks rounds forward and backward,
//!   guards against re-entrant steps during transitions, and stretches the
//!   auto-advance for long videos
//! - **Slides**: [`DeckNavigator`] moves between the top-level slides and
//!   [`FeatureCursor`] walks the bullets of the features slide
//! - **Runtime**: [`CarouselHandle`] runs a controller on a tokio task and
//!   publishes [`CarouselSnapshot`]s
//!
//! ## Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use tipdeck_core::{CarouselController, CarouselHandle, CarouselSettings};
//! use tipdeck_model::{Catalog, ContentItem};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(Catalog::new(vec![
//!     ContentItem::new("Use the command palette").with_category("Tip"),
//!     ContentItem::new("Ship a todo app").with_category("App Idea"),
//! ])?);
//! let controller = CarouselController::seeded(
//!     catalog,
//!     CarouselSettings::default(),
//!     7,
//!     tokio::time::Instant::now(),
//! );
//! let mut handle = CarouselHandle::spawn(controller, None);
//! handle.forward().await?;
//! handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```
#![allow(missing_docs)]

pub mod controller;
pub mod deck;
pub mod error;
pub mod probe;
pub mod round;
pub mod runtime;
pub mod settings;

pub use controller::{
    ActivationTicket, CarouselController, CarouselSnapshot, DurationReport, StepDirection,
    StepOutcome,
};
pub use deck::{
    DeckNavigator, DeckOutcome, FeatureCursor, FeatureStep, SlideDirection,
};
pub use error::{CoreError, Result};
pub use probe::{DeclaredLengthProbe, MediaProbe};
pub use round::{Round, RoundBuilder};
pub use runtime::{CarouselCommand, CarouselHandle};
pub use settings::{CarouselSettings, DeckSettings};
