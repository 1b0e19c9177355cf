//! Ties the deck, the carousel runtime and key input together.

use std::sync::Arc;

use anyhow::Context;
use tipdeck_core::{
    CarouselController, CarouselHandle, CarouselSettings, CarouselSnapshot,
    DeckNavigator, DeckOutcome, FeatureCursor, FeatureStep, MediaProbe,
};
use tipdeck_model::{Catalog, FEATURES, SlideId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::input::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Carousel that exists only while the tips slide is showing.
#[derive(Debug)]
struct MountedCarousel {
    handle: CarouselHandle,
    printer: JoinHandle<()>,
}

pub struct App {
    deck: DeckNavigator,
    features: FeatureCursor,
    catalog: Arc<Catalog>,
    settings: CarouselSettings,
    seed: Option<u64>,
    mounts: u64,
    probe: Arc<dyn MediaProbe>,
    carousel: Option<MountedCarousel>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("deck", &self.deck)
            .field("features", &self.features)
            .field("catalog_len", &self.catalog.len())
            .field("settings", &self.settings)
            .field("seed", &self.seed)
            .field("mounts", &self.mounts)
            .field("carousel", &self.carousel)
            .finish()
    }
}

impl App {
    pub fn new(
        deck: DeckNavigator,
        catalog: Arc<Catalog>,
        settings: CarouselSettings,
        seed: Option<u64>,
        probe: Arc<dyn MediaProbe>,
    ) -> Self {
        Self {
            deck,
            features: FeatureCursor::new(FEATURES.len()),
            catalog,
            settings,
            seed,
            mounts: 0,
            probe,
            carousel: None,
        }
    }

    pub fn current_slide(&self) -> SlideId {
        self.deck.current()
    }

    pub fn active_feature(&self) -> usize {
        self.features.active()
    }

    /// Show the starting slide, mounting the carousel if it is the tips one.
    pub fn start(&mut self) {
        let slide = self.deck.current();
        info!(slide = %slide, label = slide.label(), "showing slide");
        self.enter(slide);
    }

    pub async fn dispatch(&mut self, action: Action) -> anyhow::Result<Flow> {
        let now = Instant::now();
        let outcome = match action {
            Action::SlideNext => self.deck.next(now),
            Action::SlidePrev => self.deck.prev(now),
            Action::SlideEscape => self.deck.escape(now),
            Action::SlideGoTo(slide) => self.deck.go_to_slide(slide, now),
            Action::FeatureNext => match self.features.forward() {
                FeatureStep::Moved { to, .. } => {
                    self.show_feature(to);
                    return Ok(Flow::Continue);
                }
                FeatureStep::HandOff(_) => self.deck.next(now),
            },
            Action::FeaturePrev => match self.features.backward() {
                FeatureStep::Moved { to, .. } => {
                    self.show_feature(to);
                    return Ok(Flow::Continue);
                }
                FeatureStep::HandOff(_) => self.deck.prev(now),
            },
            Action::CarouselForward => {
                let handle = self.carousel_handle()?;
                handle.forward().await?;
                handle.reset_timer().await?;
                return Ok(Flow::Continue);
            }
            Action::CarouselBackward => {
                let handle = self.carousel_handle()?;
                handle.backward().await?;
                handle.reset_timer().await?;
                return Ok(Flow::Continue);
            }
            Action::CarouselReset => {
                self.carousel_handle()?.reset_timer().await?;
                return Ok(Flow::Continue);
            }
            Action::Quit => return Ok(Flow::Quit),
            Action::Nothing => return Ok(Flow::Continue),
        };

        if let DeckOutcome::Moved {
            from,
            to,
            direction,
        } = outcome
        {
            info!(slide = %to, label = to.label(), ?direction, "showing slide");
            if from == SlideId::Tips {
                self.unmount_carousel().await?;
            }
            self.enter(to);
        }
        Ok(Flow::Continue)
    }

    fn enter(&mut self, slide: SlideId) {
        match slide {
            SlideId::Features => {
                self.features.reset();
                self.show_feature(self.features.active());
            }
            SlideId::Tips => self.mount_carousel(),
            SlideId::Cover | SlideId::Presenter => {}
        }
    }

    fn show_feature(&self, index: usize) {
        if let Some(point) = FEATURES.get(index) {
            info!(
                feature = index + 1,
                of = FEATURES.len(),
                media = point.media,
                "{}",
                point.title
            );
        }
    }

    /// Seed for the next mount. A fixed seed still gives each visit to the
    /// tips slide its own sequence.
    fn next_seed(&mut self) -> Option<u64> {
        let seed = self.seed.map(|seed| seed.wrapping_add(self.mounts));
        self.mounts += 1;
        seed
    }

    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        self.unmount_carousel().await
    }

    fn carousel_handle(&self) -> anyhow::Result<&CarouselHandle> {
        self.carousel
            .as_ref()
            .map(|mounted| &mounted.handle)
            .context("tips carousel is not mounted")
    }

    fn mount_carousel(&mut self) {
        let now = Instant::now();
        let catalog = Arc::clone(&self.catalog);
        let settings = self.settings;
        let controller = match self.next_seed() {
            Some(seed) => {
                CarouselController::seeded(catalog, settings, seed, now)
            }
            None => CarouselController::from_entropy(catalog, settings, now),
        };
        let probe = Some(Arc::clone(&self.probe));
        let handle = CarouselHandle::spawn(controller, probe);
        let printer = tokio::spawn(print_snapshots(
            Arc::clone(&self.catalog),
            handle.subscribe(),
        ));
        debug!("tips carousel mounted");
        self.carousel = Some(MountedCarousel { handle, printer });
    }

    async fn unmount_carousel(&mut self) -> anyhow::Result<()> {
        let Some(mut mounted) = self.carousel.take() else {
            return Ok(());
        };
        mounted
            .handle
            .shutdown()
            .await
            .context("tips carousel did not stop cleanly")?;
        // The printer exits once the runtime drops its snapshot sender.
        let _ = mounted.printer.await;
        debug!("tips carousel unmounted");
        Ok(())
    }
}

async fn print_snapshots(
    catalog: Arc<Catalog>,
    mut snapshots: watch::Receiver<CarouselSnapshot>,
) {
    let mut shown = None;
    loop {
        let snapshot = *snapshots.borrow_and_update();
        if shown != Some(snapshot.ticket) {
            shown = Some(snapshot.ticket);
            if let Some(item) = catalog.get(snapshot.active_index) {
                info!(
                    position = snapshot.position + 1,
                    of = snapshot.round_len,
                    round = snapshot.rounds_built,
                    category = %item.category_key(),
                    video = item.has_video(),
                    ai_sdk = item.ai_sdk,
                    "{}",
                    item.title
                );
            }
        }
        if snapshots.changed().await.is_err() {
            break;
        }
    }
}
