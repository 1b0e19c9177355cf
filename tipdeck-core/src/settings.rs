use std::time::Duration;

/// Display time for items that do not configure their own duration.
pub const DEFAULT_TIP_DURATION: Duration = Duration::from_millis(5_000);

/// How long the outgoing item stays rendered while the exit animation runs.
pub const DEFAULT_TRANSITION_WINDOW: Duration = Duration::from_millis(1_200);

/// Auto-advance fires this long before a reported video ends so the fade-out
/// never shows the loop restart.
pub const DEFAULT_MEDIA_LEAD_OUT: Duration = Duration::from_millis(800);

/// Length of the slide-in animation between top-level slides.
pub const DEFAULT_SLIDE_TRANSITION: Duration = Duration::from_millis(500);

/// Timing knobs for the tips carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselSettings {
    pub default_duration: Duration,
    pub transition_window: Duration,
    pub media_lead_out: Duration,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            default_duration: DEFAULT_TIP_DURATION,
            transition_window: DEFAULT_TRANSITION_WINDOW,
            media_lead_out: DEFAULT_MEDIA_LEAD_OUT,
        }
    }
}

/// Timing knobs for top-level slide navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeckSettings {
    pub slide_transition: Duration,
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            slide_transition: DEFAULT_SLIDE_TRANSITION,
        }
    }
}
