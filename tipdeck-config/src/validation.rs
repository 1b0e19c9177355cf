use thiserror::Error;

use crate::models::TipdeckConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigGuardRailError {
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: String,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: hint.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Reject settings the carousel cannot run with and collect the ones that
/// merely look wrong.
pub fn apply_guard_rails(
    config: &TipdeckConfig,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let carousel = &config.carousel;
    for (field, value) in [
        ("carousel.tip_duration_ms", carousel.tip_duration_ms),
        ("carousel.transition_window_ms", carousel.transition_window_ms),
        ("deck.slide_transition_ms", config.deck.slide_transition_ms),
    ] {
        if value == 0 {
            return Err(ConfigGuardRailError::ZeroDuration { field });
        }
    }

    let mut warnings = ConfigWarnings::default();

    if carousel.transition_window_ms >= carousel.tip_duration_ms {
        warnings.push_with_hint(
            "transition window is not shorter than the default tip duration",
            "tips on the default duration wait for the exit animation \
             before every auto-advance",
        );
    }

    if carousel.media_lead_out_ms == 0 {
        warnings.push_with_hint(
            "media lead-out is zero",
            "the carousel advances exactly as a video ends and may show \
             its first frame again",
        );
    }

    Ok(warnings)
}
