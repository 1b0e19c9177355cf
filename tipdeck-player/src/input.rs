//! Line-based key input and its routing to the deck or the carousel.

use thiserror::Error;
use tipdeck_model::{SlideId, UnknownSlide};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Next,
    Prev,
    Escape,
    Reset,
    GoTo(SlideId),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error(
        "unrecognised input {0:?} (try next, prev, esc, reset, goto <slide>, quit)"
    )]
    Unknown(String),
    #[error("goto needs a slide id")]
    MissingSlide,
    #[error(transparent)]
    Slide(#[from] UnknownSlide),
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Key>, InputError> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };

    let key = match word.to_ascii_lowercase().as_str() {
        "n" | "next" | "right" | "down" => Key::Next,
        "p" | "prev" | "left" | "up" => Key::Prev,
        "esc" | "escape" | "back" => Key::Escape,
        "r" | "reset" => Key::Reset,
        "q" | "quit" | "exit" => Key::Quit,
        "goto" | "g" => {
            let target = words.next().ok_or(InputError::MissingSlide)?;
            Key::GoTo(target.parse()?)
        }
        other => return Err(InputError::Unknown(other.to_string())),
    };
    Ok(Some(key))
}

/// What a key does on the current slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SlideNext,
    SlidePrev,
    SlideGoTo(SlideId),
    /// Leave the tips slide; ignored by the deck anywhere else.
    SlideEscape,
    /// Move the feature highlight; past either end the deck moves instead.
    FeatureNext,
    FeaturePrev,
    /// Step the carousel, then restart its auto-advance timer.
    CarouselForward,
    CarouselBackward,
    CarouselReset,
    Quit,
    Nothing,
}

/// The tips slide owns the directional keys while it is showing; Escape
/// leaves it. The features slide walks its bullet list with them. Everywhere
/// else directional keys move between slides.
pub fn route(key: Key, slide: SlideId) -> Action {
    let on_tips = slide == SlideId::Tips;
    let on_features = slide == SlideId::Features;
    match key {
        Key::Next if on_tips => Action::CarouselForward,
        Key::Prev if on_tips => Action::CarouselBackward,
        Key::Reset if on_tips => Action::CarouselReset,
        Key::Next if on_features => Action::FeatureNext,
        Key::Prev if on_features => Action::FeaturePrev,
        Key::Next => Action::SlideNext,
        Key::Prev => Action::SlidePrev,
        Key::Escape => Action::SlideEscape,
        Key::Reset => Action::Nothing,
        Key::GoTo(target) => Action::SlideGoTo(target),
        Key::Quit => Action::Quit,
    }
}
