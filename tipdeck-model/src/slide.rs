use std::fmt::{self, Display};
use std::str::FromStr;

/// Top-level slides of the deck, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SlideId {
    Cover,
    Presenter,
    Features,
    Tips,
}

impl SlideId {
    pub const ALL: [SlideId; 4] = [
        SlideId::Cover,
        SlideId::Presenter,
        SlideId::Features,
        SlideId::Tips,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlideId::Cover => "cover",
            SlideId::Presenter => "presenter",
            SlideId::Features => "features",
            SlideId::Tips => "tips",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SlideId::Cover => "Welcome",
            SlideId::Presenter => "About Me",
            SlideId::Features => "Features",
            SlideId::Tips => "Tips & Tricks",
        }
    }

    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSlide(pub String);

impl Display for UnknownSlide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown slide id: {}", self.0)
    }
}

impl std::error::Error for UnknownSlide {}

impl FromStr for SlideId {
    type Err = UnknownSlide;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('#');
        SlideId::ALL
            .into_iter()
            .find(|slide| slide.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownSlide(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_and_positions() {
        assert_eq!("tips".parse::<SlideId>(), Ok(SlideId::Tips));
        assert_eq!("#presenter".parse::<SlideId>(), Ok(SlideId::Presenter));
        assert!("outro".parse::<SlideId>().is_err());
        for (i, slide) in SlideId::ALL.iter().enumerate() {
            assert_eq!(slide.position(), i);
        }
    }
}
