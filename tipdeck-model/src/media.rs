use std::fmt::{self, Display};

/// Extensions rendered through the video path. Everything else is treated
/// as a still image.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];

/// How a media reference is rendered. Only video reports a playable length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MediaKind {
    Image,
    Video,
}

/// Path or URL of the media shown alongside a tip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MediaRef(pub String);

impl MediaRef {
    pub fn new(path: impl Into<String>) -> Self {
        MediaRef(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> MediaKind {
        let ext = self
            .0
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext {
            Some(ext) if VIDEO_EXTENSIONS.contains(&ext.as_str()) => {
                MediaKind::Video
            }
            _ => MediaKind::Image,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind() == MediaKind::Video
    }
}

impl Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_video_by_extension() {
        assert!(MediaRef::new("/media/publish-to-vercel.mp4").is_video());
        assert!(MediaRef::new("/media/clip.WEBM").is_video());
        assert!(MediaRef::new("demo.mov").is_video());
        assert_eq!(
            MediaRef::new("/images/design-system.png").kind(),
            MediaKind::Image
        );
        assert_eq!(MediaRef::new("/media/loop.gif").kind(), MediaKind::Image);
        assert_eq!(MediaRef::new("no-extension").kind(), MediaKind::Image);
    }
}
