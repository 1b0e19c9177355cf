//! Bullet list shown on the features slide.

use crate::media::MediaRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeaturePoint {
    pub title: &'static str,
    pub description: &'static str,
    pub media: &'static str,
}

impl FeaturePoint {
    pub fn media_ref(&self) -> MediaRef {
        MediaRef::new(self.media)
    }
}

pub const FEATURES: [FeaturePoint; 5] = [
    FeaturePoint {
        title: "Kickstart Your Project",
        description: "Starter templates and AI prompt enhancement turn a \
                      vague idea into a detailed, buildable plan in seconds.",
        media: "/media/browse-templates.mp4",
    },
    FeaturePoint {
        title: "Polish the UI for Free",
        description: "Design mode lets you tweak styles and copy on any \
                      element live without burning a single AI credit.",
        media: "/media/design-mode.mp4",
    },
    FeaturePoint {
        title: "Add Real Backend Power",
        description: "Natively connect databases, sync to GitHub, and \
                      brainstorm implementation details with the AI.",
        media: "/media/backend-sequence.mp4",
    },
    FeaturePoint {
        title: "Experiment Without Fear",
        description: "Every change is auto-versioned with instant rollback, \
                      so you can try bold ideas and revert in one click.",
        media: "/media/version-control.mp4",
    },
    FeaturePoint {
        title: "Ship Instantly",
        description: "One-click deploy gives you a live production URL, and \
                      export lets you download the code or push to GitHub.",
        media: "/media/publish-to-vercel.mp4",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_feature_has_video_media() {
        assert!(FEATURES.iter().all(|point| point.media_ref().is_video()));
        assert_eq!(FEATURES[4].title, "Ship Instantly");
    }
}
