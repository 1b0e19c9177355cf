//! Catalog of carousel items.
//!
//! The catalog is supplied once at startup and never mutated. An item's
//! identity is its position in the catalog, so reordering the source table
//! changes every index handed out by the scheduler.

use std::time::Duration;

use crate::category::CategoryKey;
use crate::error::{ModelError, Result};
use crate::media::MediaRef;

/// Optional "read more" link shown below a tip's description.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TipLink {
    pub label: String,
    pub href: String,
}

/// One entry of the carousel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContentItem {
    pub title: String,
    pub description: String,
    /// Category tag shown above the title ("Tip", "Feature", "App Idea").
    #[cfg_attr(feature = "serde", serde(alias = "tag"))]
    pub category: Option<String>,
    /// How long the item stays up before auto-advancing. Falls back to the
    /// carousel default when unset.
    #[cfg_attr(feature = "serde", serde(alias = "duration"))]
    pub display_duration_ms: Option<u64>,
    pub media: Option<MediaRef>,
    /// Playable length declared by the media's metadata, when known ahead of
    /// playback.
    pub media_length_ms: Option<u64>,
    pub link: Option<TipLink>,
    /// Shows the "AI SDK" badge next to the tag.
    #[cfg_attr(feature = "serde", serde(alias = "aiSdk"))]
    pub ai_sdk: bool,
}

impl ContentItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_duration_ms(mut self, ms: u64) -> Self {
        self.display_duration_ms = Some(ms);
        self
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(MediaRef::new(media));
        self
    }

    pub fn with_media_length_ms(mut self, ms: u64) -> Self {
        self.media_length_ms = Some(ms);
        self
    }

    pub fn category_key(&self) -> CategoryKey {
        CategoryKey::from_tag(self.category.as_deref())
    }

    pub fn has_media(&self) -> bool {
        self.media.is_some()
    }

    pub fn has_video(&self) -> bool {
        self.media.as_ref().is_some_and(MediaRef::is_video)
    }

    pub fn display_duration(&self) -> Option<Duration> {
        self.display_duration_ms.map(Duration::from_millis)
    }

    pub fn declared_media_length(&self) -> Option<Duration> {
        self.media_length_ms.map(Duration::from_millis)
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.display_duration_ms == Some(0) {
            return Err(ModelError::InvalidItem {
                index,
                reason: "display duration must be positive".into(),
            });
        }
        if self.media_length_ms == Some(0) {
            return Err(ModelError::InvalidItem {
                index,
                reason: "declared media length must be positive".into(),
            });
        }
        if self.category.as_deref().is_some_and(|tag| tag.trim().is_empty()) {
            return Err(ModelError::InvalidItem {
                index,
                reason: "category tag must not be blank".into(),
            });
        }
        Ok(())
    }
}

/// Fixed, non-empty, ordered list of carousel items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<ContentItem>,
}

impl Catalog {
    pub fn new(items: Vec<ContentItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(ModelError::EmptyCatalog);
        }
        for (index, item) in items.iter().enumerate() {
            item.validate(index)?;
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ContentItem> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentItem> {
        self.items.iter()
    }

    /// Category key of the item at `index`, if the index is in range.
    pub fn category_of(&self, index: usize) -> Option<CategoryKey> {
        self.items.get(index).map(ContentItem::category_key)
    }

    /// Distinct category keys in first-appearance order.
    pub fn categories(&self) -> Vec<CategoryKey> {
        let mut seen: Vec<CategoryKey> = Vec::new();
        for key in self.items.iter().map(ContentItem::category_key) {
            if !seen.contains(&key) {
                seen.push(key);
            }
        }
        seen
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ContentItem;
    type IntoIter = std::slice::Iter<'a, ContentItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_catalog_is_rejected() {
        assert_eq!(Catalog::new(Vec::new()), Err(ModelError::EmptyCatalog));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = Catalog::new(vec![
            ContentItem::new("ok"),
            ContentItem::new("bad").with_duration_ms(0),
        ])
        .expect_err("zero duration must fail");
        assert!(matches!(err, ModelError::InvalidItem { index: 1, .. }));
    }

    #[test]
    fn categories_keep_first_appearance_order() {
        let catalog = Catalog::new(vec![
            ContentItem::new("a").with_category("Tip"),
            ContentItem::new("b"),
            ContentItem::new("c").with_category("Feature"),
            ContentItem::new("d").with_category("Tip"),
        ])
        .expect("valid catalog");

        assert_eq!(
            catalog.categories(),
            vec![
                CategoryKey::from("Tip"),
                CategoryKey::Uncategorized,
                CategoryKey::from("Feature"),
            ]
        );
        assert_eq!(catalog.category_of(1), Some(CategoryKey::Uncategorized));
        assert_eq!(catalog.category_of(9), None);
    }

    #[test]
    fn media_helpers_follow_reference_kind() {
        let video = ContentItem::new("v").with_media("/media/database.mp4");
        let image = ContentItem::new("i").with_media("/images/split.png");
        assert!(video.has_media() && video.has_video());
        assert!(image.has_media() && !image.has_video());
        assert!(!ContentItem::new("none").has_media());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_short_field_aliases() {
        let item: ContentItem = serde_json::from_str(
            r#"{"title":"Split the Bill","tag":"App Idea","duration":8000,"media":"/images/split-the-bill.png"}"#,
        )
        .expect("item json");
        assert_eq!(item.category.as_deref(), Some("App Idea"));
        assert_eq!(item.display_duration(), Some(Duration::from_millis(8000)));
        assert!(!item.ai_sdk);
    }
}
