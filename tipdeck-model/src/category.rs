use std::fmt::{self, Display};

/// Grouping key used when interleaving catalog items.
///
/// Items without a tag all share the single `Uncategorized` key, so two
/// untagged items count as the same category for adjacency purposes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryKey {
    Tagged(String),
    Uncategorized,
}

impl CategoryKey {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some(tag) => CategoryKey::Tagged(tag.to_string()),
            None => CategoryKey::Uncategorized,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            CategoryKey::Tagged(tag) => Some(tag),
            CategoryKey::Uncategorized => None,
        }
    }
}

impl From<&str> for CategoryKey {
    fn from(value: &str) -> Self {
        CategoryKey::Tagged(value.to_string())
    }
}

impl Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryKey::Tagged(tag) => write!(f, "{tag}"),
            CategoryKey::Uncategorized => write!(f, "uncategorized"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tag_maps_to_shared_fallback() {
        assert_eq!(CategoryKey::from_tag(None), CategoryKey::Uncategorized);
        assert_eq!(CategoryKey::from_tag(None), CategoryKey::from_tag(None));
        assert_eq!(
            CategoryKey::from_tag(Some("Tip")),
            CategoryKey::from("Tip")
        );
        assert_eq!(CategoryKey::Uncategorized.tag(), None);
    }
}
