use std::time::Duration;

use async_trait::async_trait;
use tipdeck_model::ContentItem;

/// Looks up how long an item's video actually plays.
///
/// The carousel asks once per activation of a video item and extends the
/// auto-advance when the answer is longer than the configured duration.
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// `None` when the length is unknown.
    async fn media_length(&self, item: &ContentItem) -> Option<Duration>;
}

/// Answers with the length declared in the catalog entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredLengthProbe;

#[async_trait]
impl MediaProbe for DeclaredLengthProbe {
    async fn media_length(&self, item: &ContentItem) -> Option<Duration> {
        item.declared_media_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn declared_probe_reads_catalog_length() {
        let probe = DeclaredLengthProbe;
        let item = ContentItem::new("demo")
            .with_media("/tips/demo.mp4")
            .with_media_length_ms(9_000);
        assert_eq!(
            probe.media_length(&item).await,
            Some(Duration::from_millis(9_000))
        );
        assert_eq!(probe.media_length(&ContentItem::new("plain")).await, None);
    }
}
