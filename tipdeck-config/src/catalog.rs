//! Tips catalog files.
//!
//! A catalog file holds an ordered list of `[[tips]]` tables (or a JSON
//! object with a `tips` array). Order matters: an item's position is its
//! identity for the scheduler.

use std::{fs, path::Path};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tipdeck_model::{Catalog, ContentItem};
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("../assets/tips.toml");

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub tips: Vec<ContentItem>,
}

impl CatalogFile {
    pub fn into_catalog(self) -> anyhow::Result<Catalog> {
        Catalog::new(self.tips).context("catalog rejected")
    }
}

/// Read and validate a catalog from disk.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let contents = fs::read_to_string(path).with_context(|| {
        format!("failed to read catalog from {}", path.display())
    })?;

    let shown = path.display();
    let extension = path.extension().and_then(|ext| ext.to_str());
    let file: CatalogFile = match extension {
        Some("json") => serde_json::from_str(&contents)
            .map_err(|err| anyhow!("invalid catalog {shown}: {err}"))?,
        Some("toml") => toml::from_str(&contents)
            .map_err(|err| anyhow!("invalid catalog {shown}: {err}"))?,
        _ => parse_catalog(&contents, &shown.to_string())?,
    };

    let catalog = file
        .into_catalog()
        .with_context(|| format!("invalid catalog {}", path.display()))?;
    debug!(
        path = %path.display(),
        items = catalog.len(),
        categories = catalog.categories().len(),
        "loaded tips catalog"
    );
    Ok(catalog)
}

/// Parse catalog text of unknown format, TOML first.
pub fn parse_catalog(
    contents: &str,
    origin: &str,
) -> anyhow::Result<CatalogFile> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            anyhow!(
                "failed to parse catalog {}: toml error: {}; json error: {}",
                origin,
                toml_err,
                json_err
            )
        })
    })
}

/// The catalog compiled into the binary.
pub fn builtin_catalog() -> anyhow::Result<Catalog> {
    let file: CatalogFile = toml::from_str(BUILTIN_CATALOG)
        .map_err(|err| anyhow!("invalid bundled catalog: {err}"))?;
    file.into_catalog()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tipdeck_model::CategoryKey;

    #[test]
    fn bundled_catalog_loads() {
        let catalog = builtin_catalog().expect("bundled catalog is valid");
        assert_eq!(catalog.len(), 20);
        let categories = catalog.categories();
        assert_eq!(
            categories,
            vec![
                CategoryKey::from("Tip"),
                CategoryKey::from("Feature"),
                CategoryKey::from("App Idea"),
            ]
        );
        let first = catalog.get(0).expect("first item");
        assert!(first.has_video());
        assert_eq!(first.display_duration_ms, Some(12_000));
    }

    #[test]
    fn json_catalog_with_short_field_aliases() {
        let file = parse_catalog(
            r#"{"tips": [{"title": "One", "tag": "Tip", "duration": 4000}, {"title": "Two"}]}"#,
            "inline",
        )
        .expect("valid json");
        let catalog = file.into_catalog().expect("non-empty");
        assert_eq!(catalog.category_of(0), Some(CategoryKey::from("Tip")));
        assert_eq!(catalog.category_of(1), Some(CategoryKey::Uncategorized));
        assert_eq!(catalog.get(0).and_then(|i| i.display_duration_ms), Some(4_000));
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let file = parse_catalog("tips = []", "inline").expect("valid toml");
        let err = file.into_catalog().expect_err("must fail");
        assert!(format!("{err:#}").contains("at least one"));
    }
}
