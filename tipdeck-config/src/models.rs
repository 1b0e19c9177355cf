use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tipdeck_core::settings::{self, CarouselSettings, DeckSettings};
use tipdeck_model::SlideId;

pub const CONFIG_PATH_VAR: &str = "TIPDECK_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "TIPDECK_CONFIG_JSON";

/// Where the loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Carousel timing, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CarouselSection {
    /// Display time for tips that do not set their own `duration`.
    pub tip_duration_ms: u64,
    /// How long the outgoing tip keeps animating out. Navigation is locked
    /// for this long after every step.
    pub transition_window_ms: u64,
    /// Auto-advance fires this long before a video's reported end.
    pub media_lead_out_ms: u64,
}

impl Default for CarouselSection {
    fn default() -> Self {
        Self {
            tip_duration_ms: millis(settings::DEFAULT_TIP_DURATION),
            transition_window_ms: millis(settings::DEFAULT_TRANSITION_WINDOW),
            media_lead_out_ms: millis(settings::DEFAULT_MEDIA_LEAD_OUT),
        }
    }
}

impl CarouselSection {
    pub fn to_settings(&self) -> CarouselSettings {
        CarouselSettings {
            default_duration: Duration::from_millis(self.tip_duration_ms),
            transition_window: Duration::from_millis(self.transition_window_ms),
            media_lead_out: Duration::from_millis(self.media_lead_out_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeckSection {
    pub slide_transition_ms: u64,
    /// Slide shown at startup.
    pub start_slide: SlideId,
}

impl Default for DeckSection {
    fn default() -> Self {
        Self {
            slide_transition_ms: millis(settings::DEFAULT_SLIDE_TRANSITION),
            start_slide: SlideId::Cover,
        }
    }
}

impl DeckSection {
    pub fn to_settings(&self) -> DeckSettings {
        DeckSettings {
            slide_transition: Duration::from_millis(self.slide_transition_ms),
        }
    }
}

/// Top-level tipdeck settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TipdeckConfig {
    pub carousel: CarouselSection,
    pub deck: DeckSection,
    /// Tips catalog file. The bundled catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Fixed shuffle seed for reproducible rounds.
    pub seed: Option<u64>,
}

impl TipdeckConfig {
    /// Load configuration using environment variables.
    /// Evaluation order:
    /// 1) `$TIPDECK_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$TIPDECK_CONFIG_JSON` (inline JSON),
    /// 3) `tipdeck.toml` / `config/tipdeck.toml` in the working directory,
    /// 4) defaults.
    pub fn load_from_env() -> anyhow::Result<(Self, ConfigSource)> {
        let path = env::var(CONFIG_PATH_VAR).ok();
        let inline = env::var(CONFIG_JSON_VAR).ok();
        Self::resolve(path, inline)
    }

    /// Same lookup as [`Self::load_from_env`] with the variable values passed
    /// in.
    pub fn resolve(
        path: Option<String>,
        inline: Option<String>,
    ) -> anyhow::Result<(Self, ConfigSource)> {
        if let Some(path_str) = path
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = inline
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_VAR}"))?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file() {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((Self::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read tipdeck config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid tipdeck config {}", path.display())
            }),
            Some("toml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid tipdeck config {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // TOML first, then JSON.
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse tipdeck config {}: \
                     toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid tipdeck config json: {err}"))
    }

    pub fn carousel_settings(&self) -> CarouselSettings {
        self.carousel.to_settings()
    }

    pub fn deck_settings(&self) -> DeckSettings {
        self.deck.to_settings()
    }

    fn find_default_file() -> Option<PathBuf> {
        const CANDIDATES: &[&str] = &[
            "tipdeck.toml",
            "tipdeck.json",
            "config/tipdeck.toml",
            "config/tipdeck.json",
        ];

        CANDIDATES
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(|path| path.to_path_buf())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
