use std::io::Write;

use tempfile::{Builder, NamedTempFile};
use tipdeck_config::{ConfigSource, TipdeckConfig, apply_guard_rails, load_catalog};
use tipdeck_model::SlideId;

fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn explicit_path_wins_over_inline_json() {
    let file = temp_file(
        ".toml",
        "catalog_path = \"talk.toml\"\n[carousel]\ntip_duration_ms = 7000\n",
    );
    let path = file.path().display().to_string();

    let (config, source) = TipdeckConfig::resolve(
        Some(path),
        Some(r#"{"carousel": {"tip_duration_ms": 1}}"#.into()),
    )
    .expect("config loads");

    assert_eq!(source, ConfigSource::EnvPath(file.path().to_path_buf()));
    assert_eq!(config.carousel.tip_duration_ms, 7_000);
    assert_eq!(
        config.catalog_path.as_deref(),
        Some(std::path::Path::new("talk.toml"))
    );
}

#[test]
fn blank_path_falls_through_to_inline_json() {
    let (config, source) = TipdeckConfig::resolve(
        Some("   ".into()),
        Some(r#"{"deck": {"start_slide": "features"}, "seed": 3}"#.into()),
    )
    .expect("config loads");

    assert_eq!(source, ConfigSource::EnvInline);
    assert_eq!(config.deck.start_slide, SlideId::Features);
    assert_eq!(config.seed, Some(3));
}

#[test]
fn json_file_is_parsed_by_extension() {
    let file = temp_file(".json", r#"{"carousel": {"transition_window_ms": 900}}"#);
    let config = TipdeckConfig::load_from_file(file.path()).expect("config loads");
    assert_eq!(config.carousel.transition_window_ms, 900);
    assert!(apply_guard_rails(&config).expect("valid").is_empty());
}

#[test]
fn missing_file_reports_its_path() {
    let err = TipdeckConfig::load_from_file(std::path::Path::new("/nonexistent/tipdeck.toml"))
        .expect_err("must fail");
    assert!(err.to_string().contains("/nonexistent/tipdeck.toml"));
}

#[test]
fn bad_inline_json_names_the_variable() {
    let err = TipdeckConfig::resolve(None, Some("{not json".into())).expect_err("must fail");
    assert!(err.to_string().contains("TIPDECK_CONFIG_JSON"));
}

#[test]
fn catalog_file_round_trips_into_catalog() {
    let file = temp_file(
        ".toml",
        r#"
[[tips]]
title = "Use keyboard shortcuts"
tag = "Tip"
duration = 6000

[[tips]]
title = "Live demo"
tag = "Feature"
media = "/media/demo.mp4"
media_length_ms = 9000
link = { label = "Docs", href = "https://example.com/docs" }
"#,
    );

    let catalog = load_catalog(file.path()).expect("catalog loads");
    assert_eq!(catalog.len(), 2);
    let demo = catalog.get(1).expect("second item");
    assert!(demo.has_video());
    assert_eq!(demo.media_length_ms, Some(9_000));
    assert_eq!(demo.link.as_ref().map(|l| l.label.as_str()), Some("Docs"));
}

#[test]
fn invalid_catalog_item_is_rejected() {
    let file = temp_file(".json", r#"{"tips": [{"title": "Zero", "duration": 0}]}"#);
    let err = load_catalog(file.path()).expect_err("zero duration is invalid");
    assert!(format!("{err:#}").contains("item 0"));
}
