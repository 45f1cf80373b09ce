use std::time::Duration;

use savepoint::config::{BackdropPreset, Configuration};

#[test]
fn parse_kebab_case_config() {
    let yaml = r#"
window-title: "Save Point (stage)"
load-delay: 2s
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(cfg.window_title, "Save Point (stage)");
    assert_eq!(cfg.load_delay, Duration::from_secs(2));
    // Untouched keys fall back to defaults.
    assert_eq!(cfg.backdrop, BackdropPreset::Hexagons);
    assert_eq!(cfg.particle_count, 50);
}

#[test]
fn empty_config_is_fully_defaulted() {
    let cfg: Configuration = serde_yaml::from_str("{}").unwrap();
    assert_eq!(cfg.window_title, "Save Point");
    assert_eq!(cfg.load_delay, Duration::from_millis(1000));
    assert_eq!(cfg.contact.endpoint, "https://api.web3forms.com/submit");
    assert_eq!(cfg.contact.to, "john@savepoint.com.au");
    assert!(cfg.validated().is_ok());
}

#[test]
fn parse_backdrop_presets() {
    for (raw, expected) in [
        ("flat", BackdropPreset::Flat),
        ("orbs", BackdropPreset::Orbs),
        ("hexagons", BackdropPreset::Hexagons),
    ] {
        let cfg: Configuration =
            serde_yaml::from_str(&format!("backdrop: {raw}")).unwrap();
        assert_eq!(cfg.backdrop, expected);
    }
}

#[test]
fn unknown_backdrop_preset_is_rejected() {
    let err = serde_yaml::from_str::<Configuration>("backdrop: vortex").unwrap_err();
    assert!(err.to_string().contains("vortex"), "{err}");
}

#[test]
fn parse_overlay_overrides() {
    let yaml = r#"
overlay:
  outer-radius: 3.0
  ring-thickness: 0.1
"#;
    let cfg: Configuration = serde_yaml::from_str(yaml).unwrap();
    assert!((cfg.overlay.outer_radius - 3.0).abs() < f32::EPSILON);
    assert!((cfg.overlay.ring_thickness - 0.1).abs() < f32::EPSILON);
    // Neighboring overlay keys keep their defaults.
    assert!((cfg.overlay.inner_ratio - 0.7).abs() < f32::EPSILON);
    assert!(cfg.overlay.bevel_enabled);
}

#[test]
fn validation_rejects_zero_particles() {
    let cfg: Configuration = serde_yaml::from_str("particle-count: 0").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("particle-count"), "{err}");
}

#[test]
fn validation_rejects_degenerate_hexagon() {
    let cfg: Configuration =
        serde_yaml::from_str("overlay: { inner-ratio: 1.5 }").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("inner-ratio"), "{err}");
}

#[test]
fn validation_rejects_bad_theme_color() {
    let cfg: Configuration =
        serde_yaml::from_str("theme: { muted: \"not-a-color\" }").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("muted"), "{err}");
}

#[test]
fn validation_rejects_multibyte_theme_color() {
    // "€" is 3 bytes, the same length as a bare rgb triplet.
    let cfg: Configuration =
        serde_yaml::from_str("theme: { muted: \"\u{20ac}\" }").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("muted"), "{err}");
}

#[test]
fn validation_rejects_blank_contact_relay() {
    let cfg: Configuration =
        serde_yaml::from_str("contact: { access-key: \"  \" }").unwrap();
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("access-key"), "{err}");
}

#[test]
fn from_yaml_file_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "window-title: From File\nbackdrop: orbs\nreveal-fade: 250ms\n",
    )
    .unwrap();
    let cfg = Configuration::from_yaml_file(&path)
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.window_title, "From File");
    assert_eq!(cfg.backdrop, BackdropPreset::Orbs);
    assert_eq!(cfg.reveal_fade, Duration::from_millis(250));
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Configuration::from_yaml_file(dir.path().join("nope.yaml")).is_err());
}
