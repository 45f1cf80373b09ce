use std::fmt;
use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Result};
use serde::de::{self, Deserializer};
use serde::Deserialize;

/// Top-level YAML configuration for the kiosk.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Window title.
    pub window_title: String,
    /// How long the "Loading…" placeholder stays up before the page mounts.
    #[serde(with = "humantime_serde")]
    pub load_delay: Duration,
    /// Duration of each section's one-shot entrance fade.
    #[serde(with = "humantime_serde")]
    pub reveal_fade: Duration,
    /// Which decorative layer to composite over the page.
    pub backdrop: BackdropPreset,
    /// Number of starfield particles in the hero.
    pub particle_count: usize,
    /// Page colors (hex strings).
    pub theme: ThemeConfig,
    /// Glass hexagon overlay parameters.
    pub overlay: OverlayConfig,
    /// Contact form relay settings.
    pub contact: ContactConfig,
}

/// The page variants observed across the site's history differ only in
/// decorative detail; they are exposed as presets of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackdropPreset {
    /// Starfield only.
    Flat,
    /// Starfield plus drifting gradient orbs.
    Orbs,
    /// Starfield plus the glass hexagon overlay.
    #[default]
    Hexagons,
}

impl BackdropPreset {
    const NAMES: &'static [&'static str] = &["flat", "orbs", "hexagons"];

    fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Orbs => "orbs",
            Self::Hexagons => "hexagons",
        }
    }
}

impl fmt::Display for BackdropPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BackdropPreset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "flat" => Ok(Self::Flat),
            "orbs" => Ok(Self::Orbs),
            "hexagons" => Ok(Self::Hexagons),
            _ => Err(de::Error::unknown_variant(&raw, Self::NAMES)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ThemeConfig {
    pub background: String,
    pub foreground: String,
    /// Gradient stops for the hero headline and the CTA, left to right.
    pub gradient: [String; 3],
    pub muted: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#000000".to_string(),
            foreground: "#ffffff".to_string(),
            gradient: [
                // blue-500, purple-500, pink-500
                "#3b82f6".to_string(),
                "#a855f7".to_string(),
                "#ec4899".to_string(),
            ],
            muted: "#9ca3af".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OverlayConfig {
    /// Outer radius of the hexagon silhouette, world units.
    pub outer_radius: f32,
    /// Inner hole radius as a fraction of the outer radius.
    pub inner_ratio: f32,
    /// Extrusion depth.
    pub depth: f32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_segments: u32,
    /// Hollow-ring mask center, in normalized local units.
    pub ring_radius: f32,
    /// Hollow-ring mask width.
    pub ring_thickness: f32,
    pub distortion: f32,
    pub refraction_ratio: f32,
    pub distortion_scale: f32,
    pub temporal_distortion: f32,
    pub blur_strength: f32,
    pub chromatic_offset: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            outer_radius: 4.0,
            inner_ratio: 0.7,
            depth: 0.2,
            bevel_enabled: true,
            bevel_thickness: 0.1,
            bevel_size: 0.1,
            bevel_segments: 3,
            ring_radius: 0.7,
            ring_thickness: 0.05,
            distortion: 0.5,
            refraction_ratio: 0.92,
            distortion_scale: 3.0,
            temporal_distortion: 0.25,
            blur_strength: 0.35,
            chromatic_offset: 0.006,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ContactConfig {
    /// Third-party form relay endpoint.
    pub endpoint: String,
    /// Relay access key; the body field the relay authenticates on.
    pub access_key: String,
    /// Fixed destination address included in every submission body.
    pub to: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.web3forms.com/submit".to_string(),
            access_key: "8fa24e44-9f85-4831-9082-b8772627e673".to_string(),
            to: "john@savepoint.com.au".to_string(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            window_title: "Save Point".to_string(),
            load_delay: Duration::from_millis(1000),
            reveal_fade: Duration::from_millis(800),
            backdrop: BackdropPreset::default(),
            particle_count: 50,
            theme: ThemeConfig::default(),
            overlay: OverlayConfig::default(),
            contact: ContactConfig::default(),
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde
    /// defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(self.particle_count > 0, "particle-count must be positive");
        let ov = &self.overlay;
        ensure!(ov.outer_radius > 0.0, "overlay.outer-radius must be positive");
        ensure!(
            ov.inner_ratio > 0.0 && ov.inner_ratio < 1.0,
            "overlay.inner-ratio must be in (0, 1)"
        );
        ensure!(ov.depth >= 0.0, "overlay.depth must be non-negative");
        ensure!(
            ov.bevel_thickness >= 0.0 && ov.bevel_size >= 0.0,
            "overlay bevel dimensions must be non-negative"
        );
        ensure!(
            ov.ring_radius > 0.0 && ov.ring_thickness > 0.0,
            "overlay ring mask must have positive radius and thickness"
        );
        for (name, value) in [
            ("background", &self.theme.background),
            ("foreground", &self.theme.foreground),
            ("muted", &self.theme.muted),
            ("gradient[0]", &self.theme.gradient[0]),
            ("gradient[1]", &self.theme.gradient[1]),
            ("gradient[2]", &self.theme.gradient[2]),
        ] {
            ensure!(
                parse_hex_color(value).is_some(),
                "theme.{name} is not a valid hex color: {value:?}"
            );
        }
        ensure!(
            !self.contact.endpoint.trim().is_empty(),
            "contact.endpoint must not be empty"
        );
        ensure!(
            !self.contact.access_key.trim().is_empty(),
            "contact.access-key must not be empty"
        );
        ensure!(
            !self.contact.to.trim().is_empty(),
            "contact.to must not be empty"
        );
        Ok(self)
    }
}

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` into linear-unaware sRGB
/// components in [0, 1].
pub fn parse_hex_color(value: &str) -> Option<[f32; 4]> {
    let hex = value.trim().trim_start_matches('#');
    // Byte slicing below requires every position to be a char boundary.
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
    let wide = |s: &str| channel(&s.repeat(2));
    match hex.len() {
        3 => Some([wide(&hex[0..1])?, wide(&hex[1..2])?, wide(&hex[2..3])?, 1.0]),
        4 => Some([
            wide(&hex[0..1])?,
            wide(&hex[1..2])?,
            wide(&hex[2..3])?,
            wide(&hex[3..4])?,
        ]),
        6 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            1.0,
        ]),
        8 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ]),
        _ => None,
    }
}

/// sRGB → linear, per component, for surface-format-correct clear colors.
pub fn srgb_to_linear(color: [f32; 4]) -> [f32; 4] {
    let lin = |c: f32| {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [lin(color[0]), lin(color[1]), lin(color[2]), color[3]]
}
