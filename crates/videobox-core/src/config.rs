//! Configuration
//!
//! [`VideoboxConfig`] holds library-wide tuning shared by every component
//! created from one [`crate::Videobox`] context. The per-component configs
//! mirror the markup attributes a page author sets declaratively.

use crate::{geometry::parse_number, types::PlayerKind, Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default content box width
pub const DEFAULT_WIDTH: f64 = 720.0;
/// Default content box height
pub const DEFAULT_HEIGHT: f64 = 405.0;
/// Width an expand animation starts from when no origin size is known
pub const INITIAL_WIDTH: f64 = 100.0;
/// Default slider/pagination item width
pub const DEFAULT_ITEM_WIDTH: f64 = 240.0;
/// Default pagination page size
pub const DEFAULT_PER_PAGE: f64 = 12.0;

/// How a player embedded in a slider or pager animates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddedPolicy {
    /// Skip expand/collapse animation entirely
    #[default]
    SkipAnimation,
    /// Animate width but keep the slot's aspect ratio
    SkipAspectRatio,
}

/// Library-wide tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoboxConfig {
    /// Default max width of the content box
    pub default_width: f64,
    /// Default max height of the content box
    pub default_height: f64,
    /// Expand start width without an origin size
    pub initial_width: f64,
    /// Room the overlay keeps free around the content box
    pub overlay_chrome: f64,
    /// Room the inline player keeps free around the content box
    pub inline_chrome: f64,
    /// Expand/collapse duration per pixel travelled (ms)
    pub expand_factor: f64,
    /// Slide duration per item-width pixel and step fraction (ms)
    pub slide_factor: f64,
    /// Slider move batching window (ms)
    pub debounce_ms: u64,
    /// Width reserved for slider prev/next cursors
    pub cursor_room: f64,
    /// Default slider/pagination item width
    pub default_item_width: f64,
    /// Default pagination page size
    pub default_per_page: f64,
    /// Duration of fades and the info bar reveal (ms)
    pub animation_ms: f64,
    /// Easing for every keyframe animation
    pub easing: String,
    /// Animation policy for players inside a slider or pager
    pub embedded_policy: EmbeddedPolicy,
}

impl Default for VideoboxConfig {
    fn default() -> Self {
        Self {
            default_width: DEFAULT_WIDTH,
            default_height: DEFAULT_HEIGHT,
            initial_width: INITIAL_WIDTH,
            overlay_chrome: 90.0,
            inline_chrome: 0.0,
            expand_factor: 1.5,
            slide_factor: 15.0,
            debounce_ms: 200,
            cursor_room: 96.0,
            default_item_width: DEFAULT_ITEM_WIDTH,
            default_per_page: DEFAULT_PER_PAGE,
            animation_ms: 500.0,
            easing: "ease-in-out".to_string(),
            embedded_policy: EmbeddedPolicy::SkipAnimation,
        }
    }
}

impl VideoboxConfig {
    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sizes must be positive; factors, margins and durations non-negative
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("default_width", self.default_width),
            ("default_height", self.default_height),
            ("initial_width", self.initial_width),
            ("default_item_width", self.default_item_width),
            ("default_per_page", self.default_per_page),
        ];
        let non_negative = [
            ("overlay_chrome", self.overlay_chrome),
            ("inline_chrome", self.inline_chrome),
            ("expand_factor", self.expand_factor),
            ("slide_factor", self.slide_factor),
            ("cursor_room", self.cursor_room),
            ("animation_ms", self.animation_ms),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Chrome margin for a player kind
    pub fn chrome(&self, kind: PlayerKind) -> f64 {
        match kind {
            PlayerKind::Overlay => self.overlay_chrome,
            PlayerKind::Inline => self.inline_chrome,
        }
    }
}

/// HTML boolean attribute: present means true unless spelled "false"
fn flag(value: &str) -> bool {
    !value.trim().eq_ignore_ascii_case("false")
}

fn text(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Player (`vbx-overlay` / `vbx-inline`) attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Embed URL, opaque to the player
    pub src: Option<String>,
    pub description: Option<String>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    /// Localized close label (`data-close`)
    pub close_label: Option<String>,
}

impl PlayerConfig {
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut config = Self::default();
        for (name, value) in attrs {
            match name {
                "src" => config.src = text(value),
                "description" => config.description = text(value),
                "max-width" => config.max_width = parse_number(value),
                "max-height" => config.max_height = parse_number(value),
                "data-close" => config.close_label = text(value),
                _ => debug!(attribute = name, "Ignoring player attribute"),
            }
        }
        config
    }

    pub fn close_label(&self) -> &str {
        self.close_label.as_deref().unwrap_or("Close")
    }
}

/// Slider (`vbx-slider`) attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Move one item per click instead of a whole window
    pub single: bool,
    pub item_width: Option<f64>,
    /// Restricts which children position the cursors
    pub selector: Option<String>,
    pub prev_label: Option<String>,
    pub next_label: Option<String>,
}

impl SliderConfig {
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut config = Self::default();
        for (name, value) in attrs {
            match name {
                "single" => config.single = flag(value),
                "item-width" => config.item_width = parse_number(value),
                "selector" => config.selector = text(value),
                "data-prev" => config.prev_label = text(value),
                "data-next" => config.next_label = text(value),
                _ => debug!(attribute = name, "Ignoring slider attribute"),
            }
        }
        config
    }

    pub fn prev_label(&self) -> &str {
        self.prev_label.as_deref().unwrap_or("Previous")
    }

    pub fn next_label(&self) -> &str {
        self.next_label.as_deref().unwrap_or("Next")
    }
}

/// Pagination (`vbx-pagination`) attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub per_page: Option<f64>,
    /// Requested page; clamped when read
    pub page: i64,
    pub item_width: Option<f64>,
}

impl PaginationConfig {
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut config = Self::default();
        for (name, value) in attrs {
            match name {
                "per-page" => config.per_page = parse_number(value),
                "page" => config.page = parse_number(value).map(|p| p as i64).unwrap_or(0),
                "item-width" => config.item_width = parse_number(value),
                _ => debug!(attribute = name, "Ignoring pagination attribute"),
            }
        }
        config
    }
}

/// Trigger button (`vbx-button`) attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    pub src: Option<String>,
    pub description: Option<String>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub player: PlayerKind,
    /// Resolves the inline target / animation origin inside the button
    pub selector: Option<String>,
    /// Use the button's own box as origin when no target is found
    pub origin: bool,
}

impl ButtonConfig {
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut config = Self::default();
        for (name, value) in attrs {
            match name {
                "src" => config.src = text(value),
                "description" => config.description = text(value),
                "max-width" => config.max_width = parse_number(value),
                "max-height" => config.max_height = parse_number(value),
                "player" => config.player = PlayerKind::from_attribute(value),
                "selector" => config.selector = text(value),
                "origin" => config.origin = flag(value),
                _ => debug!(attribute = name, "Ignoring button attribute"),
            }
        }
        config
    }
}
