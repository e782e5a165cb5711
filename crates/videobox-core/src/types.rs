//! Core types for Videobox

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a mounted player instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player kinds a trigger can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Full-viewport modal player
    #[default]
    #[serde(rename = "videobox")]
    Overlay,
    /// Expand-in-place player
    #[serde(rename = "vbinline")]
    Inline,
}

impl PlayerKind {
    /// All kinds, in broadcast order
    pub const ALL: [PlayerKind; 2] = [PlayerKind::Overlay, PlayerKind::Inline];

    /// Value of the trigger's `player` attribute
    pub fn attribute_value(&self) -> &'static str {
        match self {
            PlayerKind::Overlay => "videobox",
            PlayerKind::Inline => "vbinline",
        }
    }

    /// Custom element tag name
    pub fn tag_name(&self) -> &'static str {
        match self {
            PlayerKind::Overlay => "vbx-overlay",
            PlayerKind::Inline => "vbx-inline",
        }
    }

    /// Parse the `player` attribute; anything unknown opens the overlay
    pub fn from_attribute(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "vbinline" => PlayerKind::Inline,
            _ => PlayerKind::Overlay,
        }
    }
}

impl std::fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.attribute_value())
    }
}

/// Show/hide state machine phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Not visible, nothing mounted
    #[default]
    Closed,
    /// Opening animation running
    Opening,
    /// Fully open, embed ready
    Open,
    /// Closing animation running
    Closing,
}

impl Phase {
    /// Check if transition to target phase is valid
    pub fn can_transition_to(&self, target: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Closed, Opening)
                | (Opening, Open)
                | (Opening, Closing)
                | (Opening, Closed)
                | (Open, Closing)
                | (Open, Closed)
                | (Closing, Closed)
                | (Closing, Opening)
        )
    }

    /// Check if an animation is in flight
    pub fn is_animating(&self) -> bool {
        matches!(self, Phase::Opening | Phase::Closing)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Closed => write!(f, "closed"),
            Phase::Opening => write!(f, "opening"),
            Phase::Open => write!(f, "open"),
            Phase::Closing => write!(f, "closing"),
        }
    }
}

/// Rectangle in viewport pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Zero-sized rectangles belong to elements that are not laid out
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Animation origin: the on-screen rectangle an open animation expands
/// from and a close animation collapses to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Origin {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub w: Option<f64>,
    pub h: Option<f64>,
}

impl Origin {
    /// Point origin without size
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            w: None,
            h: None,
        }
    }

    /// Origin centred on a rectangle, carrying its size
    pub fn from_rect(rect: Rect) -> Self {
        let (x, y) = rect.center();
        Self {
            x: Some(x),
            y: Some(y),
            w: Some(rect.width),
            h: Some(rect.height),
        }
    }

    pub fn has_position(&self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    /// Both sizes present and non-zero, so an aspect ratio exists
    pub fn aspect(&self) -> Option<(f64, f64)> {
        match (self.w, self.h) {
            (Some(w), Some(h)) if w != 0.0 && h != 0.0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Named parts of a component's rendered tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Part {
    /// The component's own host element
    Host,
    /// Overlay backdrop
    Background,
    /// Player content box (max-width animated) or slider viewport
    Wrap,
    /// Aspect-ratio sizer (padding-bottom animated)
    Sizer,
    /// Mounted player content or slider track
    Content,
    /// Embed frame, the focus target
    Video,
    /// Overlay info bar
    Bottom,
    /// Slotted child item by index
    Item(usize),
}

impl std::fmt::Display for Part {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Part::Host => write!(f, "host"),
            Part::Background => write!(f, "background"),
            Part::Wrap => write!(f, "wrap"),
            Part::Sizer => write!(f, "sizer"),
            Part::Content => write!(f, "content"),
            Part::Video => write!(f, "video"),
            Part::Bottom => write!(f, "bottom"),
            Part::Item(i) => write!(f, "item-{}", i),
        }
    }
}

/// Where an inline player lives; slider and pager contexts change how it
/// animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Container {
    #[default]
    Standalone,
    Slider,
    Pager,
}

impl Container {
    pub fn is_embedded(&self) -> bool {
        !matches!(self, Container::Standalone)
    }
}

/// Keys with an activation contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Space,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` / `.code` name
    pub fn from_name(name: &str) -> Self {
        match name {
            "Enter" | "NumpadEnter" => Key::Enter,
            " " | "Space" | "Spacebar" => Key::Space,
            _ => Key::Other,
        }
    }

    /// Map a legacy `keyCode`
    pub fn from_code(code: u32) -> Self {
        match code {
            13 => Key::Enter,
            32 => Key::Space,
            _ => Key::Other,
        }
    }

    /// Enter and Space activate buttons and links
    pub fn activates(&self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        assert!(Phase::Closed.can_transition_to(Phase::Opening));
        assert!(Phase::Opening.can_transition_to(Phase::Open));
        assert!(Phase::Open.can_transition_to(Phase::Closing));
        assert!(Phase::Closing.can_transition_to(Phase::Closed));
        assert!(Phase::Closing.can_transition_to(Phase::Opening));

        assert!(!Phase::Closed.can_transition_to(Phase::Open));
        assert!(!Phase::Closed.can_transition_to(Phase::Closing));
        assert!(!Phase::Open.can_transition_to(Phase::Opening));
    }

    #[test]
    fn test_player_kind_attribute() {
        assert_eq!(PlayerKind::from_attribute("vbinline"), PlayerKind::Inline);
        assert_eq!(PlayerKind::from_attribute("videobox"), PlayerKind::Overlay);
        assert_eq!(PlayerKind::from_attribute("bogus"), PlayerKind::Overlay);
        assert_eq!(PlayerKind::Inline.tag_name(), "vbx-inline");
    }

    #[test]
    fn test_origin_from_rect() {
        let origin = Origin::from_rect(Rect::new(10.0, 20.0, 100.0, 50.0));
        assert_eq!(origin.x, Some(60.0));
        assert_eq!(origin.y, Some(45.0));
        assert_eq!(origin.aspect(), Some((100.0, 50.0)));
        assert!(origin.has_position());
    }

    #[test]
    fn test_origin_aspect_requires_non_zero() {
        let origin = Origin {
            w: Some(0.0),
            h: Some(50.0),
            ..Default::default()
        };
        assert_eq!(origin.aspect(), None);
        assert!(!origin.has_position());
    }

    #[test]
    fn test_keys_by_name() {
        assert_eq!(Key::from_name("Enter"), Key::Enter);
        assert_eq!(Key::from_name("Space"), Key::Space);
        assert_eq!(Key::from_name(" "), Key::Space);
        assert_eq!(Key::from_code(32), Key::Space);
        assert_eq!(Key::from_code(12), Key::Other);
        assert!(Key::Space.activates());
        assert!(!Key::Other.activates());
    }
}
