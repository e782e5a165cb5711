//! Render models.
//!
//! Each component renders by turning its committed state into one of these
//! values; a [`crate::Surface`] applies it to the document. [`View::renders`]
//! tells which parts exist in the resulting tree, which is what makes
//! "target not rendered" decidable without a browser.

use crate::{
    icon::IconShape,
    types::{Part, PlayerKind},
};
use serde::Serialize;

/// Any component's view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "component", rename_all = "snake_case")]
pub enum View {
    Player(PlayerView),
    Slider(SliderView),
    Pagination(PaginationView),
    Button(ButtonView),
    Trigger(TriggerView),
}

impl View {
    /// Whether `part` exists in the tree this view renders
    pub fn renders(&self, part: Part) -> bool {
        if part == Part::Host {
            return true;
        }
        match self {
            View::Player(v) => match part {
                Part::Background => v.kind == PlayerKind::Overlay,
                Part::Wrap | Part::Sizer => true,
                Part::Content => v.content_open,
                Part::Video => v.frame,
                Part::Bottom => v.info_bar,
                _ => false,
            },
            View::Slider(v) => match part {
                Part::Wrap | Part::Content => true,
                Part::Item(i) => v.items.contains(&i),
                _ => false,
            },
            View::Pagination(v) => match part {
                Part::Wrap => true,
                Part::Item(i) => v.slots.contains(&Some(i)),
                _ => false,
            },
            View::Button(_) | View::Trigger(_) => false,
        }
    }
}

/// Overlay or inline player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub kind: PlayerKind,
    pub open: bool,
    /// Content box max-width; unset until first measured
    pub width: Option<f64>,
    /// Sizer padding-bottom percentage
    pub aspect_percent: f64,
    pub content_open: bool,
    /// Embed frame present
    pub frame: bool,
    /// Embed URL, committed only once the box reached its final size
    pub src: Option<String>,
    pub description: Option<String>,
    pub close_label: String,
    /// Overlay info bar with description and close button
    pub info_bar: bool,
    pub close_icons: Vec<IconShape>,
}

/// Carousel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderView {
    /// Child indices in the active window, in display order
    pub items: Vec<usize>,
    /// Track width relative to the viewport
    pub track_width_percent: f64,
    pub item_basis: f64,
    /// Per-item max-width percentage (before gutter)
    pub item_max_percent: f64,
    /// Prev/next cursors shown
    pub cursors: bool,
    pub cursor_offset: f64,
    pub prev_label: String,
    pub next_label: String,
}

/// Paged grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginationView {
    /// Child index per slot; `None` renders an empty filler slot
    pub slots: Vec<Option<usize>>,
    pub item_basis: f64,
    pub column_percent: f64,
    /// Page links; empty when there is a single page
    pub pages: Vec<PageLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLink {
    pub index: usize,
    pub label: String,
    pub current: bool,
    pub aria_label: String,
}

/// Which slot a trigger button projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSlot {
    /// Clickable trigger wrapping the default slot
    Trigger,
    /// Inline player living inside the button
    Player,
    /// Inline player placed next to a target among the children
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ButtonView {
    pub slot: ButtonSlot,
    pub title: Option<String>,
}

/// Decorative play-button wrapper
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerView {
    pub icon: IconShape,
}

impl Default for TriggerView {
    fn default() -> Self {
        Self {
            icon: IconShape::Play,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(kind: PlayerKind) -> PlayerView {
        PlayerView {
            kind,
            open: true,
            width: Some(720.0),
            aspect_percent: 56.25,
            content_open: true,
            frame: true,
            src: None,
            description: None,
            close_label: "Close".into(),
            info_bar: false,
            close_icons: vec![IconShape::Close],
        }
    }

    #[test]
    fn test_player_parts() {
        let overlay = View::Player(player(PlayerKind::Overlay));
        assert!(overlay.renders(Part::Host));
        assert!(overlay.renders(Part::Background));
        assert!(overlay.renders(Part::Wrap));
        assert!(!overlay.renders(Part::Bottom));

        let inline = View::Player(PlayerView {
            content_open: false,
            frame: false,
            ..player(PlayerKind::Inline)
        });
        assert!(!inline.renders(Part::Background));
        assert!(!inline.renders(Part::Content));
        assert!(!inline.renders(Part::Video));
    }

    #[test]
    fn test_slider_parts() {
        let view = View::Slider(SliderView {
            items: vec![8, 9, 0],
            track_width_percent: 100.0,
            item_basis: 240.0,
            item_max_percent: 33.3,
            cursors: true,
            cursor_offset: 0.0,
            prev_label: "Previous".into(),
            next_label: "Next".into(),
        });
        assert!(view.renders(Part::Item(9)));
        assert!(!view.renders(Part::Item(1)));
        assert!(view.renders(Part::Content));
    }

    #[test]
    fn test_view_serializes_tagged() {
        let json = serde_json::to_string(&View::Trigger(TriggerView::default())).unwrap();
        assert_eq!(json, r#"{"component":"trigger","icon":"play"}"#);
    }
}
