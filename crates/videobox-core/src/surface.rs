//! Rendering capability consumed by every component.
//!
//! A [`Surface`] stands for one mounted component in the host document. The
//! component renders by committing a [`View`] (a pure function of its
//! committed state) and measures or animates the named parts of the tree
//! that view produced.

use crate::{
    animation::{Completion, Keyframe, Playback, Timing},
    types::{Part, PlayerKind, Rect},
    view::View,
};
use async_trait::async_trait;
use std::rc::Rc;

/// An element outside a component's own tree (inline targets, button
/// children, the host element itself).
pub trait Element {
    fn bounding_rect(&self) -> Rect;

    /// Inline `display` style, `None` when unset
    fn display(&self) -> Option<String>;

    fn set_display(&self, value: Option<&str>);

    /// `data-*` attribute
    fn data(&self, key: &str) -> Option<String>;

    fn set_data(&self, key: &str, value: Option<&str>);
}

/// One mounted component
#[async_trait(?Send)]
pub trait Surface {
    /// Host element of the component
    fn host(&self) -> Rc<dyn Element>;

    /// Bounding rectangle of a part, `None` when not rendered
    fn rect(&self, part: Part) -> Option<Rect>;

    /// Start a keyframe animation on a part, `None` when not rendered.
    /// The host calls `completion.finish()` when it ends naturally.
    fn animate(
        &self,
        part: Part,
        keyframes: &[Keyframe],
        timing: &Timing,
        completion: Completion,
    ) -> Option<Box<dyn Playback>>;

    /// Write (or with `None`, clear) an inline style property on a part
    fn set_style(&self, part: Part, property: &str, value: Option<&str>);

    /// Move keyboard focus to a part
    fn focus(&self, _part: Part) {}

    /// Resolve a selector among the component's light-DOM children
    fn query(&self, _selector: &str) -> Option<Rc<dyn Element>> {
        None
    }

    /// Rectangles of every light-DOM child matching a selector
    fn select_rects(&self, _selector: &str) -> Vec<Rect> {
        Vec::new()
    }

    /// Apply a view; resolves once the tree reflects it
    async fn commit(&self, view: View);
}

/// Creates surfaces for players the library mounts on its own (the shared
/// overlay, inline players created by triggers).
pub trait SurfaceFactory {
    fn create_player_surface(&self, kind: PlayerKind) -> Rc<dyn Surface>;
}
