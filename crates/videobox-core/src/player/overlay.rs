//! Lightbox player covering the viewport.
//!
//! The overlay fades its backdrop in, expands the content box from the
//! trigger's position toward the centre and slides the info bar out once the
//! embed is ready. One overlay per document is normally enough; see
//! [`crate::Videobox::overlay`].

use super::Player;
use crate::{
    config::PlayerConfig, document::Videobox, surface::Surface, types::PlayerKind,
};
use std::ops::Deref;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Overlay(Player);

impl Overlay {
    /// Create an unmounted overlay rendering to `surface`
    pub fn new(ctx: &Videobox, surface: Rc<dyn Surface>, config: PlayerConfig) -> Self {
        Self(Player::new(ctx, PlayerKind::Overlay, surface, config))
    }

    pub(crate) fn from_player(player: Player) -> Self {
        debug_assert_eq!(player.kind(), PlayerKind::Overlay);
        Self(player)
    }
}

impl Deref for Overlay {
    type Target = Player;

    fn deref(&self) -> &Player {
        &self.0
    }
}
