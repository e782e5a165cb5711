//! Per-document context.
//!
//! A [`Videobox`] bundles the library tuning, the scheduler, the instance
//! registry and the factory that creates player surfaces. Every component
//! belongs to exactly one context; contexts never share players.

use crate::{
    config::{PlayerConfig, VideoboxConfig},
    player::{InlinePlayer, Overlay, PlayerHandle},
    registry::Registry,
    runtime::Scheduler,
    surface::SurfaceFactory,
    types::{InstanceId, PlayerKind},
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

struct Inner {
    config: VideoboxConfig,
    scheduler: Rc<dyn Scheduler>,
    registry: Registry,
    factory: Rc<dyn SurfaceFactory>,
    /// Overlay appended by the context itself
    own_overlay: RefCell<Option<Overlay>>,
}

/// Document context shared by every component
#[derive(Clone)]
pub struct Videobox {
    inner: Rc<Inner>,
}

impl Videobox {
    pub fn new(
        config: VideoboxConfig,
        scheduler: Rc<dyn Scheduler>,
        factory: Rc<dyn SurfaceFactory>,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                config,
                registry: Registry::new(scheduler.clone()),
                scheduler,
                factory,
                own_overlay: RefCell::new(None),
            }),
        }
    }

    /// Context on the tokio `LocalSet` scheduler
    #[cfg(feature = "tokio-runtime")]
    pub fn with_tokio(config: VideoboxConfig, factory: Rc<dyn SurfaceFactory>) -> Self {
        Self::new(config, Rc::new(crate::runtime::TokioScheduler), factory)
    }

    pub fn config(&self) -> &VideoboxConfig {
        &self.inner.config
    }

    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        self.inner.scheduler.clone()
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// The document's overlay: the first mounted one, or a new overlay
    /// appended to the document on first use.
    pub fn overlay(&self) -> Overlay {
        if let Some(PlayerHandle::Overlay(overlay)) = self.inner.registry.first(PlayerKind::Overlay) {
            return overlay;
        }

        let surface = self.inner.factory.create_player_surface(PlayerKind::Overlay);
        let overlay = Overlay::new(self, surface, PlayerConfig::default());
        overlay.mount();
        debug!(id = %overlay.id(), "Overlay created");
        *self.inner.own_overlay.borrow_mut() = Some(overlay.clone());
        overlay
    }

    /// Create and mount an inline player
    pub fn create_inline(&self) -> InlinePlayer {
        let surface = self.inner.factory.create_player_surface(PlayerKind::Inline);
        let player = InlinePlayer::new(self, surface, PlayerConfig::default());
        player.mount();
        player
    }

    /// Hide every open player except `exclude`
    pub fn close_all(&self, exclude: Option<InstanceId>) -> usize {
        self.inner.registry.close_all(exclude)
    }

    /// Unmount every registered player and release the context's overlay
    pub fn teardown(&self) {
        self.inner.own_overlay.borrow_mut().take();
        for kind in PlayerKind::ALL {
            for handle in self.inner.registry.instances(kind) {
                handle.player().unmount();
            }
        }
    }
}

impl std::fmt::Debug for Videobox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Videobox")
            .field("config", &self.inner.config)
            .field("registry", &self.inner.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{headless::HeadlessDocument, runtime::TokioScheduler, types::Rect};

    fn setup() -> (Videobox, Rc<HeadlessDocument>) {
        let scheduler = Rc::new(TokioScheduler);
        let doc = Rc::new(HeadlessDocument::new(
            scheduler.clone(),
            Rect::new(0.0, 0.0, 1280.0, 800.0),
        ));
        (Videobox::new(VideoboxConfig::default(), scheduler, doc.clone()), doc)
    }

    #[test]
    fn test_overlay_is_created_once() {
        let (ctx, doc) = setup();
        let first = ctx.overlay();
        let second = ctx.overlay();
        assert_eq!(first.id(), second.id());
        assert_eq!(doc.created(PlayerKind::Overlay).len(), 1);
    }

    #[test]
    fn test_context_keeps_its_overlay() {
        let (ctx, doc) = setup();
        let id = ctx.overlay().id();
        assert_eq!(ctx.overlay().id(), id);
        assert_eq!(doc.created(PlayerKind::Overlay).len(), 1);
    }

    #[test]
    fn test_teardown_unmounts_everything() {
        let (ctx, _doc) = setup();
        let overlay = ctx.overlay();
        let inline = ctx.create_inline();
        ctx.teardown();
        assert!(ctx.registry().is_empty());
        assert!(!overlay.is_mounted());
        assert!(!inline.is_mounted());
    }

    #[test]
    fn test_contexts_are_isolated() {
        let (a, _) = setup();
        let (b, _) = setup();
        a.create_inline();
        assert!(b.registry().is_empty());
    }
}
