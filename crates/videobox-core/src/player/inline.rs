//! Player rendered in place of a target element.
//!
//! While open the target is hidden and the player shown in its spot; closed,
//! the target comes back. Without an explicit origin the player expands from
//! the target's own rectangle. Inside a slider the player adopts the aspect
//! ratio of the slot it opens from.

use super::Player;
use crate::{
    config::PlayerConfig,
    document::Videobox,
    surface::{Element, Surface},
    types::{Container, PlayerKind},
};
use std::ops::Deref;
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct InlinePlayer(Player);

impl InlinePlayer {
    /// Create an unmounted inline player rendering to `surface`
    pub fn new(ctx: &Videobox, surface: Rc<dyn Surface>, config: PlayerConfig) -> Self {
        Self(Player::new(ctx, PlayerKind::Inline, surface, config))
    }

    pub(crate) fn from_player(player: Player) -> Self {
        debug_assert_eq!(player.kind(), PlayerKind::Inline);
        Self(player)
    }

    pub fn target(&self) -> Option<Rc<dyn Element>> {
        self.0.target()
    }

    /// Swap the element this player stands in for. The previous target is
    /// made visible again.
    pub fn set_target(&self, target: Option<Rc<dyn Element>>) {
        self.0.set_target(target);
    }

    pub fn container(&self) -> Container {
        self.0.container()
    }

    /// Declare the component this player is embedded in
    pub fn set_container(&self, container: Container) {
        self.0.set_container(container);
    }
}

impl Deref for InlinePlayer {
    type Target = Player;

    fn deref(&self) -> &Player {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::EmbeddedPolicy,
        headless::{HeadlessDocument, HeadlessElement},
        runtime::TokioScheduler,
        surface::Element,
        types::{Container, Origin, Part, Phase, PlayerKind, Rect},
        visibility, Videobox, VideoboxConfig,
    };
    use std::rc::Rc;
    use tokio::task::LocalSet;

    fn setup(config: VideoboxConfig) -> (Videobox, Rc<HeadlessDocument>) {
        let scheduler = Rc::new(TokioScheduler);
        let doc = Rc::new(HeadlessDocument::new(
            scheduler.clone(),
            Rect::new(0.0, 0.0, 1280.0, 800.0),
        ));
        doc.set_inline_rect(Rect::new(100.0, 100.0, 480.0, 270.0));
        let ctx = Videobox::new(config, scheduler, doc.clone());
        (ctx, doc)
    }

    #[tokio::test(start_paused = true)]
    async fn test_target_swaps_with_player() {
        LocalSet::new()
            .run_until(async {
                let (ctx, doc) = setup(VideoboxConfig::default());
                let player = ctx.create_inline();
                let target = Rc::new(HeadlessElement::with_rect(Rect::new(
                    100.0, 100.0, 320.0, 180.0,
                )));
                player.set_target(Some(target.clone()));

                let host = doc.created(PlayerKind::Inline)[0].host_element();
                assert!(visibility::is_hidden(host.as_ref()));
                assert!(!visibility::is_hidden(target.as_ref()));

                player.show(None).await;
                assert!(visibility::is_hidden(target.as_ref()));
                assert!(!visibility::is_hidden(host.as_ref()));
                assert_eq!(player.origin(), Some(Origin::from_rect(target.bounding_rect())));
                assert_eq!(player.width(), Some(480.0));

                player.hide().await;
                assert!(!visibility::is_hidden(target.as_ref()));
                assert!(visibility::is_hidden(host.as_ref()));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_while_closing_keeps_target_hidden() {
        LocalSet::new()
            .run_until(async {
                let (ctx, doc) = setup(VideoboxConfig::default());
                let player = ctx.create_inline();
                let target = Rc::new(HeadlessElement::with_rect(Rect::new(
                    100.0, 100.0, 320.0, 180.0,
                )));
                player.set_target(Some(target.clone()));
                let host = doc.created(PlayerKind::Inline)[0].host_element();

                player.show(None).await;
                let closing = player.clone();
                let hide = tokio::task::spawn_local(async move { closing.hide().await });
                tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                assert_eq!(player.phase(), Phase::Closing);

                player.show(None).await;
                hide.await.unwrap();

                assert!(player.is_open());
                assert_eq!(player.phase(), Phase::Open);
                assert!(visibility::is_hidden(target.as_ref()));
                assert!(!visibility::is_hidden(host.as_ref()));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_expands_from_target_size() {
        LocalSet::new()
            .run_until(async {
                let (ctx, doc) = setup(VideoboxConfig::default());
                let player = ctx.create_inline();
                player.set_target(Some(Rc::new(HeadlessElement::with_rect(Rect::new(
                    0.0, 0.0, 320.0, 240.0,
                )))));
                player.show(None).await;

                let surface = &doc.created(PlayerKind::Inline)[0];
                let wrap = surface.animations_on(Part::Wrap);
                assert_eq!(wrap[0].keyframes[0].get("maxWidth"), Some("320px"));
                assert_eq!(wrap[0].keyframes[0].get("left"), None);
                let sizer = surface.animations_on(Part::Sizer);
                assert_eq!(sizer[0].keyframes[0].get("paddingBottom"), Some("75%"));
                assert!(surface.animations_on(Part::Background).is_empty());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_retarget_restores_previous() {
        let (ctx, _doc) = setup(VideoboxConfig::default());
        let player = ctx.create_inline();
        let first: Rc<HeadlessElement> = Rc::new(HeadlessElement::new());
        let second: Rc<HeadlessElement> = Rc::new(HeadlessElement::new());

        player.set_target(Some(first.clone()));
        visibility::hide(first.as_ref());
        player.set_target(Some(second.clone()));

        assert!(!visibility::is_hidden(first.as_ref()));
        assert!(!visibility::is_hidden(second.as_ref()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_embedded_skips_animation() {
        LocalSet::new()
            .run_until(async {
                let (ctx, doc) = setup(VideoboxConfig::default());
                let player = ctx.create_inline();
                player.set_container(Container::Slider);

                player.show(Some(Origin::from_rect(Rect::new(0.0, 0.0, 240.0, 180.0)))).await;
                assert_eq!(player.phase(), Phase::Open);
                assert_eq!(player.config().max_height, Some(540.0));

                player.hide().await;
                assert_eq!(player.phase(), Phase::Closed);
                assert!(doc.created(PlayerKind::Inline)[0].animations().is_empty());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_embedded_keeps_width_animation() {
        LocalSet::new()
            .run_until(async {
                let config = VideoboxConfig {
                    embedded_policy: EmbeddedPolicy::SkipAspectRatio,
                    ..VideoboxConfig::default()
                };
                let (ctx, doc) = setup(config);
                let player = ctx.create_inline();
                player.set_container(Container::Pager);

                player.show(Some(Origin::from_rect(Rect::new(0.0, 0.0, 240.0, 180.0)))).await;

                let surface = &doc.created(PlayerKind::Inline)[0];
                assert_eq!(surface.animations_on(Part::Wrap).len(), 1);
                assert!(surface.animations_on(Part::Sizer).is_empty());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_embedded_hide_closes_synchronously() {
        LocalSet::new()
            .run_until(async {
                let (ctx, _doc) = setup(VideoboxConfig::default());
                let player = ctx.create_inline();
                player.set_container(Container::Slider);
                player.show(None).await;

                let rest = player.begin_hide(false);
                assert!(rest.is_some());
                assert!(!player.is_open());
                assert_eq!(player.phase(), Phase::Closed);
                assert!(player.begin_hide(false).is_none());
            })
            .await;
    }
}
