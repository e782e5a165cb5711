//! Trigger buttons.
//!
//! A [`Button`] opens either the document overlay or an inline player of its
//! own. Activation closes every competing player, waits for the chosen one
//! to be closed, hands it the button's media settings and shows it from the
//! resolved origin. While its inline player is open the button renders the
//! player's slot instead of the trigger.

use crate::{
    config::ButtonConfig,
    document::Videobox,
    geometry::clip,
    item::ChildItem,
    player::{InlinePlayer, ListenerId, Player},
    surface::{Element, Surface},
    types::{Key, Origin, PlayerKind},
    view::{ButtonSlot, ButtonView, TriggerView, View},
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, instrument};

struct ButtonState {
    config: ButtonConfig,
    inline: Option<InlinePlayer>,
    listener: Option<ListenerId>,
    inline_open: bool,
    direct_player: bool,
    item: Option<ChildItem>,
}

struct ButtonInner {
    ctx: Videobox,
    surface: Rc<dyn Surface>,
    state: RefCell<ButtonState>,
}

/// Trigger that opens a player
#[derive(Clone)]
pub struct Button {
    inner: Rc<ButtonInner>,
}

impl Button {
    pub fn new(ctx: &Videobox, surface: Rc<dyn Surface>, config: ButtonConfig) -> Self {
        Self {
            inner: Rc::new(ButtonInner {
                ctx: ctx.clone(),
                surface,
                state: RefCell::new(ButtonState {
                    config,
                    inline: None,
                    listener: None,
                    inline_open: false,
                    direct_player: false,
                    item: None,
                }),
            }),
        }
    }

    pub fn config(&self) -> ButtonConfig {
        self.inner.state.borrow().config.clone()
    }

    /// The button's inline player, once created
    pub fn inline_player(&self) -> Option<InlinePlayer> {
        self.inner.state.borrow().inline.clone()
    }

    pub fn view(&self) -> View {
        let s = self.inner.state.borrow();
        let slot = if s.config.player == PlayerKind::Inline && s.inline_open {
            if s.direct_player {
                ButtonSlot::Player
            } else {
                ButtonSlot::Default
            }
        } else {
            ButtonSlot::Trigger
        };
        View::Button(ButtonView {
            slot,
            title: s.config.description.clone(),
        })
    }

    async fn render(&self) {
        let view = self.view();
        self.inner.surface.commit(view).await;
    }

    pub async fn mount(&self) {
        self.render().await;
    }

    /// Stop mirroring the inline player's state
    pub fn unmount(&self) {
        let (inline, listener) = {
            let mut s = self.inner.state.borrow_mut();
            (s.inline.clone(), s.listener.take())
        };
        if let (Some(player), Some(listener)) = (inline, listener) {
            player.remove_listener(listener);
        }
    }

    /// Place the button inside a slider or pager child, so its inline player
    /// closes when the child leaves view
    pub fn set_item(&self, item: Option<ChildItem>) {
        let inline = {
            let mut s = self.inner.state.borrow_mut();
            s.item = item.clone();
            s.inline.clone()
        };
        if let (Some(item), Some(player)) = (item, inline) {
            item.add_player(&player);
        }
    }

    pub async fn configure(&self, update: impl FnOnce(&mut ButtonConfig)) {
        let retarget = {
            let mut s = self.inner.state.borrow_mut();
            let before = s.config.selector.clone();
            update(&mut s.config);
            s.config.selector != before
        };
        if retarget {
            self.update_target();
        }
        self.render().await;
    }

    pub async fn set_selector(&self, selector: Option<String>) {
        self.configure(|c| c.selector = selector).await;
    }

    /// Keyboard activation
    pub async fn on_key(&self, key: Key) {
        if key.activates() {
            self.open_player().await;
        }
    }

    /// Open the configured player kind from this button
    #[instrument(skip(self), fields(player = %self.inner.state.borrow().config.player))]
    pub async fn open_player(&self) {
        let config = self.config();
        let registry = self.inner.ctx.registry();

        match config.player {
            PlayerKind::Inline => {
                registry.close_instances(PlayerKind::Overlay, None);
                let previous = {
                    let mut s = self.inner.state.borrow_mut();
                    s.inline.clone().zip(s.listener.take())
                };
                if let Some((player, listener)) = previous {
                    player.remove_listener(listener);
                }

                let player = self.inline_instance();
                registry.close_all(Some(player.id()));
                player.hide().await;
                self.assign(&player, &config).await;

                let button = Rc::downgrade(&self.inner);
                let listener = player.on_open_change(move |open| mirror_open(&button, open));
                {
                    let mut s = self.inner.state.borrow_mut();
                    s.listener = Some(listener);
                    s.inline_open = player.is_open();
                }
                self.render().await;

                player.show(self.origin()).await;
            }
            PlayerKind::Overlay => {
                let overlay = self.inner.ctx.overlay();
                registry.close_all(Some(overlay.id()));
                overlay.hide().await;
                self.assign(&overlay, &config).await;
                overlay.show(self.origin()).await;
            }
        }
    }

    async fn assign(&self, player: &Player, config: &ButtonConfig) {
        let tuning = self.inner.ctx.config();
        let max_width = clip(config.max_width, tuning.default_width);
        let max_height = clip(config.max_height, tuning.default_height);
        player
            .configure(|c| {
                c.src = config.src.clone();
                c.description = config.description.clone();
                c.max_width = Some(max_width);
                c.max_height = Some(max_height);
            })
            .await;
    }

    fn query_target(&self) -> Option<Rc<dyn Element>> {
        let selector = self.inner.state.borrow().config.selector.clone()?;
        self.inner.surface.query(&selector)
    }

    /// Selector target, else the button itself when `origin` is set
    fn origin(&self) -> Option<Origin> {
        let target = self.query_target().or_else(|| {
            self.inner
                .state
                .borrow()
                .config
                .origin
                .then(|| self.inner.surface.host())
        })?;
        Some(Origin::from_rect(target.bounding_rect()))
    }

    /// The button's inline player, created on first use and placed next to
    /// the selector target when there is one
    fn inline_instance(&self) -> InlinePlayer {
        let existing = self.inner.state.borrow().inline.clone();
        let player = match existing {
            Some(player) => player,
            None => {
                let player = self.inner.ctx.create_inline();
                let item = {
                    let mut s = self.inner.state.borrow_mut();
                    s.inline = Some(player.clone());
                    s.direct_player = true;
                    s.item.clone()
                };
                if let Some(item) = item {
                    item.add_player(&player);
                }
                debug!(id = %player.id(), "Inline player created");
                player
            }
        };
        self.place(&player);
        player
    }

    fn update_target(&self) {
        let inline = self.inner.state.borrow().inline.clone();
        if let Some(player) = inline {
            self.place(&player);
        }
    }

    fn place(&self, player: &InlinePlayer) {
        let target = self.query_target();
        if target.is_some() {
            self.inner.state.borrow_mut().direct_player = false;
        }
        player.set_target(target);
    }
}

fn mirror_open(button: &Weak<ButtonInner>, open: bool) {
    let Some(inner) = button.upgrade() else {
        return;
    };
    inner.state.borrow_mut().inline_open = open;
    let button = Button { inner };
    let scheduler = button.inner.ctx.scheduler();
    scheduler.spawn(Box::pin(async move { button.render().await }));
}

impl std::fmt::Debug for Button {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Button")
            .field("config", &self.inner.state.borrow().config)
            .finish()
    }
}

/// Decorative play-button wrapper
#[derive(Clone)]
pub struct Trigger {
    surface: Rc<dyn Surface>,
}

impl Trigger {
    pub fn new(surface: Rc<dyn Surface>) -> Self {
        Self { surface }
    }

    pub fn view(&self) -> View {
        View::Trigger(TriggerView::default())
    }

    pub async fn mount(&self) {
        self.surface.commit(self.view()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::VideoboxConfig,
        headless::{HeadlessDocument, HeadlessElement, HeadlessSurface},
        runtime::TokioScheduler,
        types::{Phase, Rect},
    };
    use tokio::task::LocalSet;

    struct Fixture {
        ctx: Videobox,
        doc: Rc<HeadlessDocument>,
    }

    impl Fixture {
        fn new() -> Self {
            let scheduler = Rc::new(TokioScheduler);
            let doc = Rc::new(HeadlessDocument::new(
                scheduler.clone(),
                Rect::new(0.0, 0.0, 1280.0, 800.0),
            ));
            let ctx = Videobox::new(VideoboxConfig::default(), scheduler, doc.clone());
            Self { ctx, doc }
        }

        fn button(&self, config: ButtonConfig) -> (Button, Rc<HeadlessSurface>) {
            let surface = self.doc.surface(Rect::new(40.0, 60.0, 320.0, 180.0));
            (Button::new(&self.ctx, surface.clone(), config), surface)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlay_dispatch() {
        LocalSet::new()
            .run_until(async {
                let f = Fixture::new();
                let (button, _) = f.button(ButtonConfig {
                    src: Some("https://example.com/embed/2".into()),
                    description: Some("Trailer".into()),
                    max_width: Some(-5.0),
                    origin: true,
                    ..ButtonConfig::default()
                });

                button.open_player().await;

                let overlay = f.ctx.overlay();
                assert!(overlay.is_open());
                let config = overlay.config();
                assert_eq!(config.src.as_deref(), Some("https://example.com/embed/2"));
                assert_eq!(config.max_width, Some(720.0));
                assert_eq!(config.max_height, Some(405.0));
                assert_eq!(
                    overlay.origin(),
                    Some(Origin::from_rect(Rect::new(40.0, 60.0, 320.0, 180.0)))
                );
                assert!(matches!(
                    button.view(),
                    View::Button(ButtonView { slot: ButtonSlot::Trigger, .. })
                ));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_origin_without_target_or_flag() {
        LocalSet::new()
            .run_until(async {
                let f = Fixture::new();
                let (button, _) = f.button(ButtonConfig {
                    selector: Some(".missing".into()),
                    ..ButtonConfig::default()
                });
                assert_eq!(button.origin(), None);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_inline_player_mirrors_slot() {
        LocalSet::new()
            .run_until(async {
                let f = Fixture::new();
                let (button, _) = f.button(ButtonConfig {
                    player: PlayerKind::Inline,
                    ..ButtonConfig::default()
                });
                button.mount().await;

                button.open_player().await;
                let player = button.inline_player().expect("inline player created");
                assert!(player.is_open());
                assert!(matches!(
                    button.view(),
                    View::Button(ButtonView { slot: ButtonSlot::Player, .. })
                ));

                player.hide().await;
                assert!(matches!(
                    button.view(),
                    View::Button(ButtonView { slot: ButtonSlot::Trigger, .. })
                ));

                button.open_player().await;
                assert_eq!(button.inline_player().map(|p| p.id()), Some(player.id()));
                assert_eq!(f.doc.created(PlayerKind::Inline).len(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_inline_player_next_to_target() {
        LocalSet::new()
            .run_until(async {
                let f = Fixture::new();
                let (button, surface) = f.button(ButtonConfig {
                    player: PlayerKind::Inline,
                    selector: Some("img".into()),
                    ..ButtonConfig::default()
                });
                let thumb = Rc::new(HeadlessElement::with_rect(Rect::new(50.0, 70.0, 160.0, 90.0)));
                surface.add_child("img", thumb.clone());

                button.open_player().await;

                let player = button.inline_player().expect("inline player created");
                assert!(player.target().is_some());
                assert_eq!(
                    player.origin(),
                    Some(Origin::from_rect(Rect::new(50.0, 70.0, 160.0, 90.0)))
                );
                assert!(matches!(
                    button.view(),
                    View::Button(ButtonView { slot: ButtonSlot::Default, .. })
                ));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_selector_change_retargets() {
        LocalSet::new()
            .run_until(async {
                let f = Fixture::new();
                let (button, surface) = f.button(ButtonConfig {
                    player: PlayerKind::Inline,
                    ..ButtonConfig::default()
                });
                button.open_player().await;
                let player = button.inline_player().expect("inline player created");
                assert!(player.target().is_none());

                surface.add_child(".poster", Rc::new(HeadlessElement::new()));
                button.set_selector(Some(".poster".into())).await;
                assert!(player.target().is_some());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_inline_closes_overlay() {
        LocalSet::new()
            .run_until(async {
                let f = Fixture::new();
                let (overlay_button, _) = f.button(ButtonConfig::default());
                let (inline_button, _) = f.button(ButtonConfig {
                    player: PlayerKind::Inline,
                    ..ButtonConfig::default()
                });

                overlay_button.open_player().await;
                let overlay = f.ctx.overlay();
                assert!(overlay.is_open());

                inline_button.on_key(Key::Enter).await;
                assert_ne!(overlay.phase(), Phase::Open);
                assert!(inline_button.inline_player().map(|p| p.is_open()).unwrap_or(false));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_button_in_slider_item() {
        LocalSet::new()
            .run_until(async {
                let f = Fixture::new();
                let (button, _) = f.button(ButtonConfig {
                    player: PlayerKind::Inline,
                    ..ButtonConfig::default()
                });
                let item = ChildItem::new();
                item.set_container(crate::types::Container::Slider);
                button.set_item(Some(item.clone()));

                button.open_player().await;
                assert_eq!(item.players().len(), 1);
                assert_eq!(item.players()[0].container(), crate::types::Container::Slider);
            })
            .await;
    }

    #[tokio::test]
    async fn test_trigger_view() {
        let f = Fixture::new();
        let surface = f.doc.surface(Rect::default());
        let trigger = Trigger::new(surface.clone());
        trigger.mount().await;
        assert_eq!(surface.view(), Some(View::Trigger(TriggerView::default())));
    }
}
