//! Player state machine shared by the overlay and inline players.
//!
//! ```text
//!            show()                 animations settled
//!   Closed ─────────► Opening ───────────────────────► Open
//!     ▲                  │ hide()                        │ hide()
//!     │                  ▼                               ▼
//!     └──────────────── Closing ◄────────────────────────┘
//!        animations          │ show()
//!         settled            └──────► Opening
//! ```
//!
//! At most one of {opening, closing} runs at a time: each call cancels the
//! opposite direction's animations first. Every transition bumps an epoch;
//! continuations resumed after an await check it and stop when a newer
//! transition owns the player. `open` and the embed's readiness are only
//! committed on the success path.

pub mod inline;
pub mod overlay;

pub use inline::InlinePlayer;
pub use overlay::Overlay;

use crate::{
    animation::{self, animate, AnimationHandle, Finished, Keyframe, Timing},
    config::{EmbeddedPolicy, PlayerConfig},
    document::Videobox,
    geometry::{aspect_percent, clip, fit_width, initial_width, percent, px, travel_duration},
    icon::IconShape,
    runtime::LocalFuture,
    surface::{Element, Surface},
    types::{Container, InstanceId, Key, Origin, Part, Phase, PlayerKind},
    view::{PlayerView, View},
    visibility,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// Handle returned by [`Player::on_open_change`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct PlayerState {
    config: PlayerConfig,
    /// Logical open state; stays true through the closing phase
    open: bool,
    phase: Phase,
    /// Whether the content (frame) is mounted
    content_open: bool,
    /// Set once the open animation finished; gates the frame src
    ready: bool,
    /// Fitted max width, `None` until first computed
    width: Option<f64>,
    /// Width must be recomputed on the next show
    dirty: bool,
    /// Rect the expand animation starts from
    origin: Option<Origin>,
    opening: Vec<AnimationHandle>,
    closing: Vec<AnimationHandle>,
    /// A hide is past its synchronous prefix
    closing_active: bool,
    /// Bumped on every show/hide; stale continuations compare against it
    epoch: u64,
    mounted: bool,
    /// Inline only: element swapped out while the player is open
    target: Option<Rc<dyn Element>>,
    container: Container,
    next_listener: u64,
}

struct PlayerCore {
    id: InstanceId,
    kind: PlayerKind,
    ctx: Videobox,
    surface: Rc<dyn Surface>,
    state: RefCell<PlayerState>,
    /// Broadcast of every phase transition
    phase_tx: watch::Sender<Phase>,
    /// Open-state listeners, called on every change of `open`
    listeners: RefCell<Vec<(ListenerId, Rc<dyn Fn(bool)>)>>,
    /// Restores focus to whatever opened the player
    focus_return: RefCell<Option<Rc<dyn Fn()>>>,
}

/// A video player instance (overlay or inline)
#[derive(Clone)]
pub struct Player {
    core: Rc<PlayerCore>,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.core.id)
            .field("kind", &self.core.kind)
            .field("phase", &self.phase())
            .finish()
    }
}

fn cancel_all(handles: Vec<AnimationHandle>) {
    for handle in handles {
        handle.cancel();
    }
}

impl Player {
    pub(crate) fn new(
        ctx: &Videobox,
        kind: PlayerKind,
        surface: Rc<dyn Surface>,
        config: PlayerConfig,
    ) -> Self {
        let (phase_tx, _) = watch::channel(Phase::Closed);
        Self {
            core: Rc::new(PlayerCore {
                id: InstanceId::new(),
                kind,
                ctx: ctx.clone(),
                surface,
                state: RefCell::new(PlayerState {
                    config,
                    open: false,
                    phase: Phase::Closed,
                    content_open: false,
                    ready: false,
                    width: None,
                    dirty: true,
                    origin: None,
                    opening: Vec::new(),
                    closing: Vec::new(),
                    closing_active: false,
                    epoch: 0,
                    mounted: false,
                    target: None,
                    container: Container::Standalone,
                    next_listener: 0,
                }),
                phase_tx,
                listeners: RefCell::new(Vec::new()),
                focus_return: RefCell::new(None),
            }),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.core.id
    }

    pub fn kind(&self) -> PlayerKind {
        self.core.kind
    }

    /// External visibility
    pub fn is_open(&self) -> bool {
        self.core.state.borrow().open
    }

    pub fn phase(&self) -> Phase {
        self.core.state.borrow().phase
    }

    /// Subscribe to phase changes
    pub fn subscribe_phase(&self) -> watch::Receiver<Phase> {
        self.core.phase_tx.subscribe()
    }

    /// Computed content width, once measured
    pub fn width(&self) -> Option<f64> {
        self.core.state.borrow().width
    }

    /// Embed URL committed to the tree
    pub fn is_ready(&self) -> bool {
        self.core.state.borrow().ready
    }

    /// Embed subtree mounted
    pub fn is_content_open(&self) -> bool {
        self.core.state.borrow().content_open
    }

    pub fn config(&self) -> PlayerConfig {
        self.core.state.borrow().config.clone()
    }

    /// Origin of the last open
    pub fn origin(&self) -> Option<Origin> {
        self.core.state.borrow().origin
    }

    pub fn surface(&self) -> Rc<dyn Surface> {
        self.core.surface.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.core.state.borrow().mounted
    }

    /// Register with the document's instance registry
    pub fn mount(&self) {
        self.core.state.borrow_mut().mounted = true;
        self.core.ctx.registry().register(self);
        self.set_target_visibility(None);
        debug!(id = %self.core.id, kind = %self.core.kind, "Player mounted");
    }

    /// Leave the registry and cancel anything in flight
    pub fn unmount(&self) {
        self.core.ctx.registry().unregister(self.core.id);
        let (opening, closing) = {
            let mut s = self.core.state.borrow_mut();
            s.mounted = false;
            s.epoch += 1;
            s.closing_active = false;
            (std::mem::take(&mut s.opening), std::mem::take(&mut s.closing))
        };
        cancel_all(opening);
        cancel_all(closing);
        debug!(id = %self.core.id, kind = %self.core.kind, "Player unmounted");
    }

    /// Listen for `open` toggles (the "open-change" notification)
    pub fn on_open_change(&self, listener: impl Fn(bool) + 'static) -> ListenerId {
        let id = {
            let mut s = self.core.state.borrow_mut();
            s.next_listener += 1;
            ListenerId(s.next_listener)
        };
        self.core
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.core.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(l, _)| *l != id);
        listeners.len() != before
    }

    /// Callback that hands keyboard focus back after a close with
    /// `notify_blur`
    pub fn set_focus_return(&self, callback: impl Fn() + 'static) {
        *self.core.focus_return.borrow_mut() = Some(Rc::new(callback));
    }

    /// Render model of the committed state
    pub fn view(&self) -> View {
        let s = self.core.state.borrow();
        let (max_w, max_h) = self.max_size_of(&s.config);
        let overlay = self.core.kind == PlayerKind::Overlay;

        View::Player(PlayerView {
            kind: self.core.kind,
            open: s.open,
            width: s.width,
            aspect_percent: aspect_percent(max_w, max_h),
            content_open: s.content_open,
            frame: if overlay { s.content_open } else { s.content_open && s.ready },
            src: if s.ready { s.config.src.clone() } else { None },
            description: s.config.description.clone(),
            close_label: s.config.close_label().to_string(),
            info_bar: overlay && s.content_open && s.ready,
            close_icons: if overlay {
                vec![IconShape::Close]
            } else {
                vec![IconShape::Circle, IconShape::CloseSmall]
            },
        })
    }

    async fn render(&self) {
        let view = self.view();
        self.core.surface.commit(view).await;
    }

    fn max_size_of(&self, config: &PlayerConfig) -> (f64, f64) {
        let tuning = self.core.ctx.config();
        (
            clip(config.max_width, tuning.default_width),
            clip(config.max_height, tuning.default_height),
        )
    }

    fn max_size(&self) -> (f64, f64) {
        let s = self.core.state.borrow();
        self.max_size_of(&s.config)
    }

    fn epoch(&self) -> u64 {
        self.core.state.borrow().epoch
    }

    fn timing(&self, duration_ms: f64) -> Timing {
        Timing::new(duration_ms, &self.core.ctx.config().easing)
    }

    fn set_phase(&self, phase: Phase) {
        let from = {
            let mut s = self.core.state.borrow_mut();
            let from = s.phase;
            if from == phase {
                return;
            }
            if !from.can_transition_to(phase) {
                warn!(id = %self.core.id, from = %from, to = %phase, "Unexpected phase transition");
            }
            s.phase = phase;
            from
        };
        self.core.phase_tx.send_replace(phase);
        info!(id = %self.core.id, kind = %self.core.kind, from = %from, to = %phase, "Phase transition");
    }

    fn set_open(&self, open: bool) {
        {
            let mut s = self.core.state.borrow_mut();
            if s.open == open {
                return;
            }
            s.open = open;
        }

        self.set_target_visibility(None);

        let listeners: Vec<_> = self
            .core
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in listeners {
            listener(open);
        }
    }

    /// Inline players swap visibility with their target: `visible` refers to
    /// the target, defaulting to "visible while closed".
    fn set_target_visibility(&self, visible: Option<bool>) {
        if self.core.kind != PlayerKind::Inline {
            return;
        }
        let (target, visible) = {
            let s = self.core.state.borrow();
            (s.target.clone(), visible.unwrap_or(!s.open))
        };

        if let Some(target) = target {
            if visible {
                visibility::show(target.as_ref());
            } else {
                visibility::hide(target.as_ref());
            }
        }

        let host = self.core.surface.host();
        if visible {
            visibility::hide(host.as_ref());
        } else {
            visibility::show(host.as_ref());
        }
    }

    pub(crate) fn target(&self) -> Option<Rc<dyn Element>> {
        self.core.state.borrow().target.clone()
    }

    pub(crate) fn set_target(&self, target: Option<Rc<dyn Element>>) {
        let same = {
            let s = self.core.state.borrow();
            match (&s.target, &target) {
                (Some(a), Some(b)) => Rc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
        };
        if same {
            return;
        }
        self.set_target_visibility(Some(true));
        self.core.state.borrow_mut().target = target;
        self.set_target_visibility(None);
    }

    pub(crate) fn container(&self) -> Container {
        self.core.state.borrow().container
    }

    pub(crate) fn set_container(&self, container: Container) {
        self.core.state.borrow_mut().container = container;
    }

    /// Embedded players skip parts of the expand/collapse animation:
    /// `(skip everything, skip aspect ratio)`
    fn embedded_skips(&self) -> (bool, bool) {
        if !self.container().is_embedded() {
            return (false, false);
        }
        match self.core.ctx.config().embedded_policy {
            EmbeddedPolicy::SkipAnimation => (true, true),
            EmbeddedPolicy::SkipAspectRatio => (false, true),
        }
    }

    /// Update configuration; size changes re-run the width calculation
    pub async fn configure(&self, update: impl FnOnce(&mut PlayerConfig)) {
        let resized = {
            let mut s = self.core.state.borrow_mut();
            let before = (s.config.max_width, s.config.max_height);
            update(&mut s.config);
            before != (s.config.max_width, s.config.max_height)
        };
        if resized {
            self.recalculate_width().await;
        }
        self.render().await;
    }

    pub async fn set_max_size(&self, max_width: Option<f64>, max_height: Option<f64>) {
        self.configure(|c| {
            c.max_width = max_width;
            c.max_height = max_height;
        })
        .await;
    }

    /// Container resized
    pub async fn resized(&self) {
        self.recalculate_width().await;
        if self.is_open() {
            self.render().await;
        }
    }

    /// Fit the content box into the available space. While closed this only
    /// flags the width dirty; the next `show` recalculates.
    pub async fn recalculate_width(&self) {
        if !self.is_open() {
            self.core.state.borrow_mut().dirty = true;
            return;
        }

        let (max_w, max_h) = self.max_size();
        self.core.state.borrow_mut().dirty = false;

        self.render().await;

        let available = self.core.surface.rect(Part::Host).unwrap_or_default();
        let chrome = self.core.ctx.config().chrome(self.core.kind);
        let width = fit_width(max_w, max_h, available, chrome);
        debug!(
            id = %self.core.id,
            max_w, max_h,
            available_w = available.width,
            available_h = available.height,
            width,
            "Width recalculated"
        );
        self.core.state.borrow_mut().width = Some(width);
    }

    pub async fn show(&self, origin: Option<Origin>) {
        self.show_with(origin, false).await;
    }

    /// Open the player, expanding from `origin`. No-op while open (a closing
    /// player reopens). With `focus`, the embed takes focus once settled.
    #[instrument(skip(self), fields(id = %self.core.id, kind = %self.core.kind))]
    pub async fn show_with(&self, origin: Option<Origin>, focus: bool) {
        let embedded = self.container() == Container::Slider;
        if let (true, Some((w, h))) = (embedded, origin.and_then(|o| o.aspect())) {
            let (max_w, _) = self.max_size();
            self.core.state.borrow_mut().config.max_height = Some(h / w * max_w);
        }

        let (epoch, opening) = {
            let mut s = self.core.state.borrow_mut();
            if s.open && !s.closing_active {
                debug!("Already open");
                return;
            }
            s.epoch += 1;
            (s.epoch, std::mem::take(&mut s.opening))
        };
        cancel_all(opening);

        self.core.ctx.registry().close_all(Some(self.core.id));

        let origin = match origin {
            Some(origin) => Some(origin),
            None => self.target().map(|target| {
                self.set_target_visibility(Some(true));
                Origin::from_rect(target.bounding_rect())
            }),
        };

        let closing = {
            let mut s = self.core.state.borrow_mut();
            s.content_open = true;
            s.ready = false;
            s.closing_active = false;
            std::mem::take(&mut s.closing)
        };
        if !closing.is_empty() && self.core.kind == PlayerKind::Overlay {
            self.core.surface.set_style(Part::Background, "opacity", None);
        }
        cancel_all(closing);

        self.set_phase(Phase::Opening);
        self.set_open(true);
        // set_open is a no-op when reopening mid-close
        self.set_target_visibility(None);
        self.render().await;
        if self.epoch() != epoch {
            return;
        }

        if self.core.state.borrow().dirty {
            self.recalculate_width().await;
            if self.epoch() != epoch {
                return;
            }
        }

        let background = if self.core.kind == PlayerKind::Overlay {
            self.start_opening(
                Part::Background,
                vec![
                    Keyframe::new().set("opacity", "0"),
                    Keyframe::new().set("opacity", "1"),
                ],
                self.core.ctx.config().animation_ms,
            )
        } else {
            None
        };
        let background = async move {
            if let Some(finished) = background {
                let _ = finished.await;
            }
        };

        let ((), expanded) = tokio::join!(background, self.expand(origin.unwrap_or_default(), epoch));
        if !expanded || self.epoch() != epoch {
            return;
        }

        self.core.state.borrow_mut().ready = true;
        self.render().await;
        if self.epoch() != epoch {
            return;
        }

        if self.core.kind == PlayerKind::Overlay {
            let reveal = self.start_opening(
                Part::Bottom,
                vec![
                    Keyframe::new().set("transform", "translateY(-100%)"),
                    Keyframe::new().set("transform", "translateY(0%)"),
                ],
                self.core.ctx.config().animation_ms,
            );
            if let Some(finished) = reveal {
                let _ = finished.await;
            }
            if self.epoch() != epoch {
                return;
            }
        }

        self.core.state.borrow_mut().opening.clear();
        self.set_phase(Phase::Open);

        if focus {
            self.core.surface.focus(Part::Video);
        }
    }

    fn start_opening(&self, part: Part, keyframes: Vec<Keyframe>, duration_ms: f64) -> Option<Finished> {
        let anim = animate(self.core.surface.as_ref(), part, keyframes, self.timing(duration_ms))?;
        self.core.state.borrow_mut().opening.push(anim.handle);
        Some(anim.finished)
    }

    /// Expand the content box from `origin` to the computed width. Returns
    /// false when cancelled or superseded.
    async fn expand(&self, origin: Origin, epoch: u64) -> bool {
        self.core.state.borrow_mut().origin = Some(origin);

        if self.core.surface.rect(Part::Wrap).is_none() {
            debug!("Content not rendered, skipping expand");
            return true;
        }

        self.render().await;
        if self.epoch() != epoch {
            return false;
        }

        let (skip_all, skip_aspect) = self.embedded_skips();
        if skip_all {
            return true;
        }

        let tuning = self.core.ctx.config();
        let (max_w, max_h) = self.max_size();
        let width = self.width().unwrap_or(max_w);

        let mut from = Keyframe::new();
        let mut to = Keyframe::new();
        let mut duration = 0.0;

        if self.core.kind == PlayerKind::Overlay {
            from = from.set("transform", "translateY(0px)");
            to = to.set("transform", "translateY(-30px)");

            if origin.has_position() {
                let rect = self.core.surface.rect(Part::Host).unwrap_or_default();
                let left = origin
                    .x
                    .map(|x| (x - rect.left()) - rect.width / 2.0)
                    .unwrap_or(0.0);
                let top = origin
                    .y
                    .map(|y| (y - rect.top()) - rect.height / 2.0)
                    .unwrap_or(0.0);

                from = from.set("left", px(left)).set("top", px(top));
                to = to.set("left", "0px").set("top", "0px");
                duration = travel_duration(left.hypot(top), tuning.expand_factor);
            }
        }

        let start = initial_width(&origin, max_w, max_h, tuning.initial_width);
        from = from.set("maxWidth", px(start));
        to = to.set("maxWidth", px(width));
        if duration == 0.0 {
            duration = travel_duration(start - width, tuning.expand_factor);
        }

        let mut finished = Vec::new();
        finished.extend(self.start_opening(Part::Wrap, vec![from, to], duration));

        if let (false, Some((w, h))) = (skip_aspect, origin.aspect()) {
            finished.extend(self.start_opening(
                Part::Sizer,
                vec![
                    Keyframe::new().set("paddingBottom", percent(aspect_percent(w, h))),
                    Keyframe::new().set("paddingBottom", percent(aspect_percent(max_w, max_h))),
                ],
                duration,
            ));
        }

        animation::all(finished).await.is_ok() && self.epoch() == epoch
    }

    pub async fn hide(&self) {
        self.hide_with(false).await;
    }

    /// Close the player. No-op when closed or already closing. With
    /// `notify_blur`, the focus-return callback runs once settled.
    pub async fn hide_with(&self, notify_blur: bool) {
        if let Some(rest) = self.begin_hide(notify_blur) {
            rest.await;
        }
    }

    /// Close button / backdrop activation
    pub async fn close(&self) {
        self.hide_with(true).await;
    }

    /// Keyboard activation of the close button
    pub async fn on_close_key(&self, key: Key) {
        if key.activates() {
            self.close().await;
        }
    }

    /// Synchronous part of [`Player::hide_with`]: claims the closing
    /// transition and returns the remainder to run, or `None` when there is
    /// nothing to close.
    pub fn begin_hide(&self, notify_blur: bool) -> Option<LocalFuture<()>> {
        let (epoch, opening, has_origin) = {
            let mut s = self.core.state.borrow_mut();
            if !s.open || s.closing_active {
                return None;
            }
            s.epoch += 1;
            s.closing_active = true;
            s.content_open = false;
            (s.epoch, std::mem::take(&mut s.opening), s.origin.is_some())
        };
        cancel_all(opening);

        let (skip_all, skip_aspect) = self.embedded_skips();
        let collapse = has_origin && !skip_all && self.core.surface.rect(Part::Wrap).is_some();
        let fade = self.core.kind == PlayerKind::Overlay
            && self.core.surface.rect(Part::Background).is_some();

        debug!(id = %self.core.id, collapse, fade, "Hiding");

        if !collapse && !fade {
            self.core.state.borrow_mut().closing_active = false;
            self.set_phase(Phase::Closing);
            self.set_open(false);
            self.set_phase(Phase::Closed);
        } else {
            self.set_phase(Phase::Closing);
        }

        let player = self.clone();
        Some(Box::pin(async move {
            player.finish_hide(epoch, collapse, fade, skip_aspect).await;
            if notify_blur {
                let callback = player.core.focus_return.borrow().clone();
                if let Some(callback) = callback {
                    callback();
                }
            }
        }))
    }

    async fn finish_hide(&self, epoch: u64, collapse: bool, fade: bool, skip_aspect: bool) {
        self.render().await;
        if !collapse && !fade {
            return;
        }
        if self.epoch() != epoch {
            return;
        }

        let tuning = self.core.ctx.config();
        let mut finished = Vec::new();

        if fade {
            finished.extend(self.start_closing(
                Part::Background,
                vec![
                    Keyframe::new().set("opacity", "1"),
                    Keyframe::new().set("opacity", "0"),
                ],
                tuning.animation_ms,
            ));
            self.core
                .surface
                .set_style(Part::Background, "opacity", Some("0"));
        }

        if collapse {
            let origin = self.origin().unwrap_or_default();
            let (max_w, max_h) = self.max_size();
            let width = self.width().unwrap_or(max_w);
            let end = initial_width(&origin, max_w, max_h, tuning.initial_width);
            let duration = travel_duration(end - width, tuning.expand_factor);

            finished.extend(self.start_closing(
                Part::Wrap,
                vec![
                    Keyframe::new().set("maxWidth", px(width)),
                    Keyframe::new().set("maxWidth", px(end)),
                ],
                duration,
            ));

            if let (false, Some((w, h))) = (skip_aspect, origin.aspect()) {
                finished.extend(self.start_closing(
                    Part::Sizer,
                    vec![
                        Keyframe::new().set("paddingBottom", percent(aspect_percent(max_w, max_h))),
                        Keyframe::new().set("paddingBottom", percent(aspect_percent(w, h))),
                    ],
                    duration,
                ));
            }
        }

        let settled = animation::all(finished).await;
        if self.epoch() != epoch {
            // A newer show owns the player now
            return;
        }
        if let Err(e) = settled {
            debug!(error = %e, "Closing animation interrupted");
        }

        {
            let mut s = self.core.state.borrow_mut();
            s.closing.clear();
            s.closing_active = false;
        }
        self.set_open(false);
        self.set_phase(Phase::Closed);
        self.render().await;

        if fade {
            self.core.surface.set_style(Part::Background, "opacity", None);
        }
    }

    fn start_closing(&self, part: Part, keyframes: Vec<Keyframe>, duration_ms: f64) -> Option<Finished> {
        let anim = animate(self.core.surface.as_ref(), part, keyframes, self.timing(duration_ms))?;
        self.core.state.borrow_mut().closing.push(anim.handle);
        Some(anim.finished)
    }
}

/// Tagged handle over the player kinds, used for registry broadcasts and
/// trigger dispatch
#[derive(Debug, Clone)]
pub enum PlayerHandle {
    Overlay(Overlay),
    Inline(InlinePlayer),
}

impl PlayerHandle {
    pub(crate) fn from_player(player: Player) -> Self {
        match player.kind() {
            PlayerKind::Overlay => PlayerHandle::Overlay(Overlay::from_player(player)),
            PlayerKind::Inline => PlayerHandle::Inline(InlinePlayer::from_player(player)),
        }
    }

    pub fn player(&self) -> &Player {
        match self {
            PlayerHandle::Overlay(p) => p,
            PlayerHandle::Inline(p) => p,
        }
    }

    pub fn id(&self) -> InstanceId {
        self.player().id()
    }

    pub fn kind(&self) -> PlayerKind {
        self.player().kind()
    }

    pub fn is_open(&self) -> bool {
        self.player().is_open()
    }

    pub async fn show(&self, origin: Option<Origin>) {
        self.player().show(origin).await;
    }

    pub async fn hide(&self) {
        self.player().hide().await;
    }

    pub fn begin_hide(&self, notify_blur: bool) -> Option<LocalFuture<()>> {
        self.player().begin_hide(notify_blur)
    }
}

/// Registry entry that does not keep the player alive
#[derive(Clone)]
pub(crate) struct WeakPlayer(Weak<PlayerCore>);

impl WeakPlayer {
    pub(crate) fn new(player: &Player) -> Self {
        Self(Rc::downgrade(&player.core))
    }

    pub(crate) fn upgrade(&self) -> Option<Player> {
        self.0.upgrade().map(|core| Player { core })
    }
}
