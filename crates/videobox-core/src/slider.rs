//! Carousel with batched moves.
//!
//! `prev`/`next` accumulate a signed displacement in `pending_move`; a
//! debounced settle cycle turns the batch into one slide:
//!
//! ```text
//!   idle ──prev/next──► pending ──window elapsed──► animating ──► idle
//!    ▲                     ▲                            │
//!    │                     └──── more moves queued ─────┤
//!    └──────────────────────────────────────────────────┘
//! ```
//!
//! The rendered window is `active + |moving|` children starting at `start`
//! (or `start + moving` while sliding backward), indices taken modulo
//! `total`. Sliding translates that over-wide track; once the animation
//! settles `moving` folds into `start`.

use crate::{
    animation::{self, animate, AnimationHandle, Keyframe, Timing},
    config::SliderConfig,
    debounce::Debouncer,
    document::Videobox,
    geometry::{circular_index, clip, px},
    item::ChildItem,
    surface::Surface,
    types::{Container, Part, Rect},
    view::{SliderView, View},
    Result,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, instrument, warn};

struct SliderState {
    config: SliderConfig,
    items: Vec<ChildItem>,
    total: usize,
    /// Items visible at once
    active: usize,
    /// First visible item, always in `0..total`
    start: usize,
    /// Signed step of the slide animation in flight, 0 when idle
    moving: i64,
    /// Steps requested but not yet started
    pending_move: i64,
    /// The settle loop is running
    settling: bool,
    /// Cursor top, the midpoint of the visible children
    cursor_offset: f64,
    /// Last measured host width
    width: Option<f64>,
    /// Slide and height animations of the current move
    animations: Vec<AnimationHandle>,
}

struct SliderInner {
    ctx: Videobox,
    surface: Rc<dyn Surface>,
    state: RefCell<SliderState>,
    /// Batches rapid next/prev calls into one settle
    debouncer: Debouncer<()>,
}

/// Carousel component
#[derive(Clone)]
pub struct Slider {
    inner: Rc<SliderInner>,
}

fn active_items_of(s: &SliderState) -> Vec<usize> {
    if s.total == 0 {
        return Vec::new();
    }
    let start = if s.moving > 0 {
        s.start as i64
    } else {
        s.start as i64 + s.moving
    };
    let len = s.active + s.moving.unsigned_abs() as usize;
    (0..len)
        .map(|i| circular_index(start + i as i64, s.total))
        .collect()
}

impl Slider {
    pub fn new(ctx: &Videobox, surface: Rc<dyn Surface>, config: SliderConfig) -> Self {
        Self {
            inner: Rc::new(SliderInner {
                ctx: ctx.clone(),
                surface,
                state: RefCell::new(SliderState {
                    config,
                    items: Vec::new(),
                    total: 0,
                    active: 0,
                    start: 0,
                    moving: 0,
                    pending_move: 0,
                    settling: false,
                    cursor_offset: 0.0,
                    width: None,
                    animations: Vec::new(),
                }),
                debouncer: Debouncer::new(ctx.config().debounce_window(), ctx.scheduler()),
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.inner.state.borrow().total
    }

    /// Children visible at once
    pub fn active(&self) -> usize {
        self.inner.state.borrow().active
    }

    /// First visible child, always in `[0, total)`
    pub fn start(&self) -> usize {
        self.inner.state.borrow().start
    }

    /// Displacement being animated; 0 when idle
    pub fn moving(&self) -> i64 {
        self.inner.state.borrow().moving
    }

    /// Displacement requested but not yet applied
    pub fn pending_move(&self) -> i64 {
        self.inner.state.borrow().pending_move
    }

    pub fn cursor_offset(&self) -> f64 {
        self.inner.state.borrow().cursor_offset
    }

    pub fn config(&self) -> SliderConfig {
        self.inner.state.borrow().config.clone()
    }

    pub fn items(&self) -> Vec<ChildItem> {
        self.inner.state.borrow().items.clone()
    }

    /// Child indices currently rendered, in display order
    pub fn active_items(&self) -> Vec<usize> {
        active_items_of(&self.inner.state.borrow())
    }

    pub fn item_width(&self) -> f64 {
        let s = self.inner.state.borrow();
        clip(s.config.item_width, self.inner.ctx.config().default_item_width)
    }

    /// Children moved per click
    pub fn move_count(&self) -> usize {
        let s = self.inner.state.borrow();
        let count = if s.config.single { 1 } else { s.active };
        s.total.min(count)
    }

    pub fn view(&self) -> View {
        let item_width = self.item_width();
        let s = self.inner.state.borrow();
        let items = active_items_of(&s);
        let track_width_percent = if s.active > 0 {
            100.0 * items.len() as f64 / s.active as f64
        } else {
            100.0
        };
        let item_max_percent = if items.is_empty() {
            100.0
        } else {
            100.0 / items.len() as f64
        };

        View::Slider(SliderView {
            items,
            track_width_percent,
            item_basis: item_width,
            item_max_percent,
            cursors: s.active > 0 && s.active < s.total,
            cursor_offset: s.cursor_offset,
            prev_label: s.config.prev_label().to_string(),
            next_label: s.config.next_label().to_string(),
        })
    }

    async fn render(&self) {
        let view = self.view();
        self.inner.surface.commit(view).await;
    }

    pub async fn mount(&self) {
        self.inner.state.borrow_mut().width = self.inner.surface.rect(Part::Host).map(|r| r.width);
        self.recalculate_count();
        self.render().await;
        self.recalculate_cursor_offset();
        self.render().await;
    }

    /// Drop queued moves and stop a running slide
    pub fn unmount(&self) {
        self.inner.debouncer.cancel();
        let animations = {
            let mut s = self.inner.state.borrow_mut();
            s.pending_move = 0;
            std::mem::take(&mut s.animations)
        };
        for handle in animations {
            handle.cancel();
        }
    }

    /// Replace the slotted children; `total` follows the child count
    pub async fn set_items(&self, items: Vec<ChildItem>) {
        for item in &items {
            item.set_container(Container::Slider);
        }
        {
            let mut s = self.inner.state.borrow_mut();
            s.total = items.len();
            s.items = items;
            s.start = circular_index(s.start as i64, s.total);
        }
        self.recalculate_count();
        self.render().await;
        self.recalculate_cursor_offset();
        self.render().await;
    }

    pub async fn configure(&self, update: impl FnOnce(&mut SliderConfig)) {
        update(&mut self.inner.state.borrow_mut().config);
        self.recalculate_count();
        self.render().await;
        self.recalculate_cursor_offset();
        self.render().await;
    }

    /// Host resized; only width changes matter
    pub async fn resized(&self) {
        let width = self.inner.surface.rect(Part::Host).map(|r| r.width);
        {
            let mut s = self.inner.state.borrow_mut();
            if s.width == width {
                return;
            }
            s.width = width;
        }
        self.recalculate_count();
        self.render().await;
        self.recalculate_cursor_offset();
        self.render().await;
    }

    /// Fit as many children as the host width allows, keeping room for the
    /// cursors when not everything fits
    pub fn recalculate_count(&self) {
        let width = self
            .inner
            .surface
            .rect(Part::Host)
            .map(|r| r.width)
            .unwrap_or(0.0);
        let item_width = self.item_width();
        let cursor_room = self.inner.ctx.config().cursor_room;

        let mut s = self.inner.state.borrow_mut();
        let visible = (width / item_width).round().max(1.0) as usize;
        s.active = if visible >= s.total {
            visible
        } else {
            ((width - cursor_room) / item_width).round().max(1.0) as usize
        };
        debug!(width, item_width, active = s.active, total = s.total, "Slider count recalculated");
    }

    /// Vertical midpoint of the visible children relative to the host top
    pub fn recalculate_cursor_offset(&self) {
        let (selector, total) = {
            let s = self.inner.state.borrow();
            (s.config.selector.clone(), s.total)
        };
        let rects: Vec<Rect> = match selector {
            Some(selector) => self.inner.surface.select_rects(&selector),
            None => (0..total)
                .filter_map(|i| self.inner.surface.rect(Part::Item(i)))
                .collect(),
        };

        let midpoints: Vec<f64> = rects
            .iter()
            .filter(|r| r.width != 0.0 || r.height != 0.0)
            .map(|r| (r.top() + r.bottom()) / 2.0)
            .collect();
        if midpoints.is_empty() {
            return;
        }

        let midpoint = midpoints.iter().sum::<f64>() / midpoints.len() as f64;
        let top = self
            .inner
            .surface
            .rect(Part::Host)
            .map(|r| r.top())
            .unwrap_or(0.0);
        self.inner.state.borrow_mut().cursor_offset = midpoint - top;
    }

    pub async fn prev(&self) {
        let count = self.move_count() as i64;
        self.request_move(-count).await;
    }

    pub async fn next(&self) {
        let count = self.move_count() as i64;
        self.request_move(count).await;
    }

    async fn request_move(&self, delta: i64) {
        self.inner.state.borrow_mut().pending_move += delta;
        let slider = self.clone();
        self.inner
            .debouncer
            .request(move || async move { slider.settle().await })
            .await;
    }

    /// Run settle cycles until no move is pending
    #[instrument(skip(self))]
    async fn settle(&self) {
        {
            let mut s = self.inner.state.borrow_mut();
            if s.settling || s.pending_move == 0 {
                return;
            }
            s.settling = true;
        }

        loop {
            if let Err(e) = self.settle_cycle().await {
                warn!(error = %e, "Slider settle cycle failed");
                self.recover().await;
            }

            let pending = self.inner.state.borrow().pending_move;
            if pending == 0 {
                break;
            }
        }

        self.inner.state.borrow_mut().settling = false;
    }

    async fn settle_cycle(&self) -> Result<()> {
        let (step, start) = {
            let mut s = self.inner.state.borrow_mut();
            let step = if s.total > 0 {
                s.pending_move % s.total as i64
            } else {
                0
            };
            s.pending_move = 0;
            (step, s.start)
        };
        debug!(step, start, "Settling slider move");

        let mut heights = None;
        if let Some(before) = self.inner.surface.rect(Part::Content) {
            {
                let mut s = self.inner.state.borrow_mut();
                s.start = circular_index(start as i64 + step, s.total);
            }
            self.render().await;

            let after = self
                .inner
                .surface
                .rect(Part::Content)
                .map(|r| r.height)
                .unwrap_or(0.0);
            let visible: HashSet<usize> = self.active_items().into_iter().collect();
            self.recalculate_cursor_offset();

            self.inner.state.borrow_mut().start = start;
            self.render().await;

            let scheduler = self.inner.ctx.scheduler();
            for (i, item) in self.items().iter().enumerate() {
                if !visible.contains(&i) {
                    item.hide_players(scheduler.as_ref());
                }
            }
            heights = Some((before.height, after));
        }

        self.inner.state.borrow_mut().moving = step;
        self.render().await;
        self.slide(heights).await
    }

    async fn slide(&self, heights: Option<(f64, f64)>) -> Result<()> {
        let (moving, active) = {
            let s = self.inner.state.borrow();
            (s.moving, s.active)
        };
        if moving == 0 {
            return Ok(());
        }
        if self.inner.surface.rect(Part::Content).is_none() {
            self.fold_move();
            self.render().await;
            return Ok(());
        }

        let step = moving as f64 / (active as f64 + moving.abs() as f64);
        let (from, to) = if moving > 0 {
            ("translate(0%)".to_string(), format!("translate({}%)", -100.0 * step))
        } else {
            (format!("translate({}%)", 100.0 * step), "translate(0%)".to_string())
        };
        let tuning = self.inner.ctx.config();
        let timing = Timing::new(
            tuning.slide_factor * self.item_width() * step.abs(),
            &tuning.easing,
        );

        let mut finished = Vec::new();
        if let Some(anim) = animate(
            self.inner.surface.as_ref(),
            Part::Content,
            vec![
                Keyframe::new().set("transform", from),
                Keyframe::new().set("transform", to.clone()),
            ],
            timing.clone(),
        ) {
            self.inner.state.borrow_mut().animations.push(anim.handle);
            finished.push(anim.finished);
        }
        self.inner
            .surface
            .set_style(Part::Content, "transform", Some(&to));

        if let Some((before, after)) = heights {
            if before != after && (before != 0.0 || after != 0.0) {
                if let Some(anim) = animate(
                    self.inner.surface.as_ref(),
                    Part::Wrap,
                    vec![
                        Keyframe::new().set("height", px(before)),
                        Keyframe::new().set("height", px(after)),
                    ],
                    timing,
                ) {
                    self.inner.state.borrow_mut().animations.push(anim.handle);
                    finished.push(anim.finished);
                }
                self.inner
                    .surface
                    .set_style(Part::Wrap, "height", Some(&px(after)));
            }
        }

        animation::all(finished).await?;

        self.inner.state.borrow_mut().animations.clear();
        self.fold_move();
        self.render().await;
        self.inner.surface.set_style(Part::Content, "transform", None);
        Ok(())
    }

    fn fold_move(&self) {
        let mut s = self.inner.state.borrow_mut();
        s.start = circular_index(s.start as i64 + s.moving, s.total);
        s.moving = 0;
    }

    /// Leave the slider idle at its last committed position
    async fn recover(&self) {
        {
            let mut s = self.inner.state.borrow_mut();
            s.moving = 0;
            s.animations.clear();
        }
        self.inner.surface.set_style(Part::Content, "transform", None);
        self.render().await;
    }
}

impl std::fmt::Debug for Slider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.inner.state.borrow();
        f.debug_struct("Slider")
            .field("total", &s.total)
            .field("active", &s.active)
            .field("start", &s.start)
            .field("moving", &s.moving)
            .field("pending_move", &s.pending_move)
            .finish()
    }
}
