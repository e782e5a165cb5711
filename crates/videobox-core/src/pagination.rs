//! Paged grid.
//!
//! Shows one page of children at a time. The rendered window is the page
//! size rounded up to whole rows of `active` columns; slots past the page or
//! past the last child render empty. Changing page closes inline players in
//! children that left the window.

use crate::{
    config::PaginationConfig,
    document::Videobox,
    geometry::clip,
    item::ChildItem,
    surface::Surface,
    types::{Container, Key, Part},
    view::{PageLink, PaginationView, View},
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, instrument};

struct PaginationState {
    config: PaginationConfig,
    /// Slotted children, in document order
    items: Vec<ChildItem>,
    /// Child count
    total: usize,
    /// Columns that fit the last measured width
    active: usize,
    /// Last measured host width
    width: Option<f64>,
}

struct PaginationInner {
    ctx: Videobox,
    surface: Rc<dyn Surface>,
    state: RefCell<PaginationState>,
}

/// Paged grid component
#[derive(Clone)]
pub struct Pagination {
    inner: Rc<PaginationInner>,
}

impl Pagination {
    pub fn new(ctx: &Videobox, surface: Rc<dyn Surface>, config: PaginationConfig) -> Self {
        Self {
            inner: Rc::new(PaginationInner {
                ctx: ctx.clone(),
                surface,
                state: RefCell::new(PaginationState {
                    config,
                    items: Vec::new(),
                    total: 0,
                    active: 0,
                    width: None,
                }),
            }),
        }
    }

    pub fn total(&self) -> usize {
        self.inner.state.borrow().total
    }

    /// Columns that fit the host width
    pub fn active(&self) -> usize {
        self.inner.state.borrow().active
    }

    pub fn config(&self) -> PaginationConfig {
        self.inner.state.borrow().config.clone()
    }

    pub fn items(&self) -> Vec<ChildItem> {
        self.inner.state.borrow().items.clone()
    }

    pub fn item_width(&self) -> f64 {
        let s = self.inner.state.borrow();
        clip(s.config.item_width, self.inner.ctx.config().default_item_width)
    }

    /// Children per page, at least one and never more than the child count
    pub fn per_page(&self) -> usize {
        let s = self.inner.state.borrow();
        let requested = clip(s.config.per_page, self.inner.ctx.config().default_per_page)
            .floor()
            .max(1.0);
        let bound = s.total.max(1);
        if requested >= bound as f64 {
            bound
        } else {
            requested as usize
        }
    }

    pub fn page_count(&self) -> usize {
        self.total().div_ceil(self.per_page())
    }

    /// Requested page clamped to `[0, page_count - 1]`
    pub fn page(&self) -> usize {
        let last = self.page_count().saturating_sub(1) as i64;
        self.inner.state.borrow().config.page.clamp(0, last.max(0)) as usize
    }

    fn window_size(&self) -> usize {
        let per_page = self.per_page();
        match self.active() {
            0 => per_page,
            active => per_page.div_ceil(active).saturating_mul(active),
        }
    }

    /// Child indices of the rendered window, including indices past the end
    pub fn active_items(&self) -> Vec<usize> {
        if self.total() == 0 {
            return Vec::new();
        }
        let start = self.page().saturating_mul(self.per_page());
        (start..start.saturating_add(self.window_size())).collect()
    }

    /// Child index per rendered slot; `None` for filler slots
    pub fn slots(&self) -> Vec<Option<usize>> {
        let total = self.total();
        let per_page = self.per_page();
        self.active_items()
            .into_iter()
            .enumerate()
            .map(|(j, i)| (i < total && j < per_page).then_some(i))
            .collect()
    }

    fn pages(&self) -> Vec<PageLink> {
        let count = self.page_count();
        if count <= 1 {
            return Vec::new();
        }
        let current = self.page();
        (0..count)
            .map(|index| {
                let label = (index + 1).to_string();
                let aria_label = if index == current {
                    format!("Page {}, Current Page", label)
                } else {
                    format!("Page {}", label)
                };
                PageLink {
                    index,
                    label,
                    current: index == current,
                    aria_label,
                }
            })
            .collect()
    }

    pub fn view(&self) -> View {
        let active = self.active();
        View::Pagination(PaginationView {
            slots: self.slots(),
            item_basis: self.item_width(),
            column_percent: if active > 0 { 100.0 / active as f64 } else { 100.0 },
            pages: self.pages(),
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
    }

    /// Columns from host width: `max(1, floor(width / item width))`
    pub fn recalculate_count(&self) {
        let width = self
            .inner
            .surface
            .rect(Part::Host)
            .map(|r| r.width)
            .unwrap_or(0.0);
        let item_width = self.item_width();
        let active = (width / item_width).floor().max(1.0) as usize;
        self.inner.state.borrow_mut().active = active;
        debug!(width, item_width, active, "Pagination count recalculated");
    }

    pub async fn set_items(&self, items: Vec<ChildItem>) {
        for item in &items {
            item.set_container(Container::Pager);
        }
        {
            let mut s = self.inner.state.borrow_mut();
            s.total = items.len();
            s.items = items;
        }
        self.render().await;
    }

    pub async fn configure(&self, update: impl FnOnce(&mut PaginationConfig)) {
        let page_changed = {
            let mut s = self.inner.state.borrow_mut();
            let before = s.config.page;
            update(&mut s.config);
            s.config.page != before
        };
        self.recalculate_count();
        if page_changed {
            self.hide_out_of_view();
        }
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
    }

    /// Go to `page` (clamped when read)
    #[instrument(skip(self))]
    pub async fn set_page(&self, page: i64) {
        self.configure(|c| c.page = page).await;
    }

    /// Keyboard activation of a page link
    pub async fn on_page_key(&self, index: usize, key: Key) {
        if key.activates() {
            self.set_page(index as i64).await;
        }
    }

    fn hide_out_of_view(&self) {
        let visible: HashSet<usize> = self.active_items().into_iter().collect();
        let scheduler = self.inner.ctx.scheduler();
        let hidden: usize = self
            .items()
            .iter()
            .enumerate()
            .filter(|(i, _)| !visible.contains(i))
            .map(|(_, item)| item.hide_players(scheduler.as_ref()))
            .sum();
        if hidden > 0 {
            debug!(hidden, "Closed players on page change");
        }
    }
}

impl std::fmt::Debug for Pagination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pagination")
            .field("total", &self.total())
            .field("page", &self.page())
            .field("per_page", &self.per_page())
            .finish()
    }
}
