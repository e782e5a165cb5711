//! Deterministic in-memory rendering.
//!
//! [`HeadlessSurface`] keeps the last committed view, answers measurements
//! from configured rectangles (or a layout function of the view), finishes
//! animations on the scheduler's clock and records every commit, animation
//! and style write. It backs the test suite and server-side layout
//! prediction.

use crate::{
    animation::{Completion, Keyframe, Playback, Timing},
    runtime::Scheduler,
    surface::{Element, Surface, SurfaceFactory},
    types::{Part, PlayerKind, Rect},
    view::View,
};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

/// Element with settable geometry and style
#[derive(Debug, Default)]
pub struct HeadlessElement {
    rect: Cell<Rect>,
    display: RefCell<Option<String>>,
    data: RefCell<HashMap<String, String>>,
}

impl HeadlessElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rect(rect: Rect) -> Self {
        let el = Self::new();
        el.rect.set(rect);
        el
    }

    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }
}

impl Element for HeadlessElement {
    fn bounding_rect(&self) -> Rect {
        self.rect.get()
    }

    fn display(&self) -> Option<String> {
        self.display.borrow().clone()
    }

    fn set_display(&self, value: Option<&str>) {
        *self.display.borrow_mut() = value.map(str::to_string);
    }

    fn data(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn set_data(&self, key: &str, value: Option<&str>) {
        let mut data = self.data.borrow_mut();
        match value {
            Some(v) => {
                data.insert(key.to_string(), v.to_string());
            }
            None => {
                data.remove(key);
            }
        }
    }
}

/// Lifecycle of a recorded animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Finished,
    Cancelled,
}

/// One animation started on a headless surface
#[derive(Debug, Clone)]
pub struct AnimationRecord {
    pub part: Part,
    pub keyframes: Vec<Keyframe>,
    pub timing: Timing,
    pub state: AnimationState,
}

type Layout = Box<dyn Fn(&View, Part) -> Option<Rect>>;

/// In-memory [`Surface`]
pub struct HeadlessSurface {
    host: Rc<HeadlessElement>,
    scheduler: Rc<dyn Scheduler>,
    rects: RefCell<HashMap<Part, Rect>>,
    layout: RefCell<Option<Layout>>,
    view: RefCell<Option<View>>,
    commits: Cell<usize>,
    styles: RefCell<HashMap<(Part, String), String>>,
    animations: Rc<RefCell<Vec<AnimationRecord>>>,
    completions: RefCell<Vec<Completion>>,
    focused: Cell<Option<Part>>,
    children: RefCell<Vec<(String, Rc<HeadlessElement>)>>,
}

impl HeadlessSurface {
    pub fn new(scheduler: Rc<dyn Scheduler>, host_rect: Rect) -> Self {
        Self {
            host: Rc::new(HeadlessElement::with_rect(host_rect)),
            scheduler,
            rects: RefCell::new(HashMap::new()),
            layout: RefCell::new(None),
            view: RefCell::new(None),
            commits: Cell::new(0),
            styles: RefCell::new(HashMap::new()),
            animations: Rc::new(RefCell::new(Vec::new())),
            completions: RefCell::new(Vec::new()),
            focused: Cell::new(None),
            children: RefCell::new(Vec::new()),
        }
    }

    pub fn host_element(&self) -> Rc<HeadlessElement> {
        self.host.clone()
    }

    /// Fixed rectangle for a part (used while the part is rendered)
    pub fn set_rect(&self, part: Part, rect: Rect) {
        if part == Part::Host {
            self.host.set_rect(rect);
        } else {
            self.rects.borrow_mut().insert(part, rect);
        }
    }

    /// Compute part rectangles from the committed view; overrides fixed
    /// rectangles for every part except the host.
    pub fn set_layout(&self, layout: impl Fn(&View, Part) -> Option<Rect> + 'static) {
        *self.layout.borrow_mut() = Some(Box::new(layout));
    }

    /// Register a light-DOM child reachable by `selector`
    pub fn add_child(&self, selector: &str, element: Rc<HeadlessElement>) {
        self.children
            .borrow_mut()
            .push((selector.to_string(), element));
    }

    pub fn view(&self) -> Option<View> {
        self.view.borrow().clone()
    }

    pub fn commits(&self) -> usize {
        self.commits.get()
    }

    pub fn animations(&self) -> Vec<AnimationRecord> {
        self.animations.borrow().clone()
    }

    pub fn animations_on(&self, part: Part) -> Vec<AnimationRecord> {
        self.animations
            .borrow()
            .iter()
            .filter(|a| a.part == part)
            .cloned()
            .collect()
    }

    /// Cancel running animations on `part` from the host side, as a browser
    /// does when the element leaves the tree.
    pub fn interrupt(&self, part: Part) {
        let interrupted: Vec<usize> = {
            let mut records = self.animations.borrow_mut();
            records
                .iter_mut()
                .enumerate()
                .filter(|(_, r)| r.part == part && r.state == AnimationState::Running)
                .map(|(i, r)| {
                    r.state = AnimationState::Cancelled;
                    i
                })
                .collect()
        };
        let completions = self.completions.borrow();
        for i in interrupted {
            if let Some(completion) = completions.get(i) {
                completion.cancel();
            }
        }
    }

    pub fn style(&self, part: Part, property: &str) -> Option<String> {
        self.styles
            .borrow()
            .get(&(part, property.to_string()))
            .cloned()
    }

    pub fn focused(&self) -> Option<Part> {
        self.focused.get()
    }

    fn renders(&self, part: Part) -> bool {
        match self.view.borrow().as_ref() {
            Some(view) => view.renders(part),
            None => part == Part::Host,
        }
    }
}

struct HeadlessPlayback {
    records: Rc<RefCell<Vec<AnimationRecord>>>,
    index: usize,
}

impl Playback for HeadlessPlayback {
    fn cancel(&self) {
        if let Some(record) = self.records.borrow_mut().get_mut(self.index) {
            if record.state == AnimationState::Running {
                record.state = AnimationState::Cancelled;
            }
        }
    }
}

/// Completes on the second poll
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[async_trait(?Send)]
impl Surface for HeadlessSurface {
    fn host(&self) -> Rc<dyn Element> {
        self.host.clone()
    }

    fn rect(&self, part: Part) -> Option<Rect> {
        if part == Part::Host {
            return Some(self.host.bounding_rect());
        }
        if !self.renders(part) {
            return None;
        }
        if let Some(layout) = self.layout.borrow().as_ref() {
            let view = self.view.borrow();
            return view.as_ref().and_then(|v| layout(v, part));
        }
        Some(self.rects.borrow().get(&part).copied().unwrap_or_default())
    }

    fn animate(
        &self,
        part: Part,
        keyframes: &[Keyframe],
        timing: &Timing,
        completion: Completion,
    ) -> Option<Box<dyn Playback>> {
        if !self.renders(part) {
            return None;
        }

        let index = {
            let mut records = self.animations.borrow_mut();
            records.push(AnimationRecord {
                part,
                keyframes: keyframes.to_vec(),
                timing: timing.clone(),
                state: AnimationState::Running,
            });
            records.len() - 1
        };
        self.completions.borrow_mut().push(completion.clone());

        let records = self.animations.clone();
        let sleep = self.scheduler.sleep(timing.duration());
        self.scheduler.spawn(Box::pin(async move {
            sleep.await;
            let finished = {
                let mut records = records.borrow_mut();
                match records.get_mut(index) {
                    Some(record) if record.state == AnimationState::Running => {
                        record.state = AnimationState::Finished;
                        true
                    }
                    _ => false,
                }
            };
            if finished {
                completion.finish();
            }
        }));

        Some(Box::new(HeadlessPlayback {
            records: self.animations.clone(),
            index,
        }))
    }

    fn set_style(&self, part: Part, property: &str, value: Option<&str>) {
        let key = (part, property.to_string());
        let mut styles = self.styles.borrow_mut();
        match value {
            Some(v) => {
                styles.insert(key, v.to_string());
            }
            None => {
                styles.remove(&key);
            }
        }
    }

    fn focus(&self, part: Part) {
        if self.renders(part) {
            self.focused.set(Some(part));
        }
    }

    fn query(&self, selector: &str) -> Option<Rc<dyn Element>> {
        self.children
            .borrow()
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, el)| el.clone() as Rc<dyn Element>)
    }

    fn select_rects(&self, selector: &str) -> Vec<Rect> {
        self.children
            .borrow()
            .iter()
            .filter(|(s, _)| s == selector)
            .map(|(_, el)| el.bounding_rect())
            .collect()
    }

    async fn commit(&self, view: View) {
        *self.view.borrow_mut() = Some(view);
        self.commits.set(self.commits.get() + 1);
        YieldNow(false).await;
    }
}

/// Headless document: creates player surfaces sized to a viewport and keeps
/// them for inspection.
pub struct HeadlessDocument {
    scheduler: Rc<dyn Scheduler>,
    viewport: Rect,
    inline_rect: Cell<Rect>,
    created: RefCell<Vec<(PlayerKind, Rc<HeadlessSurface>)>>,
}

impl HeadlessDocument {
    pub fn new(scheduler: Rc<dyn Scheduler>, viewport: Rect) -> Self {
        Self {
            scheduler,
            viewport,
            inline_rect: Cell::new(viewport),
            created: RefCell::new(Vec::new()),
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Host rectangle given to inline players created from now on
    pub fn set_inline_rect(&self, rect: Rect) {
        self.inline_rect.set(rect);
    }

    /// Standalone surface on the document's clock
    pub fn surface(&self, host_rect: Rect) -> Rc<HeadlessSurface> {
        Rc::new(HeadlessSurface::new(self.scheduler.clone(), host_rect))
    }

    pub fn created(&self, kind: PlayerKind) -> Vec<Rc<HeadlessSurface>> {
        self.created
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, s)| s.clone())
            .collect()
    }
}

impl SurfaceFactory for HeadlessDocument {
    fn create_player_surface(&self, kind: PlayerKind) -> Rc<dyn Surface> {
        let host_rect = match kind {
            PlayerKind::Overlay => self.viewport,
            PlayerKind::Inline => self.inline_rect.get(),
        };
        let surface = self.surface(host_rect);
        for part in [Part::Wrap, Part::Sizer, Part::Content, Part::Video] {
            surface.set_rect(part, host_rect);
        }
        self.created.borrow_mut().push((kind, surface.clone()));
        surface
    }
}
