//! DOM-backed surfaces.
//!
//! Each component gets a shadow root on its host element. Views are written
//! as markup; parts are resolved by class inside the shadow root; animations
//! run through the Web Animations API.

use crate::markup;
use async_trait::async_trait;
use js_sys::{Array, Object, Promise, Reflect};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, error, warn};
use videobox_core::{
    animation::{Completion, Keyframe, Playback, Timing},
    headless::HeadlessSurface,
    Element, Key, Part, Player, PlayerKind, Rect, Registry, Scheduler, Surface, SurfaceFactory,
    View,
};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    DomRect, Event, HtmlElement, KeyboardEvent, KeyframeAnimationOptions, MutationObserver,
    MutationObserverInit, ResizeObserver, ShadowRoot, ShadowRootInit, ShadowRootMode,
};

fn to_rect(r: DomRect) -> Rect {
    Rect::new(r.x(), r.y(), r.width(), r.height())
}

/// An element of the host document
#[derive(Debug, Clone)]
pub struct DomElement {
    element: HtmlElement,
}

impl DomElement {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }
}

impl Element for DomElement {
    fn bounding_rect(&self) -> Rect {
        to_rect(self.element.get_bounding_client_rect())
    }

    fn display(&self) -> Option<String> {
        self.element
            .style()
            .get_property_value("display")
            .ok()
            .filter(|v| !v.is_empty())
    }

    fn set_display(&self, value: Option<&str>) {
        let style = self.element.style();
        let _ = match value {
            Some(value) => style.set_property("display", value),
            None => style.remove_property("display").map(|_| ()),
        };
    }

    fn data(&self, key: &str) -> Option<String> {
        self.element.get_attribute(&format!("data-{}", key))
    }

    fn set_data(&self, key: &str, value: Option<&str>) {
        let name = format!("data-{}", key);
        let _ = match value {
            Some(value) => self.element.set_attribute(&name, value),
            None => self.element.remove_attribute(&name),
        };
    }
}

/// User intent read off a clicked or key-activated node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Open,
    Close,
    Prev,
    Next,
    Page(usize),
}

impl Action {
    pub fn parse(name: &str, index: Option<&str>) -> Option<Self> {
        match name {
            "open" => Some(Action::Open),
            "close" => Some(Action::Close),
            "prev" => Some(Action::Prev),
            "next" => Some(Action::Next),
            "page" => index?.parse().ok().map(Action::Page),
            _ => None,
        }
    }

    fn from_event(event: &Event) -> Option<Self> {
        let target = event.target()?.dyn_into::<web_sys::Element>().ok()?;
        let node = target.closest("[data-action]").ok()??;
        let name = node.get_attribute("data-action")?;
        Action::parse(&name, node.get_attribute("data-index").as_deref())
    }
}

struct Running(web_sys::Animation);

impl Playback for Running {
    fn cancel(&self) {
        self.0.cancel();
    }
}

type Listener = Closure<dyn FnMut(Event)>;
type Callback = Closure<dyn FnMut(JsValue)>;

/// A component mounted on a host element's shadow root
pub struct DomSurface {
    host: HtmlElement,
    root: ShadowRoot,
    markup: RefCell<String>,
    listeners: RefCell<Vec<Listener>>,
    resize: RefCell<Option<(ResizeObserver, Callback)>>,
    mutation: RefCell<Option<(MutationObserver, Callback)>>,
}

impl DomSurface {
    /// Take over `host`, reusing its shadow root if it already has one
    pub fn attach(host: HtmlElement) -> Result<Self, JsValue> {
        let root = match host.shadow_root() {
            Some(root) => root,
            None => host.attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))?,
        };
        Ok(Self {
            host,
            root,
            markup: RefCell::new(String::new()),
            listeners: RefCell::new(Vec::new()),
            resize: RefCell::new(None),
            mutation: RefCell::new(None),
        })
    }

    pub fn host_element(&self) -> &HtmlElement {
        &self.host
    }

    fn part(&self, part: Part) -> Option<HtmlElement> {
        if part == Part::Host {
            return Some(self.host.clone());
        }
        self.root
            .query_selector(&markup::selector(part))
            .ok()
            .flatten()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }

    /// Route clicks and Enter/Space on `data-action` nodes to `handler`
    pub fn on_action(&self, handler: impl Fn(Action) + 'static) -> Result<(), JsValue> {
        let handler = Rc::new(handler);

        let on_click = handler.clone();
        let click: Listener = Closure::new(move |event: Event| {
            if let Some(action) = Action::from_event(&event) {
                on_click(action);
            }
        });
        let keydown: Listener = Closure::new(move |event: Event| {
            let key = event
                .dyn_ref::<KeyboardEvent>()
                .map(|e| Key::from_name(&e.key()))
                .unwrap_or(Key::Other);
            if !key.activates() {
                return;
            }
            if let Some(action) = Action::from_event(&event) {
                event.prevent_default();
                handler(action);
            }
        });

        self.root
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        self.root
            .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        self.listeners.borrow_mut().extend([click, keydown]);
        Ok(())
    }

    fn apply_styles(&self, rules: &[markup::StyleRule]) {
        for rule in rules {
            let Ok(nodes) = self.root.query_selector_all(rule.selector) else {
                continue;
            };
            for node in (0..nodes.length()).filter_map(|i| nodes.item(i)) {
                let Ok(element) = node.dyn_into::<HtmlElement>() else {
                    continue;
                };
                let style = element.style();
                let _ = match rule.value.as_deref() {
                    Some(value) => style.set_property(rule.property, value),
                    None => style.remove_property(rule.property).map(|_| ()),
                };
            }
        }
    }

    /// Call `handler` whenever the host box changes size. Replaces any
    /// previous resize handler.
    pub fn observe_resize(&self, handler: impl Fn() + 'static) -> Result<(), JsValue> {
        let callback: Callback = Closure::new(move |_entries: JsValue| handler());
        let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
        observer.observe(&self.host);
        if let Some((previous, _)) = self.resize.replace(Some((observer, callback))) {
            previous.disconnect();
        }
        Ok(())
    }

    /// Call `handler` whenever light-DOM children are added or removed.
    /// Replaces any previous children handler.
    pub fn observe_children(&self, handler: impl Fn() + 'static) -> Result<(), JsValue> {
        let callback: Callback = Closure::new(move |_records: JsValue| handler());
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let init = Object::new();
        Reflect::set(&init, &"childList".into(), &true.into())?;
        observer.observe_with_options(&self.host, &init.unchecked_into::<MutationObserverInit>())?;
        if let Some((previous, _)) = self.mutation.replace(Some((observer, callback))) {
            previous.disconnect();
        }
        Ok(())
    }

    /// Stop both observers and drop their callbacks
    pub fn disconnect(&self) {
        if let Some((observer, _)) = self.resize.take() {
            observer.disconnect();
        }
        if let Some((observer, _)) = self.mutation.take() {
            observer.disconnect();
        }
    }

    pub fn is_observed(&self) -> bool {
        self.resize.borrow().is_some() || self.mutation.borrow().is_some()
    }

    /// Give every light-DOM child the item slot of its index
    pub fn slot_children(&self) -> usize {
        let children = self.host.children();
        for i in 0..children.length() {
            if let Some(child) = children.item(i) {
                let _ = child.set_attribute("slot", &markup::item_slot(i as usize));
            }
        }
        children.length() as usize
    }
}

fn keyframes(frames: &[Keyframe]) -> Result<Array, JsValue> {
    let out = Array::new();
    for frame in frames {
        let object = Object::new();
        for (property, value) in frame.iter() {
            Reflect::set(&object, &property.into(), &value.into())?;
        }
        out.push(&object);
    }
    Ok(out)
}

fn options(timing: &Timing) -> Result<KeyframeAnimationOptions, JsValue> {
    let object = Object::new();
    Reflect::set(&object, &"duration".into(), &timing.duration_ms.into())?;
    Reflect::set(&object, &"easing".into(), &timing.easing.as_str().into())?;
    Ok(object.unchecked_into())
}

#[async_trait(?Send)]
impl Surface for DomSurface {
    fn host(&self) -> Rc<dyn Element> {
        Rc::new(DomElement::new(self.host.clone()))
    }

    fn rect(&self, part: Part) -> Option<Rect> {
        self.part(part).map(|e| to_rect(e.get_bounding_client_rect()))
    }

    fn animate(
        &self,
        part: Part,
        frames: &[Keyframe],
        timing: &Timing,
        completion: Completion,
    ) -> Option<Box<dyn Playback>> {
        let element = self.part(part)?;
        let started = keyframes(frames).and_then(|frames| {
            let frames: Object = frames.into();
            Ok(element.animate_with_keyframe_animation_options(Some(&frames), &options(timing)?))
        });
        match started {
            Ok(animation) => {
                let finished = completion.clone();
                let on_finish = Closure::once_into_js(move || finished.finish());
                animation.set_onfinish(Some(on_finish.unchecked_ref()));
                // Fires for our own cancel too; by then the completion is settled
                let on_cancel = Closure::once_into_js(move || completion.cancel());
                animation.set_oncancel(Some(on_cancel.unchecked_ref()));
                Some(Box::new(Running(animation)))
            }
            Err(e) => {
                warn!(%part, error = ?e, "Animation rejected");
                None
            }
        }
    }

    fn set_style(&self, part: Part, property: &str, value: Option<&str>) {
        let Some(element) = self.part(part) else {
            return;
        };
        let style = element.style();
        let _ = match value {
            Some(value) => style.set_property(property, value),
            None => style.remove_property(property).map(|_| ()),
        };
    }

    fn focus(&self, part: Part) {
        if let Some(element) = self.part(part) {
            let _ = element.focus();
        }
    }

    fn query(&self, selector: &str) -> Option<Rc<dyn Element>> {
        let element = self.host.query_selector(selector).ok()??;
        let element = element.dyn_into::<HtmlElement>().ok()?;
        Some(Rc::new(DomElement::new(element)))
    }

    fn select_rects(&self, selector: &str) -> Vec<Rect> {
        let Ok(nodes) = self.host.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(|e| to_rect(e.get_bounding_client_rect()))
            .collect()
    }

    async fn commit(&self, view: View) {
        let html = markup::render(&view);
        if *self.markup.borrow() != html {
            self.root.set_inner_html(&html);
            *self.markup.borrow_mut() = html;
        }
        self.apply_styles(&markup::styles(&view));
        // Resolve after a microtask, like an element's update completing
        let _ = JsFuture::from(Promise::resolve(&JsValue::UNDEFINED)).await;
    }
}

impl std::fmt::Debug for DomSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomSurface")
            .field("host", &self.host.tag_name())
            .finish()
    }
}

/// Creates player hosts in the page and wires their close controls
pub struct DomDocument {
    document: web_sys::Document,
    scheduler: Rc<dyn Scheduler>,
    registry: RefCell<Option<Registry>>,
    placement: RefCell<Option<HtmlElement>>,
    /// Observed surfaces, disconnected on teardown
    observed: RefCell<Vec<Weak<DomSurface>>>,
}

impl DomDocument {
    pub fn new(document: web_sys::Document, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            document,
            scheduler,
            registry: RefCell::new(None),
            placement: RefCell::new(None),
            observed: RefCell::new(Vec::new()),
        }
    }

    /// Remember `surface` so [`DomDocument::disconnect`] stops its observers
    pub fn track(&self, surface: &Rc<DomSurface>) {
        let mut observed = self.observed.borrow_mut();
        observed.retain(|s| s.strong_count() > 0);
        observed.push(Rc::downgrade(surface));
    }

    /// Disconnect the observers of every tracked surface
    pub fn disconnect(&self) {
        let observed = std::mem::take(&mut *self.observed.borrow_mut());
        let count = observed
            .iter()
            .filter_map(Weak::upgrade)
            .inspect(|surface| surface.disconnect())
            .count();
        debug!(count, "Observers disconnected");
    }

    /// Registry used to find the player behind a close control
    pub fn bind(&self, registry: Registry) {
        *self.registry.borrow_mut() = Some(registry);
    }

    /// Parent for inline players created until the next call; the body
    /// when `None`
    pub fn place_inline_in(&self, parent: Option<HtmlElement>) {
        *self.placement.borrow_mut() = parent;
    }

    fn mount_player(&self, kind: PlayerKind) -> Result<Rc<DomSurface>, JsValue> {
        let host = self
            .document
            .create_element(kind.tag_name())?
            .dyn_into::<HtmlElement>()
            .map_err(JsValue::from)?;

        let parent = match kind {
            PlayerKind::Inline => self.placement.borrow().clone(),
            PlayerKind::Overlay => None,
        };
        match parent {
            Some(parent) => {
                host.set_attribute("slot", "player")?;
                parent.append_child(&host)?;
            }
            None => {
                let body = self
                    .document
                    .body()
                    .ok_or_else(|| JsValue::from_str("document has no body"))?;
                body.append_child(&host)?;
            }
        }

        let surface = Rc::new(DomSurface::attach(host)?);
        let registry = self.registry.borrow().clone();

        let weak = Rc::downgrade(&surface);
        let close_registry = registry.clone();
        let scheduler = self.scheduler.clone();
        surface.on_action(move |action| {
            if action != Action::Close {
                return;
            }
            if let Some(player) = owner(close_registry.as_ref(), &weak, kind) {
                scheduler.spawn(Box::pin(async move { player.close().await }));
            }
        })?;

        let weak = Rc::downgrade(&surface);
        let scheduler = self.scheduler.clone();
        surface.observe_resize(move || {
            if let Some(player) = owner(registry.as_ref(), &weak, kind) {
                scheduler.spawn(Box::pin(async move { player.resized().await }));
            }
        })?;
        self.track(&surface);

        debug!(%kind, "Player host mounted");
        Ok(surface)
    }
}

/// The registered player rendering to `surface`
fn owner(
    registry: Option<&Registry>,
    surface: &Weak<DomSurface>,
    kind: PlayerKind,
) -> Option<Player> {
    let (registry, surface) = (registry?, surface.upgrade()?);
    registry
        .instances(kind)
        .into_iter()
        .find(|handle| {
            std::ptr::eq(
                Rc::as_ptr(&handle.player().surface()) as *const (),
                Rc::as_ptr(&surface) as *const (),
            )
        })
        .map(|handle| handle.player().clone())
}

impl SurfaceFactory for DomDocument {
    fn create_player_surface(&self, kind: PlayerKind) -> Rc<dyn Surface> {
        match self.mount_player(kind) {
            Ok(surface) => surface,
            Err(e) => {
                error!(%kind, error = ?e, "Could not mount player host, using a detached surface");
                Rc::new(HeadlessSurface::new(self.scheduler.clone(), Rect::default()))
            }
        }
    }
}
