//! Videobox WASM - browser binding for the Videobox widgets
//!
//! Mounts the core components on real DOM hosts: each host gets a shadow
//! root the component renders into, animations run through the Web
//! Animations API and deferred work goes through the browser event loop.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { VideoboxApp } from 'videobox-wasm';
//!
//! await init();
//!
//! const app = new VideoboxApp('{"debounce_ms": 100}');
//! const slider = app.slider(document.querySelector('#carousel'), { single: '' });
//! const button = app.button(document.querySelector('#intro'), {
//!     src: 'https://www.youtube.com/embed/VIDEO_ID',
//!     player: 'vbinline',
//! });
//! slider.attach(0, button);
//! await slider.next();
//! ```

pub mod dom;
pub mod markup;
pub mod scheduler;

use dom::{Action, DomDocument, DomSurface};
use scheduler::BrowserScheduler;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use videobox_core::{
    Button, ButtonConfig, ChildItem, LocalFuture, Pagination, PaginationConfig, PlayerKind,
    Scheduler, Slider, SliderConfig, Trigger, Videobox, VideoboxConfig,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::HtmlElement;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"[Videobox WASM] Initialized".into());
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    videobox_core::VERSION.to_string()
}

fn to_js(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{:#}", e))
}

fn js_error(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{}", e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Attribute map from a plain JS object; `undefined` and `null` are empty
fn attributes(value: JsValue) -> anyhow::Result<BTreeMap<String, String>> {
    if value.is_undefined() || value.is_null() {
        return Ok(BTreeMap::new());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| anyhow::anyhow!("invalid attributes: {}", e))
}

fn pairs(attrs: &BTreeMap<String, String>) -> impl Iterator<Item = (&str, &str)> {
    attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

/// Per-page Videobox context
#[wasm_bindgen]
pub struct VideoboxApp {
    ctx: Videobox,
    document: Rc<DomDocument>,
}

#[wasm_bindgen]
impl VideoboxApp {
    /// Create the context, optionally from a JSON configuration
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<VideoboxApp, JsValue> {
        Self::build(config.as_deref()).map_err(to_js)
    }

    /// Turn `host` into a trigger button
    pub fn button(&self, host: HtmlElement, attrs: JsValue) -> Result<VideoboxButton, JsValue> {
        self.mount_button(host, attrs).map_err(to_js)
    }

    /// Decorate `host` with a play icon
    pub fn trigger(&self, host: HtmlElement) -> Result<(), JsValue> {
        let surface = DomSurface::attach(host)?;
        let trigger = Trigger::new(Rc::new(surface));
        wasm_bindgen_futures::spawn_local(async move { trigger.mount().await });
        Ok(())
    }

    /// Turn `host` into a slider over its children
    pub fn slider(&self, host: HtmlElement, attrs: JsValue) -> Result<VideoboxSlider, JsValue> {
        self.mount_slider(host, attrs).map_err(to_js)
    }

    /// Turn `host` into a paged grid over its children
    pub fn pagination(
        &self,
        host: HtmlElement,
        attrs: JsValue,
    ) -> Result<VideoboxPagination, JsValue> {
        self.mount_pagination(host, attrs).map_err(to_js)
    }

    /// Close every open player; returns how many were closing
    pub fn close_all(&self) -> usize {
        self.ctx.close_all(None)
    }

    /// Re-measure every player after a viewport resize
    pub fn resized(&self) -> js_sys::Promise {
        let players: Vec<_> = PlayerKind::ALL
            .iter()
            .flat_map(|kind| self.ctx.registry().instances(*kind))
            .collect();
        future_to_promise(async move {
            for handle in players {
                handle.player().resized().await;
            }
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Stop observing hosts, drop the shared overlay and unregister every
    /// player
    pub fn teardown(&self) {
        self.document.disconnect();
        self.ctx.teardown();
    }
}

impl VideoboxApp {
    fn build(config: Option<&str>) -> anyhow::Result<VideoboxApp> {
        let config = match config {
            Some(json) => VideoboxConfig::from_json(json)?,
            None => VideoboxConfig::default(),
        };
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| anyhow::anyhow!("no document available"))?;
        let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler);
        let dom = Rc::new(DomDocument::new(document, scheduler.clone()));
        let ctx = Videobox::new(config, scheduler, dom.clone());
        dom.bind(ctx.registry().clone());
        videobox_core::init();
        Ok(VideoboxApp { ctx, document: dom })
    }

    fn mount_button(&self, host: HtmlElement, attrs: JsValue) -> anyhow::Result<VideoboxButton> {
        let config = ButtonConfig::from_attributes(pairs(&attributes(attrs)?));
        let surface = Rc::new(DomSurface::attach(host).map_err(js_error)?);
        let button = VideoboxButton {
            button: Button::new(&self.ctx, surface.clone(), config),
            surface: surface.clone(),
            document: self.document.clone(),
        };

        let opener = button.opener();
        surface
            .on_action(move |action| {
                if action == Action::Open {
                    wasm_bindgen_futures::spawn_local(opener());
                }
            })
            .map_err(js_error)?;

        let mount = button.button.clone();
        wasm_bindgen_futures::spawn_local(async move { mount.mount().await });
        Ok(button)
    }

    fn mount_slider(&self, host: HtmlElement, attrs: JsValue) -> anyhow::Result<VideoboxSlider> {
        let config = SliderConfig::from_attributes(pairs(&attributes(attrs)?));
        let surface = Rc::new(DomSurface::attach(host).map_err(js_error)?);
        let slider = Slider::new(&self.ctx, surface.clone(), config);

        let actions = slider.clone();
        surface
            .on_action(move |action| {
                let slider = actions.clone();
                match action {
                    Action::Prev => {
                        wasm_bindgen_futures::spawn_local(async move { slider.prev().await })
                    }
                    Action::Next => {
                        wasm_bindgen_futures::spawn_local(async move { slider.next().await })
                    }
                    _ => {}
                }
            })
            .map_err(js_error)?;

        let items = Rc::new(RefCell::new(children(&surface)));
        let resized = slider.clone();
        let refreshed = slider.clone();
        observe(
            &surface,
            &items,
            move || {
                let slider = resized.clone();
                Box::pin(async move { slider.resized().await })
            },
            move |items| {
                let slider = refreshed.clone();
                Box::pin(async move { slider.set_items(items).await })
            },
        )
        .map_err(js_error)?;
        self.document.track(&surface);

        let mount = slider.clone();
        let initial = items.borrow().clone();
        wasm_bindgen_futures::spawn_local(async move {
            mount.mount().await;
            mount.set_items(initial).await;
        });
        Ok(VideoboxSlider {
            slider,
            surface,
            items,
        })
    }

    fn mount_pagination(
        &self,
        host: HtmlElement,
        attrs: JsValue,
    ) -> anyhow::Result<VideoboxPagination> {
        let config = PaginationConfig::from_attributes(pairs(&attributes(attrs)?));
        let surface = Rc::new(DomSurface::attach(host).map_err(js_error)?);
        let pagination = Pagination::new(&self.ctx, surface.clone(), config);

        let actions = pagination.clone();
        surface
            .on_action(move |action| {
                if let Action::Page(page) = action {
                    let pagination = actions.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        pagination.set_page(page as i64).await
                    });
                }
            })
            .map_err(js_error)?;

        let items = Rc::new(RefCell::new(children(&surface)));
        let resized = pagination.clone();
        let refreshed = pagination.clone();
        observe(
            &surface,
            &items,
            move || {
                let pagination = resized.clone();
                Box::pin(async move { pagination.resized().await })
            },
            move |items| {
                let pagination = refreshed.clone();
                Box::pin(async move { pagination.set_items(items).await })
            },
        )
        .map_err(js_error)?;
        self.document.track(&surface);

        let mount = pagination.clone();
        let initial = items.borrow().clone();
        wasm_bindgen_futures::spawn_local(async move {
            mount.mount().await;
            mount.set_items(initial).await;
        });
        Ok(VideoboxPagination {
            pagination,
            surface,
            items,
        })
    }
}

fn children(surface: &DomSurface) -> Vec<ChildItem> {
    (0..surface.slot_children()).map(|_| ChildItem::new()).collect()
}

type SharedItems = Rc<RefCell<Vec<ChildItem>>>;

/// Re-measure on host resize and re-read children when they change
fn observe(
    surface: &Rc<DomSurface>,
    items: &SharedItems,
    on_resize: impl Fn() -> LocalFuture<()> + 'static,
    on_children: impl Fn(Vec<ChildItem>) -> LocalFuture<()> + 'static,
) -> Result<(), JsValue> {
    surface.observe_resize(move || wasm_bindgen_futures::spawn_local(on_resize()))?;

    let weak = Rc::downgrade(surface);
    let items = items.clone();
    surface.observe_children(move || {
        let Some(surface) = weak.upgrade() else {
            return;
        };
        let fresh = children(&surface);
        *items.borrow_mut() = fresh.clone();
        wasm_bindgen_futures::spawn_local(on_children(fresh));
    })
}

fn refresh_items(
    surface: &DomSurface,
    items: &SharedItems,
    apply: impl FnOnce(Vec<ChildItem>) -> LocalFuture<()>,
) -> js_sys::Promise {
    let fresh = children(surface);
    *items.borrow_mut() = fresh.clone();
    let done = apply(fresh);
    future_to_promise(async move {
        done.await;
        Ok(JsValue::UNDEFINED)
    })
}

/// Trigger button handle
#[wasm_bindgen]
pub struct VideoboxButton {
    button: Button,
    surface: Rc<DomSurface>,
    document: Rc<DomDocument>,
}

impl VideoboxButton {
    fn opener(&self) -> impl Fn() -> videobox_core::LocalFuture<()> + 'static {
        let button = self.button.clone();
        let document = self.document.clone();
        let host = self.surface.host_element().clone();
        move || {
            let button = button.clone();
            let document = document.clone();
            let host = host.clone();
            Box::pin(async move {
                document.place_inline_in(Some(host));
                button.open_player().await;
                document.place_inline_in(None);
            })
        }
    }
}

#[wasm_bindgen]
impl VideoboxButton {
    /// Open this button's player
    pub fn open(&self) -> js_sys::Promise {
        let open = self.opener()();
        future_to_promise(async move {
            open.await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Point the inline player at a different target among the children
    pub fn set_selector(&self, selector: Option<String>) -> js_sys::Promise {
        let button = self.button.clone();
        future_to_promise(async move {
            button.set_selector(selector).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    #[wasm_bindgen(getter)]
    pub fn open_state(&self) -> bool {
        self.button
            .inline_player()
            .map(|p| p.is_open())
            .unwrap_or(false)
    }
}

/// Slider handle
#[wasm_bindgen]
pub struct VideoboxSlider {
    slider: Slider,
    surface: Rc<DomSurface>,
    items: SharedItems,
}

#[wasm_bindgen]
impl VideoboxSlider {
    pub fn next(&self) -> js_sys::Promise {
        let slider = self.slider.clone();
        future_to_promise(async move {
            slider.next().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn prev(&self) -> js_sys::Promise {
        let slider = self.slider.clone();
        future_to_promise(async move {
            slider.prev().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Re-read the children; only needed where mutation observers are
    /// unavailable
    pub fn refresh(&self) -> js_sys::Promise {
        let slider = self.slider.clone();
        refresh_items(&self.surface, &self.items, move |items| {
            Box::pin(async move { slider.set_items(items).await })
        })
    }

    pub fn resized(&self) -> js_sys::Promise {
        let slider = self.slider.clone();
        future_to_promise(async move {
            slider.resized().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    /// Bind a button to the child at `index`, so its inline player closes
    /// when the child slides out of view
    pub fn attach(&self, index: usize, button: &VideoboxButton) {
        button.button.set_item(self.items.borrow().get(index).cloned());
    }

    #[wasm_bindgen(getter)]
    pub fn start(&self) -> usize {
        self.slider.start()
    }

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> usize {
        self.slider.active()
    }
}

/// Paged grid handle
#[wasm_bindgen]
pub struct VideoboxPagination {
    pagination: Pagination,
    surface: Rc<DomSurface>,
    items: SharedItems,
}

#[wasm_bindgen]
impl VideoboxPagination {
    pub fn set_page(&self, page: i32) -> js_sys::Promise {
        let pagination = self.pagination.clone();
        future_to_promise(async move {
            pagination.set_page(page as i64).await;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn refresh(&self) -> js_sys::Promise {
        let pagination = self.pagination.clone();
        refresh_items(&self.surface, &self.items, move |items| {
            Box::pin(async move { pagination.set_items(items).await })
        })
    }

    pub fn resized(&self) -> js_sys::Promise {
        let pagination = self.pagination.clone();
        future_to_promise(async move {
            pagination.resized().await;
            Ok(JsValue::UNDEFINED)
        })
    }

    pub fn attach(&self, index: usize, button: &VideoboxButton) {
        button.button.set_item(self.items.borrow().get(index).cloned());
    }

    #[wasm_bindgen(getter)]
    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    #[wasm_bindgen(getter)]
    pub fn page_count(&self) -> usize {
        self.pagination.page_count()
    }
}
