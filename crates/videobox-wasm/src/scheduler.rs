//! Browser event loop scheduler

use js_sys::{Function, Promise};
use std::time::Duration;
use videobox_core::{LocalFuture, Scheduler};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

/// Runs deferred work on the browser's microtask queue and timers
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn spawn(&self, future: LocalFuture<()>) {
        wasm_bindgen_futures::spawn_local(future);
    }

    fn sleep(&self, duration: Duration) -> LocalFuture<()> {
        let timeout = duration.as_millis().min(i32::MAX as u128) as i32;
        let promise = Promise::new(&mut |resolve: Function, _reject: Function| {
            let scheduled = web_sys::window().map(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout)
            });
            // Workers and detached contexts have no window; resolve right away
            if !matches!(scheduled, Some(Ok(_))) {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        Box::pin(async move {
            let _ = JsFuture::from(promise).await;
        })
    }
}
