//! Keyframe animation primitive.
//!
//! [`animate`] starts a native keyframe animation on a rendered part and
//! hands back a cancellable [`AnimationHandle`] plus a [`Finished`] future
//! that resolves on natural completion and fails with
//! [`Error::AnimationCancelled`] on cancellation. Every transition in the
//! crate is built from this one primitive. Starting a new animation on a
//! part does not stop the old one; callers cancel the obsolete handle first.

use crate::{surface::Surface, types::Part, Error, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::debug;

/// One keyframe: CSS property (camelCase, as the Web Animations API takes
/// it) to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Keyframe(BTreeMap<String, String>);

impl Keyframe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: &str, value: impl Into<String>) -> Self {
        self.0.insert(property.to_string(), value.into());
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Animation timing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timing {
    /// Duration in milliseconds; 0 completes instantly
    pub duration_ms: f64,
    pub easing: String,
}

impl Timing {
    pub fn new(duration_ms: f64, easing: &str) -> Self {
        let duration_ms = if duration_ms.is_finite() { duration_ms.max(0.0) } else { 0.0 };
        Self {
            duration_ms,
            easing: easing.to_string(),
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_ms / 1000.0)
    }
}

/// Host-side running animation
pub trait Playback {
    /// Stop the animation and drop its effect
    fn cancel(&self);
}

struct Signal {
    tx: RefCell<Option<oneshot::Sender<()>>>,
}

/// Given to the host when an animation starts; the host calls
/// [`Completion::finish`] when the animation ends naturally.
#[derive(Clone)]
pub struct Completion {
    signal: Rc<Signal>,
}

impl Completion {
    pub fn finish(&self) {
        if let Some(tx) = self.signal.tx.borrow_mut().take() {
            let _ = tx.send(());
        }
    }

    /// The host dropped the animation without finishing it
    pub fn cancel(&self) {
        if self.signal.tx.borrow_mut().take().is_some() {
            debug!("Animation cancelled by host");
        }
    }

    /// Still waiting for either finish or cancel
    pub fn is_pending(&self) -> bool {
        self.signal.tx.borrow().is_some()
    }
}

/// Cancellable handle to a running animation
#[derive(Clone)]
pub struct AnimationHandle {
    part: Part,
    signal: Rc<Signal>,
    playback: Rc<RefCell<Option<Box<dyn Playback>>>>,
}

impl AnimationHandle {
    pub fn part(&self) -> Part {
        self.part
    }

    /// Cancel the animation; its [`Finished`] future fails. No-op once
    /// settled.
    pub fn cancel(&self) {
        let playback = self.playback.borrow_mut().take();
        if let Some(playback) = playback {
            playback.cancel();
        }
        if self.signal.tx.borrow_mut().take().is_some() {
            debug!(part = %self.part, "Animation cancelled");
        }
    }

    /// Finished or cancelled
    pub fn is_settled(&self) -> bool {
        self.signal.tx.borrow().is_none()
    }
}

impl std::fmt::Debug for AnimationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationHandle")
            .field("part", &self.part)
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Resolves when an animation settles
#[derive(Debug)]
pub struct Finished {
    rx: oneshot::Receiver<()>,
}

impl Future for Finished {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.map_err(|_| Error::AnimationCancelled))
    }
}

/// A started animation
#[derive(Debug)]
pub struct Animation {
    pub handle: AnimationHandle,
    pub finished: Finished,
}

/// Start a keyframe animation on `part`.
///
/// Returns `None` when the part is not rendered.
pub fn animate(
    surface: &dyn Surface,
    part: Part,
    keyframes: Vec<Keyframe>,
    timing: Timing,
) -> Option<Animation> {
    let (tx, rx) = oneshot::channel();
    let signal = Rc::new(Signal {
        tx: RefCell::new(Some(tx)),
    });
    let completion = Completion {
        signal: signal.clone(),
    };

    debug!(part = %part, duration_ms = timing.duration_ms, "Starting animation");
    let playback = surface.animate(part, &keyframes, &timing, completion)?;

    Some(Animation {
        handle: AnimationHandle {
            part,
            signal,
            playback: Rc::new(RefCell::new(Some(playback))),
        },
        finished: Finished { rx },
    })
}

/// Wait for every animation; fails on the first cancellation.
pub async fn all(finished: Vec<Finished>) -> Result<()> {
    for f in finished {
        f.await?;
    }
    Ok(())
}
