//! Videobox Core - headless engine for Videobox video widgets
//!
//! This crate provides the behaviour behind the Videobox components:
//! - Overlay (lightbox) and inline players with animated show/hide
//! - Responsive sizing of the content box against available space
//! - Carousel slider with batched, debounced moves
//! - Paged grid
//! - Trigger buttons that pick, position and open a player
//! - Per-document instance registry for "only one player open"
//!
//! Rendering is a capability the engine consumes through [`Surface`]: each
//! component turns its committed state into a [`View`] and awaits the
//! surface's commit. [`headless`] ships an in-memory surface.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Videobox Core                           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐           │
//! │  │    Button    │  │    Slider    │  │  Pagination  │           │
//! │  │   Dispatch   │  │  (debounced) │  │              │           │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘           │
//! │         │                 │  hide out-of-view players           │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐            │
//! │  │   Registry   │◄─┤   Players   ├─►│  Animation   │            │
//! │  │ (close all)  │  │overlay/inline│ │  Primitive   │            │
//! │  └──────────────┘  └──────┬──────┘  └──────────────┘            │
//! │                           │                                     │
//! │                    ┌──────┴──────┐  ┌──────────────┐            │
//! │                    │   Surface   │  │  Scheduler   │            │
//! │                    │ (DOM/headless)│ │ (tokio/wasm) │            │
//! │                    └─────────────┘  └──────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod geometry;
pub mod runtime;
pub mod animation;
pub mod surface;
pub mod view;
pub mod icon;
pub mod visibility;
pub mod debounce;
pub mod headless;
pub mod registry;
pub mod document;
pub mod player;
pub mod item;
pub mod slider;
pub mod pagination;
pub mod button;

pub use error::{Error, Result};
pub use types::*;
pub use config::{
    ButtonConfig, EmbeddedPolicy, PaginationConfig, PlayerConfig, SliderConfig, VideoboxConfig,
};
pub use animation::{animate, Animation, AnimationHandle, Completion, Finished, Keyframe, Timing};
pub use surface::{Element, Surface, SurfaceFactory};
pub use view::View;
pub use runtime::{LocalFuture, Scheduler};
#[cfg(feature = "tokio-runtime")]
pub use runtime::TokioScheduler;
pub use registry::Registry;
pub use document::Videobox;
pub use player::{InlinePlayer, ListenerId, Overlay, Player, PlayerHandle};
pub use item::ChildItem;
pub use slider::Slider;
pub use pagination::Pagination;
pub use button::{Button, Trigger};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the widget library
pub fn init() {
    tracing::info!(version = VERSION, "Videobox Core initialized");
}
