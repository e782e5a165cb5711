//! Icon shapes referenced by the views. Drawing them is the host's job.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconShape {
    Close,
    CloseSmall,
    Circle,
    Play,
    AngleLeft,
    AngleRight,
}

impl IconShape {
    /// Symbol id in the sprite
    pub fn symbol(&self) -> &'static str {
        match self {
            IconShape::Close => "close",
            IconShape::CloseSmall => "close-small",
            IconShape::Circle => "circle",
            IconShape::Play => "play",
            IconShape::AngleLeft | IconShape::AngleRight => "angle",
        }
    }
}
