//! Children of a slider or pager.
//!
//! Each child remembers the inline players living inside it, so the
//! container can close them when the child scrolls or pages out of view.

use crate::{player::InlinePlayer, runtime::Scheduler, types::Container};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug)]
struct ChildInner {
    container: Cell<Container>,
    players: RefCell<Vec<InlinePlayer>>,
}

/// One slotted child
#[derive(Debug, Clone)]
pub struct ChildItem {
    inner: Rc<ChildInner>,
}

impl Default for ChildItem {
    fn default() -> Self {
        Self::new()
    }
}

impl ChildItem {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ChildInner {
                container: Cell::new(Container::Standalone),
                players: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn with_players(players: impl IntoIterator<Item = InlinePlayer>) -> Self {
        let item = Self::new();
        for player in players {
            item.add_player(&player);
        }
        item
    }

    /// Track an inline player placed inside this child
    pub fn add_player(&self, player: &InlinePlayer) {
        let mut players = self.inner.players.borrow_mut();
        if players.iter().any(|p| p.id() == player.id()) {
            return;
        }
        player.set_container(self.inner.container.get());
        players.push(player.clone());
    }

    pub fn players(&self) -> Vec<InlinePlayer> {
        self.inner.players.borrow().clone()
    }

    pub fn container(&self) -> Container {
        self.inner.container.get()
    }

    pub(crate) fn set_container(&self, container: Container) {
        self.inner.container.set(container);
        for player in self.inner.players.borrow().iter() {
            player.set_container(container);
        }
    }

    /// Fire-and-forget hide of every player in this child. Returns how many
    /// were open.
    pub(crate) fn hide_players(&self, scheduler: &dyn Scheduler) -> usize {
        let mut hidden = 0;
        for player in self.players() {
            if let Some(rest) = player.begin_hide(false) {
                scheduler.spawn(rest);
                hidden += 1;
            }
        }
        hidden
    }
}
