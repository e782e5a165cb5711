//! Live player instances per document.
//!
//! Players join on mount and leave on unmount. The registry holds weak
//! entries, so a player dropped without unmounting simply disappears from
//! broadcasts.

use crate::{
    player::{Player, PlayerHandle, WeakPlayer},
    runtime::Scheduler,
    types::{InstanceId, PlayerKind},
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

struct Entry {
    id: InstanceId,
    kind: PlayerKind,
    player: WeakPlayer,
}

/// Registry of mounted players
#[derive(Clone)]
pub struct Registry {
    entries: Rc<RefCell<Vec<Entry>>>,
    scheduler: Rc<dyn Scheduler>,
}

impl Registry {
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
            scheduler,
        }
    }

    pub(crate) fn register(&self, player: &Player) {
        let mut entries = self.entries.borrow_mut();
        if entries.iter().any(|e| e.id == player.id()) {
            return;
        }
        entries.push(Entry {
            id: player.id(),
            kind: player.kind(),
            player: WeakPlayer::new(player),
        });
    }

    pub(crate) fn unregister(&self, id: InstanceId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    /// Mounted instances of `kind`, in mount order
    pub fn instances(&self, kind: PlayerKind) -> Vec<PlayerHandle> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.kind == kind)
            .filter_map(|e| e.player.upgrade())
            .map(PlayerHandle::from_player)
            .collect()
    }

    pub fn first(&self, kind: PlayerKind) -> Option<PlayerHandle> {
        self.instances(kind).into_iter().next()
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.entries.borrow().iter().any(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Hide every open instance of `kind` except `exclude`. Each hide claims
    /// its closing transition before this returns; the animations run on
    /// the scheduler. Returns the number of players told to close.
    pub fn close_instances(&self, kind: PlayerKind, exclude: Option<InstanceId>) -> usize {
        let mut closed = 0;
        for handle in self.instances(kind) {
            if Some(handle.id()) == exclude {
                continue;
            }
            if let Some(rest) = handle.begin_hide(false) {
                self.scheduler.spawn(rest);
                closed += 1;
            }
        }
        if closed > 0 {
            debug!(kind = %kind, closed, "Closed instances");
        }
        closed
    }

    /// [`Registry::close_instances`] across both player kinds
    pub fn close_all(&self, exclude: Option<InstanceId>) -> usize {
        PlayerKind::ALL
            .iter()
            .map(|kind| self.close_instances(*kind, exclude))
            .sum()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("instances", &self.len())
            .finish()
    }
}
