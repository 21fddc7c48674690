//! The single dialog container shared by all threads on mobile.

use std::cell::Cell;
use std::rc::Rc;

use super::DialogId;

/// Shared mobile dialog container.
///
/// At most one dialog occupies the slot. Acquiring an occupied slot evicts
/// the previous occupant, which from then on behaves as hidden.
#[derive(Debug)]
pub struct MobileDialogSlot {
    occupant: Cell<Option<DialogId>>,
    close_listener_bound: Cell<bool>,
}

impl MobileDialogSlot {
    pub fn new() -> Self {
        Self {
            occupant: Cell::new(None),
            close_listener_bound: Cell::new(false),
        }
    }

    /// Slot ready to be handed to every dialog of a viewer.
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Move `dialog` into the slot, unhide it and bind the close button.
    /// Returns the evicted occupant, if another dialog held the slot.
    pub fn acquire(&self, dialog: DialogId) -> Option<DialogId> {
        let previous = self.occupant.replace(Some(dialog));
        self.close_listener_bound.set(true);
        match previous {
            Some(evicted) if evicted != dialog => {
                log::debug!("📱 Mobile dialog {} evicted by {}", evicted.0, dialog.0);
                Some(evicted)
            }
            _ => None,
        }
    }

    /// Empty the slot if `dialog` holds it. Returns whether it did.
    pub fn release(&self, dialog: DialogId) -> bool {
        if self.occupant.get() != Some(dialog) {
            return false;
        }
        self.occupant.set(None);
        self.close_listener_bound.set(false);
        true
    }

    pub fn occupant(&self) -> Option<DialogId> {
        self.occupant.get()
    }

    pub fn is_held_by(&self, dialog: DialogId) -> bool {
        self.occupant.get() == Some(dialog)
    }

    /// The container is hidden whenever nobody holds it.
    pub fn is_hidden(&self) -> bool {
        self.occupant.get().is_none()
    }

    pub fn close_listener_bound(&self) -> bool {
        self.close_listener_bound.get()
    }
}

impl Default for MobileDialogSlot {
    fn default() -> Self {
        Self::new()
    }
}
