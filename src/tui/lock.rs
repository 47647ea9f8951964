use std::{cell::Cell, rc::Rc};

/// Whether the screen behind an overlay may scroll. Held through a [`BackgroundGuard`];
/// there is no counting, so a second guard's release also frees the first.
#[derive(Clone, Default)]
pub(crate) struct BackgroundLock {
    held: Rc<Cell<bool>>,
}

impl BackgroundLock {
    pub(crate) fn is_held(&self) -> bool {
        self.held.get()
    }

    pub(crate) fn acquire(&self) -> BackgroundGuard {
        self.held.set(true);
        BackgroundGuard {
            held: Rc::clone(&self.held),
        }
    }
}

/// Releases the background lock when dropped.
pub(crate) struct BackgroundGuard {
    held: Rc<Cell<bool>>,
}

impl Drop for BackgroundGuard {
    fn drop(&mut self) {
        self.held.set(false);
    }
}
