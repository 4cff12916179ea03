// src/sync.rs
//! Shared cell for a control that the host can also write to.
//!
//! UI handlers hold the control mutably while they push to the host. A host
//! that answers synchronously lands here while that borrow is live, so its
//! value is parked and applied as soon as the handler returns.

use std::cell::{Cell, RefCell};

/// Something the host can overwrite with a raw number.
pub trait HostSync {
    fn host_sync(&mut self, value: f64);
}

impl HostSync for crate::knob::Knob {
    fn host_sync(&mut self, value: f64) {
        self.set_from_host(value);
    }
}

pub struct HostSlot<T> {
    inner: RefCell<T>,
    pending: Cell<Option<f64>>,
}

impl<T: HostSync> HostSlot<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner: RefCell::new(inner),
            pending: Cell::new(None),
        }
    }

    /// Runs a UI handler, then applies any host value that arrived meanwhile.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = {
            let mut inner = self.inner.borrow_mut();
            f(&mut *inner)
        };
        self.flush();
        out
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&*self.inner.borrow())
    }

    /// Applies now, or parks the value if a handler is running. A later push
    /// replaces an earlier parked one.
    pub fn host_push(&self, value: f64) {
        match self.inner.try_borrow_mut() {
            Ok(mut inner) => inner.host_sync(value),
            Err(_) => {
                log::debug!("control busy, deferring host value {}", value);
                self.pending.set(Some(value));
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.get().is_some()
    }

    fn flush(&self) {
        if let Some(value) = self.pending.take() {
            self.host_push(value);
        }
    }
}
