// src/popup.rs
//! Filter settings popup visibility.

pub const CLOSE_KEY: &str = "Escape";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Popup {
    open: bool,
}

impl Popup {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Only a click landing on the overlay itself closes; clicks inside the
    /// content bubble up with a different target.
    pub fn backdrop_click(&mut self, target_is_overlay: bool) {
        if target_is_overlay {
            self.close();
        }
    }

    /// Returns whether the key changed visibility.
    pub fn key(&mut self, key: &str) -> bool {
        if key == CLOSE_KEY && self.open {
            self.close();
            return true;
        }
        false
    }
}
