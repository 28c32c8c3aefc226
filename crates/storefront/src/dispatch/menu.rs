//! Mobile menu open/closed state.

/// Whether the mobile menu is open. Starts closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    /// Whether the menu is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        self.open
    }

    /// Flip the state and return the new one.
    pub const fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Close the menu. Returns `true` if it was open.
    pub const fn close(&mut self) -> bool {
        let was_open = self.open;
        self.open = false;
        was_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_and_close() {
        let mut menu = MobileMenu::default();
        assert!(!menu.is_open());
        assert!(menu.toggle());
        assert!(menu.close());
        assert!(!menu.close());
        assert!(menu.toggle());
        assert!(!menu.toggle());
    }
}
