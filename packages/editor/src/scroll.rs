//! Scroll ownership between the canvas and the inspector.
//!
//! Selecting a block scrolls the other panel to match. Whichever panel the
//! user is actively scrolling owns the coupling until it lets go, so the
//! follower never fights the owner.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Canvas,
    Inspector,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollOwnership {
    #[default]
    Free,
    LockedTo(Panel),
}

#[derive(Debug, Default)]
pub struct ScrollArbiter {
    state: ScrollOwnership,
}

impl ScrollArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ScrollOwnership {
        self.state
    }

    /// Take ownership; fails while the other panel holds it
    pub fn claim(&mut self, panel: Panel) -> bool {
        match self.state {
            ScrollOwnership::LockedTo(owner) if owner != panel => false,
            _ => {
                self.state = ScrollOwnership::LockedTo(panel);
                true
            }
        }
    }

    /// Only the owner can release
    pub fn release(&mut self, panel: Panel) -> bool {
        if self.state == ScrollOwnership::LockedTo(panel) {
            self.state = ScrollOwnership::Free;
            true
        } else {
            false
        }
    }

    /// Whether `panel` should follow scroll requests from the other one
    pub fn should_follow(&self, panel: Panel) -> bool {
        match self.state {
            ScrollOwnership::Free => true,
            ScrollOwnership::LockedTo(owner) => owner != panel,
        }
    }
}
