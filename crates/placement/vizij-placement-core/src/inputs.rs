//! Input contracts: touch actions and the single-slot intent mailbox.
//!
//! The input context only ever posts into the mailbox; the render tick
//! takes the slot exactly once per frame.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchAction {
    Down,
    Up,
    /// The gesture was aborted by the platform; treated as `Up`.
    Cancel,
}

/// Placement intent handed from the input context to the render tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Touch-down: pick at view center, or spawn.
    Pick,
    /// Touch-up: stop following the picked object.
    Release,
    /// Down and up landed within one frame: pick or spawn, then release.
    Tap,
}

impl Intent {
    pub fn from_action(action: TouchAction) -> Self {
        match action {
            TouchAction::Down => Intent::Pick,
            TouchAction::Up | TouchAction::Cancel => Intent::Release,
        }
    }

    /// Fold a later intent into an earlier one still waiting in the slot.
    pub fn merge(self, next: Intent) -> Intent {
        match (self, next) {
            (Intent::Pick, Intent::Release) => Intent::Tap,
            (Intent::Tap, Intent::Release) => Intent::Tap,
            (_, Intent::Pick) => Intent::Pick,
            (_, Intent::Tap) => Intent::Tap,
            (Intent::Release, Intent::Release) => Intent::Release,
        }
    }

    #[inline]
    pub fn picks(self) -> bool {
        matches!(self, Intent::Pick | Intent::Tap)
    }
}

#[derive(Debug, Default, Clone)]
pub struct IntentMailbox {
    slot: Option<Intent>,
}

impl IntentMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&mut self, action: TouchAction) {
        self.post_intent(Intent::from_action(action));
    }

    pub fn post_intent(&mut self, intent: Intent) {
        self.slot = Some(match self.slot {
            Some(prev) => prev.merge(intent),
            None => intent,
        });
    }

    #[inline]
    pub fn take(&mut self) -> Option<Intent> {
        self.slot.take()
    }

    #[inline]
    pub fn peek(&self) -> Option<Intent> {
        self.slot
    }
}
