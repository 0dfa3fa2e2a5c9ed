//! Mood model, selector dock entries and the mood store
//!
//! The mood is the only piece of mutable UI state in the twin. It is written
//! exclusively by the selector dock and observed by the avatar viewport
//! through a [`MoodSubscription`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

/// UI context selected from the dock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Calm,
    Focus,
    Care,
    Listen,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Calm, Mood::Focus, Mood::Care, Mood::Listen];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Focus => "focus",
            Mood::Care => "care",
            Mood::Listen => "listen",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown mood: {0}")]
pub struct UnknownMood(pub String);

impl FromStr for Mood {
    type Err = UnknownMood;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMood(s.to_string()))
    }
}

/// A single entry of the selector dock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectorItem {
    pub label: &'static str,
    pub glyph: &'static str,
    pub mood: Mood,
}

/// Dock entries, top to bottom
pub const SELECTOR_ITEMS: [SelectorItem; 4] = [
    SelectorItem { label: "Vitals", glyph: "🫀", mood: Mood::Calm },
    SelectorItem { label: "Reports", glyph: "📄", mood: Mood::Focus },
    SelectorItem { label: "Medication", glyph: "💊", mood: Mood::Care },
    SelectorItem { label: "Consult", glyph: "🩺", mood: Mood::Listen },
];

/// Look up a dock entry by its label
pub fn selector_item(label: &str) -> Option<&'static SelectorItem> {
    SELECTOR_ITEMS.iter().find(|item| item.label == label)
}

/// Holder of the currently selected mood
///
/// Selection is a flat assignment: any mood can replace any other, and
/// re-selecting the current mood is a no-op. Observers are notified only
/// when the value actually changes.
#[derive(Debug)]
pub struct MoodStore {
    tx: watch::Sender<Mood>,
}

impl MoodStore {
    pub fn new(default: Mood) -> Self {
        let (tx, _) = watch::channel(default);
        Self { tx }
    }

    pub fn current(&self) -> Mood {
        *self.tx.borrow()
    }

    /// Replace the current mood. Returns whether the value changed.
    pub fn select_mood(&self, mood: Mood) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == mood {
                false
            } else {
                *current = mood;
                true
            }
        });
        debug!(mood = %mood, changed, "Mood selected");
        changed
    }

    /// Subscribe to mood changes. The current value counts as already seen.
    pub fn subscribe(&self) -> MoodSubscription {
        MoodSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for MoodStore {
    fn default() -> Self {
        Self::new(Mood::default())
    }
}

/// Change notification handle for a [`MoodStore`]
#[derive(Debug, Clone)]
pub struct MoodSubscription {
    rx: watch::Receiver<Mood>,
}

impl MoodSubscription {
    /// Returns the new mood once per change, `None` if nothing changed since
    /// the last call (or the store is gone).
    pub fn changed(&mut self) -> Option<Mood> {
        match self.rx.has_changed() {
            Ok(true) => Some(*self.rx.borrow_and_update()),
            _ => None,
        }
    }

    /// Latest mood held by the store, without consuming the change flag
    pub fn latest(&self) -> Mood {
        *self.rx.borrow()
    }
}
