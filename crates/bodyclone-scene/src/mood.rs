//! Mood state resource and dock selection messages

use bevy::prelude::*;
use bodyclone_core::{Mood, MoodStore, MoodSubscription};
use tracing::info;

/// Page-level mood holder
#[derive(Resource, Debug)]
pub struct MoodState(MoodStore);

impl MoodState {
    pub fn new(default: Mood) -> Self {
        Self(MoodStore::new(default))
    }

    pub fn current(&self) -> Mood {
        self.0.current()
    }

    pub fn subscribe(&self) -> MoodSubscription {
        self.0.subscribe()
    }

    /// Flat assignment; returns whether the mood changed
    pub fn select_mood(&self, mood: Mood) -> bool {
        self.0.select_mood(mood)
    }
}

/// Written by the selector dock when an icon is activated
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectMood(pub Mood);

pub struct MoodPlugin {
    pub default: Mood,
}

impl Plugin for MoodPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(MoodState::new(self.default))
            .add_message::<SelectMood>()
            .add_systems(Update, apply_mood_selections);
    }
}

/// Apply dock selections in the order they were made
pub fn apply_mood_selections(mut selections: MessageReader<SelectMood>, state: Res<MoodState>) {
    for SelectMood(mood) in selections.read() {
        let previous = state.current();
        if state.select_mood(*mood) {
            info!(from = %previous, to = %mood, "Mood changed");
        }
    }
}
