use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Flip,
    Match,
    Mismatch,
    Win,
    ButtonClick,
}

pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Audio sink that drops every cue.
#[derive(Copy, Clone, Debug, Default)]
pub struct Muted;

impl AudioSink for Muted {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Receives everything a presentation layer needs to mirror the session.
///
/// All methods default to doing nothing so implementors only pick what they draw.
pub trait SessionObserver {
    /// Called after the board was replaced by a new game or a restore.
    fn board_rebuilt(&mut self, _board: &Board) {}
    fn card_revealed(&mut self, _card: &CardSlot) {}
    fn card_concealed(&mut self, _card: &CardSlot) {}
    fn card_matched(&mut self, _card: &CardSlot) {}
    fn score_changed(&mut self, _score: u32, _combo: u32) {}
    fn moves_changed(&mut self, _moves: u32) {}
    fn phase_changed(&mut self, _phase: SessionPhase) {}
    fn won(&mut self, _stats: &SessionStats, _elapsed: Duration) {}
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

/// String key-value storage provided by the platform.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    fn remove(&mut self, key: &str);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.into(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

/// Maps card values to faces of a theme.
pub trait ThemeProvider {
    fn theme_count(&self) -> usize;

    /// Distinct faces available in `theme`, zero for unknown themes.
    fn face_count(&self, theme: ThemeId) -> CellCount;

    fn has_theme(&self, theme: ThemeId) -> bool {
        usize::from(theme) < self.theme_count()
    }

    /// Face shown for `value`, `None` when the theme has no face for it.
    fn face_index(&self, theme: ThemeId, value: CardValue) -> Option<CardValue> {
        (value < self.face_count(theme)).then_some(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeInfo {
    pub name: String,
    pub face_count: CellCount,
}

/// Theme list known at build time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticThemes {
    themes: Vec<ThemeInfo>,
}

impl StaticThemes {
    pub fn new(themes: Vec<ThemeInfo>) -> Self {
        Self { themes }
    }

    /// Single theme with `face_count` faces.
    pub fn single(name: &str, face_count: CellCount) -> Self {
        Self::new(alloc::vec![ThemeInfo {
            name: name.into(),
            face_count,
        }])
    }

    pub fn get(&self, theme: ThemeId) -> Option<&ThemeInfo> {
        self.themes.get(usize::from(theme))
    }
}

impl ThemeProvider for StaticThemes {
    fn theme_count(&self) -> usize {
        self.themes.len()
    }

    fn face_count(&self, theme: ThemeId) -> CellCount {
        self.get(theme).map_or(0, |info| info.face_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(!store.contains("k"));

        store.set("k", "v".into()).unwrap();
        assert_eq!(store.get("k").as_deref(), Some("v"));

        store.remove("k");
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn static_themes_lookup() {
        let themes = StaticThemes::new(alloc::vec![
            ThemeInfo {
                name: "fruits".into(),
                face_count: 12,
            },
            ThemeInfo {
                name: "animals".into(),
                face_count: 4,
            },
        ]);

        assert!(themes.has_theme(1));
        assert!(!themes.has_theme(2));
        assert_eq!(themes.face_count(1), 4);
        assert_eq!(themes.face_count(9), 0);
        assert_eq!(themes.face_index(1, 3), Some(3));
        assert_eq!(themes.face_index(1, 4), None);
        assert_eq!(themes.get(0).map(|info| info.name.as_str()), Some("fruits"));
    }
}
