use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Bumped whenever the snapshot layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Key a value is stored under in a [`KeyValueStore`].
pub trait StorageKey {
    const KEY: &'static str;
}

/// Persisted form of an in-progress session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub rows: Coord,
    pub columns: Coord,
    pub theme: ThemeId,
    pub stats: SessionStats,
    pub elapsed: Duration,
    /// Every card in row-major order.
    pub cards: Vec<CardSlot>,
}

impl StorageKey for SessionSnapshot {
    const KEY: &'static str = "pairflip:session";
}

impl SessionSnapshot {
    pub fn capture(game: &GameConfig, engine: &MatchEngine, timer: &SessionTimer) -> Self {
        let (rows, columns) = engine.board().size();
        Self {
            version: SNAPSHOT_VERSION,
            rows,
            columns,
            theme: game.theme,
            stats: *engine.stats(),
            elapsed: timer.elapsed(),
            cards: engine.board().card_states(),
        }
    }

    pub fn size(&self) -> Coord2 {
        (self.rows, self.columns)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.theme)
    }

    /// Checks the snapshot describes a session that could actually have been played.
    pub fn validate(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            log::warn!("Unsupported snapshot version {}", self.version);
            return Err(GameError::CorruptData);
        }
        let (_, columns) = validate_size(self.size()).map_err(|_| GameError::CorruptData)?;

        let total_cells = mult(self.rows, self.columns);
        if self.cards.len() != usize::from(total_cells) || self.stats.total_pairs != total_cells / 2
        {
            return Err(GameError::CorruptData);
        }
        // a cleared board is never saved, the win clears the slot instead
        if self.stats.matched_pairs >= self.stats.total_pairs {
            return Err(GameError::CorruptData);
        }
        if self
            .stats
            .last_match_move
            .is_some_and(|last| last > self.stats.moves)
        {
            return Err(GameError::CorruptData);
        }

        // per value: (cards, matched cards)
        let mut per_value: BTreeMap<CardValue, (usize, usize)> = BTreeMap::new();
        for (index, card) in self.cards.iter().enumerate() {
            if card.coords() != coords_from_index(index, columns) {
                return Err(GameError::CorruptData);
            }
            let entry = per_value.entry(card.value).or_default();
            entry.0 += 1;
            if card.face.is_matched() {
                entry.1 += 1;
            }
        }
        if per_value
            .values()
            .any(|&(cards, matched)| cards % 2 != 0 || matched % 2 != 0)
        {
            return Err(GameError::CorruptData);
        }

        let matched: usize = per_value.values().map(|&(_, matched)| matched).sum();
        if matched != usize::from(self.stats.matched_pairs) * 2 {
            return Err(GameError::CorruptData);
        }
        Ok(())
    }
}

/// Reads and writes the session snapshot through the platform store.
pub struct PersistenceCodec {
    store: Box<dyn KeyValueStore>,
}

impl PersistenceCodec {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn encode(snapshot: &SessionSnapshot) -> Result<String> {
        serde_json::to_string(snapshot).map_err(|err| {
            log::error!("Failed to encode snapshot: {}", err);
            GameError::CorruptData
        })
    }

    pub fn decode(text: &str) -> Result<SessionSnapshot> {
        let snapshot: SessionSnapshot = serde_json::from_str(text).map_err(|err| {
            log::warn!("Failed to decode snapshot: {}", err);
            GameError::CorruptData
        })?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn has_saved_session(&self) -> bool {
        self.store.contains(SessionSnapshot::KEY)
    }

    pub fn write(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        let text = Self::encode(snapshot)?;
        self.store.set(SessionSnapshot::KEY, text)?;
        log::debug!(
            "Saved session, {} moves, score {}",
            snapshot.stats.moves,
            snapshot.stats.score
        );
        Ok(())
    }

    /// `Ok(None)` when nothing is saved, `CorruptData` when something is but cannot be used.
    pub fn read(&self) -> Result<Option<SessionSnapshot>> {
        match self.store.get(SessionSnapshot::KEY) {
            Some(text) => Self::decode(&text).map(Some),
            None => Ok(None),
        }
    }

    pub fn clear(&mut self) {
        if self.has_saved_session() {
            self.store.remove(SessionSnapshot::KEY);
            log::debug!("Cleared saved session");
        }
    }
}

/// Lets the host keep a handle on a store it also gave to a session.
impl<S: KeyValueStore> KeyValueStore for Rc<RefCell<S>> {
    fn get(&self, key: &str) -> Option<String> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) {
        self.borrow_mut().remove(key)
    }

    fn contains(&self, key: &str) -> bool {
        self.borrow().contains(key)
    }
}
