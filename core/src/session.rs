use alloc::boxed::Box;
use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No board yet.
    #[default]
    Setup,
    /// A fresh board is shown face up before play.
    Previewing,
    /// A restored board is shown face up before play.
    RestoringPreview,
    Active,
    Paused,
    Won,
}

impl SessionPhase {
    pub const fn is_previewing(self) -> bool {
        matches!(self, Self::Previewing | Self::RestoringPreview)
    }

    pub const fn accepts_input(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Setup => "Setup",
            Self::Previewing => "Previewing",
            Self::RestoringPreview => "RestoringPreview",
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::Won => "Won",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored,
    /// Nothing usable was stored, a new game was started instead.
    StartedNew,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SessionTask {
    EndPreview,
    BeginPlay,
}

/// Platform services handed to a [`GameSession`].
pub struct Collaborators {
    pub store: Box<dyn KeyValueStore>,
    pub themes: Box<dyn ThemeProvider>,
    pub audio: Box<dyn AudioSink>,
    pub observer: Box<dyn SessionObserver>,
}

impl Collaborators {
    /// Silent collaborators around the given store and themes.
    pub fn new(store: Box<dyn KeyValueStore>, themes: Box<dyn ThemeProvider>) -> Self {
        Self {
            store,
            themes,
            audio: Box::new(Muted),
            observer: Box::new(NullObserver),
        }
    }

    pub fn with_audio(mut self, audio: Box<dyn AudioSink>) -> Self {
        self.audio = audio;
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }
}

/// One player's game from setup to win, including preview, pause, and save/restore.
///
/// Time only moves through [`tick`](Self::tick). Every engine event is forwarded to the
/// observer and audio sink in the order it happened.
pub struct GameSession {
    config: SessionConfig,
    game: GameConfig,
    phase: SessionPhase,
    engine: Option<MatchEngine>,
    timer: SessionTimer,
    scheduler: Scheduler<SessionTask>,
    /// The one preview or begin-play timer in flight.
    phase_timer: Option<TimerToken>,
    previewed: Vec<Coord2>,
    save_deferred: bool,
    suspended: bool,
    pairing: Box<dyn PairingGenerator>,
    codec: PersistenceCodec,
    themes: Box<dyn ThemeProvider>,
    audio: Box<dyn AudioSink>,
    observer: Box<dyn SessionObserver>,
}

impl GameSession {
    pub fn new(config: SessionConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            store,
            themes,
            audio,
            observer,
        } = collaborators;
        Self {
            config,
            game: config.default_game,
            phase: SessionPhase::Setup,
            engine: None,
            timer: SessionTimer::new(),
            scheduler: Scheduler::new(),
            phase_timer: None,
            previewed: Vec::new(),
            save_deferred: false,
            suspended: false,
            pairing: Box::new(RandomPairingGenerator::new(config.seed)),
            codec: PersistenceCodec::new(store),
            themes,
            audio,
            observer,
        }
    }

    /// Replaces the seeded random pairing.
    pub fn with_pairing(mut self, pairing: Box<dyn PairingGenerator>) -> Self {
        self.pairing = pairing;
        self
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Settings of the current game, or of the next one while in setup.
    pub fn game_config(&self) -> GameConfig {
        self.game
    }

    pub fn board(&self) -> Option<&Board> {
        self.engine.as_ref().map(MatchEngine::board)
    }

    pub fn stats(&self) -> Option<&SessionStats> {
        self.engine.as_ref().map(MatchEngine::stats)
    }

    pub fn engine(&self) -> Option<&MatchEngine> {
        self.engine.as_ref()
    }

    pub fn timer(&self) -> &SessionTimer {
        &self.timer
    }

    pub fn has_saved_session(&self) -> bool {
        self.codec.has_saved_session()
    }

    pub fn start_new(&mut self, game: GameConfig) -> Result<()> {
        let size = validate_size(game.size)?;
        let theme = self.usable_theme(game.theme);
        let faces = match self.themes.face_count(theme) {
            0 => {
                log::warn!("Theme {} has no faces, using one value per pair", theme);
                game.total_pairs()
            }
            faces => faces,
        };
        let pairing = self.pairing.generate(game.total_pairs(), faces)?;
        let board = Board::build(size, &pairing)?;

        log::info!(
            "Starting {}x{} game with theme {}",
            size.0,
            size.1,
            theme
        );
        let engine = MatchEngine::new(
            board,
            self.config.scoring,
            self.config.timings.flip_back_delay(),
        );
        self.install(engine, GameConfig::new_unchecked(size, theme), SessionTimer::new());
        self.begin_preview(SessionPhase::Previewing)
    }

    /// Restores the stored session, or starts a new game with the last settings if there is none.
    pub fn load(&mut self) -> Result<LoadOutcome> {
        match self.codec.read() {
            Ok(Some(snapshot)) => match self.restore(&snapshot) {
                Ok(()) => return Ok(LoadOutcome::Restored),
                Err(err) => {
                    log::warn!("Saved session cannot be restored: {}", err);
                    self.codec.clear();
                }
            },
            Ok(None) => log::debug!("No saved session"),
            Err(err) => {
                log::warn!("Discarding saved session: {}", err);
                self.codec.clear();
            }
        }
        self.start_new(self.game)?;
        Ok(LoadOutcome::StartedNew)
    }

    fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<()> {
        let size = snapshot.size();
        let board = Board::from_card_states(size, &snapshot.cards)
            .map_err(|_| GameError::CorruptData)?;
        let engine = MatchEngine::restore(
            board,
            snapshot.stats,
            self.config.scoring,
            self.config.timings.flip_back_delay(),
        )?;
        let game = GameConfig {
            theme: self.usable_theme(snapshot.theme),
            ..snapshot.game_config()
        };

        log::info!(
            "Restoring {}x{} game at {} moves",
            size.0,
            size.1,
            snapshot.stats.moves
        );
        self.install(engine, game, SessionTimer::restored(snapshot.elapsed));
        self.begin_preview(SessionPhase::RestoringPreview)
    }

    /// No-op unless play is running.
    pub fn save(&mut self) -> Result<()> {
        let Some(engine) = self.engine.as_ref().filter(|_| self.phase == SessionPhase::Active)
        else {
            log::trace!("Not saving in phase {}", self.phase.name());
            return Ok(());
        };
        let snapshot = SessionSnapshot::capture(&self.game, engine, &self.timer);
        self.codec.write(&snapshot)?;
        self.save_deferred = false;
        Ok(())
    }

    /// Drops the stored session and starts over with the current settings.
    pub fn restart(&mut self) -> Result<()> {
        self.audio.play(AudioCue::ButtonClick);
        self.codec.clear();
        self.start_new(self.game)
    }

    pub fn pause(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Active {
            return Err(self.invalid_transition(SessionPhase::Paused));
        }
        self.timer.stop();
        self.set_phase(SessionPhase::Paused);
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        if self.phase != SessionPhase::Paused {
            return Err(self.invalid_transition(SessionPhase::Active));
        }
        self.suspended = false;
        self.timer.start();
        self.set_phase(SessionPhase::Active);
        if self.save_deferred {
            self.auto_save();
        }
        Ok(())
    }

    /// Player clicked a card. Anything that cannot be played right now is ignored.
    pub fn card_activated(&mut self, coords: Coord2) -> Result<SelectOutcome> {
        let Some(engine) = self.engine.as_mut() else {
            return Ok(SelectOutcome::Ignored);
        };
        let mut events = Vec::new();
        let outcome = engine.select_card(coords, self.phase.accepts_input(), &mut events)?;
        self.dispatch(events);
        Ok(outcome)
    }

    /// Advances session time by `delta`.
    ///
    /// Time is split at every due timer, session or engine, so each one fires at its own instant and
    /// anything it schedules counts from there. Play time stops at the instant the game is won.
    pub fn tick(&mut self, delta: Duration) -> Result<()> {
        let mut remaining = delta;
        loop {
            let step = self
                .next_due_in()
                .filter(|&due| due <= remaining)
                .unwrap_or(remaining);
            self.step(step)?;
            remaining -= step;

            if remaining.is_zero() || self.phase == SessionPhase::Won {
                return Ok(());
            }
        }
    }

    /// Earliest pending timer of the session or its engine.
    fn next_due_in(&self) -> Option<Duration> {
        let engine_due = self
            .engine
            .as_ref()
            .and_then(MatchEngine::next_resolution_in);
        match (self.scheduler.next_due_in(), engine_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Advances every clock by `step`, firing whatever comes due at its end.
    fn step(&mut self, step: Duration) -> Result<()> {
        self.timer.tick(step);

        if let Some(engine) = self.engine.as_mut() {
            let mut events = Vec::new();
            let result = engine.advance(step, &mut events);
            self.dispatch(events);
            result?;
        }

        let deadline = self.scheduler.deadline_after(step);
        while let Some(task) = self.scheduler.pop_due(deadline) {
            self.phase_timer = None;
            self.run_task(task)?;
        }
        self.scheduler.advance_to(deadline);
        Ok(())
    }

    /// The app went to the background: save and hold the clock.
    pub fn app_suspended(&mut self) {
        if self.phase == SessionPhase::Active {
            self.auto_save();
            self.timer.stop();
            self.set_phase(SessionPhase::Paused);
            self.suspended = true;
        }
    }

    /// Undoes [`app_suspended`](Self::app_suspended). A pause the player chose stays in place.
    pub fn app_resumed(&mut self) {
        if self.suspended && self.phase == SessionPhase::Paused {
            if let Err(err) = self.resume() {
                log::warn!("Failed to resume after suspend: {}", err);
            }
        }
        self.suspended = false;
    }

    pub fn quit(&mut self) {
        self.audio.play(AudioCue::ButtonClick);
        self.auto_save();
        log::info!("Quitting in phase {}", self.phase.name());
    }

    fn usable_theme(&self, theme: ThemeId) -> ThemeId {
        if self.themes.has_theme(theme) {
            theme
        } else {
            log::warn!("Unknown theme {}, using theme 0", theme);
            0
        }
    }

    /// Swaps in a new board, cancelling everything that belonged to the old one.
    fn install(&mut self, engine: MatchEngine, game: GameConfig, timer: SessionTimer) {
        self.cancel_phase_timer();
        self.engine = Some(engine);
        self.game = game;
        self.timer = timer;
        self.previewed.clear();
        self.save_deferred = false;
        self.suspended = false;

        if let Some(engine) = &self.engine {
            let stats = engine.stats();
            self.observer.board_rebuilt(engine.board());
            self.observer.score_changed(stats.score, stats.combo_count);
            self.observer.moves_changed(stats.moves);
        }
    }

    fn cancel_phase_timer(&mut self) {
        if let Some(token) = self.phase_timer.take() {
            if self.scheduler.cancel(token) {
                log::debug!("Cancelled pending {} timer", self.phase.name());
            }
        }
    }

    fn schedule_phase_timer(&mut self, delay: Duration, task: SessionTask) {
        self.cancel_phase_timer();
        self.phase_timer = Some(self.scheduler.schedule(delay, task));
    }

    fn begin_preview(&mut self, phase: SessionPhase) -> Result<()> {
        let mut events = Vec::new();
        if let Some(engine) = self.engine.as_mut() {
            self.previewed = engine.reveal_for_preview(&mut events)?;
        }
        self.set_phase(phase);
        self.dispatch(events);
        self.schedule_phase_timer(self.config.timings.preview_duration(), SessionTask::EndPreview);
        Ok(())
    }

    fn run_task(&mut self, task: SessionTask) -> Result<()> {
        match task {
            SessionTask::EndPreview => {
                let mut events = Vec::new();
                if let Some(engine) = self.engine.as_mut() {
                    engine.conceal_after_preview(&self.previewed, &mut events)?;
                }
                self.previewed.clear();
                self.dispatch(events);
                self.schedule_phase_timer(self.config.timings.flip_duration(), SessionTask::BeginPlay);
            }
            SessionTask::BeginPlay => {
                self.timer.start();
                self.set_phase(SessionPhase::Active);
                if let Some(engine) = self.engine.as_mut() {
                    if engine.resume_pending() {
                        log::debug!("Resumed restored comparison");
                    }
                }
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::CardRevealed(coords) => {
                    if let Some(engine) = &self.engine {
                        self.observer.card_revealed(&engine.board()[coords]);
                    }
                }
                GameEvent::CardConcealed(coords) => {
                    if let Some(engine) = &self.engine {
                        self.observer.card_concealed(&engine.board()[coords]);
                    }
                }
                GameEvent::CardMatched(coords) => {
                    if let Some(engine) = &self.engine {
                        self.observer.card_matched(&engine.board()[coords]);
                    }
                }
                GameEvent::MovesChanged(moves) => self.observer.moves_changed(moves),
                GameEvent::ScoreChanged { score, combo } => {
                    self.observer.score_changed(score, combo)
                }
                GameEvent::PairResolved {
                    first,
                    second,
                    matched,
                    points,
                } => log::trace!(
                    "Resolved {:?} and {:?}: matched {}, {} points",
                    first,
                    second,
                    matched,
                    points
                ),
                GameEvent::Cue(cue) => self.audio.play(cue),
                GameEvent::Won => self.finish(),
                GameEvent::SaveRequested => self.auto_save(),
            }
        }
    }

    fn finish(&mut self) {
        self.timer.stop();
        self.cancel_phase_timer();
        self.save_deferred = false;
        self.set_phase(SessionPhase::Won);
        self.codec.clear();
        if let Some(engine) = &self.engine {
            log::info!(
                "Won with score {} in {} moves",
                engine.stats().score,
                engine.stats().moves
            );
            self.observer.won(engine.stats(), self.timer.elapsed());
        }
    }

    fn auto_save(&mut self) {
        match self.phase {
            SessionPhase::Active => {
                if let Err(err) = self.save() {
                    log::warn!("Auto-save failed: {}", err);
                }
            }
            SessionPhase::Paused => self.save_deferred = true,
            _ => {}
        }
    }

    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            log::debug!("Session {} -> {}", self.phase.name(), phase.name());
            self.phase = phase;
            self.observer.phase_changed(phase);
        }
    }

    fn invalid_transition(&self, to: SessionPhase) -> GameError {
        GameError::InvalidTransition {
            from: self.phase.name(),
            to: to.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    const PREVIEW: Duration = Duration::from_secs(3);
    const FLIP: Duration = Duration::from_millis(300);
    const DELAY: Duration = Duration::from_secs(1);

    #[derive(Clone, Default)]
    struct Cues(Rc<RefCell<Vec<AudioCue>>>);

    impl AudioSink for Cues {
        fn play(&mut self, cue: AudioCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    #[derive(Clone, Default)]
    struct Phases(Rc<RefCell<Vec<SessionPhase>>>);

    impl SessionObserver for Phases {
        fn phase_changed(&mut self, phase: SessionPhase) {
            self.0.borrow_mut().push(phase);
        }
    }

    fn session(pairing: &[CardValue]) -> (GameSession, Rc<RefCell<MemoryStore>>, Cues) {
        let store = Rc::new(RefCell::new(MemoryStore::new()));
        let cues = Cues::default();
        let collaborators = Collaborators::new(
            Box::new(store.clone()),
            Box::new(StaticThemes::single("fruit", 8)),
        )
        .with_audio(Box::new(cues.clone()));
        let session = GameSession::new(SessionConfig::default(), collaborators)
            .with_pairing(Box::new(FixedPairing::new(pairing.to_vec())));
        (session, store, cues)
    }

    fn play(session: &mut GameSession) {
        session.start_new(GameConfig::DEFAULT).unwrap();
        session.tick(PREVIEW).unwrap();
        session.tick(FLIP).unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn preview_then_active() {
        let (mut session, _, _) = session(&[1, 0, 0, 1]);
        assert_eq!(session.phase(), SessionPhase::Setup);

        session.start_new(GameConfig::DEFAULT).unwrap();
        assert_eq!(session.phase(), SessionPhase::Previewing);
        assert!(session.board().unwrap().iter().all(|card| card.face.is_face_up()));
        assert_eq!(
            session.card_activated((0, 0)),
            Ok(SelectOutcome::Ignored)
        );

        session.tick(PREVIEW).unwrap();
        assert!(session.board().unwrap().iter().all(|card| card.face.is_face_down()));
        assert_eq!(session.phase(), SessionPhase::Previewing);
        assert!(!session.timer().is_running());

        session.tick(FLIP).unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert!(session.timer().is_running());
        assert_eq!(session.timer().elapsed(), Duration::ZERO);
    }

    #[test]
    fn rejects_odd_grid_without_touching_state() {
        let (mut session, _, _) = session(&[1, 0, 0, 1]);
        assert!(matches!(
            session.start_new(GameConfig::new_unchecked((3, 3), 0)),
            Err(GameError::InvalidArgument(_))
        ));
        assert_eq!(session.phase(), SessionPhase::Setup);
        assert!(session.board().is_none());
    }

    #[test]
    fn pause_transitions() {
        let (mut session, _, _) = session(&[1, 0, 0, 1]);
        assert_eq!(
            session.pause(),
            Err(GameError::InvalidTransition {
                from: "Setup",
                to: "Paused"
            })
        );

        play(&mut session);
        session.pause().unwrap();
        assert_eq!(session.card_activated((0, 0)), Ok(SelectOutcome::Ignored));
        session.tick(Duration::from_secs(10)).unwrap();
        assert_eq!(session.timer().elapsed(), Duration::ZERO);
        assert!(session.pause().is_err());

        session.resume().unwrap();
        assert!(session.resume().is_err());
        session.tick(Duration::from_millis(1500)).unwrap();
        assert_eq!(session.timer().elapsed_secs(), 1);
    }

    #[test]
    fn resolution_saves_and_win_clears() {
        let (mut session, store, cues) = session(&[1, 0, 0, 1]);
        play(&mut session);

        session.card_activated((0, 1)).unwrap();
        session.card_activated((1, 0)).unwrap();
        assert!(!session.has_saved_session());
        session.tick(DELAY).unwrap();
        assert!(session.has_saved_session());
        assert!(store.borrow().contains(SessionSnapshot::KEY));

        session.card_activated((0, 0)).unwrap();
        session.card_activated((1, 1)).unwrap();
        session.tick(DELAY).unwrap();
        assert_eq!(session.phase(), SessionPhase::Won);
        assert!(!session.has_saved_session());
        assert!(!session.timer().is_running());
        assert_eq!(session.stats().map(|stats| stats.score), Some(25));

        let cues = cues.0.borrow();
        assert_eq!(cues.iter().filter(|&&cue| cue == AudioCue::Win).count(), 1);
        assert_eq!(
            cues.iter().filter(|&&cue| cue == AudioCue::Match).count(),
            2
        );

        assert!(session.pause().is_err());
    }

    #[test]
    fn save_while_paused_waits_for_resume() {
        let (mut session, _, _) = session(&[1, 0, 0, 1]);
        play(&mut session);

        session.card_activated((0, 0)).unwrap();
        session.card_activated((0, 1)).unwrap();
        session.pause().unwrap();
        session.tick(DELAY).unwrap();
        // the comparison still resolves while paused
        assert!(!session.engine().unwrap().is_resolving());
        assert!(!session.has_saved_session());

        session.resume().unwrap();
        assert!(session.has_saved_session());
    }

    #[test]
    fn restart_clears_save_and_keeps_settings() {
        let wide = GameConfig::new_unchecked((2, 4), 0);
        let (mut session, _, cues) = session(&[1, 0, 0, 1, 1, 0, 0, 1]);
        session.start_new(wide).unwrap();
        session.tick(PREVIEW + FLIP).unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
        session.card_activated((0, 0)).unwrap();
        session.card_activated((0, 1)).unwrap();
        session.tick(DELAY).unwrap();
        assert!(session.has_saved_session());

        session.restart().unwrap();
        assert!(!session.has_saved_session());
        assert_eq!(session.phase(), SessionPhase::Previewing);
        assert_eq!(session.game_config(), wide);
        assert_eq!(session.stats().map(|stats| stats.moves), Some(0));
        assert_eq!(cues.0.borrow().last(), Some(&AudioCue::ButtonClick));
    }

    #[test]
    fn restart_during_preview_drops_old_timers() {
        let (mut session, _, _) = session(&[1, 0, 0, 1, 1, 0, 0, 1]);
        session
            .start_new(GameConfig::new_unchecked((2, 4), 0))
            .unwrap();
        session.tick(Duration::from_secs(2)).unwrap();
        session.restart().unwrap();

        // the first preview would have ended here
        session.tick(Duration::from_secs(2)).unwrap();
        assert_eq!(session.phase(), SessionPhase::Previewing);
        assert!(session.board().unwrap().iter().all(|card| card.face.is_face_up()));

        session.tick(Duration::from_secs(1)).unwrap();
        session.tick(FLIP).unwrap();
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn suspend_saves_and_resume_restarts_clock() {
        let (mut session, _, _) = session(&[1, 0, 0, 1]);
        play(&mut session);
        let phases = Phases::default();
        session.observer = Box::new(phases.clone());

        session.app_suspended();
        assert!(session.has_saved_session());
        assert_eq!(session.phase(), SessionPhase::Paused);

        session.app_resumed();
        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(
            phases.0.borrow().as_slice(),
            &[SessionPhase::Paused, SessionPhase::Active]
        );
    }

    #[test]
    fn user_pause_survives_app_resume() {
        let (mut session, _, _) = session(&[1, 0, 0, 1]);
        play(&mut session);

        session.pause().unwrap();
        session.app_suspended();
        session.app_resumed();
        assert_eq!(session.phase(), SessionPhase::Paused);
    }

    #[test]
    fn load_restores_saved_game() {
        let (mut first, store, _) = session(&[1, 0, 0, 1]);
        play(&mut first);
        first.card_activated((0, 1)).unwrap();
        first.card_activated((1, 0)).unwrap();
        first.tick(DELAY).unwrap();
        first.card_activated((0, 0)).unwrap();
        first.quit();

        let collaborators = Collaborators::new(
            Box::new(store.clone()),
            Box::new(StaticThemes::single("fruit", 8)),
        );
        let mut second = GameSession::new(SessionConfig::default(), collaborators);
        assert_eq!(second.load(), Ok(LoadOutcome::Restored));
        assert_eq!(second.phase(), SessionPhase::RestoringPreview);
        assert_eq!(second.stats(), first.stats());
        assert_eq!(second.timer().elapsed(), DELAY);

        second.tick(PREVIEW).unwrap();
        second.tick(FLIP).unwrap();
        assert_eq!(second.phase(), SessionPhase::Active);
        let board = second.board().unwrap();
        assert!(board[(0, 0)].face.is_face_up());
        assert!(board[(1, 1)].face.is_face_down());
        assert!(board[(0, 1)].face.is_matched());

        assert_eq!(second.card_activated((1, 1)), Ok(SelectOutcome::ComparisonScheduled));
        second.tick(DELAY).unwrap();
        assert_eq!(second.phase(), SessionPhase::Won);
        assert_eq!(second.stats().map(|stats| stats.score), Some(25));
    }

    #[test]
    fn corrupt_save_falls_back_to_new_game() {
        let (mut session, store, _) = session(&[1, 0, 0, 1]);
        store
            .borrow_mut()
            .set(SessionSnapshot::KEY, "{\"broken\":".into())
            .unwrap();

        assert_eq!(session.load(), Ok(LoadOutcome::StartedNew));
        assert_eq!(session.phase(), SessionPhase::Previewing);
        assert!(!session.has_saved_session());
        assert_eq!(session.stats().map(|stats| stats.moves), Some(0));
    }

    #[test]
    fn themes_without_faces_still_play() {
        let collaborators =
            Collaborators::new(Box::new(MemoryStore::new()), Box::new(StaticThemes::default()));
        let mut session = GameSession::new(SessionConfig::default(), collaborators);

        assert_eq!(session.load(), Ok(LoadOutcome::StartedNew));
        assert_eq!(session.game_config().theme, 0);
        assert_eq!(session.board().map(Board::total_pairs), Some(2));

        session
            .start_new(GameConfig::new_unchecked((4, 4), 3))
            .unwrap();
        let board = session.board().unwrap();
        assert!(board.iter().all(|card| card.value < 8));
    }

    #[test]
    fn unknown_theme_falls_back() {
        let (mut session, _, _) = session(&[1, 0, 0, 1]);
        session
            .start_new(GameConfig::new_unchecked((2, 2), 7))
            .unwrap();
        assert_eq!(session.game_config().theme, 0);
    }
}
