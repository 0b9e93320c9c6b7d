//! Game session: lifecycle, timers, scoring and coins
//!
//! A `Session` owns the active simulation, the saved progress and the timers
//! driving it. Every mutation happens either in a UI call (start, pause, input,
//! shop) or in `on_timer`. Feedback for the UI, audio and renderer is queued as
//! `GameEvent`s and drained by the caller.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{
    BOT_KILL_BONUS, CLASSIC_MIN_TICK_MS, CLASSIC_SPEEDUP_EVERY, CLASSIC_SPEEDUP_STEP_MS,
    CLOCK_INTERVAL_MS, FOOD_POINTS, SPECIAL_FOOD_COIN_FACTOR, SPECIAL_FOOD_LIFETIME_MS,
    SPECIAL_FOOD_POINTS, SPECIAL_FOOD_SPAWN_MS,
};
use crate::difficulty::Difficulty;
use crate::economy::{Economy, ItemKind};
use crate::error::{EconomyError, SessionError};
use crate::format_time;
use crate::highscores::HighScores;
use crate::persistence::KeyValueStore;
use crate::platform::{ManualScheduler, Scheduler, TimerKind};
use crate::settings::Settings;
use crate::sim::{ActiveSimulation, BotStrike, Collision, FoodKind, GameMode, Intent, TickReport};

/// Session state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Board laid out, waiting for the first input
    #[default]
    Idle,
    Running,
    Paused,
    Over,
}

impl Phase {
    /// A game is under way (running or paused)
    pub fn is_live(&self) -> bool {
        matches!(self, Phase::Running | Phase::Paused)
    }
}

/// End-of-run report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    pub cause: Collision,
    pub score: u32,
    pub length: usize,
    pub level: u32,
    pub elapsed_secs: u32,
    /// `mm:ss`
    pub time: String,
    /// Game-over payout
    pub coins_earned: u64,
    pub new_high_score: bool,
}

/// Fire-and-forget notifications for UI, audio and renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GameEvent {
    Started { mode: GameMode, difficulty: Difficulty },
    Paused,
    Resumed,
    Reset,
    FoodEaten { kind: FoodKind, points: u32, coins: u64 },
    SpecialFoodSpawned,
    SpecialFoodExpired,
    SpeedUp { interval_ms: u32 },
    BotEliminated { bonus: u64 },
    HeadOnCollision { bonus: u64 },
    GameOver { summary: GameSummary },
}

/// Level shown in the game-over summary
pub fn level_for(score: u32) -> u32 {
    score / 100 + 1
}

pub struct Session<S: Scheduler, K: KeyValueStore> {
    scheduler: S,
    store: K,
    rng: Pcg32,

    mode: GameMode,
    settings: Settings,
    economy: Economy,
    high_scores: HighScores,

    sim: ActiveSimulation,
    phase: Phase,
    score: u32,
    /// Current tick period
    tick_interval_ms: u32,

    started_at_ms: f64,
    paused_at_ms: Option<f64>,
    paused_total_ms: f64,
    /// Last value written by the display clock
    elapsed_secs: u32,

    events: Vec<GameEvent>,
    redraw: bool,
}

impl<S: Scheduler, K: KeyValueStore> Session<S, K> {
    /// Load saved progress and lay out an idle classic board
    pub fn new(scheduler: S, store: K, seed: u64) -> Self {
        let settings = Settings::load(&store);
        let economy = Economy::load(&store);
        let high_scores = HighScores::load(&store);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mode = GameMode::default();
        let sim = ActiveSimulation::new(mode, settings.difficulty, &mut rng);
        let tick_interval_ms = sim.base_tick_ms(settings.difficulty);

        log::info!(
            "Session created (seed {}, {} / {})",
            seed,
            mode.as_str(),
            settings.difficulty.as_str()
        );

        Self {
            scheduler,
            store,
            rng,
            mode,
            settings,
            economy,
            high_scores,
            sim,
            phase: Phase::Idle,
            score: 0,
            tick_interval_ms,
            started_at_ms: 0.0,
            paused_at_ms: None,
            paused_total_ms: 0.0,
            elapsed_secs: 0,
            events: Vec::new(),
            redraw: true,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.settings.difficulty
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn tick_interval_ms(&self) -> u32 {
        self.tick_interval_ms
    }

    pub fn simulation(&self) -> &ActiveSimulation {
        &self.sim
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether the board changed since the last call
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.redraw, false)
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Running time so far, pauses excluded
    fn elapsed_ms(&self) -> f64 {
        if self.phase == Phase::Idle {
            return 0.0;
        }
        let now = self.paused_at_ms.unwrap_or_else(|| self.scheduler.now_ms());
        (now - self.started_at_ms - self.paused_total_ms).max(0.0)
    }

    fn update_clock(&mut self) {
        self.elapsed_secs = (self.elapsed_ms() / 1000.0).floor() as u32;
    }

    fn start_run_timers(&mut self) {
        self.scheduler
            .start_repeating(TimerKind::Tick, self.tick_interval_ms);
        self.scheduler
            .start_repeating(TimerKind::Clock, CLOCK_INTERVAL_MS);
    }

    /// Idle → Running; false in any other phase
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        self.phase = Phase::Running;
        self.started_at_ms = self.scheduler.now_ms();
        self.paused_at_ms = None;
        self.paused_total_ms = 0.0;
        self.elapsed_secs = 0;

        self.start_run_timers();
        self.scheduler
            .start_repeating(TimerKind::SpecialSpawn, SPECIAL_FOOD_SPAWN_MS);

        log::info!(
            "Game started: {} / {}, tick {} ms",
            self.mode.as_str(),
            self.settings.difficulty.as_str(),
            self.tick_interval_ms
        );
        self.emit(GameEvent::Started {
            mode: self.mode,
            difficulty: self.settings.difficulty,
        });
        true
    }

    /// Stop and clear everything, then start straight away
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.phase = Phase::Paused;
        self.paused_at_ms = Some(self.scheduler.now_ms());
        self.scheduler.stop(TimerKind::Tick);
        self.scheduler.stop(TimerKind::Clock);
        log::info!("Game paused");
        self.emit(GameEvent::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        if let Some(paused_at) = self.paused_at_ms.take() {
            self.paused_total_ms += self.scheduler.now_ms() - paused_at;
        }
        self.phase = Phase::Running;
        self.start_run_timers();
        log::info!("Game resumed");
        self.emit(GameEvent::Resumed);
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Apply a player intent; a directional intent also starts an idle game
    pub fn input(&mut self, intent: Intent) {
        match self.phase {
            Phase::Idle => {
                let changed = self.sim.apply_intent(intent);
                if intent.starts_game() {
                    self.start();
                }
                self.redraw |= changed;
            }
            Phase::Running => {
                self.sim.apply_intent(intent);
            }
            Phase::Paused | Phase::Over => {}
        }
    }

    /// Cancel every timer and rebuild the board
    pub fn reset(&mut self) {
        self.scheduler.stop_all();
        self.sim = ActiveSimulation::new(self.mode, self.settings.difficulty, &mut self.rng);
        self.tick_interval_ms = self.sim.base_tick_ms(self.settings.difficulty);
        self.phase = Phase::Idle;
        self.score = 0;
        self.started_at_ms = 0.0;
        self.paused_at_ms = None;
        self.paused_total_ms = 0.0;
        self.elapsed_secs = 0;
        self.redraw = true;
        log::info!("Game reset ({})", self.mode.as_str());
        self.emit(GameEvent::Reset);
    }

    pub fn select_mode(&mut self, mode: GameMode) -> Result<(), SessionError> {
        if self.phase.is_live() {
            return Err(SessionError::GameInProgress {
                action: "change mode",
                phase: self.phase,
            });
        }
        self.mode = mode;
        self.reset();
        Ok(())
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        if self.phase.is_live() {
            return Err(SessionError::GameInProgress {
                action: "change difficulty",
                phase: self.phase,
            });
        }
        self.settings.difficulty = difficulty;
        self.settings.save(&mut self.store);
        self.reset();
        Ok(())
    }

    /// Entry point for every timer firing
    pub fn on_timer(&mut self, kind: TimerKind) {
        match kind {
            TimerKind::Tick => self.tick(),
            TimerKind::Clock => {
                if self.phase == Phase::Running {
                    self.update_clock();
                }
            }
            TimerKind::SpecialSpawn => self.spawn_special_food(),
            TimerKind::SpecialExpiry => {
                if self.sim.clear_special_food() {
                    log::debug!("Special food expired");
                    self.redraw = true;
                    self.emit(GameEvent::SpecialFoodExpired);
                }
            }
        }
    }

    fn spawn_special_food(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let now = self.scheduler.now_ms();
        if self.sim.spawn_special_food(&mut self.rng, now) {
            self.scheduler
                .start_once(TimerKind::SpecialExpiry, SPECIAL_FOOD_LIFETIME_MS);
            log::debug!("Special food spawned");
            self.redraw = true;
            self.emit(GameEvent::SpecialFoodSpawned);
        }
    }

    fn tick(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let report = match self.sim.advance_tick(&mut self.rng) {
            Ok(report) => report,
            Err(e) => {
                log::warn!("Skipping tick: {}", e);
                return;
            }
        };
        self.redraw = true;
        self.apply_report(report);
    }

    fn apply_report(&mut self, report: TickReport) {
        let multiplier = self.settings.difficulty.coin_multiplier();

        for kind in report.eaten() {
            match kind {
                FoodKind::Regular => {
                    let coins = FOOD_POINTS as u64 * multiplier;
                    self.award(FoodKind::Regular, FOOD_POINTS, coins);
                    if self.mode == GameMode::Classic && report.length % CLASSIC_SPEEDUP_EVERY == 0 {
                        self.speed_up();
                    }
                }
                FoodKind::Special => {
                    let coins = SPECIAL_FOOD_POINTS as u64 * multiplier * SPECIAL_FOOD_COIN_FACTOR;
                    self.scheduler.stop(TimerKind::SpecialExpiry);
                    self.award(FoodKind::Special, SPECIAL_FOOD_POINTS, coins);
                }
            }
        }

        match report.bot {
            Some(BotStrike::HeadOn) => {
                self.pay_kill_bonus();
                self.emit(GameEvent::HeadOnCollision {
                    bonus: BOT_KILL_BONUS,
                });
            }
            Some(BotStrike::Eliminated) => {
                self.pay_kill_bonus();
                log::info!("Bot eliminated, +{} coins", BOT_KILL_BONUS);
                self.emit(GameEvent::BotEliminated {
                    bonus: BOT_KILL_BONUS,
                });
            }
            Some(BotStrike::Neck) | None => {}
        }

        if let Some(cause) = report.game_over {
            self.game_over(cause, report.length);
        }
    }

    fn award(&mut self, kind: FoodKind, points: u32, coins: u64) {
        self.score += points;
        self.economy.credit(coins);
        self.economy.save(&mut self.store);
        log::debug!("Ate {:?}: +{} points, +{} coins", kind, points, coins);
        self.emit(GameEvent::FoodEaten {
            kind,
            points,
            coins,
        });
    }

    fn pay_kill_bonus(&mut self) {
        self.economy.credit(BOT_KILL_BONUS);
        self.economy.save(&mut self.store);
    }

    fn speed_up(&mut self) {
        let next = self
            .tick_interval_ms
            .saturating_sub(CLASSIC_SPEEDUP_STEP_MS)
            .max(CLASSIC_MIN_TICK_MS);
        if next == self.tick_interval_ms {
            return;
        }
        self.tick_interval_ms = next;
        self.scheduler.start_repeating(TimerKind::Tick, next);
        log::debug!("Tick interval now {} ms", next);
        self.emit(GameEvent::SpeedUp { interval_ms: next });
    }

    fn game_over(&mut self, cause: Collision, length: usize) {
        self.update_clock();
        self.scheduler.stop_all();
        self.phase = Phase::Over;

        let new_high_score = self.high_scores.record(self.mode, self.score as u64);
        let payout = (self.score / 10) as u64 * self.settings.difficulty.coin_multiplier();
        self.economy.credit(payout);
        self.economy.save(&mut self.store);
        self.high_scores.save(&mut self.store);

        let summary = GameSummary {
            mode: self.mode,
            difficulty: self.settings.difficulty,
            cause,
            score: self.score,
            length,
            level: level_for(self.score),
            elapsed_secs: self.elapsed_secs,
            time: format_time(self.elapsed_secs),
            coins_earned: payout,
            new_high_score,
        };
        log::info!(
            "Game over ({:?}): score {}, length {}, {} +{} coins{}",
            cause,
            summary.score,
            summary.length,
            summary.time,
            payout,
            if new_high_score { ", new high score" } else { "" }
        );
        self.emit(GameEvent::GameOver { summary });
    }

    /// Buy a theme or skin
    pub fn buy(&mut self, kind: ItemKind, id: &str, cost: u64) -> Result<(), EconomyError> {
        self.economy.buy(kind, id, cost)?;
        self.economy.save(&mut self.store);
        Ok(())
    }

    /// Switch to an owned theme or skin
    pub fn select(&mut self, kind: ItemKind, id: &str) -> Result<(), EconomyError> {
        self.economy.require_owned(kind, id)?;
        match kind {
            ItemKind::Theme => self.settings.theme = id.to_string(),
            ItemKind::Skin => self.settings.skin = id.to_string(),
        }
        self.settings.save(&mut self.store);
        self.redraw = true;
        Ok(())
    }

    pub fn unlock_vip(&mut self) {
        self.economy.unlock_vip();
        self.economy.save(&mut self.store);
        log::info!("VIP unlocked");
    }

    /// Flip the sound flag; returns the new value
    pub fn toggle_sound(&mut self) -> bool {
        self.settings.sound_enabled = !self.settings.sound_enabled;
        self.settings.save(&mut self.store);
        self.settings.sound_enabled
    }

    /// Forget all saved progress and start over from defaults
    pub fn reset_all_data(&mut self) {
        self.store.clear();
        self.settings = Settings::default();
        self.economy = Economy::default();
        self.high_scores = HighScores::default();
        log::info!("All saved data cleared");
        self.reset();
    }
}

impl<K: KeyValueStore> Session<ManualScheduler, K> {
    /// Run every timer due in the next `ms` milliseconds, in order
    pub fn advance_time(&mut self, ms: f64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some(kind) = self.scheduler.fire_next(until) {
            self.on_timer(kind);
        }
        self.scheduler.advance_to(until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, keys};
    use crate::sim::{Cell, ClassicBot, Direction, GridRect, Heading, SpecialFood};

    type TestSession = Session<ManualScheduler, MemoryStore>;

    fn session_with(difficulty: Difficulty) -> TestSession {
        let mut store = MemoryStore::new();
        store.set(keys::DIFFICULTY, difficulty.as_str());
        Session::new(ManualScheduler::new(), store, 1234)
    }

    fn classic(session: &mut TestSession) -> &mut crate::sim::ClassicGame {
        session.sim.as_classic_mut().unwrap()
    }

    #[test]
    fn test_new_session_is_idle_with_defaults() {
        let session = Session::new(ManualScheduler::new(), MemoryStore::new(), 1);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.mode(), GameMode::Classic);
        assert_eq!(session.difficulty(), Difficulty::Normal);
        assert_eq!(session.economy().coins, 500);
        assert_eq!(session.tick_interval_ms(), 300);
        for kind in TimerKind::ALL {
            assert!(!session.scheduler().is_active(kind));
        }
    }

    #[test]
    fn test_start_arms_timers_once() {
        let mut session = session_with(Difficulty::Easy);
        assert!(session.start());
        assert!(!session.start());
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.scheduler().period_of(TimerKind::Tick), Some(400));
        assert_eq!(session.scheduler().period_of(TimerKind::Clock), Some(1000));
        assert_eq!(session.scheduler().period_of(TimerKind::SpecialSpawn), Some(15_000));
        assert_eq!(
            session.drain_events(),
            vec![GameEvent::Started {
                mode: GameMode::Classic,
                difficulty: Difficulty::Easy
            }]
        );
    }

    #[test]
    fn test_direction_input_starts_idle_game() {
        let mut session = session_with(Difficulty::Easy);
        session.input(Intent::Key(Direction::Up));
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(
            session.simulation().as_classic().unwrap().heading,
            Heading::from(Direction::Up)
        );
    }

    #[test]
    fn test_hold_does_not_start_game() {
        let mut session = session_with(Difficulty::Easy);
        session.input(Intent::Hold { left: true, right: false });
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_pause_freezes_ticks_and_clock() {
        let mut session = session_with(Difficulty::Easy);
        session.input(Intent::Key(Direction::Up));
        session.advance_time(400.0);
        let head = classic(&mut session).snake[0];
        assert_eq!(head, Cell::new(10, 9));

        assert!(session.pause());
        assert!(!session.scheduler().is_active(TimerKind::Tick));
        assert!(!session.scheduler().is_active(TimerKind::Clock));
        assert!(session.scheduler().is_active(TimerKind::SpecialSpawn));
        session.advance_time(5000.0);
        assert_eq!(classic(&mut session).snake[0], head);

        // Input is ignored while paused
        session.input(Intent::Key(Direction::Left));
        assert_eq!(classic(&mut session).heading, Heading::from(Direction::Up));

        assert!(session.toggle_pause());
        assert_eq!(session.phase(), Phase::Running);
        session.advance_time(400.0);
        assert_eq!(classic(&mut session).snake[0], Cell::new(10, 8));
    }

    #[test]
    fn test_elapsed_time_excludes_pause() {
        let mut session = session_with(Difficulty::Easy);
        session.start();
        session.advance_time(3000.0);
        assert_eq!(session.elapsed_secs(), 3);
        session.pause();
        session.advance_time(10_000.0);
        assert_eq!(session.elapsed_secs(), 3);
        session.resume();
        session.advance_time(2000.0);
        assert_eq!(session.elapsed_secs(), 5);
    }

    #[test]
    fn test_mode_and_difficulty_locked_while_live() {
        let mut session = session_with(Difficulty::Easy);
        session.start();
        assert_eq!(
            session.set_difficulty(Difficulty::Hard),
            Err(SessionError::GameInProgress {
                action: "change difficulty",
                phase: Phase::Running
            })
        );
        session.pause();
        assert!(session.select_mode(GameMode::Modern).is_err());
        assert_eq!(session.mode(), GameMode::Classic);
    }

    #[test]
    fn test_difficulty_change_persists_and_resets() {
        let mut session = session_with(Difficulty::Easy);
        session.set_difficulty(Difficulty::Extreme).unwrap();
        assert_eq!(session.store().get(keys::DIFFICULTY).as_deref(), Some("extreme"));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.simulation().has_bot());
        assert_eq!(session.tick_interval_ms(), 300);
    }

    #[test]
    fn test_select_mode_rebuilds_board() {
        let mut session = session_with(Difficulty::Normal);
        session.select_mode(GameMode::Modern).unwrap();
        assert_eq!(session.simulation().mode(), GameMode::Modern);
        assert_eq!(session.tick_interval_ms(), crate::consts::MODERN_TICK_MS);
        session.start();
        assert_eq!(session.scheduler().period_of(TimerKind::Tick), Some(16));
    }

    #[test]
    fn test_modern_tick_pays_for_both_foods() {
        let mut session = session_with(Difficulty::Easy);
        session.select_mode(GameMode::Modern).unwrap();
        let game = session.sim.as_modern_mut().unwrap();
        game.food = glam::Vec2::new(205.0, 200.0);
        game.special_food = Some(SpecialFood {
            pos: glam::Vec2::new(210.0, 200.0),
            created_at_ms: 0.0,
        });
        session.start();
        session.advance_time(16.0);

        assert_eq!(session.score(), 30);
        // 10 x1 regular, 20 x1 x2 special
        assert_eq!(session.economy().coins, 540);
        assert!(!session.simulation().has_special_food());
        let events = session.drain_events();
        assert!(events.contains(&GameEvent::FoodEaten {
            kind: FoodKind::Regular,
            points: 10,
            coins: 10
        }));
        assert!(events.contains(&GameEvent::FoodEaten {
            kind: FoodKind::Special,
            points: 20,
            coins: 40
        }));
    }

    #[test]
    fn test_special_food_expires_after_five_seconds() {
        let mut session = session_with(Difficulty::Easy);
        session.start();
        session.advance_time(15_000.0);
        assert!(session.simulation().has_special_food());
        let spawned = session.simulation().as_classic().unwrap().special_food.unwrap();
        assert_eq!(spawned.created_at_ms, 15_000.0);
        assert!(!classic(&mut session).snake.contains(&spawned.pos));

        session.advance_time(4_999.0);
        assert!(session.simulation().has_special_food());
        session.drain_events();
        session.advance_time(1.0);
        assert!(!session.simulation().has_special_food());
        assert_eq!(session.drain_events(), vec![GameEvent::SpecialFoodExpired]);
    }

    #[test]
    fn test_spawn_is_skipped_while_paused() {
        let mut session = session_with(Difficulty::Easy);
        session.start();
        session.pause();
        session.advance_time(15_000.0);
        assert!(!session.simulation().has_special_food());
    }

    #[test]
    fn test_regular_eat_scores_and_persists() {
        let mut session = session_with(Difficulty::Easy);
        classic(&mut session).food = Cell::new(11, 10);
        session.input(Intent::Key(Direction::Right));
        session.advance_time(400.0);

        assert_eq!(session.score(), 10);
        assert_eq!(session.economy().coins, 510);
        assert_eq!(session.store().get(keys::COINS).as_deref(), Some("510"));
        assert_eq!(classic(&mut session).snake.len(), 4);
        assert!(session.drain_events().contains(&GameEvent::FoodEaten {
            kind: FoodKind::Regular,
            points: 10,
            coins: 10
        }));
    }

    #[test]
    fn test_special_eat_pays_double() {
        let mut session = session_with(Difficulty::Normal);
        let game = classic(&mut session);
        game.obstacles.clear();
        game.special_food = Some(SpecialFood {
            pos: Cell::new(11, 10),
            created_at_ms: 0.0,
        });
        session.input(Intent::Key(Direction::Right));
        session.advance_time(300.0);

        assert_eq!(session.score(), 20);
        // 20 points x2 difficulty x2 special
        assert_eq!(session.economy().coins, 580);
        assert_eq!(classic(&mut session).snake.len(), 7);
    }

    #[test]
    fn test_classic_speeds_up_every_fifth_segment() {
        let mut session = session_with(Difficulty::Easy);
        let game = classic(&mut session);
        game.snake.push(Cell::new(7, 10));
        game.food = Cell::new(11, 10);
        session.input(Intent::Key(Direction::Right));
        session.advance_time(400.0);

        assert_eq!(classic(&mut session).snake.len(), 5);
        assert_eq!(session.tick_interval_ms(), 395);
        assert_eq!(session.scheduler().period_of(TimerKind::Tick), Some(395));
        assert!(session.drain_events().contains(&GameEvent::SpeedUp { interval_ms: 395 }));
    }

    #[test]
    fn test_wall_crash_ends_game_and_pays_out() {
        let mut session = session_with(Difficulty::Easy);
        session.input(Intent::Key(Direction::Right));
        session.score = 120;
        // Head reaches x = 19 after 9 ticks; the 10th leaves the board
        session.advance_time(4000.0);

        assert_eq!(session.phase(), Phase::Over);
        for kind in TimerKind::ALL {
            assert!(!session.scheduler().is_active(kind));
        }
        assert_eq!(session.high_scores().classic, 120);
        assert_eq!(session.high_scores().overall, 120);
        assert_eq!(session.economy().coins, 512);
        assert_eq!(session.store().get(keys::CLASSIC_HIGH_SCORE).as_deref(), Some("120"));

        let summary = session
            .drain_events()
            .into_iter()
            .find_map(|e| match e {
                GameEvent::GameOver { summary } => Some(summary),
                _ => None,
            })
            .unwrap();
        assert_eq!(summary.cause, Collision::Wall);
        assert_eq!(summary.level, 2);
        assert_eq!(summary.coins_earned, 12);
        assert_eq!(summary.time, "00:04");
        assert!(summary.new_high_score);

        // Nothing moves once the game is over
        session.input(Intent::Key(Direction::Up));
        session.advance_time(10_000.0);
        assert_eq!(session.phase(), Phase::Over);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut session = session_with(Difficulty::Easy);
        session.input(Intent::Key(Direction::Right));
        session.advance_time(4000.0);
        assert_eq!(session.phase(), Phase::Over);

        session.reset();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.score(), 0);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(classic(&mut session).snake[0], Cell::new(10, 10));
        session.restart();
        assert_eq!(session.phase(), Phase::Running);
    }

    #[test]
    fn test_head_on_pays_bonus_once() {
        let mut session = session_with(Difficulty::Extreme);
        let game = classic(&mut session);
        // Bot boxed in so its only way forward is into the player's head
        game.obstacles = vec![GridRect::new(11, 9, 1, 1), GridRect::new(11, 11, 1, 1)];
        let mut bot = ClassicBot::new(Cell::new(13, 10));
        bot.segments = vec![Cell::new(11, 10), Cell::new(12, 10), Cell::new(13, 10)];
        bot.heading = Heading::from(Direction::Left);
        game.bot = Some(bot);

        session.start();
        session.advance_time(1000.0);
        session.advance_time(10_000.0);

        let events = session.drain_events();
        let bonuses = events
            .iter()
            .filter(|e| matches!(e, GameEvent::HeadOnCollision { bonus: 500 }))
            .count();
        assert_eq!(bonuses, 1);
        assert_eq!(session.phase(), Phase::Over);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::GameOver { summary } if summary.cause == Collision::HeadOn
        )));
        assert_eq!(session.economy().coins, 1000);
    }

    #[test]
    fn test_shop_and_selection() {
        let mut session = session_with(Difficulty::Easy);
        assert!(matches!(
            session.select(ItemKind::Skin, "neon"),
            Err(EconomyError::NotOwned { .. })
        ));
        session.buy(ItemKind::Skin, "neon", 200).unwrap();
        session.select(ItemKind::Skin, "neon").unwrap();
        assert_eq!(session.settings().skin, "neon");
        assert_eq!(session.store().get(keys::SKIN).as_deref(), Some("neon"));
        assert_eq!(session.store().get(keys::COINS).as_deref(), Some("300"));
    }

    #[test]
    fn test_vip_and_full_reset() {
        let mut session = session_with(Difficulty::Hard);
        session.unlock_vip();
        assert_eq!(session.economy().coins, crate::consts::VIP_COINS);
        assert!(!session.toggle_sound());
        assert_eq!(session.store().get(keys::SOUND).as_deref(), Some("false"));

        session.reset_all_data();
        assert!(session.store().is_empty());
        assert_eq!(session.economy(), &Economy::default());
        assert_eq!(session.settings(), &Settings::default());
        assert_eq!(session.difficulty(), Difficulty::Normal);
    }

    #[test]
    fn test_same_seed_same_game() {
        let run = || {
            let mut session = session_with(Difficulty::Extreme);
            session.input(Intent::Key(Direction::Down));
            session.advance_time(2_000.0);
            session.input(Intent::Key(Direction::Left));
            session.advance_time(20_000.0);
            (session.simulation().clone(), session.score(), session.phase())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_bot_event_json_shape() {
        let json = serde_json::to_string(&GameEvent::BotEliminated { bonus: 500 }).unwrap();
        assert_eq!(json, r#"{"event":"botEliminated","bonus":500}"#);
        let json = serde_json::to_string(&GameEvent::HeadOnCollision { bonus: 500 }).unwrap();
        assert_eq!(json, r#"{"event":"headOnCollision","bonus":500}"#);
    }
}
