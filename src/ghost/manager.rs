//! Coordinates all ghosts: the global scatter/chase waves, fright windows and collisions.

use glam::{IVec2, Vec2};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::constants::WAVE_SCHEDULE;
use crate::ghost::mode::{Countdown, GhostMode};
use crate::ghost::personality::Personality;
use crate::ghost::{fright_cap, CollisionOutcome, Ghost};
use crate::state::GameState;

/// Walks the wave table; the last entry never expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveSchedule {
    index: usize,
    countdown: Countdown,
}

impl Default for WaveSchedule {
    fn default() -> Self {
        Self {
            index: 0,
            countdown: Self::countdown_for(0),
        }
    }
}

impl WaveSchedule {
    fn countdown_for(index: usize) -> Countdown {
        match WAVE_SCHEDULE[index].0 {
            Some(ticks) => Countdown::ticks(ticks),
            None => Countdown::Indefinite,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> GhostMode {
        WAVE_SCHEDULE[self.index].1
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    /// Ticks the current wave. Returns the new wave's mode and countdown when the wave changes.
    pub fn tick(&mut self) -> Option<(GhostMode, Countdown)> {
        self.countdown.tick();
        if !self.countdown.expired() || self.index + 1 >= WAVE_SCHEDULE.len() {
            return None;
        }
        self.index += 1;
        self.countdown = Self::countdown_for(self.index);
        Some((self.mode(), self.countdown))
    }
}

/// Owns the ghosts and the shared game state they read.
///
/// Ghosts are always updated and collision-checked in the order they were added.
pub struct GhostManager {
    ghosts: Vec<Ghost>,
    state: GameState,
    waves: WaveSchedule,
    rng: SmallRng,
}

impl GhostManager {
    pub fn new(state: GameState, seed: u64) -> Self {
        Self {
            ghosts: Vec::new(),
            state,
            waves: WaveSchedule::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Creates a manager with one ghost of each personality.
    pub fn with_all_personalities(state: GameState, seed: u64) -> Self {
        let mut manager = Self::new(state, seed);
        for personality in Personality::ALL {
            let ghost = Ghost::new(personality, &manager.state.grid, manager.state.house);
            manager.add_ghost(ghost);
        }
        manager
    }

    /// Registers a ghost for coordinated updates.
    pub fn add_ghost(&mut self, ghost: Ghost) {
        debug!(ghost = %ghost.personality(), count = self.ghosts.len() + 1, "Ghost added");
        self.ghosts.push(ghost);
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn ghosts_mut(&mut self) -> &mut [Ghost] {
        &mut self.ghosts
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn waves(&self) -> &WaveSchedule {
        &self.waves
    }

    /// Advances the wave schedule and the fright window, then every ghost.
    pub fn update_all(&mut self) {
        if let Some((mode, countdown)) = self.waves.tick() {
            info!(wave = self.waves.index(), mode = %mode, "Wave changed");
            // Ghosts tick their own countdowns later this frame, so arm them one tick long to stay in step.
            for ghost in self.ghosts.iter_mut().filter(|ghost| ghost.mode().is_roaming()) {
                ghost.force_mode(mode, countdown.padded());
                // Drops the old path; the facing a ghost ends the tick with comes from its new path.
                ghost.reverse_direction();
            }
        }

        if self.state.fright_active {
            self.state.fright_remaining.tick();
            if self.state.fright_remaining.expired() {
                debug!("Fright window over");
                self.state.fright_active = false;
            }
        }

        let partner = self.partner_tile();
        for ghost in self.ghosts.iter_mut() {
            ghost.update(&self.state, partner, &mut self.rng);
        }
    }

    /// The direct chaser's tile, if there is one.
    fn partner_tile(&self) -> Option<IVec2> {
        self.ghosts
            .iter()
            .find(|ghost| ghost.personality() == Personality::DirectChaser)
            .map(Ghost::tile)
    }

    /// Starts a fright window: every ghost that is neither dead nor in the house becomes frightened.
    pub fn trigger_fright_mode(&mut self) {
        let duration = fright_cap(self.state.level);
        info!(duration, "Fright mode triggered");
        self.state.fright_active = true;
        self.state.fright_remaining = Countdown::ticks(duration);
        for ghost in self.ghosts.iter_mut() {
            ghost.set_frightened(duration);
        }
    }

    /// Checks the player against each ghost in order; the first contact decides the outcome.
    pub fn check_collisions(&mut self, player: Vec2) -> CollisionOutcome {
        self.ghosts
            .iter_mut()
            .map(|ghost| ghost.collide_with_player(player))
            .find(|outcome| *outcome != CollisionOutcome::None)
            .unwrap_or_default()
    }

    /// Restarts the wave schedule, ends any fright window and sends every ghost home.
    pub fn reset(&mut self) {
        self.waves = WaveSchedule::default();
        self.state.fright_remaining = Countdown::default();
        self.state.fright_active = false;
        for ghost in self.ghosts.iter_mut() {
            ghost.reset();
        }
    }
}
