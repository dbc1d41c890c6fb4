//! Authoritative arena simulation.
//!
//! `GameState` owns every registered player in join order. One call to
//! `step` advances the world by a tick: movement, then strikes, then scoring,
//! then the snapshot of ready players. Nothing here touches the network.

use crate::config::ServerConfig;
use crate::player::PlayerState;
use log::{debug, info};
use shared::{Arena, Direction, PlayerView, Position};

#[derive(Debug, Clone)]
pub struct GameState {
    pub tick: u64,
    pub arena: Arena,
    step: i32,
    strike_reach: i32,
    /// Registration order, which is also snapshot order
    players: Vec<PlayerState>,
}

impl GameState {
    pub fn new(arena: Arena, step: i32, strike_reach: i32) -> Self {
        Self {
            tick: 0,
            arena,
            step,
            strike_reach,
            players: Vec::new(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.arena, config.step, config.strike_reach)
    }

    pub fn add_player(&mut self, number: u32, spawn: Position) {
        info!("Added player {} at ({}, {})", number, spawn.x, spawn.y);
        self.players.push(PlayerState::new(number, spawn));
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, number: u32) -> Option<&PlayerState> {
        self.index_of(number).map(|i| &self.players[i])
    }

    pub fn player_mut(&mut self, number: u32) -> Option<&mut PlayerState> {
        self.index_of(number).map(move |i| &mut self.players[i])
    }

    /// Numbers are handed out sequentially, so the slot is normally
    /// `number - 1`; fall back to a scan if registration skipped one.
    fn index_of(&self, number: u32) -> Option<usize> {
        let guess = (number as usize).checked_sub(1)?;
        match self.players.get(guess) {
            Some(p) if p.number == number => Some(guess),
            _ => self.players.iter().position(|p| p.number == number),
        }
    }

    pub fn apply_move(&mut self, number: u32, direction: Direction) -> bool {
        let step = self.step;
        match self.player_mut(number) {
            Some(player) => {
                player.apply_move(direction, step);
                true
            }
            None => false,
        }
    }

    pub fn apply_strike(&mut self, number: u32) -> bool {
        match self.player_mut(number) {
            Some(player) => {
                player.apply_strike();
                true
            }
            None => false,
        }
    }

    pub fn mark_ready(&mut self, number: u32) -> bool {
        match self.player_mut(number) {
            Some(player) => {
                player.mark_ready();
                true
            }
            None => false,
        }
    }

    /// Commits each pending move that stays in bounds and clears every other
    /// player. Rejected moves stay pending and are retried next tick.
    pub fn resolve_movement(&mut self) {
        for i in 0..self.players.len() {
            let target = self.players[i].pending_position;
            if target == self.players[i].position || !self.arena.in_bounds(target) {
                continue;
            }

            let blocked = self
                .players
                .iter()
                .enumerate()
                .any(|(j, other)| {
                    j != i && self.arena.rect_overlap(target, other.position, Position::default())
                });

            if !blocked {
                self.players[i].position = target;
            }
        }
    }

    /// Marks every player caught by a strike and resets the strikers.
    pub fn resolve_strikes(&mut self) {
        let mut struck = Vec::new();

        for (i, striker) in self.players.iter().enumerate() {
            if !striker.striking {
                continue;
            }

            let reach = striker.facing.strike_offset(self.strike_reach);
            for (j, other) in self.players.iter().enumerate() {
                if j != i && self.arena.rect_overlap(striker.position, other.position, reach) {
                    debug!("Player {} struck player {}", striker.number, other.number);
                    struck.push(j);
                }
            }
        }

        for player in &mut self.players {
            player.animating = player.striking;
            player.striking = false;
        }

        for j in struck {
            self.players[j].hit = true;
        }
    }

    /// Converts this tick's hits into points, one per struck player.
    pub fn apply_scores(&mut self) {
        for player in &mut self.players {
            if player.hit {
                player.score += 1;
                player.hit = false;
            }
        }
    }

    /// Views of ready players in registration order, `None` when nobody is ready.
    pub fn snapshot(&self) -> Option<Vec<PlayerView>> {
        let views: Vec<PlayerView> = self
            .players
            .iter()
            .filter(|p| p.ready)
            .map(PlayerState::view)
            .collect();

        if views.is_empty() {
            None
        } else {
            Some(views)
        }
    }

    /// Runs one full tick and returns the snapshot to broadcast, if any.
    pub fn step(&mut self) -> Option<Vec<PlayerView>> {
        self.resolve_movement();
        self.resolve_strikes();
        self.apply_scores();
        self.tick += 1;
        self.snapshot()
    }
}
