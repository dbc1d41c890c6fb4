//! Authoritative per-player record.
//!
//! Command-derived fields (`pending_position`, `facing`, `striking`, `ready`)
//! change only through the `apply_*` methods. Everything else is written by
//! the tick phases in `game`.

use shared::{Direction, Facing, PlayerView, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    /// Join-order number, starting at 1
    pub number: u32,
    pub position: Position,
    /// Target of the latest move command, equal to `position` when idle
    pub pending_position: Position,
    pub facing: Facing,
    /// Strike requested for the upcoming tick
    pub striking: bool,
    /// Struck by another player during the current tick
    pub hit: bool,
    /// Threw a strike during the last completed tick, display hint only
    pub animating: bool,
    pub score: u32,
    /// Join handshake completed; only ready players are broadcast
    pub ready: bool,
}

impl PlayerState {
    pub fn new(number: u32, spawn: Position) -> Self {
        Self {
            number,
            position: spawn,
            pending_position: spawn,
            facing: Facing::Right,
            striking: false,
            hit: false,
            animating: false,
            score: 0,
            ready: false,
        }
    }

    /// Replaces any earlier pending move with one step from the current position.
    pub fn apply_move(&mut self, direction: Direction, step: i32) {
        let (dx, dy) = direction.delta(step);
        self.pending_position = self.position.offset(dx, dy);
        if let Some(facing) = direction.facing() {
            self.facing = facing;
        }
    }

    pub fn apply_strike(&mut self) {
        self.striking = true;
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    pub fn wants_to_move(&self) -> bool {
        self.pending_position != self.position
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            number: self.number,
            position: self.position,
            facing: self.facing,
            score: self.score,
            animating: self.animating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = PlayerState::new(3, Position::new(100, 200));
        assert_eq!(player.number, 3);
        assert_eq!(player.position, Position::new(100, 200));
        assert_eq!(player.pending_position, player.position);
        assert_eq!(player.facing, Facing::Right);
        assert_eq!(player.score, 0);
        assert!(!player.striking && !player.hit && !player.animating && !player.ready);
        assert!(!player.wants_to_move());
    }

    #[test]
    fn test_move_sets_pending_relative_to_position() {
        let mut player = PlayerState::new(1, Position::new(100, 100));

        player.apply_move(Direction::Up, 5);
        assert_eq!(player.pending_position, Position::new(100, 95));
        player.apply_move(Direction::Down, 5);
        assert_eq!(player.pending_position, Position::new(100, 105));
        player.apply_move(Direction::Right, 5);
        assert_eq!(player.pending_position, Position::new(105, 100));
        player.apply_move(Direction::Left, 5);
        assert_eq!(player.pending_position, Position::new(95, 100));

        assert_eq!(player.position, Position::new(100, 100));
        assert!(player.wants_to_move());
    }

    #[test]
    fn test_repeated_move_is_not_cumulative() {
        let mut once = PlayerState::new(1, Position::new(100, 100));
        once.apply_move(Direction::Right, 5);

        let mut twice = PlayerState::new(1, Position::new(100, 100));
        twice.apply_move(Direction::Right, 5);
        twice.apply_move(Direction::Right, 5);

        assert_eq!(once.pending_position, twice.pending_position);
    }

    #[test]
    fn test_only_horizontal_moves_turn() {
        let mut player = PlayerState::new(1, Position::new(100, 100));

        player.apply_move(Direction::Left, 5);
        assert_eq!(player.facing, Facing::Left);
        player.apply_move(Direction::Up, 5);
        assert_eq!(player.facing, Facing::Left);
        player.apply_move(Direction::Down, 5);
        assert_eq!(player.facing, Facing::Left);
        player.apply_move(Direction::Right, 5);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_commands_leave_session_fields_alone() {
        let mut player = PlayerState::new(1, Position::new(100, 100));
        player.score = 4;
        player.hit = true;
        player.animating = true;

        player.apply_move(Direction::Left, 5);
        player.apply_strike();
        player.mark_ready();

        assert_eq!(player.position, Position::new(100, 100));
        assert_eq!(player.score, 4);
        assert!(player.hit);
        assert!(player.animating);
        assert!(player.striking);
        assert!(player.ready);
    }

    #[test]
    fn test_view_reflects_state() {
        let mut player = PlayerState::new(2, Position::new(10, 20));
        player.score = 7;
        player.animating = true;
        player.facing = Facing::Left;

        let view = player.view();
        assert_eq!(view.number, 2);
        assert_eq!(view.position, Position::new(10, 20));
        assert_eq!(view.facing, Facing::Left);
        assert_eq!(view.score, 7);
        assert!(view.animating);
    }
}
