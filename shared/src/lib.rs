//! Types and rules shared by the arena server and its clients.
//!
//! Holds the arena geometry (boundary containment and sprite overlap), the
//! wire protocol exchanged over each player connection, and the frame codec
//! that turns a reliable byte stream into discrete packets.

pub mod framing;

use serde::{Deserialize, Serialize};

pub const ARENA_WIDTH: i32 = 1024;
pub const ARENA_HEIGHT: i32 = 768;
pub const SPRITE_WIDTH: i32 = 50;
pub const SPRITE_HEIGHT: i32 = 110;
/// Distance covered by a single move command.
pub const STEP: i32 = 5;
/// Horizontal reach added to the sprite when striking.
pub const STRIKE_REACH: i32 = 5;
pub const TICK_RATE: u32 = 20;

/// Integer arena coordinates of a sprite's top-left corner.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Direction carried by a move command.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Displacement produced by one step in this direction.
    pub fn delta(&self, step: i32) -> (i32, i32) {
        match self {
            Direction::Up => (0, -step),
            Direction::Down => (0, step),
            Direction::Left => (-step, 0),
            Direction::Right => (step, 0),
        }
    }

    /// Horizontal moves turn the player, vertical ones keep the current facing.
    pub fn facing(&self) -> Option<Facing> {
        match self {
            Direction::Left => Some(Facing::Left),
            Direction::Right => Some(Facing::Right),
            Direction::Up | Direction::Down => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Offset applied to the striker's sprite when testing a strike.
    pub fn strike_offset(&self, reach: i32) -> Position {
        match self {
            Facing::Left => Position::new(-reach, 0),
            Facing::Right => Position::new(reach, 0),
        }
    }
}

/// Extents of the playing field and of every player sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
    pub sprite_width: i32,
    pub sprite_height: i32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            sprite_width: SPRITE_WIDTH,
            sprite_height: SPRITE_HEIGHT,
        }
    }
}

impl Arena {
    /// True when the sprite anchored at `p` lies strictly inside the arena.
    ///
    /// All four sides are exclusive: a sprite touching an edge is out.
    pub fn in_bounds(&self, p: Position) -> bool {
        p.x > 0
            && p.y > 0
            && p.x + self.sprite_width < self.width
            && p.y + self.sprite_height < self.height
    }

    /// True when the sprite at `a` shifted by `offset` overlaps the sprite at `b`.
    ///
    /// Open-interval test: sprites sharing only an edge do not overlap.
    pub fn rect_overlap(&self, a: Position, b: Position, offset: Position) -> bool {
        let ax = a.x + offset.x;
        let ay = a.y + offset.y;

        ax < b.x + self.sprite_width
            && ax + self.sprite_width > b.x
            && ay < b.y + self.sprite_height
            && ay + self.sprite_height > b.y
    }

    /// Inclusive range of x coordinates satisfying `in_bounds`.
    pub fn legal_x(&self) -> (i32, i32) {
        (1, self.width - self.sprite_width - 1)
    }

    /// Inclusive range of y coordinates satisfying `in_bounds`.
    pub fn legal_y(&self) -> (i32, i32) {
        (1, self.height - self.sprite_height - 1)
    }

    /// Moves `p` to the nearest position that passes `in_bounds`.
    pub fn clamp(&self, p: Position) -> Position {
        let (min_x, max_x) = self.legal_x();
        let (min_y, max_y) = self.legal_y();
        Position {
            x: p.x.clamp(min_x, max_x.max(min_x)),
            y: p.y.clamp(min_y, max_y.max(min_y)),
        }
    }
}

/// Per-player entry of a snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub number: u32,
    pub position: Position,
    pub facing: Facing,
    pub score: u32,
    pub animating: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub enum Packet {
    // Client -> server
    Join,
    Move { direction: Direction },
    Strike,

    // Server -> client
    Ready { player_number: u32 },
    Snapshot { players: Vec<PlayerView> },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Position {
        Position::new(0, 0)
    }

    #[test]
    fn test_in_bounds_interior() {
        let arena = Arena::default();
        assert!(arena.in_bounds(Position::new(1, 1)));
        assert!(arena.in_bounds(Position::new(500, 300)));
        assert!(arena.in_bounds(Position::new(
            ARENA_WIDTH - SPRITE_WIDTH - 1,
            ARENA_HEIGHT - SPRITE_HEIGHT - 1
        )));
    }

    #[test]
    fn test_in_bounds_edges_are_exclusive() {
        let arena = Arena::default();
        assert!(!arena.in_bounds(Position::new(0, 100)));
        assert!(!arena.in_bounds(Position::new(100, 0)));
        assert!(!arena.in_bounds(Position::new(ARENA_WIDTH - SPRITE_WIDTH, 100)));
        assert!(!arena.in_bounds(Position::new(100, ARENA_HEIGHT - SPRITE_HEIGHT)));
        assert!(!arena.in_bounds(Position::new(-5, 100)));
    }

    #[test]
    fn test_overlap_identical_positions() {
        let arena = Arena::default();
        let p = Position::new(200, 200);
        assert!(arena.rect_overlap(p, p, origin()));
    }

    #[test]
    fn test_overlap_exact_touch_is_not_collision() {
        let arena = Arena::default();
        let a = Position::new(100, 100);
        assert!(!arena.rect_overlap(a, Position::new(100 + SPRITE_WIDTH, 100), origin()));
        assert!(!arena.rect_overlap(a, Position::new(100, 100 + SPRITE_HEIGHT), origin()));
        assert!(!arena.rect_overlap(a, Position::new(100 - SPRITE_WIDTH, 100), origin()));
        assert!(arena.rect_overlap(a, Position::new(100 + SPRITE_WIDTH - 1, 100), origin()));
    }

    #[test]
    fn test_overlap_far_apart() {
        let arena = Arena::default();
        let a = Position::new(100, 100);
        assert!(!arena.rect_overlap(a, Position::new(400, 100), origin()));
        assert!(!arena.rect_overlap(a, Position::new(100, 400), origin()));
    }

    #[test]
    fn test_overlap_offset_shifts_first_rect_only() {
        let arena = Arena::default();
        let striker = Position::new(100, 100);
        let reach = Facing::Right.strike_offset(STRIKE_REACH);

        assert!(!arena.rect_overlap(striker, Position::new(155, 100), reach));
        assert!(arena.rect_overlap(striker, Position::new(154, 100), reach));

        // Same pair with roles swapped: offset pushes away from the target.
        assert!(!arena.rect_overlap(Position::new(154, 100), striker, reach));
    }

    #[test]
    fn test_clamp_produces_legal_position() {
        let arena = Arena::default();
        for p in [
            Position::new(0, 0),
            Position::new(ARENA_WIDTH, ARENA_HEIGHT),
            Position::new(-40, 900),
            Position::new(1023, 1),
        ] {
            assert!(arena.in_bounds(arena.clamp(p)), "{:?} clamped out of bounds", p);
        }
        assert_eq!(arena.clamp(Position::new(300, 200)), Position::new(300, 200));
    }

    #[test]
    fn test_direction_delta_and_facing() {
        assert_eq!(Direction::Up.delta(STEP), (0, -5));
        assert_eq!(Direction::Down.delta(STEP), (0, 5));
        assert_eq!(Direction::Left.delta(STEP), (-5, 0));
        assert_eq!(Direction::Right.delta(STEP), (5, 0));

        assert_eq!(Direction::Left.facing(), Some(Facing::Left));
        assert_eq!(Direction::Right.facing(), Some(Facing::Right));
        assert_eq!(Direction::Up.facing(), None);
        assert_eq!(Direction::Down.facing(), None);
    }

    #[test]
    fn test_facing_defaults_right() {
        assert_eq!(Facing::default(), Facing::Right);
        assert_eq!(Facing::Left.strike_offset(5), Position::new(-5, 0));
    }

    #[test]
    fn test_packet_serialization_snapshot() {
        let packet = Packet::Snapshot {
            players: vec![
                PlayerView {
                    number: 1,
                    position: Position::new(10, 20),
                    facing: Facing::Left,
                    score: 3,
                    animating: true,
                },
                PlayerView {
                    number: 2,
                    position: Position::new(300, 400),
                    facing: Facing::Right,
                    score: 0,
                    animating: false,
                },
            ],
        };

        let serialized = bincode::serialize(&packet).unwrap();
        let deserialized: Packet = bincode::deserialize(&serialized).unwrap();
        assert_eq!(deserialized, packet);
    }
}
