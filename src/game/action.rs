use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Map a pan translation to a direction.
    ///
    /// The axis with the larger magnitude wins and its sign picks the side.
    /// Ties (including a zero translation) resolve to the vertical axis, so a
    /// motionless pan reads as `Up`.
    pub fn from_translation(dx: f32, dy: f32) -> Self {
        if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }
}

/// Something the player asked the session to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Steer in a specific direction
    Turn(Direction),
    /// Steer from a pan gesture's cumulative translation
    Swipe { dx: f32, dy: f32 },
    /// Flip between running and paused
    TogglePause,
    /// Start over from the initial layout
    Reload,
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Turn(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Right.is_opposite(Direction::Right));
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }

    #[test]
    fn test_default_is_right() {
        assert_eq!(Direction::default(), Direction::Right);
    }

    #[test]
    fn test_horizontal_translation() {
        assert_eq!(Direction::from_translation(12.0, 3.0), Direction::Right);
        assert_eq!(Direction::from_translation(-12.0, 3.0), Direction::Left);
        assert_eq!(Direction::from_translation(-12.0, -11.5), Direction::Left);
    }

    #[test]
    fn test_vertical_translation() {
        assert_eq!(Direction::from_translation(1.0, 9.0), Direction::Down);
        assert_eq!(Direction::from_translation(1.0, -9.0), Direction::Up);
    }

    #[test]
    fn test_ties_resolve_vertically() {
        assert_eq!(Direction::from_translation(4.0, 4.0), Direction::Down);
        assert_eq!(Direction::from_translation(4.0, -4.0), Direction::Up);
        assert_eq!(Direction::from_translation(0.0, 0.0), Direction::Up);
    }
}
