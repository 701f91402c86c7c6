//! Pure collision and placement helpers used by the tick.

use rand::Rng;

use super::state::{Bounds, Position};

/// True when both axis distances between `head` and `food` are below `threshold`.
///
/// This is a box test, so eating happens at coarse proximity rather than on
/// exact overlap.
pub fn is_near_food(head: Position, food: Position, threshold: i32) -> bool {
    (head.x - food.x).abs() < threshold && (head.y - food.y).abs() < threshold
}

/// True when `head` lies outside the inclusive `bounds`.
pub fn is_out_of_bounds(head: Position, bounds: &Bounds) -> bool {
    head.x < bounds.x_min || head.x > bounds.x_max || head.y < bounds.y_min || head.y > bounds.y_max
}

/// Uniform cell in `[0, x_max) x [0, y_max)`. Snake cells are not excluded.
pub fn random_food_position<R: Rng + ?Sized>(rng: &mut R, x_max: i32, y_max: i32) -> Position {
    Position::new(sample_axis(rng, x_max), sample_axis(rng, y_max))
}

fn sample_axis<R: Rng + ?Sized>(rng: &mut R, max: i32) -> i32 {
    if max <= 0 { 0 } else { rng.gen_range(0..max) }
}
