//! Pan gestures from mouse drags.
//!
//! Each drag event reports the cumulative translation since the button went
//! down; samples are not integrated over time.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Terminal cells are roughly twice as tall as they are wide.
const ROW_ASPECT: f32 = 2.0;

/// Cumulative translation since the pan started
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translation {
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Default)]
pub struct PanTracker {
    origin: Option<(u16, u16)>,
}

impl PanTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Feed a mouse event; drags during an active pan yield a translation
    pub fn handle(&mut self, event: MouseEvent) -> Option<Translation> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((event.column, event.row));
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (x0, y0) = self.origin?;
                Some(Translation {
                    dx: f32::from(event.column) - f32::from(x0),
                    dy: (f32::from(event.row) - f32::from(y0)) * ROW_ASPECT,
                })
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.origin = None;
                None
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use crossterm::event::KeyModifiers;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_drag_without_press_is_ignored() {
        let mut pan = PanTracker::new();
        assert!(pan.handle(mouse(MouseEventKind::Drag(MouseButton::Left), 5, 5)).is_none());
    }

    #[test]
    fn test_translation_is_cumulative() {
        let mut pan = PanTracker::new();
        pan.handle(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        assert!(pan.is_active());

        let first = pan
            .handle(mouse(MouseEventKind::Drag(MouseButton::Left), 12, 10))
            .unwrap();
        assert_eq!(first, Translation { dx: 2.0, dy: 0.0 });

        let second = pan
            .handle(mouse(MouseEventKind::Drag(MouseButton::Left), 13, 8))
            .unwrap();
        assert_eq!(second, Translation { dx: 3.0, dy: -4.0 });
        assert_eq!(Direction::from_translation(second.dx, second.dy), Direction::Up);
    }

    #[test]
    fn test_release_ends_pan() {
        let mut pan = PanTracker::new();
        pan.handle(mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));
        pan.handle(mouse(MouseEventKind::Up(MouseButton::Left), 4, 1));

        assert!(!pan.is_active());
        assert!(pan.handle(mouse(MouseEventKind::Drag(MouseButton::Left), 6, 1)).is_none());
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut pan = PanTracker::new();
        pan.handle(mouse(MouseEventKind::Down(MouseButton::Right), 1, 1));
        assert!(!pan.is_active());
    }
}
