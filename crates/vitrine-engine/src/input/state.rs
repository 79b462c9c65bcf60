use std::collections::HashSet;

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::{InputEvent, MouseButton, MouseButtonState};

/// What the pointer looks like right now.
///
/// Button events from winit carry no position, so the last known pointer
/// position is kept here and stamped onto them.
#[derive(Debug, Default)]
pub struct InputState {
    pub focused: bool,
    /// Logical pixels; `None` while the pointer is outside the window.
    pub pointer_pos: Option<Vec2>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Folds `ev` into the state and queues it on `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(focused) => {
                self.focused = *focused;
                if !focused {
                    self.buttons_down.clear();
                }
            }
            InputEvent::PointerMoved { x, y } => self.pointer_pos = Some(Vec2::new(*x, *y)),
            InputEvent::PointerLeft => self.pointer_pos = None,
            InputEvent::PointerButton { button, state, x, y } => {
                self.pointer_pos = Some(Vec2::new(*x, *y));
                match state {
                    MouseButtonState::Pressed => self.buttons_down.insert(*button),
                    MouseButtonState::Released => self.buttons_down.remove(button),
                };
            }
            InputEvent::Wheel(_) => {}
        }
        frame.events.push(ev);
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseWheelDelta;

    fn left(state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton { button: MouseButton::Left, state, x: 5.0, y: 6.0 }
    }

    #[test]
    fn buttons_track_press_and_release() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, left(MouseButtonState::Pressed));
        assert!(state.button_down(MouseButton::Left));
        assert_eq!(state.pointer_pos, Some(Vec2::new(5.0, 6.0)));

        state.apply_event(&mut frame, left(MouseButtonState::Released));
        assert!(!state.button_down(MouseButton::Left));
        assert_eq!(frame.events.len(), 2);
    }

    #[test]
    fn losing_focus_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, left(MouseButtonState::Pressed));
        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.buttons_down.is_empty());
    }

    #[test]
    fn leaving_the_window_forgets_the_pointer() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 1.0, y: 2.0 });
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn every_event_is_queued_in_order() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let wheel = InputEvent::Wheel(MouseWheelDelta::Pixel { x: 0.0, y: 3.0 });
        state.apply_event(&mut frame, InputEvent::PointerMoved { x: 1.0, y: 2.0 });
        state.apply_event(&mut frame, wheel.clone());
        assert_eq!(frame.events.last(), Some(&wheel));

        frame.clear();
        assert!(frame.is_empty());
    }
}
