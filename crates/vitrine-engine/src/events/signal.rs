use crate::coords::{Vec2, Viewport};
use crate::input::{InputEvent, MouseButton, MouseButtonState, MouseWheelDelta};

/// Pixels scrolled per wheel "line" for line-based wheel devices.
pub const WHEEL_LINE_PX: f32 = 40.0;

/// Host-level signal fed into event routing once per occurrence.
///
/// Positions are logical pixels in stage space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum HostSignal {
    Resized(Viewport),
    PointerMoved(Vec2),
    PointerDown(Vec2),
    PointerUp(Vec2),
    /// Pointer left the surface.
    PointerLeft,
    /// `delta_y > 0` scrolls content down (towards later content).
    Wheel { position: Vec2, delta_y: f32 },
}

impl HostSignal {
    /// Translates a platform-agnostic input event.
    ///
    /// Only the primary button produces press/release signals. `pointer` is the
    /// last known pointer position, used to locate wheel events.
    pub fn from_input(ev: &InputEvent, pointer: Option<Vec2>) -> Option<HostSignal> {
        match ev {
            InputEvent::PointerMoved { x, y } => Some(HostSignal::PointerMoved(Vec2::new(*x, *y))),
            InputEvent::PointerButton { button: MouseButton::Left, state, x, y } => {
                let p = Vec2::new(*x, *y);
                Some(match state {
                    MouseButtonState::Pressed => HostSignal::PointerDown(p),
                    MouseButtonState::Released => HostSignal::PointerUp(p),
                })
            }
            InputEvent::PointerButton { .. } => None,
            InputEvent::PointerLeft => Some(HostSignal::PointerLeft),
            InputEvent::Wheel(delta) => {
                let delta_y = match delta {
                    MouseWheelDelta::Line { y, .. } => -y * WHEEL_LINE_PX,
                    MouseWheelDelta::Pixel { y, .. } => -y,
                };
                Some(HostSignal::Wheel { position: pointer.unwrap_or_default(), delta_y })
            }
            InputEvent::Focused(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_button_maps_to_down_and_up() {
        let down = InputEvent::PointerButton {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            x: 3.0,
            y: 4.0,
        };
        assert_eq!(HostSignal::from_input(&down, None), Some(HostSignal::PointerDown(Vec2::new(3.0, 4.0))));

        let up = InputEvent::PointerButton {
            button: MouseButton::Left,
            state: MouseButtonState::Released,
            x: 3.0,
            y: 4.0,
        };
        assert_eq!(HostSignal::from_input(&up, None), Some(HostSignal::PointerUp(Vec2::new(3.0, 4.0))));
    }

    #[test]
    fn secondary_buttons_are_ignored() {
        let ev = InputEvent::PointerButton {
            button: MouseButton::Right,
            state: MouseButtonState::Pressed,
            x: 0.0,
            y: 0.0,
        };
        assert_eq!(HostSignal::from_input(&ev, None), None);
    }

    #[test]
    fn wheel_lines_scroll_down_when_rolled_towards_user() {
        let ev = InputEvent::Wheel(MouseWheelDelta::Line { x: 0.0, y: -1.0 });
        let sig = HostSignal::from_input(&ev, Some(Vec2::new(10.0, 10.0)));
        assert_eq!(
            sig,
            Some(HostSignal::Wheel { position: Vec2::new(10.0, 10.0), delta_y: WHEEL_LINE_PX })
        );
    }

    #[test]
    fn wheel_pixels_pass_through_inverted() {
        let ev = InputEvent::Wheel(MouseWheelDelta::Pixel { x: 0.0, y: 12.5 });
        match HostSignal::from_input(&ev, None) {
            Some(HostSignal::Wheel { delta_y, .. }) => assert_eq!(delta_y, -12.5),
            other => panic!("unexpected {other:?}"),
        }
    }
}
