use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton, MouseScrollDelta, WindowEvent};
use winit::window::Window;

use crate::coords::Vec2;
use crate::input::{InputEvent, InputState, MouseButton, MouseButtonState, MouseWheelDelta};

/// Maps the window events the stage cares about; everything else is `None`.
pub(crate) fn translate_window_event(
    window: &Window,
    state: &InputState,
    event: &WindowEvent,
) -> Option<InputEvent> {
    let scale = window.scale_factor();
    let ev = match event {
        WindowEvent::Focused(focused) => InputEvent::Focused(*focused),
        WindowEvent::CursorLeft { .. } => InputEvent::PointerLeft,
        WindowEvent::CursorMoved { position, .. } => {
            let p = logical(*position, scale);
            InputEvent::PointerMoved { x: p.x, y: p.y }
        }
        WindowEvent::MouseInput { state: pressed, button, .. } => {
            // Button events carry no position in winit 0.30.
            let p = state.pointer_pos.unwrap_or_default();
            InputEvent::PointerButton {
                button: button_of(*button),
                state: if *pressed == ElementState::Pressed {
                    MouseButtonState::Pressed
                } else {
                    MouseButtonState::Released
                },
                x: p.x,
                y: p.y,
            }
        }
        WindowEvent::MouseWheel { delta: MouseScrollDelta::LineDelta(x, y), .. } => {
            InputEvent::Wheel(MouseWheelDelta::Line { x: *x, y: *y })
        }
        WindowEvent::MouseWheel { delta: MouseScrollDelta::PixelDelta(px), .. } => {
            let p = logical(*px, scale);
            InputEvent::Wheel(MouseWheelDelta::Pixel { x: p.x, y: p.y })
        }
        _ => return None,
    };
    Some(ev)
}

fn logical(pos: PhysicalPosition<f64>, scale: f64) -> Vec2 {
    let l = pos.to_logical::<f64>(scale);
    Vec2::new(l.x as f32, l.y as f32)
}

fn button_of(b: WinitButton) -> MouseButton {
    match b {
        WinitButton::Left => MouseButton::Left,
        WinitButton::Right => MouseButton::Right,
        WinitButton::Middle => MouseButton::Middle,
        WinitButton::Back => MouseButton::Other(3),
        WinitButton::Forward => MouseButton::Other(4),
        WinitButton::Other(n) => MouseButton::Other(n),
    }
}
