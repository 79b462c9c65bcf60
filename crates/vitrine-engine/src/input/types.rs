/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Mouse wheel delta as reported by the platform.
///
/// `Line` is "scroll lines" style input; `Pixel` is high precision (touchpads).
/// Positive `y` means the wheel rolled away from the user.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Coordinates are logical pixels relative to the window's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerMoved { x: f32, y: f32 },

    /// Button transitions carry the tracked pointer position; winit does not
    /// report one with the button event.
    PointerButton {
        button: MouseButton,
        state: MouseButtonState,
        x: f32,
        y: f32,
    },

    Wheel(MouseWheelDelta),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),
}
