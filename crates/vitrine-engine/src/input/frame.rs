use super::types::InputEvent;

/// Input that arrived since the previous frame, oldest first.
///
/// The runtime fills it between frames and empties it after `on_frame`.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
