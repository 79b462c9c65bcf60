//! Audio cue seam.
//!
//! Scenes describe sounds as cues (an asset path plus playback options) and
//! hand them to an [`AudioSink`]. Playback itself is up to the sink.

/// Handle to a playing cue, returned by [`AudioSink::play`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SoundId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct SoundCue {
    pub source: String,
    /// `0.0..=1.0`
    pub volume: f32,
    pub looping: bool,
}

impl SoundCue {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), volume: 1.0, looping: false }
    }

    pub fn volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }
}

pub trait AudioSink {
    fn play(&mut self, cue: &SoundCue) -> SoundId;

    /// Stops a cue. Unknown or already stopped ids are ignored.
    fn stop(&mut self, id: SoundId);

    /// Number of cues currently playing.
    fn playing(&self) -> usize;
}

/// Sink that plays nothing and logs every cue at `info`.
#[derive(Debug, Default)]
pub struct LogAudioSink {
    next: u64,
    active: Vec<SoundId>,
}

impl AudioSink for LogAudioSink {
    fn play(&mut self, cue: &SoundCue) -> SoundId {
        let id = SoundId(self.next);
        self.next += 1;
        log::info!(
            "audio: play {:?} (volume {:.2}{})",
            cue.source,
            cue.volume,
            if cue.looping { ", looping" } else { "" }
        );
        // One-shot cues end immediately in a silent sink.
        if cue.looping {
            self.active.push(id);
        }
        id
    }

    fn stop(&mut self, id: SoundId) {
        if let Some(pos) = self.active.iter().position(|a| *a == id) {
            self.active.remove(pos);
            log::info!("audio: stop {id:?}");
        }
    }

    fn playing(&self) -> usize {
        self.active.len()
    }
}
