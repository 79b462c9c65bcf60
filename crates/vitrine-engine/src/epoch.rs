use std::fmt;

/// Activation generation.
///
/// The scene manager bumps the epoch on every successful transition. Listener
/// registrations, timers and asynchronous work are stamped with the epoch that
/// created them, so anything carrying an older stamp belongs to a scene that
/// is no longer active.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Epoch(u64);

impl Epoch {
    pub const ZERO: Epoch = Epoch(0);

    #[inline]
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The following generation.
    #[inline]
    pub const fn next(self) -> Epoch {
        Epoch(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
