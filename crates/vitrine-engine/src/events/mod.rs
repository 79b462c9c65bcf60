//! Host signal routing.
//!
//! Turns raw host signals (pointer, wheel, resize) into per-listener
//! deliveries. Subscriptions are explicit handles stamped with an
//! [`Epoch`](crate::epoch::Epoch) so that a scene's listeners can be
//! audited and swept after it is torn down.

mod bus;
mod signal;

pub use bus::{Delivery, Event, EventBus, ListenerId, SignalKind};
pub use signal::{HostSignal, WHEEL_LINE_PX};
