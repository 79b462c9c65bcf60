//! Asynchronous content requests.
//!
//! Scenes ask for a document by location and get a [`ContentTicket`] back.
//! A [`ContentSource`] completes the request, possibly from a worker thread,
//! through a [`ContentReply`]; completions are drained once per frame on the
//! event-loop thread. Every ticket carries the epoch it was issued under, so
//! the scene manager can drop completions that outlived their scene.

use std::sync::mpsc::{self, Receiver, Sender};

use thiserror::Error;
use vitrine_engine::epoch::Epoch;

/// Identifies one content request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ContentTicket {
    id: u64,
    epoch: Epoch,
}

impl ContentTicket {
    pub fn id(self) -> u64 {
        self.id
    }

    /// Epoch that was current when the request was issued.
    pub fn epoch(self) -> Epoch {
        self.epoch
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ContentError {
    #[error("failed to read {location}: {reason}")]
    Transport { location: String, reason: String },
    #[error("malformed content: {0}")]
    Malformed(String),
    #[error("content source dropped the request")]
    Dropped,
}

pub type ContentResult = Result<String, ContentError>;

/// One-shot completion handle passed to a [`ContentSource`].
///
/// Dropping it without calling [`ContentReply::send`] completes the request
/// with [`ContentError::Dropped`], so a scene never waits forever.
pub struct ContentReply {
    ticket: ContentTicket,
    tx: Option<Sender<(ContentTicket, ContentResult)>>,
}

impl ContentReply {
    pub fn ticket(&self) -> ContentTicket {
        self.ticket
    }

    pub fn send(mut self, result: ContentResult) {
        if let Some(tx) = self.tx.take() {
            // The queue may be gone during shutdown; nothing left to notify.
            let _ = tx.send((self.ticket, result));
        }
    }
}

impl Drop for ContentReply {
    fn drop(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send((self.ticket, Err(ContentError::Dropped)));
        }
    }
}

/// Where content comes from (a file, an embedded document, the network).
///
/// `fetch` must not block the caller; long work belongs on another thread,
/// which is why the reply handle is `Send`.
pub trait ContentSource {
    fn fetch(&mut self, location: &str, reply: ContentReply);
}

/// Ticket allocation plus the completion channel.
pub struct ContentQueue {
    source: Box<dyn ContentSource>,
    tx: Sender<(ContentTicket, ContentResult)>,
    rx: Receiver<(ContentTicket, ContentResult)>,
    next_id: u64,
    in_flight: usize,
}

impl ContentQueue {
    pub fn new(source: Box<dyn ContentSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { source, tx, rx, next_id: 0, in_flight: 0 }
    }

    /// Issues a request stamped with `epoch`.
    pub fn request(&mut self, location: &str, epoch: Epoch) -> ContentTicket {
        let ticket = ContentTicket { id: self.next_id, epoch };
        self.next_id += 1;
        self.in_flight += 1;

        log::debug!("content: request {} for {location:?} at epoch {epoch}", ticket.id);
        let reply = ContentReply { ticket, tx: Some(self.tx.clone()) };
        self.source.fetch(location, reply);
        ticket
    }

    /// Requests issued and not yet drained.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Takes every completion that has arrived so far, in arrival order.
    pub fn drain(&mut self) -> Vec<(ContentTicket, ContentResult)> {
        let done: Vec<_> = self.rx.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(done.len());
        done
    }
}

/// Source that answers nothing; every request completes with `Dropped`.
#[derive(Debug, Default)]
pub struct NoContent;

impl ContentSource for NoContent {
    fn fetch(&mut self, location: &str, reply: ContentReply) {
        log::warn!("content: no source configured for {location:?}");
        drop(reply);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Holds replies until the test completes them.
    #[derive(Clone, Default)]
    pub(crate) struct ManualSource {
        pub pending: Rc<RefCell<Vec<(String, ContentReply)>>>,
    }

    impl ContentSource for ManualSource {
        fn fetch(&mut self, location: &str, reply: ContentReply) {
            self.pending.borrow_mut().push((location.to_string(), reply));
        }
    }

    impl ManualSource {
        pub(crate) fn complete_all(&self, body: &str) {
            for (_, reply) in self.pending.borrow_mut().drain(..) {
                reply.send(Ok(body.to_string()));
            }
        }
    }
}
