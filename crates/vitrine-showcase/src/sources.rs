use std::collections::HashMap;
use std::path::PathBuf;
use std::thread;

use vitrine_ui::content::{ContentError, ContentReply, ContentSource};

/// Reads documents from disk on a worker thread per request.
///
/// Locations are resolved against `root`. A location with an embedded
/// fallback is answered from memory when the file can't be read.
pub struct FileSource {
    root: PathBuf,
    fallbacks: HashMap<String, &'static str>,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), fallbacks: HashMap::new() }
    }

    pub fn with_fallback(mut self, location: impl Into<String>, body: &'static str) -> Self {
        self.fallbacks.insert(location.into(), body);
        self
    }
}

impl ContentSource for FileSource {
    fn fetch(&mut self, location: &str, reply: ContentReply) {
        let path = self.root.join(location);
        let fallback = self.fallbacks.get(location).copied();
        let location = location.to_string();

        let spawned = thread::Builder::new()
            .name("vitrine-content".to_string())
            .spawn(move || {
                let result = match std::fs::read_to_string(&path) {
                    Ok(body) => Ok(body),
                    Err(err) => match fallback {
                        Some(body) => {
                            log::warn!("content: {} unreadable ({err}); using embedded copy", path.display());
                            Ok(body.to_string())
                        }
                        None => Err(ContentError::Transport { location, reason: err.to_string() }),
                    },
                };
                reply.send(result);
            });

        // The closure, and the reply inside it, is dropped on spawn failure,
        // which completes the request with `Dropped`.
        if let Err(err) = spawned {
            log::error!("content: failed to spawn worker: {err}");
        }
    }
}

/// Answers from documents compiled into the binary.
#[derive(Debug, Default)]
pub struct EmbeddedSource {
    documents: HashMap<String, &'static str>,
}

impl EmbeddedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, location: impl Into<String>, body: &'static str) -> Self {
        self.documents.insert(location.into(), body);
        self
    }
}

impl ContentSource for EmbeddedSource {
    fn fetch(&mut self, location: &str, reply: ContentReply) {
        let result = match self.documents.get(location) {
            Some(body) => Ok(body.to_string()),
            None => Err(ContentError::Transport {
                location: location.to_string(),
                reason: "no embedded document".to_string(),
            }),
        };
        reply.send(result);
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use vitrine_engine::epoch::Epoch;
    use vitrine_ui::content::{ContentQueue, ContentResult, ContentTicket};

    use super::*;

    fn wait(queue: &mut ContentQueue) -> Vec<(ContentTicket, ContentResult)> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let done = queue.drain();
            if !done.is_empty() || Instant::now() > deadline {
                return done;
            }
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn reads_files_relative_to_root() {
        let mut queue = ContentQueue::new(Box::new(FileSource::new(env!("CARGO_MANIFEST_DIR"))));
        let ticket = queue.request("assets/magicwords.json", Epoch::ZERO);

        let done = wait(&mut queue);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].0, ticket);
        assert!(done[0].1.as_ref().unwrap().contains("dialogue"));
    }

    #[test]
    fn missing_file_is_a_transport_error() {
        let mut queue = ContentQueue::new(Box::new(FileSource::new(env!("CARGO_MANIFEST_DIR"))));
        queue.request("assets/missing.json", Epoch::ZERO);

        let done = wait(&mut queue);
        assert!(matches!(&done[0].1, Err(ContentError::Transport { location, .. }) if location == "assets/missing.json"));
    }

    #[test]
    fn missing_file_uses_the_fallback() {
        let source = FileSource::new("/nonexistent").with_fallback("doc.json", "{}");
        let mut queue = ContentQueue::new(Box::new(source));
        queue.request("doc.json", Epoch::ZERO);

        let done = wait(&mut queue);
        assert_eq!(done[0].1, Ok("{}".to_string()));
    }

    #[test]
    fn embedded_documents_answer_immediately() {
        let mut queue = ContentQueue::new(Box::new(EmbeddedSource::new().with("a", "body")));
        queue.request("a", Epoch::ZERO);
        queue.request("b", Epoch::ZERO);

        let done = queue.drain();
        assert_eq!(done[0].1, Ok("body".to_string()));
        assert!(done[1].1.is_err());
    }
}
