//! Session registry keyed by document identity.

use std::collections::HashMap;

use crate::host::Host;
use crate::session::{Session, SessionOptions};

/// Identifier of one document (buffer number, file id, ...).
pub type DocumentId = u64;

/// Owns one [`Session`] per open document.
///
/// Sessions are created lazily on first use and dropped when the document
/// closes; dropping a session stops its debounce worker.
pub struct Notebook<H: Host + 'static> {
    options: SessionOptions,
    sessions: HashMap<DocumentId, Session<H>>,
}

impl<H: Host + 'static> Notebook<H> {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            options,
            sessions: HashMap::new(),
        }
    }

    /// The session for `document`, created with `host()` on first access.
    pub fn session(&mut self, document: DocumentId, host: impl FnOnce() -> H) -> &Session<H> {
        self.sessions
            .entry(document)
            .or_insert_with(|| Session::attach(host(), self.options.clone()))
    }

    /// The session for `document`, if one exists already.
    pub fn get(&self, document: DocumentId) -> Option<&Session<H>> {
        self.sessions.get(&document)
    }

    /// Drop the session of a closed document.
    pub fn detach(&mut self, document: DocumentId) {
        self.sessions.remove(&document);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
