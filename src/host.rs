//! The editor capability surface.
//!
//! Everything the session layer needs from a host editor is behind this
//! trait: buffer snapshots, cursor position, annotations, a floating popup
//! surface, clipboard and a status channel. Implementations are thin I/O
//! wrappers; all logic stays on the session side.

use thiserror::Error;

/// Handle of a floating popup surface.
pub type PopupId = u64;

/// A failed host call. Host errors are swallowed at the session boundary;
/// they exist so implementations can report them without panicking.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HostError(pub String);

/// Capabilities a host editor provides to a document session.
///
/// The debounce worker invokes sessions from its own thread, so hosts must
/// be [`Send`]. A host whose editor API is single-threaded marshals inside
/// these methods (the session layer never assumes a particular thread).
pub trait Host: Send {
    /// Full buffer snapshot as lines.
    fn lines(&self) -> Vec<String>;

    /// Zero-based (line, column) of the cursor.
    fn cursor(&self) -> (usize, usize);

    /// Remove every annotation this session has placed.
    fn clear_annotations(&mut self);

    /// Attach annotation text to a line.
    fn annotate(&mut self, line: usize, text: &str);

    /// Open a floating surface near the cursor showing `lines`.
    fn show_popup(&mut self, lines: &[String]) -> Result<PopupId, HostError>;

    /// Close a previously opened popup. Closing one that is already gone
    /// is allowed to fail; callers ignore the error.
    fn close_popup(&mut self, popup: PopupId) -> Result<(), HostError>;

    /// Insert lines into the buffer before line index `at`.
    fn insert_lines(&mut self, at: usize, lines: Vec<String>);

    /// Write text to the system clipboard.
    fn set_clipboard(&mut self, text: &str);

    /// Write a message to the editor's output/status channel.
    fn status(&mut self, message: &str);
}
