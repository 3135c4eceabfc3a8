//! Marginalia - live evaluation annotations for editable documents
//!
//! # Overview
//!
//! Marginalia watches an editable document, incrementally parses and
//! executes its top-level statements, and annotates marked lines with the
//! resulting values. Editing anywhere re-evaluates only the suffix of the
//! program the edit invalidated; everything above keeps its cached result
//! and its side effects.
//!
//! The moving parts:
//!
//! - [`debounce::Debouncer`] collapses bursts of edit events into single
//!   evaluation passes, with at most one pass in flight per document.
//! - `marginalia-core` re-parses snapshots tolerantly (invalid lines are
//!   blanked, never fatal) and evaluates statements against a persistent
//!   per-document environment with per-statement memoization.
//! - [`session::Session`] ties both to a host editor through the
//!   [`host::Host`] capability trait: annotations, popup, clipboard,
//!   injection.
//!
//! # Quick Start
//!
//! ```ignore
//! use marginalia::{Session, SessionOptions};
//!
//! // EditorHost implements marginalia::Host for your editor.
//! let session = Session::attach(EditorHost::new(buffer), SessionOptions::default());
//! session.enable();
//!
//! // Wire editor events:
//! //   text changed  -> session.on_text_changed()
//! //   cursor moved  -> session.on_cursor_moved()
//! //
//! // Lines ending in `#=` (or containing a lone `# <<<`) get annotated
//! // with the value of the statement they belong to.
//! ```
//!
//! Multiple documents hang off a [`notebook::Notebook`], one session each.

pub mod debounce;
pub mod host;
pub mod notebook;
pub mod session;

// Re-export the public core API so embedders need only this crate.
pub use marginalia_core::{
    Annotation, Engine, Environment, MarkerConfig, Outcome, ParseError, RuntimeError, Value,
};
pub use marginalia_fmt::{RenderOptions, render_block, render_clipboard, render_inline};

pub use debounce::Debouncer;
pub use host::{Host, HostError, PopupId};
pub use notebook::{DocumentId, Notebook};
pub use session::{Session, SessionOptions};
