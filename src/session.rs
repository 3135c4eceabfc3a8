//! Per-document live evaluation session.
//!
//! A session owns one [`Engine`] (environment + result cache) and one
//! [`Debouncer`], and wires them to a [`Host`]. Edit events arrive through
//! [`Session::on_text_changed`]; the debounced pass re-reads the full
//! snapshot at invocation time, so it always evaluates the latest text.

use std::sync::Arc;
use std::time::Duration;

use marginalia_core::{Engine, MarkerConfig, Outcome};
use marginalia_fmt::{RenderOptions, render_block, render_clipboard, render_inline};
use parking_lot::Mutex;

use crate::debounce::Debouncer;
use crate::host::{Host, PopupId};

/// Session configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Debounce delay between the last edit and the evaluation pass.
    pub delay: Option<Duration>,
    /// Marker tokens to recognize.
    pub markers: MarkerConfig,
    /// Rendering configuration shared by all presentation consumers.
    pub render: RenderOptions,
}

impl SessionOptions {
    fn delay(&self) -> Duration {
        self.delay.unwrap_or(Debouncer::DEFAULT_DELAY)
    }
}

struct State<H: Host> {
    host: H,
    engine: Engine,
    markers: MarkerConfig,
    render: RenderOptions,
    enabled: bool,
    popup: Option<PopupId>,
}

/// A live evaluation session bound to one document.
///
/// All state sits behind one mutex; the debounce worker and the editor
/// thread both lock it, so evaluation passes are serialized even beyond
/// the single-flight guarantee of the debouncer itself.
pub struct Session<H: Host + 'static> {
    state: Arc<Mutex<State<H>>>,
    debouncer: Debouncer,
}

impl<H: Host + 'static> Session<H> {
    /// Attach a new session to a document. The session starts disabled.
    pub fn attach(host: H, options: SessionOptions) -> Self {
        let state = Arc::new(Mutex::new(State {
            host,
            engine: Engine::new(),
            markers: options.markers.clone(),
            render: options.render.clone(),
            enabled: false,
            popup: None,
        }));

        let worker_state = Arc::clone(&state);
        let debouncer = Debouncer::new(options.delay(), move || {
            let mut state = worker_state.lock();
            if state.enabled {
                state.evaluate_and_annotate();
            }
        });

        Self { state, debouncer }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    pub fn enable(&self) {
        let mut state = self.state.lock();
        state.enabled = true;
        state.evaluate_and_annotate();
        state.refresh_popup();
        state.host.status("marginalia enabled");
    }

    pub fn disable(&self) {
        let mut state = self.state.lock();
        state.enabled = false;
        state.host.clear_annotations();
        state.remove_popup();
        state.host.status("marginalia disabled");
    }

    pub fn toggle(&self) {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
    }

    /// Drop environment and cache, then re-evaluate immediately (not
    /// debounced).
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.engine.reset();
        state.evaluate_and_annotate();
    }

    /// Insert the rendered outcome of the statement under the cursor into
    /// the buffer, as comment lines directly below that statement.
    pub fn inject(&self) {
        let mut state = self.state.lock();
        state.ensure_enabled();
        let Some((outcome, span)) = state.statement_under_cursor() else {
            return;
        };
        let render = state.render.clone();
        let Some(text) = render_block(&outcome, &render) else {
            return;
        };
        let mut lines = Vec::new();
        for (i, chunk) in text.split('\n').enumerate() {
            if i == 0 {
                lines.push(format!("# >>> {chunk}"));
            } else {
                lines.push(format!("# ... {chunk}"));
            }
        }
        state.host.insert_lines(span.end, lines);
    }

    /// Copy the rendered outcome of the statement under the cursor to the
    /// clipboard. A plain string value is copied raw.
    pub fn copy(&self) {
        let mut state = self.state.lock();
        state.ensure_enabled();
        let Some((outcome, _)) = state.statement_under_cursor() else {
            return;
        };
        if let Some(text) = render_clipboard(&outcome) {
            state.host.set_clipboard(&text);
        }
    }

    /// The document changed: close the popup and (re)arm the debounce
    /// delay. No-op while disabled.
    pub fn on_text_changed(&self) {
        {
            let mut state = self.state.lock();
            if !state.enabled {
                return;
            }
            state.remove_popup();
        }
        self.debouncer.event();
    }

    /// The cursor moved: drop any popup, and when the new line carries a
    /// marker whose outcome renders multi-line, show it in a fresh popup.
    pub fn on_cursor_moved(&self) {
        let mut state = self.state.lock();
        state.remove_popup();
        if !state.enabled {
            return;
        }
        state.refresh_popup();
    }
}

impl<H: Host> State<H> {
    /// One full evaluation pass: clear, evaluate, annotate.
    fn evaluate_and_annotate(&mut self) {
        self.host.clear_annotations();
        let lines = self.host.lines();
        let annotations = self.engine.evaluate(&lines, &self.markers);
        tracing::debug!(count = annotations.len(), "annotating pass results");
        for annotation in annotations {
            if let Some(text) = render_inline(&annotation.outcome) {
                self.host.annotate(annotation.line, &text);
            }
        }
    }

    /// Inject and copy work from anywhere, enabling the session on demand.
    fn ensure_enabled(&mut self) {
        if !self.enabled {
            self.enabled = true;
            self.evaluate_and_annotate();
            self.host.status("marginalia enabled");
        }
    }

    fn statement_under_cursor(&mut self) -> Option<(Outcome, core::ops::Range<usize>)> {
        let lines = self.host.lines();
        let (cursor_line, _) = self.host.cursor();
        self.engine.statement_at(&lines, cursor_line)
    }

    fn refresh_popup(&mut self) {
        self.remove_popup();
        let lines = self.host.lines();
        let (cursor_line, _) = self.host.cursor();
        let Some(line) = lines.get(cursor_line) else {
            return;
        };
        if !self.markers.is_marked(line) {
            return;
        }
        let Some((outcome, _)) = self.engine.statement_at(&lines, cursor_line) else {
            return;
        };
        let render = self.render.clone();
        let Some(text) = render_block(&outcome, &render) else {
            return;
        };
        if !text.contains('\n') {
            return;
        }
        let popup_lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        match self.host.show_popup(&popup_lines) {
            Ok(id) => self.popup = Some(id),
            Err(error) => tracing::debug!(%error, "popup could not be opened"),
        }
    }

    /// Best-effort popup teardown; a host refusing to close an already
    /// dead popup is not an error worth surfacing.
    fn remove_popup(&mut self) {
        if let Some(id) = self.popup.take() {
            if let Err(error) = self.host.close_popup(id) {
                tracing::debug!(%error, "popup close failed");
            }
        }
    }
}
