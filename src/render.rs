//! Plain-text presentation of the session.
//!
//! The store never prints. [`Presenter`] subscribes to its notifications and
//! redraws the affected part after every turn of the control loop.

use std::fmt::Write as _;
use std::io::{self, Write};

use paramscope_core::{
    BodyState, BodyView, Details, ExchangeRow, Header, ParameterSet, Payload, RequestView,
    SessionEvent, SessionStore, format_as_lines,
};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

pub(crate) const NO_REQUESTS: &str = "Waiting for fetch/XHR requests...";
pub(crate) const NO_MATCHES: &str = "No matching requests";
pub(crate) const NO_SELECTION: &str = "Select a request to view its details";
pub(crate) const NO_PARAMS: &str = "This request has no parameter data";
pub(crate) const LOADING: &str = "Loading response content...";
pub(crate) const NO_CONTENT: &str = "No response content";

/// The filtered list, or the empty-state message that applies.
pub(crate) fn render_list(store: &SessionStore) -> String {
    let rows = store.filtered_rows();
    if rows.is_empty() {
        let message = if store.is_empty() { NO_REQUESTS } else { NO_MATCHES };
        return format!("{}\n", message);
    }

    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        out.push_str(&render_row(index, row, store.selection() == Some(index)));
    }
    out
}

/// One list line. `index` is 0-based; rows are shown 1-based.
pub(crate) fn render_row(index: usize, row: &ExchangeRow, selected: bool) -> String {
    format!(
        "{}{:>3}. {:<7} {:>3} {:<5} {:>6}  {}\n",
        if selected { ">" } else { " " },
        index + 1,
        row.method,
        row.status_label(),
        row.kind.to_string(),
        row.size_label,
        row.display_name
    )
}

fn section(out: &mut String, title: &str, body: &str) {
    let _ = writeln!(out, "== {} ==", title);
    out.push_str(body);
    if !body.ends_with('\n') {
        out.push('\n');
    }
}

fn table<'a>(rows: impl Iterator<Item = (&'a str, String)>) -> String {
    let mut out = String::new();
    for (key, value) in rows {
        let _ = writeln!(out, "  {}: {}", key, value);
    }
    out
}

fn param_table(params: &ParameterSet) -> String {
    table(params.iter().map(|(k, v)| (k, v.to_string())))
}

fn header_table(headers: &[Header]) -> String {
    table(headers.iter().map(|h| (h.name.as_str(), h.value.clone())))
}

/// Request side of the details pane.
pub(crate) fn render_request(view: &RequestView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "URL:    {}", view.url);
    let _ = writeln!(out, "Method: {}", view.method);
    let _ = writeln!(out, "Status: {}", view.status_line);

    match &view.payload {
        Payload::Params(params) => section(&mut out, "Request Payload", &format_as_lines(params)),
        Payload::Raw(text) => section(&mut out, "Raw Request Data", text),
        Payload::None => {}
    }
    if !view.headers.is_empty() {
        section(&mut out, "Request Headers", &header_table(&view.headers));
    }
    if !view.query.is_empty() {
        section(&mut out, "Query String", &param_table(&view.query));
    }
    if view.is_empty() {
        let _ = writeln!(out, "{}", NO_PARAMS);
    }
    out
}

pub(crate) fn render_preview(preview: &BodyState<BodyView>) -> String {
    let mut out = String::new();
    match preview {
        BodyState::Loading => section(&mut out, "Response Preview", LOADING),
        BodyState::Absent => section(&mut out, "Response Preview", NO_CONTENT),
        BodyState::Ready(BodyView::Structured { pretty }) => {
            section(&mut out, "Response Preview (JSON)", pretty)
        }
        BodyState::Ready(BodyView::Plain { text }) => section(&mut out, "Response Preview", text),
    }
    out
}

pub(crate) fn render_response(response: &BodyState<String>) -> String {
    let mut out = String::new();
    let body = match response {
        BodyState::Loading => LOADING,
        BodyState::Absent => NO_CONTENT,
        BodyState::Ready(text) => text.as_str(),
    };
    section(&mut out, "Response", body);
    out
}

/// The whole details pane.
pub(crate) fn render_details(details: &Details) -> String {
    match details {
        Details::NoneSelected => format!("{}\n", NO_SELECTION),
        Details::Selected(d) => {
            let mut out = render_request(&d.request);
            out.push_str(&render_preview(&d.preview));
            out.push_str(&render_response(&d.response));
            out
        }
    }
}

/// Copy text for the selected request: payload lines then query lines.
pub(crate) fn copy_text(view: &RequestView) -> String {
    let mut blocks = Vec::new();
    match &view.payload {
        Payload::Params(params) => blocks.push(format_as_lines(params)),
        Payload::Raw(text) => blocks.push(text.clone()),
        Payload::None => {}
    }
    if !view.query.is_empty() {
        blocks.push(format_as_lines(&view.query));
    }
    blocks.join("\n")
}

/// Redraws from [`SessionEvent`]s.
pub(crate) struct Presenter<W> {
    events: broadcast::Receiver<SessionEvent>,
    out: W,
}

impl<W: Write> Presenter<W> {
    pub(crate) fn new(store: &SessionStore, out: W) -> Self {
        Self {
            events: store.subscribe(),
            out,
        }
    }

    /// Print the full list regardless of pending events.
    pub(crate) fn show_list(&mut self, store: &SessionStore) -> io::Result<()> {
        self.out.write_all(render_list(store).as_bytes())
    }

    /// Direct output for command replies.
    pub(crate) fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Render every notification published since the last call.
    pub(crate) fn flush(&mut self, store: &SessionStore) -> io::Result<()> {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.show(&event, store)?,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Presenter fell behind, redrawing list");
                    self.show_list(store)?;
                }
            }
        }
        self.out.flush()
    }

    fn show(&mut self, event: &SessionEvent, store: &SessionStore) -> io::Result<()> {
        debug!(?event, "Rendering");
        let text = match event {
            SessionEvent::Appended { id, visible: true } => {
                let Some((index, row)) = store
                    .filtered_rows()
                    .into_iter()
                    .enumerate()
                    .find(|(_, r)| r.id == *id)
                else {
                    return Ok(());
                };
                render_row(index, &row, false)
            }
            SessionEvent::Appended { visible: false, .. } => return Ok(()),
            SessionEvent::Filtered { term, matches } => {
                let header = if term.is_empty() {
                    format!("-- all requests ({}) --\n", matches)
                } else {
                    format!("-- {} matching \"{}\" --\n", matches, term)
                };
                header + &render_list(store)
            }
            SessionEvent::Selected { .. } => match store.details() {
                Details::Selected(d) => {
                    format!("{}{}\n", render_request(&d.request), LOADING)
                }
                Details::NoneSelected => format!("{}\n", NO_SELECTION),
            },
            SessionEvent::BodyReady { .. } => match store.details() {
                Details::Selected(d) => {
                    render_preview(&d.preview) + &render_response(&d.response)
                }
                Details::NoneSelected => return Ok(()),
            },
            SessionEvent::Cleared => format!("-- cleared --\n{}\n", NO_REQUESTS),
        };
        self.out.write_all(text.as_bytes())
    }

    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
