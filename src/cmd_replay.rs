//! `replay`: inspect the requests recorded in a HAR file.

use std::io::{self, Write};
use std::path::Path;

use paramscope_core::{NetworkExchange, SessionStore, load_har, resolve_body};
use tracing::info;

use crate::render::Presenter;

pub(crate) async fn run_replay(
    file: &Path,
    search: Option<String>,
    select: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let exchanges = load_har(file)?;
    info!(path = %file.display(), entries = exchanges.len(), "Loaded HAR");
    replay(exchanges, search, select, io::stdout()).await?;
    Ok(())
}

/// Feed recorded exchanges through a fresh session and print the result.
pub(crate) async fn replay<W: Write>(
    exchanges: Vec<NetworkExchange>,
    search: Option<String>,
    select: Option<usize>,
    out: W,
) -> io::Result<W> {
    let total = exchanges.len();
    let mut store = SessionStore::new();
    for exchange in exchanges {
        store.append(exchange);
    }
    info!(total, relevant = store.len(), "Replayed exchanges");

    let mut presenter = Presenter::new(&store, out);
    match search {
        Some(term) => store.set_search_term(term),
        None => presenter.show_list(&store)?,
    }
    presenter.flush(&store)?;

    if let Some(row) = select {
        let ticket = row.checked_sub(1).and_then(|index| store.select(index));
        match ticket {
            Some(ticket) => {
                presenter.flush(&store)?;
                let body = match store.exchange(ticket.exchange) {
                    Some(exchange) => resolve_body(exchange).await,
                    None => None,
                };
                store.complete_body(ticket, body);
            }
            None => writeln!(
                presenter.out(),
                "No row {} ({} shown)",
                row,
                store.filtered_len()
            )?,
        }
        presenter.flush(&store)?;
    }

    Ok(presenter.into_inner())
}

#[cfg(test)]
#[path = "cmd_replay_tests.rs"]
mod tests;
