//! `watch`: live capture from a Chrome page.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use paramscope_cdp::{CdpClient, run_capture};
use paramscope_config::Config;
use paramscope_core::{BodyTicket, NetworkExchange, SessionStore, resolve_body};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::command::{self, HELP, InputCommand, Outcome};
use crate::render::Presenter;

/// Captured exchanges buffered between the capture task and the loop.
const EXCHANGE_BUFFER: usize = 256;

type BodyResult = (BodyTicket, Option<String>);

pub(crate) async fn run_watch(
    config: &Config,
    endpoint: Option<String>,
    target: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let endpoint = endpoint.unwrap_or_else(|| config.cdp.endpoint.clone());
    let target = target.or_else(|| config.cdp.target.clone());
    let timeout = Duration::from_secs(config.cdp.request_timeout_secs);

    let client = CdpClient::connect_with_timeout(&endpoint, timeout).await?;
    let page = client.find_page(target.as_deref()).await?;
    info!(id = %page.id, url = %page.url, "Attaching to page");
    let session = Arc::new(client.attach_page(&page.id).await?);

    let (exchange_tx, exchanges) = mpsc::channel(EXCHANGE_BUFFER);
    let mut capture = tokio::spawn(run_capture(session, exchange_tx));

    let mut store = SessionStore::new();
    let mut presenter = Presenter::new(&store, io::stdout());
    println!("Watching \"{}\" ({})", page.title, page.url);
    print!("{}", HELP);
    presenter.show_list(&store)?;

    let lines = BufReader::new(tokio::io::stdin()).lines();
    let exit = watch_loop(
        &mut store,
        &mut presenter,
        exchanges,
        lines,
        tokio::signal::ctrl_c(),
    )
    .await;

    if let Ok(LoopExit::Closed) = exit {
        match (&mut capture).await {
            Ok(Err(e)) => return Err(e.into()),
            Err(e) => warn!("Capture task failed: {}", e),
            Ok(Ok(())) => {}
        }
        println!("Page connection closed.");
    }
    capture.abort();
    exit.map(|_| ())
}

/// Why [`watch_loop`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopExit {
    /// The capture stream ended.
    Closed,
    Quit,
    Interrupted,
}

/// Multiplex captured exchanges, body completions, input lines and the
/// shutdown signal until one of them ends the session.
///
/// `shutdown` is polled across every turn; a signal that arrives while
/// another branch is being handled still ends the loop.
async fn watch_loop<R, W, F>(
    store: &mut SessionStore,
    presenter: &mut Presenter<W>,
    mut exchanges: mpsc::Receiver<NetworkExchange>,
    mut lines: Lines<R>,
    shutdown: F,
) -> Result<LoopExit, Box<dyn std::error::Error>>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    F: Future,
{
    let (body_tx, mut bodies) = mpsc::unbounded_channel::<BodyResult>();
    let mut stdin_open = true;
    tokio::pin!(shutdown);

    let exit = loop {
        tokio::select! {
            exchange = exchanges.recv() => match exchange {
                Some(exchange) => {
                    store.append(exchange);
                }
                None => break LoopExit::Closed,
            },
            Some((ticket, body)) = bodies.recv() => {
                store.complete_body(ticket, body);
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) if line.trim().is_empty() => {}
                Some(line) => match line.parse::<InputCommand>() {
                    Ok(cmd) => match command::apply(cmd, store, presenter)? {
                        Outcome::Continue => {}
                        Outcome::Resolve(ticket) => spawn_resolution(store, ticket, &body_tx),
                        Outcome::Quit => break LoopExit::Quit,
                    },
                    Err(e) => writeln!(presenter.out(), "{}", e)?,
                },
                None => {
                    debug!("stdin closed, capturing until interrupted");
                    stdin_open = false;
                }
            },
            _ = &mut shutdown => {
                info!("Interrupted");
                break LoopExit::Interrupted;
            }
        }
        presenter.flush(store)?;
    };
    presenter.flush(store)?;
    Ok(exit)
}

/// Resolve the selected body off the loop; the result comes back tagged.
fn spawn_resolution(
    store: &SessionStore,
    ticket: BodyTicket,
    tx: &mpsc::UnboundedSender<BodyResult>,
) {
    let Some(exchange) = store.exchange(ticket.exchange).cloned() else {
        return;
    };
    let tx = tx.clone();
    tokio::spawn(async move {
        let body = resolve_body(&exchange).await;
        let _ = tx.send((ticket, body));
    });
}

#[cfg(test)]
#[path = "cmd_watch_tests.rs"]
mod tests;
