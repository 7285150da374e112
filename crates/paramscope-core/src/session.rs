//! Session state: captured exchanges, search term, filtered view and
//! selection.
//!
//! One [`SessionStore`] exists per inspector instance. It is driven from a
//! single control loop; mutations publish [`SessionEvent`]s so the
//! presentation layer can redraw without the store knowing about it.
//!
//! Body resolution is asynchronous. [`SessionStore::select`] hands out a
//! [`BodyTicket`] carrying the selection generation, and
//! [`SessionStore::complete_body`] drops results whose ticket is no longer
//! current.

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::body::{BodyState, classify_body};
use crate::classifier::{ClassifiedExchange, ExchangeId};
use crate::exchange::NetworkExchange;
use crate::view::{Details, ExchangeDetails, ExchangeRow, RequestView};

/// Buffered notifications per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 256;

/// State-change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A relevant exchange was stored; `visible` tells whether it matches the
    /// current search term.
    Appended { id: ExchangeId, visible: bool },
    /// The search term changed and the filtered view was rebuilt.
    Filtered { term: String, matches: usize },
    /// A row of the filtered view was selected.
    Selected { index: usize, id: ExchangeId },
    /// The body of the selected exchange settled.
    BodyReady { id: ExchangeId },
    /// Everything was reset.
    Cleared,
}

/// Tag for an in-flight body resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyTicket {
    pub generation: u64,
    pub exchange: ExchangeId,
}

/// Captured exchanges plus search and selection state.
pub struct SessionStore {
    exchanges: Vec<ClassifiedExchange>,
    search_term: String,
    /// Indices into `exchanges`, in order.
    filtered: Vec<usize>,
    /// Index into `filtered`.
    selection: Option<usize>,
    /// Bumped whenever the selection changes or is invalidated.
    generation: u64,
    next_id: u64,
    body: BodyState<String>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            exchanges: Vec::new(),
            search_term: String::new(),
            filtered: Vec::new(),
            selection: None,
            generation: 0,
            next_id: 1,
            body: BodyState::Loading,
            events,
        }
    }

    /// Subscribe to state-change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Classify and, if relevant, store an exchange.
    pub fn append(&mut self, exchange: NetworkExchange) -> Option<ExchangeId> {
        let id = ExchangeId(self.next_id);
        let classified = ClassifiedExchange::new(id, exchange);
        if !classified.relevant {
            debug!(
                "Ignoring {} {}",
                classified.exchange.method(),
                classified.exchange.url()
            );
            return None;
        }

        self.next_id += 1;
        let visible = self.matches(&classified.exchange);
        debug!(
            "Captured {} {} {} (visible: {})",
            id,
            classified.exchange.method(),
            classified.exchange.url(),
            visible
        );
        self.exchanges.push(classified);
        self.refilter();
        self.publish(SessionEvent::Appended { id, visible });
        Some(id)
    }

    /// Replace the search term. Resets the selection.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.refilter();
        self.reset_selection();
        self.publish(SessionEvent::Filtered {
            term: self.search_term.clone(),
            matches: self.filtered.len(),
        });
    }

    /// Select a row of the filtered view. Out-of-range indices are ignored.
    ///
    /// Returns the ticket under which the selected exchange's body should be
    /// resolved.
    pub fn select(&mut self, index: usize) -> Option<BodyTicket> {
        let exchange = self.filtered.get(index).map(|&i| self.exchanges[i].id)?;

        self.selection = Some(index);
        self.generation += 1;
        self.body = BodyState::Loading;
        self.publish(SessionEvent::Selected {
            index,
            id: exchange,
        });

        Some(BodyTicket {
            generation: self.generation,
            exchange,
        })
    }

    /// Deliver a resolved body. Returns `false` if the ticket is stale.
    pub fn complete_body(&mut self, ticket: BodyTicket, body: Option<String>) -> bool {
        if ticket.generation != self.generation || self.selected_id() != Some(ticket.exchange) {
            debug!(
                "Dropping stale body for {} (generation {} != {})",
                ticket.exchange, ticket.generation, self.generation
            );
            return false;
        }

        self.body = body.into();
        self.publish(SessionEvent::BodyReady {
            id: ticket.exchange,
        });
        true
    }

    /// Reset exchanges, term, filtered view and selection together.
    pub fn clear(&mut self) {
        self.exchanges.clear();
        self.filtered.clear();
        self.search_term.clear();
        self.reset_selection();
        self.publish(SessionEvent::Cleared);
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Exchanges matching the search term, in arrival order.
    pub fn filtered(&self) -> impl Iterator<Item = &ClassifiedExchange> {
        self.filtered.iter().map(|&i| &self.exchanges[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn exchange(&self, id: ExchangeId) -> Option<&NetworkExchange> {
        self.exchanges
            .iter()
            .find(|c| c.id == id)
            .map(|c| &c.exchange)
    }

    pub fn selected(&self) -> Option<&ClassifiedExchange> {
        self.selection
            .and_then(|s| self.filtered.get(s))
            .map(|&i| &self.exchanges[i])
    }

    pub fn selected_id(&self) -> Option<ExchangeId> {
        self.selected().map(|c| c.id)
    }

    /// Rows for the list pane.
    pub fn filtered_rows(&self) -> Vec<ExchangeRow> {
        self.filtered()
            .map(|c| ExchangeRow::from_exchange(c.id, &c.exchange))
            .collect()
    }

    /// Details for the current selection.
    pub fn details(&self) -> Details {
        let Some(selected) = self.selected() else {
            return Details::NoneSelected;
        };

        Details::Selected(Box::new(ExchangeDetails {
            id: selected.id,
            request: RequestView::from_exchange(&selected.exchange),
            preview: self.body.as_ref().map(|text| classify_body(text)),
            response: self.body.clone(),
        }))
    }

    fn matches(&self, exchange: &NetworkExchange) -> bool {
        self.search_term.is_empty()
            || exchange
                .url()
                .to_lowercase()
                .contains(&self.search_term.to_lowercase())
    }

    /// Rebuild the filtered view from scratch and re-validate the selection.
    fn refilter(&mut self) {
        self.filtered = self
            .exchanges
            .iter()
            .enumerate()
            .filter(|(_, c)| self.matches(&c.exchange))
            .map(|(i, _)| i)
            .collect();

        if self.selection.is_some_and(|s| s >= self.filtered.len()) {
            self.reset_selection();
        }
    }

    fn reset_selection(&mut self) {
        self.selection = None;
        self.generation += 1;
        self.body = BodyState::Loading;
    }

    fn publish(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
