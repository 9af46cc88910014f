//! The capabilities the page and form controllers are given instead of reaching for globals.

use std::sync::{Arc, Mutex};

use axum::http::HeaderValue;

use crate::{account::AccountApi, transaction::TransactionApi};

/// The client event that re-renders widgets and pages after a mutation.
pub const UPDATE_EVENT: &str = "app:update";
/// The client event that refreshes the summary widgets only.
pub const UPDATE_WIDGETS_EVENT: &str = "app:update-widgets";
/// The client event that closes the open modal.
pub const MODAL_CLOSE_EVENT: &str = "modal:close";

/// Cross-component refresh signalling.
pub trait App: Send + Sync {
    /// Re-render the widgets and pages affected by a mutation.
    fn update(&self);

    /// Refresh the summary widgets only.
    fn update_widgets(&self);
}

/// The controller of the modal dialog hosting a form.
pub trait Modal: Send + Sync {
    /// Close the currently open modal.
    fn close(&self);
}

/// A blocking yes/no prompt gating destructive actions.
pub trait Confirm: Send + Sync {
    /// Ask the user `message`, returning `true` if they agreed.
    fn confirm(&self, message: &str) -> bool;
}

/// Everything a controller talks to, passed in at construction.
#[derive(Clone)]
pub struct Collaborators {
    /// Account data access.
    pub accounts: Arc<dyn AccountApi>,
    /// Transaction data access.
    pub transactions: Arc<dyn TransactionApi>,
    /// Refresh signalling.
    pub app: Arc<dyn App>,
    /// The modal hosting the create transaction form.
    pub modal: Arc<dyn Modal>,
    /// The confirmation prompt.
    pub confirm: Arc<dyn Confirm>,
}

/// Collects the client events raised while handling a request so they can be
/// sent back in an htmx trigger header.
#[derive(Debug, Default)]
pub struct ClientEvents {
    pending: Mutex<Vec<&'static str>>,
}

impl ClientEvents {
    /// Create a collector with no pending events.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: &'static str) {
        match self.pending.lock() {
            Ok(mut pending) => {
                if !pending.contains(&event) {
                    pending.push(event);
                }
            }
            Err(error) => tracing::error!("Could not record client event {event}: {error}"),
        }
    }

    /// Take the events raised so far, in the order they were first raised.
    pub fn drain(&self) -> Vec<&'static str> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(error) => {
                tracing::error!("Could not read client events: {error}");
                Vec::new()
            }
        }
    }

    /// Take the events raised so far as a header value, e.g. "modal:close, app:update".
    ///
    /// Returns `None` if no events were raised.
    pub fn drain_header_value(&self) -> Option<HeaderValue> {
        let events = self.drain();

        if events.is_empty() {
            return None;
        }

        HeaderValue::from_str(&events.join(", "))
            .inspect_err(|error| tracing::error!("Could not encode client events: {error}"))
            .ok()
    }
}

impl App for ClientEvents {
    fn update(&self) {
        self.push(UPDATE_EVENT);
    }

    fn update_widgets(&self) {
        self.push(UPDATE_WIDGETS_EVENT);
    }
}

impl Modal for ClientEvents {
    fn close(&self) {
        self.push(MODAL_CLOSE_EVENT);
    }
}

/// A [Confirm] for requests that the browser already confirmed with `hx-confirm`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmedByClient;

impl Confirm for ConfirmedByClient {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!("\"{message}\" was confirmed in the browser");
        true
    }
}
