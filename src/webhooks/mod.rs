use crate::github;
use async_trait::async_trait;
use http::{HeaderMap, StatusCode};
use std::{collections::HashMap, error::Error as StdError, sync::Arc};
use tracing::{debug, error, field::Empty, info, instrument, Span};

mod error;
mod models;
pub(crate) mod validators;

pub use error::{Error, Result};
pub use models::{Event, EventKind, IssueComment};

const EVENT_HEADER: &str = "X-GitHub-Event";
const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

/// Reacts to a single kind of webhook event
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &Event) -> github::Result<()>;
}

/// Validates, parses and routes webhook deliveries to their registered handler
pub struct Dispatcher {
    secret: Vec<u8>,
    handlers: HashMap<EventKind, Arc<dyn EventHandler>>,
}

impl Dispatcher {
    /// Create a dispatcher without any handlers
    pub fn new<S: Into<Vec<u8>>>(secret: S) -> Dispatcher {
        Dispatcher {
            secret: secret.into(),
            handlers: HashMap::new(),
        }
    }

    /// Register the handler for a kind of event, replacing any existing one
    pub fn register<H>(mut self, kind: EventKind, handler: H) -> Dispatcher
    where
        H: EventHandler + 'static,
    {
        self.handlers.insert(kind, Arc::new(handler));
        self
    }

    /// Handle a single webhook delivery
    #[instrument(skip_all, fields(event = Empty, delivery = Empty))]
    pub async fn handle(&self, headers: &HeaderMap, body: &[u8]) -> Result<StatusCode> {
        let span = Span::current();
        if let Some(delivery) = header(headers, DELIVERY_HEADER) {
            span.record("delivery", &delivery);
        }

        if let Err(e) = validators::github(body, headers, &self.secret) {
            info!(error = %e, "signature is invalid");
            return Err(e.into());
        }

        let event = header(headers, EVENT_HEADER)
            .ok_or(Error::MissingEventKind)
            .and_then(|name| Event::parse(name, body).map_err(Error::from));
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                error!(error = %e, source = ?e.source(), "failed to parse hook");
                return Err(e);
            }
        };
        span.record("event", &event.name());
        info!("got new {} hook", event.name());

        if let Event::Ping(ping) = &event {
            info!(zen = %ping.zen, hook_id = ping.hook_id, "received ping");
        }

        let handler = match event.kind().and_then(|kind| self.handlers.get(&kind)) {
            Some(handler) => handler,
            None => {
                debug!("no handler registered, ignoring");
                return Ok(StatusCode::OK);
            }
        };

        if let Err(e) = handler.handle(&event).await {
            error!(error = %e, source = ?e.source(), "failed to process an event");
            return Err(e.into());
        }

        Ok(StatusCode::OK)
    }
}

/// Get a header's value if it is present and valid
fn header<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
