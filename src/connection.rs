//! Connection manager: one persistent channel to the board server.
//!
//! Handlers are registered per event name before `open()`; after that the
//! table is frozen. Inbound frames queue up on a channel fed by the socket
//! task and are dispatched on the caller's loop via [`Connection::pump`], so
//! every handler runs serially and in arrival order. Sends are synchronous and
//! fire-and-forget. Nothing is retried.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::constants::net::ENGINE_IO_VERSION;
use crate::protocol::{inbound, ClientEvent};
use crate::socketio;
use crate::transport;
use crate::types::Frame;

pub type Handler<S> = Box<dyn FnMut(&mut S, Value) -> anyhow::Result<()>>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("connection was already opened")]
    AlreadyOpen,
    #[error("cannot register handler for {0:?} after open()")]
    RegistrationClosed(String),
    #[error("not connected")]
    NotConnected,
    #[error("invalid server url {0:?}")]
    InvalidUrl(String),
}

/// What the command side needs from a connection.
pub trait Outbound {
    fn is_connected(&self) -> bool;
    fn send(&self, event: &ClientEvent) -> Result<(), ConnectionError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ConnState {
    /// Handlers may still be registered.
    Idle,
    Open,
    Closed,
}

/// Build the websocket endpoint for a Socket.IO server.
pub fn socket_endpoint(server_url: &str, path: &str) -> Result<String, ConnectionError> {
    let invalid = || ConnectionError::InvalidUrl(server_url.to_string());
    let trimmed = server_url.trim_end_matches('/');
    let (scheme, host) = trimmed.split_once("://").ok_or_else(invalid)?;
    let scheme = match scheme {
        "wss" | "https" => "wss",
        "ws" | "http" => "ws",
        _ => return Err(invalid()),
    };
    if host.is_empty() {
        return Err(invalid());
    }
    let path = path.trim_matches('/');
    Ok(format!(
        "{scheme}://{host}/{path}/?EIO={ENGINE_IO_VERSION}&transport=websocket"
    ))
}

pub struct Connection<S> {
    endpoint: String,
    handlers: HashMap<String, Handler<S>>,
    state: ConnState,
    outbound: Option<UnboundedSender<String>>,
    inbound: Option<UnboundedReceiver<Frame>>,
    task: Option<JoinHandle<anyhow::Result<()>>>,
}

impl<S> Connection<S> {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            handlers: HashMap::new(),
            state: ConnState::Idle,
            outbound: None,
            inbound: None,
            task: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    /// Register the handler for `event`, replacing any earlier one.
    pub fn on<F>(&mut self, event: &str, handler: F) -> Result<(), ConnectionError>
    where
        F: FnMut(&mut S, Value) -> anyhow::Result<()> + 'static,
    {
        if self.state != ConnState::Idle {
            return Err(ConnectionError::RegistrationClosed(event.to_string()));
        }
        if self
            .handlers
            .insert(event.to_string(), Box::new(handler))
            .is_some()
        {
            log::warn!("handler for {event:?} replaced");
        }
        Ok(())
    }

    /// Like [`on`](Self::on), decoding the payload into `T` first.
    pub fn on_typed<T, F>(&mut self, event: &str, mut handler: F) -> Result<(), ConnectionError>
    where
        T: DeserializeOwned,
        F: FnMut(&mut S, T) + 'static,
    {
        let name = event.to_string();
        self.on(event, move |state, payload| {
            let value: T = serde_json::from_value(payload)
                .with_context(|| format!("decoding {name:?} payload"))?;
            handler(state, value);
            Ok(())
        })
    }

    pub fn has_handler(&self, event: &str) -> bool {
        self.handlers.contains_key(event)
    }

    /// Start the socket task. Can only happen once per connection.
    pub fn open(&mut self) -> Result<(), ConnectionError> {
        let (out_rx, in_tx) = self.start()?;
        log::info!("opening socket to {}", self.endpoint);
        let endpoint = self.endpoint.clone();
        self.task = Some(tokio::spawn(async move {
            transport::run_socket(endpoint, out_rx, in_tx).await
        }));
        Ok(())
    }

    /// Open over in-memory channels instead of a socket. The caller gets the
    /// encoded outbound frames and a sender to inject inbound frames.
    pub fn open_in_memory(
        &mut self,
    ) -> Result<(UnboundedReceiver<String>, UnboundedSender<Frame>), ConnectionError> {
        self.start()
    }

    fn start(&mut self) -> Result<(UnboundedReceiver<String>, UnboundedSender<Frame>), ConnectionError> {
        if self.state != ConnState::Idle {
            return Err(ConnectionError::AlreadyOpen);
        }
        let (out_tx, out_rx) = unbounded_channel::<String>();
        let (in_tx, in_rx) = unbounded_channel::<Frame>();
        self.outbound = Some(out_tx);
        self.inbound = Some(in_rx);
        self.state = ConnState::Open;
        Ok((out_rx, in_tx))
    }

    /// Tear the channel down. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.state == ConnState::Closed {
            return;
        }
        log::info!("closing connection");
        // Dropping the sender lets the socket task say goodbye and exit
        self.outbound = None;
        self.state = ConnState::Closed;
    }

    /// Give the socket task up to `grace` to finish after [`close`](Self::close).
    pub async fn join(&mut self, grace: Duration) {
        let Some(task) = self.task.take() else {
            return;
        };
        match tokio::time::timeout(grace, task).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => log::warn!("socket task ended with error: {e:#}"),
            Ok(Err(e)) => log::warn!("socket task did not complete: {e}"),
            Err(_) => log::warn!("socket task still running after {grace:?}"),
        }
    }

    /// Dispatch every frame already received. Never waits.
    pub fn pump(&mut self, state: &mut S) -> usize {
        let mut n = 0;
        while let Some(frame) = self.inbound.as_mut().and_then(|rx| rx.try_recv().ok()) {
            self.dispatch(state, frame);
            n += 1;
        }
        n
    }

    /// Wait for the next inbound frame.
    pub async fn next_frame(&mut self) -> Option<Frame> {
        match self.inbound.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }

    pub fn dispatch(&mut self, state: &mut S, frame: Frame) {
        let Frame { event, payload } = frame;

        if event == inbound::DISCONNECT || event == inbound::CONNECT_ERROR {
            // The socket task is gone; further sends have nowhere to go
            self.outbound = None;
            self.state = ConnState::Closed;
        }

        match self.handlers.get_mut(&event) {
            Some(handler) => {
                if let Err(e) = handler(state, payload) {
                    log::warn!("handler for {event:?} failed: {e:#}");
                }
            }
            None => log::debug!("no handler for {event:?}, dropping frame"),
        }
    }
}

impl<S> Outbound for Connection<S> {
    fn is_connected(&self) -> bool {
        self.state == ConnState::Open
            && self.outbound.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    fn send(&self, event: &ClientEvent) -> Result<(), ConnectionError> {
        if self.state != ConnState::Open {
            return Err(ConnectionError::NotConnected);
        }
        let tx = self.outbound.as_ref().ok_or(ConnectionError::NotConnected)?;
        let frame = socketio::encode_event(event);
        log::debug!("-> {frame}");
        tx.send(frame).map_err(|_| ConnectionError::NotConnected)
    }
}
