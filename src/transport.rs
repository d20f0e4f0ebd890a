//! WebSocket task behind a [`Connection`](crate::connection::Connection).
//!
//! Owns the socket for its whole life: performs the Engine.IO/Socket.IO
//! handshake, answers heartbeats, forwards decoded events to the loop and
//! writes whatever the loop queues. When the socket ends the task reports it
//! once (`disconnect` or `connect_error`) and exits. It never reconnects.

use std::collections::VecDeque;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::connect_async;
use tungstenite::protocol::Message;

use crate::protocol::inbound;
use crate::socketio::{self, Packet};
use crate::types::Frame;

pub(crate) async fn run_socket(
    endpoint: String,
    mut outbound: UnboundedReceiver<String>,
    tx: UnboundedSender<Frame>,
) -> Result<()> {
    let (ws, _) = match connect_async(endpoint.as_str()).await {
        Ok(ok) => ok,
        Err(e) => {
            log::error!("connect to {endpoint} failed: {e}");
            let _ = tx.send(Frame::new(inbound::CONNECT_ERROR, Value::String(e.to_string())));
            return Err(e.into());
        }
    };
    let (mut ws_write, mut ws_read) = ws.split();

    // Set once the server confirms the namespace join
    let mut joined = false;
    // Frames queued by the loop before the join completed
    let mut backlog: VecDeque<String> = VecDeque::new();

    let reason = loop {
        tokio::select! {
            msg = ws_read.next() => {
                let msg = match msg {
                    Some(Ok(m)) => m,
                    Some(Err(e)) => break format!("transport error: {e}"),
                    None => break "transport closed".to_string(),
                };
                let text = match msg {
                    Message::Text(t) => t,
                    Message::Close(_) => break "server closed the socket".to_string(),
                    // tungstenite answers websocket-level pings itself
                    _ => continue,
                };
                match socketio::decode(&text) {
                    Ok(Packet::Open(handshake)) => {
                        log::info!(
                            "engine.io open sid={} ping={}ms",
                            handshake.sid, handshake.ping_interval
                        );
                        if let Err(e) = ws_write.send(Message::Text(socketio::CONNECT.into())).await {
                            break format!("write failed: {e}");
                        }
                    }
                    Ok(Packet::Ping) => {
                        if let Err(e) = ws_write.send(Message::Text(socketio::PONG.into())).await {
                            break format!("write failed: {e}");
                        }
                    }
                    Ok(Packet::Connect(_)) => {
                        joined = true;
                        log::info!("connected to socket.io server");
                        let _ = tx.send(Frame::new(inbound::CONNECT, Value::Null));
                        let mut failed = None;
                        while let Some(frame) = backlog.pop_front() {
                            if let Err(e) = ws_write.send(Message::Text(frame)).await {
                                failed = Some(format!("write failed: {e}"));
                                break;
                            }
                        }
                        if let Some(reason) = failed {
                            break reason;
                        }
                    }
                    Ok(Packet::ConnectError(reason)) => {
                        log::error!("namespace join refused: {reason}");
                        let _ = tx.send(Frame::new(inbound::CONNECT_ERROR, Value::String(reason)));
                        let _ = ws_write.close().await;
                        return Ok(());
                    }
                    Ok(Packet::Event { event, payload }) => {
                        let _ = tx.send(Frame::new(event, payload));
                    }
                    Ok(Packet::Disconnect) | Ok(Packet::Close) => {
                        break "server disconnected".to_string();
                    }
                    Ok(other) => log::debug!("ignoring packet {other:?}"),
                    Err(e) => log::warn!("undecodable frame {text:?}: {e}"),
                }
            }
            out = outbound.recv() => {
                match out {
                    Some(frame) if joined => {
                        if let Err(e) = ws_write.send(Message::Text(frame)).await {
                            break format!("write failed: {e}");
                        }
                    }
                    Some(frame) => backlog.push_back(frame),
                    None => {
                        // Local close()
                        if joined {
                            let _ = ws_write.send(Message::Text(socketio::DISCONNECT.into())).await;
                        }
                        let _ = ws_write.close().await;
                        log::info!("socket closed locally");
                        return Ok(());
                    }
                }
            }
        }
    };

    log::info!("socket ended: {reason}");
    let event = if joined {
        inbound::DISCONNECT
    } else {
        inbound::CONNECT_ERROR
    };
    let _ = tx.send(Frame::new(event, Value::String(reason)));
    Ok(())
}
