//! Socket.IO v5 over Engine.IO v4 text framing (websocket transport only).
//!
//! Only the default namespace is spoken. A text frame starts with the Engine.IO
//! packet type; a `4` (message) frame carries a Socket.IO packet whose own type
//! digit follows, e.g. `42["cards",[...]]`.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::protocol::ClientEvent;

/// Client reply to the server's Engine.IO ping.
pub const PONG: &str = "3";
/// Client request to join the default namespace.
pub const CONNECT: &str = "40";
/// Client notice that it leaves the default namespace.
pub const DISCONNECT: &str = "41";

/// Engine.IO open handshake sent by the server.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handshake {
    pub sid: String,
    #[serde(default)]
    pub ping_interval: u64,
    #[serde(default)]
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    Open(Handshake),
    Close,
    Ping,
    Pong,
    Upgrade,
    Noop,
    /// Namespace join confirmed.
    Connect(Option<Value>),
    Disconnect,
    Event { event: String, payload: Value },
    Ack,
    ConnectError(String),
    Binary,
}

#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    #[error("empty frame")]
    Empty,
    #[error("unknown engine.io packet type {0:?}")]
    UnknownEngineType(char),
    #[error("unknown socket.io packet type {0:?}")]
    UnknownSocketType(char),
    #[error("malformed json: {0}")]
    Json(String),
    #[error("event array has no name")]
    MissingEventName,
}

fn json_err(e: serde_json::Error) -> CodecError {
    CodecError::Json(e.to_string())
}

/// Split the leading packet-type char from the rest of the frame.
fn split_kind(text: &str) -> Result<(char, &str), CodecError> {
    let kind = text.chars().next().ok_or(CodecError::Empty)?;
    Ok((kind, &text[kind.len_utf8()..]))
}

pub fn decode(text: &str) -> Result<Packet, CodecError> {
    let (kind, rest) = split_kind(text)?;
    match kind {
        '0' => serde_json::from_str(rest).map(Packet::Open).map_err(json_err),
        '1' => Ok(Packet::Close),
        '2' => Ok(Packet::Ping),
        '3' => Ok(Packet::Pong),
        '4' => decode_message(rest),
        '5' => Ok(Packet::Upgrade),
        '6' => Ok(Packet::Noop),
        other => Err(CodecError::UnknownEngineType(other)),
    }
}

fn decode_message(text: &str) -> Result<Packet, CodecError> {
    let (kind, mut body) = split_kind(text)?;

    // "/nsp," prefix; only the default namespace is used so it is skipped
    if body.starts_with('/') {
        body = body.find(',').map(|i| &body[i + 1..]).unwrap_or("");
    }

    match kind {
        '0' => {
            if body.is_empty() {
                Ok(Packet::Connect(None))
            } else {
                serde_json::from_str(body)
                    .map(|v| Packet::Connect(Some(v)))
                    .map_err(json_err)
            }
        }
        '1' => Ok(Packet::Disconnect),
        '2' => {
            // optional ack id precedes the array
            let json = body.trim_start_matches(|c: char| c.is_ascii_digit());
            decode_event(json)
        }
        '3' => Ok(Packet::Ack),
        '4' => Ok(Packet::ConnectError(connect_error_reason(body))),
        '5' | '6' => Ok(Packet::Binary),
        other => Err(CodecError::UnknownSocketType(other)),
    }
}

fn decode_event(json: &str) -> Result<Packet, CodecError> {
    let value: Value = serde_json::from_str(json).map_err(json_err)?;
    let Value::Array(items) = value else {
        return Err(CodecError::Json("event is not an array".into()));
    };
    let mut items = items.into_iter();
    let event = match items.next() {
        Some(Value::String(name)) => name,
        _ => return Err(CodecError::MissingEventName),
    };
    let payload = items.next().unwrap_or(Value::Null);
    Ok(Packet::Event { event, payload })
}

fn connect_error_reason(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(m)) => m.clone(),
            Some(other) => other.to_string(),
            None => body.to_string(),
        },
        Ok(Value::String(s)) => s,
        _ => body.to_string(),
    }
}

/// `42["name"]` or `42["name",payload]`.
pub fn encode_emit(event: &str, payload: Option<Value>) -> String {
    let mut args = vec![Value::String(event.to_string())];
    if let Some(p) = payload {
        args.push(p);
    }
    format!("42{}", Value::Array(args))
}

pub fn encode_event(event: &ClientEvent) -> String {
    encode_emit(event.name(), event.payload())
}
