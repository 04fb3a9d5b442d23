//! Inbound frame decoding.
//!
//! Two shapes are accepted:
//!
//! - A JSON object `{"onward_route": [..], "return_route": [..], "payload": ".."}`
//!   (any text frame starting with `{`). Missing routes default to empty.
//!   The sending peer's address always ends the return route.
//! - Anything else: the whole frame is the payload, sent along the
//!   configured default route with the peer as return route.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::{Address, Message, Route};

/// Structured wire form of a [`Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Remaining path, front first.
    #[serde(default)]
    pub onward_route: Route,
    /// Path travelled so far, most recent hop first.
    #[serde(default)]
    pub return_route: Route,
    /// Text payload.
    #[serde(default)]
    pub payload: String,
}

impl Frame {
    /// Turn the frame into a message sent by `peer`.
    ///
    /// `peer` is appended to the return route unless it already ends it,
    /// so the connection a message came from is never lost.
    pub fn into_message(self, peer: &Address) -> Message {
        let return_route = if self.return_route.last() == Some(peer) {
            self.return_route
        } else {
            self.return_route.append(peer.clone())
        };
        Message::new(self.onward_route, return_route, self.payload)
    }
}

/// Decode a text frame received from `peer`.
pub fn decode_text(
    text: &str,
    peer: &Address,
    default_route: &Route,
) -> Result<Message, TransportError> {
    if text.trim_start().starts_with('{') {
        let frame: Frame = serde_json::from_str(text)?;
        return Ok(frame.into_message(peer));
    }
    Ok(Message::new(
        default_route.clone(),
        Route::single(peer.clone()),
        text.to_owned(),
    ))
}

/// Decode a binary frame received from `peer`. Binary frames are always
/// payload-only.
pub fn decode_binary(data: Bytes, peer: &Address, default_route: &Route) -> Message {
    Message::new(default_route.clone(), Route::single(peer.clone()), data)
}
