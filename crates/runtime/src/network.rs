//! Wire encoding and relay of command payloads between peers.
//!
//! Each locally executed command leaves the controller as a [`Payload`] in
//! its outbox. The bridge encodes payloads as single-line JSON messages and
//! replays received ones through [`GridController::receive`], which
//! resolves unit and cell references against the receiving board.

use tracing::debug;

use tactics_core::{CommandError, Payload};

use crate::controller::GridController;
use crate::error::Result;

#[derive(Clone, Copy, Debug, Default)]
pub struct NetworkBridge;

impl NetworkBridge {
    /// One JSON object per message, no embedded newlines.
    pub fn encode(payload: &Payload) -> String {
        serde_json::Value::Object(payload.clone()).to_string()
    }

    pub fn decode(message: &str) -> Result<Payload> {
        let value: serde_json::Value = serde_json::from_str(message).map_err(|error| {
            CommandError::InvalidField {
                key: "message".into(),
                reason: error.to_string(),
            }
        })?;
        match value {
            serde_json::Value::Object(payload) => Ok(payload),
            _ => Err(CommandError::InvalidField {
                key: "message".into(),
                reason: "expected a JSON object".into(),
            }
            .into()),
        }
    }

    /// Moves every pending payload of `from` into `to`, in order. Stops at
    /// the first payload `to` rejects. Returns how many were replayed.
    pub fn relay(from: &mut GridController, to: &mut GridController) -> Result<usize> {
        let mut relayed = 0;
        for payload in from.drain_outbox() {
            let message = Self::encode(&payload);
            debug!(target: "tactics::network", bytes = message.len(), "relaying payload");
            to.receive(&Self::decode(&message)?)?;
            relayed += 1;
        }
        Ok(relayed)
    }
}
