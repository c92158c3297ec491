// ABOUTME: Relay wire messages - the client EVENT frame and parsing of the
// ABOUTME: relay frames a publisher can receive (OK, NOTICE, EOSE, CLOSED, EVENT).

use serde_json::Value;

use super::Event;
use crate::error::NostrError;

/// Messages sent from client to relay.
#[derive(Debug, Clone)]
pub enum ClientMessage {
    /// `["EVENT", <event JSON>]`
    Event(Event),
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, NostrError> {
        let value = match self {
            ClientMessage::Event(event) => serde_json::json!(["EVENT", event]),
        };
        Ok(serde_json::to_string(&value)?)
    }
}

/// Messages sent from relay to client.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    /// `["OK", <event id>, <accepted>, <message>]`
    Ok {
        event_id: String,
        accepted: bool,
        message: String,
    },
    /// `["NOTICE", <message>]`
    Notice(String),
    /// `["EOSE", <subscription id>]`
    Eose(String),
    /// `["CLOSED", <subscription id>, <message>]`
    Closed {
        subscription_id: String,
        message: String,
    },
    /// `["EVENT", <subscription id>, <event JSON>]`
    Event {
        subscription_id: String,
        event: Box<Event>,
    },
}

impl RelayMessage {
    /// Parse a text frame received from a relay.
    pub fn from_json(text: &str) -> Result<Self, NostrError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| NostrError::Protocol(format!("relay frame is not JSON: {e}")))?;
        let arr = value
            .as_array()
            .ok_or_else(|| NostrError::Protocol("relay message must be a JSON array".into()))?;
        let label = arr
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| NostrError::Protocol("relay message has no type label".into()))?;

        match label {
            "OK" => {
                if arr.len() < 3 {
                    return Err(NostrError::Protocol(
                        "OK message requires an event id and a status".into(),
                    ));
                }
                Ok(RelayMessage::Ok {
                    event_id: str_at(arr, 1, "OK event id")?,
                    accepted: arr[2].as_bool().ok_or_else(|| {
                        NostrError::Protocol("OK accepted field must be a boolean".into())
                    })?,
                    // Some relays omit the message entirely.
                    message: arr.get(3).and_then(Value::as_str).unwrap_or("").to_string(),
                })
            }
            "NOTICE" => Ok(RelayMessage::Notice(str_at(arr, 1, "NOTICE message")?)),
            "EOSE" => Ok(RelayMessage::Eose(str_at(arr, 1, "EOSE subscription id")?)),
            "CLOSED" => Ok(RelayMessage::Closed {
                subscription_id: str_at(arr, 1, "CLOSED subscription id")?,
                message: arr.get(2).and_then(Value::as_str).unwrap_or("").to_string(),
            }),
            "EVENT" => {
                let subscription_id = str_at(arr, 1, "EVENT subscription id")?;
                let event = arr
                    .get(2)
                    .cloned()
                    .ok_or_else(|| NostrError::Protocol("EVENT message has no event".into()))?;
                Ok(RelayMessage::Event {
                    subscription_id,
                    event: Box::new(serde_json::from_value(event)?),
                })
            }
            other => Err(NostrError::Protocol(format!(
                "unknown relay message type: {other}"
            ))),
        }
    }
}

fn str_at(arr: &[Value], index: usize, what: &str) -> Result<String, NostrError> {
    arr.get(index)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| NostrError::Protocol(format!("{what} must be a string")))
}
