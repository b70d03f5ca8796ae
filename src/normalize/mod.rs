//! Response normalization.
//!
//! The API sits behind a gateway that may wrap the member array in a
//! `{statusCode, headers, body}` envelope, sometimes with `body` as a JSON
//! string, and sometimes twice. This module peels at most two envelopes and
//! turns each member object into a [`MemberRecord`] with coerced numbers.

pub mod coerce;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::calculate::attacks_left;
use crate::models::{
    MemberRecord, CUM_ATTACKS_POSSIBLE, CUM_ATTACKS_USED, CUM_DESTRUCTION_PCT, LAST_UPDATED,
    PLAYER_ID, PLAYER_NAME, TOWN_HALL,
};

pub use coerce::{finite, to_number};

const ENVELOPE_KEY: &str = "body";

/// Errors that can occur while normalizing a payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("failed to parse response body")]
    MalformedPayload(#[source] serde_json::Error),

    #[error("expected an array of members")]
    UnexpectedShape,
}

/// Unwrap the gateway envelope and return the member array.
pub fn unwrap_envelope(data: Value) -> Result<Vec<Value>, PayloadError> {
    let mut body = take_body(data);

    if let Value::String(text) = &body {
        body = serde_json::from_str(text).map_err(PayloadError::MalformedPayload)?;
    }

    // Double-wrapped: one more level, best effort.
    if has_body(&body) {
        debug!("Unwrapping second response envelope");
        body = take_body(body);
        if let Value::String(text) = &body {
            match serde_json::from_str(text) {
                Ok(parsed) => body = parsed,
                Err(e) => debug!("Inner body is not JSON, leaving as text: {}", e),
            }
        }
    }

    match body {
        Value::Array(items) => Ok(items),
        _ => Err(PayloadError::UnexpectedShape),
    }
}

/// Normalize a decoded API response into member records.
///
/// Output order and length match the member array exactly.
pub fn parse_payload(data: Value) -> Result<Vec<MemberRecord>, PayloadError> {
    let items = unwrap_envelope(data)?;
    debug!("Normalizing {} member records", items.len());
    Ok(items.into_iter().map(member_from_value).collect())
}

/// Build a record from one array element. Non-object elements yield a
/// record with every field absent.
pub fn member_from_value(value: Value) -> MemberRecord {
    let mut object = match value {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    let town_hall = take_number(&mut object, TOWN_HALL);
    let cum_attacks_used = take_number(&mut object, CUM_ATTACKS_USED);
    let cum_attacks_possible = take_number(&mut object, CUM_ATTACKS_POSSIBLE);
    let cum_destruction_pct = take_number(&mut object, CUM_DESTRUCTION_PCT);

    MemberRecord {
        player_id: take_text(&mut object, PLAYER_ID),
        player_name: take_text(&mut object, PLAYER_NAME),
        town_hall,
        cum_attacks_used,
        cum_attacks_possible,
        cum_destruction_pct,
        last_updated: take_text(&mut object, LAST_UPDATED),
        attacks_left: attacks_left(cum_attacks_used, cum_attacks_possible),
        extra: object,
        ..Default::default()
    }
}

fn has_body(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| map.contains_key(ENVELOPE_KEY))
}

fn take_body(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key(ENVELOPE_KEY) => {
            map.remove(ENVELOPE_KEY).unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn take_number(object: &mut Map<String, Value>, key: &str) -> Option<f64> {
    object.remove(key).as_ref().and_then(to_number)
}

/// Identifiers and names are usually strings, but numeric IDs are kept as
/// their text form.
fn take_text(object: &mut Map<String, Value>, key: &str) -> Option<String> {
    match object.remove(key)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
