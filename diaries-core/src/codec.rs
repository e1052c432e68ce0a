//! Payload codec: typed domain data to and from untyped wire payloads
//!
//! # Why a Codec Module?
//!
//! Reply payloads arrive as generic JSON whose shape is method-specific and
//! validated nowhere else. The decoders here are the single boundary past
//! which no untyped value may travel: each expected shape (list-of-mapping,
//! nested string, integer) has one decode function that returns a typed
//! record or a specific decode error.
//!
//! # Atomic List Decoding
//!
//! [`decode_list`] validates the payload is a sequence and every element is a
//! mapping before handing elements to the item decoder. A single wrong-shaped
//! element fails the whole decode; no partial list is ever returned.
//!
//! # Examples
//!
//! ```rust
//! use diaries_core::{codec, Request};
//!
//! let request = Request::new("getDiaries").param("accessToken", "tok1");
//! let json = codec::encode(&request).unwrap();
//! assert!(json.contains("\"method\":\"getDiaries\""));
//! ```

use crate::error::{Error, Result};
use crate::model::{Diary, Page, SigninReply};
use crate::types::{Request, Response};
use serde_json::{Map, Value};

/// Encode a request envelope to its canonical JSON form
///
/// Field order is not guaranteed; every supported parameter type (string,
/// number, boolean, nested mapping) round-trips.
pub fn encode(request: &Request) -> Result<String> {
    serde_json::to_string(request).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decode a raw reply into a response envelope
///
/// A reply whose status block is absent or malformed is a fatal decode error
/// for that reply.
pub fn decode_response(data: &str) -> Result<Response> {
    serde_json::from_str(data).map_err(|e| Error::MalformedPayload(e.to_string()))
}

/// Name the JSON type of a value, for decode error reporting
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode a sequence-of-mappings payload into domain records
///
/// The item decoder sees each element only after it has been validated to be
/// a mapping. Decoding is atomic: the first wrong-shaped element or item
/// decode failure aborts the whole list.
pub fn decode_list<T>(
    payload: &Value,
    item_decoder: impl Fn(&Map<String, Value>) -> Result<T>,
) -> Result<Vec<T>> {
    let Value::Array(items) = payload else {
        return Err(Error::UnexpectedType {
            expected: "array",
            actual: json_type_name(payload),
        });
    };

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(map) = item else {
            return Err(Error::UnexpectedType {
                expected: "object",
                actual: json_type_name(item),
            });
        };
        records.push(item_decoder(map)?);
    }
    Ok(records)
}

/// Decode the signin reply's nested JSON document
///
/// The signin payload is a JSON *string* containing a second JSON document
/// with the token pair. A payload of any other type is `UnexpectedType`; a
/// string that does not parse as the expected document is
/// `MalformedPayload`.
pub fn decode_signin_reply(payload: &Value) -> Result<SigninReply> {
    let Value::String(inner) = payload else {
        return Err(Error::UnexpectedType {
            expected: "string",
            actual: json_type_name(payload),
        });
    };
    serde_json::from_str(inner).map_err(|e| Error::MalformedPayload(e.to_string()))
}

/// Decode the register reply's integer user id
pub fn decode_registration_id(payload: &Value) -> Result<i64> {
    payload.as_i64().ok_or(Error::UnexpectedType {
        expected: "integer",
        actual: json_type_name(payload),
    })
}

/// Extract a required string field from a record mapping
pub fn str_field(map: &Map<String, Value>, key: &str) -> Result<String> {
    match map.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(Error::UnexpectedType {
            expected: "string",
            actual: json_type_name(other),
        }),
        None => Err(Error::MalformedPayload(format!("missing field '{key}'"))),
    }
}

/// Extract a required integer field from a record mapping
pub fn i64_field(map: &Map<String, Value>, key: &str) -> Result<i64> {
    match map.get(key) {
        Some(value) => value.as_i64().ok_or(Error::UnexpectedType {
            expected: "integer",
            actual: json_type_name(value),
        }),
        None => Err(Error::MalformedPayload(format!("missing field '{key}'"))),
    }
}

/// Decode one diary record from its wire mapping
pub fn decode_diary(map: &Map<String, Value>) -> Result<Diary> {
    Ok(Diary {
        id: i64_field(map, "id")?,
        title: str_field(map, "title")?,
    })
}

/// Decode one page record from its wire mapping
pub fn decode_page(map: &Map<String, Value>) -> Result<Page> {
    Ok(Page {
        id: i64_field(map, "id")?,
        title: str_field(map, "title")?,
    })
}
