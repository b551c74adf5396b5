use serde_json::Value;
use std::borrow::Cow;

use crate::xml::XmlDocument;

/// A decoded fixture, as stored in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// HTML, CSS, plain text, and anything that is not a JSON object or array
    Text(String),
    Json(Value),
    /// Document already parsed by the transport
    Document(XmlDocument),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&XmlDocument> {
        match self {
            Payload::Document(document) => Some(document),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Text(_) => "text",
            Payload::Json(_) => "json",
            Payload::Document(_) => "document",
        }
    }

    /// String form used when the payload is injected into a document.
    pub fn to_markup(&self) -> Cow<'_, str> {
        match self {
            Payload::Text(text) => Cow::Borrowed(text),
            Payload::Json(value) => Cow::Owned(value.to_string()),
            Payload::Document(document) => Cow::Borrowed(document.source()),
        }
    }
}

/// Classify a response body.
///
/// A document produced by the transport wins. Otherwise the body is JSON only
/// when it strictly parses to an object or array; everything else, malformed
/// JSON included, stays text.
pub fn classify(body: String, document: Option<XmlDocument>) -> Payload {
    if let Some(document) = document {
        return Payload::Document(document);
    }
    match parse_structured_json(&body) {
        Some(value) => Payload::Json(value),
        None => Payload::Text(body),
    }
}

/// True when `text` parses to a JSON object or array. `"123"`, `"true"`,
/// `"null"` and quoted strings are valid JSON but not fixtures of JSON type.
pub fn is_json(text: &str) -> bool {
    parse_structured_json(text).is_some()
}

pub fn is_json_value(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

fn parse_structured_json(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(is_json_value)
}
