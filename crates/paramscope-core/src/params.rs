//! Request parameter extraction.
//!
//! Bodies and query strings arrive in heterogeneous encodings. Everything is
//! normalised into a [`ParameterSet`]: an ordered map of dotted-path keys to
//! leaf values.

use std::borrow::Cow;
use std::fmt;

use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use url::Url;

use crate::exchange::Header;

/// Request headers worth showing; everything else is noise for API work.
pub const IMPORTANT_HEADERS: &[&str] = &["authorization", "cookie"];

/// A flattened parameter value.
///
/// Arrays are opaque leaves and are never expanded into indexed keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
    Array(Vec<Value>),
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => ParamValue::String(s),
            Value::Number(n) => ParamValue::Number(n),
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Null => ParamValue::Null,
            Value::Array(items) => ParamValue::Array(items),
            // Flattening never leaves an object at a leaf.
            other @ Value::Object(_) => ParamValue::String(other.to_string()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::String(s) => f.write_str(s),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Null => f.write_str("null"),
            ParamValue::Array(items) => {
                let compact = Value::Array(items.clone()).to_string();
                f.write_str(&compact)
            }
        }
    }
}

/// Ordered key/value parameters with unique keys.
///
/// Re-inserting a key keeps its original position and replaces the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = ParameterSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, ParamValue);
    type IntoIter = std::vec::IntoIter<(String, ParamValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for ParameterSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Flatten a JSON object into dotted-path keys.
///
/// Nested objects are descended into; every other value becomes a leaf.
/// Keys follow the object's own order.
pub fn flatten(object: &Map<String, Value>) -> ParameterSet {
    let mut set = ParameterSet::new();
    flatten_into(&mut set, "", object);
    set
}

fn flatten_into(set: &mut ParameterSet, prefix: &str, object: &Map<String, Value>) {
    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(nested) => flatten_into(set, &path, nested),
            leaf => set.insert(path, leaf.clone()),
        }
    }
}

/// Parameters carried by a request body.
///
/// JSON objects are flattened; anything else is read as a
/// `key=value&key=value` form.
pub fn extract_body_params(text: &str) -> ParameterSet {
    if text.is_empty() {
        return ParameterSet::new();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => flatten(&object),
        _ => parse_pairs(text),
    }
}

/// Parameters carried by a URL's query string. Last duplicate wins.
pub fn extract_query_params(url: &str) -> ParameterSet {
    match Url::parse(url) {
        Ok(parsed) => parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        Err(_) => {
            let query = url
                .split_once('?')
                .map(|(_, rest)| rest.split('?').next().unwrap_or(rest))
                .unwrap_or("");
            parse_pairs(query)
        }
    }
}

/// Keep only the headers in [`IMPORTANT_HEADERS`], in original order and
/// casing.
pub fn extract_important_headers(headers: &[Header]) -> Vec<Header> {
    headers
        .iter()
        .filter(|h| {
            IMPORTANT_HEADERS
                .iter()
                .any(|name| h.name.eq_ignore_ascii_case(name))
        })
        .cloned()
        .collect()
}

/// Render parameters as `key:value` lines for copying.
pub fn format_as_lines(params: &ParameterSet) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}:{}", k, v))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split `a=1&b=2` into pairs. A missing `=` yields an empty value and
/// pairs without a key are skipped.
fn parse_pairs(text: &str) -> ParameterSet {
    let mut set = ParameterSet::new();
    for pair in text.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key.is_empty() {
            continue;
        }
        set.insert(decode_component(key), decode_component(value));
    }
    set
}

/// Percent-decode without treating `+` as a space. Invalid UTF-8 keeps the
/// raw text.
fn decode_component(raw: &str) -> String {
    percent_decode_str(raw)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
