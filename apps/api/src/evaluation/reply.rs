//! Model reply parsing.
//!
//! The model is asked for `"Job Description Match":"<pct>%", "Missing Keywords":"..."`
//! but nothing guarantees it complies. The reply is read as a JSON object when it
//! is one (with or without the surrounding braces), including fields nested in
//! inner objects, and otherwise scanned for `"key": value` pairs. Either way the
//! first occurrence of a key wins. `Job Description Match` is the only required field.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::strip_json_fences;

pub const MATCH_FIELD: &str = "Job Description Match";
pub const MISSING_KEYWORDS_FIELD: &str = "Missing Keywords";

/// Reserved match value meaning the model could not produce a numeric score.
pub const NOT_APPLICABLE: &str = "N/A";

/// `"key": "text"`, `"key": [list]` or `"key": number`.
static FIELD_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"\\]+)"\s*:\s*(?:"([^"]*)"|\[([^\]]*)\]|(-?\d+(?:\.\d+)?))"#)
        .expect("field pair pattern is valid")
});

#[derive(Debug, Error, PartialEq)]
pub enum ReplyError {
    #[error("model reply has no \"Job Description Match\" field")]
    MissingMatchField,

    #[error("match percentage '{0}' is not a number between 0 and 100")]
    InvalidPercentage(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchScore {
    Percent(f64),
    NotApplicable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelReply {
    pub score: MatchScore,
    /// Keywords the model reports as missing, lower-cased. Empty when absent.
    pub missing_keywords: Vec<String>,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq)]
enum FieldValue {
    Text(String),
    List(Vec<String>),
}

/// Reply fields keyed by lower-cased, trimmed name. First occurrence wins.
#[derive(Debug, Default)]
struct ReplyFields(HashMap<String, FieldValue>);

impl ReplyFields {
    fn parse(text: &str) -> Self {
        Self::from_json(text)
            .or_else(|| Self::from_json(&format!("{{{text}}}")))
            .unwrap_or_else(|| Self::scan(text))
    }

    fn from_json(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }

    fn scan(text: &str) -> Self {
        let mut fields = Self::default();
        for caps in FIELD_PAIR.captures_iter(text) {
            let value = if let Some(list) = caps.get(3) {
                FieldValue::List(
                    list.as_str()
                        .split(',')
                        .map(|item| item.trim().trim_matches('"').to_string())
                        .collect(),
                )
            } else {
                let text = caps.get(2).or_else(|| caps.get(4)).map_or("", |m| m.as_str());
                FieldValue::Text(text.to_string())
            };
            fields.insert(&caps[1], value);
        }
        fields
    }

    fn insert(&mut self, key: &str, value: FieldValue) {
        self.0
            .entry(key.trim().to_lowercase())
            .or_insert(value);
    }

    fn merge(&mut self, inner: ReplyFields) {
        for (key, value) in inner.0 {
            self.0.entry(key).or_insert(value);
        }
    }

    fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(&key.to_lowercase())
    }
}

// Entries reach `insert` in document order, duplicates included; a
// `serde_json::Map` would keep only the last value of a repeated key.
impl<'de> Deserialize<'de> for ReplyFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ReplyFieldsVisitor)
    }
}

struct ReplyFieldsVisitor;

impl<'de> Visitor<'de> for ReplyFieldsVisitor {
    type Value = ReplyFields;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ReplyFields, A::Error> {
        let mut fields = ReplyFields::default();
        while let Some((key, entry)) = map.next_entry::<String, JsonEntry>()? {
            match entry {
                JsonEntry::Nested(inner) => fields.merge(inner),
                JsonEntry::Value(Value::String(s)) => fields.insert(&key, FieldValue::Text(s)),
                JsonEntry::Value(Value::Number(n)) => {
                    fields.insert(&key, FieldValue::Text(n.to_string()))
                }
                JsonEntry::Value(Value::Array(items)) => fields.insert(
                    &key,
                    FieldValue::List(items.into_iter().map(json_text).collect()),
                ),
                JsonEntry::Value(_) => {}
            }
        }
        Ok(fields)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonEntry {
    Nested(ReplyFields),
    Value(Value),
}

fn json_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Parses the model's reply into a score and the model-reported missing keywords.
pub fn parse_reply(response_text: &str) -> Result<ModelReply, ReplyError> {
    let fields = ReplyFields::parse(strip_json_fences(response_text));

    let score = match fields.get(MATCH_FIELD) {
        Some(FieldValue::Text(value)) => parse_score(value)?,
        Some(FieldValue::List(items)) => {
            return Err(ReplyError::InvalidPercentage(items.join(",")));
        }
        None => return Err(ReplyError::MissingMatchField),
    };

    let missing_keywords = match fields.get(MISSING_KEYWORDS_FIELD) {
        Some(FieldValue::Text(value)) => normalize_keywords(value.split(',')),
        Some(FieldValue::List(items)) => normalize_keywords(items.iter().map(String::as_str)),
        None => Vec::new(),
    };

    Ok(ModelReply {
        score,
        missing_keywords,
        raw: response_text.to_string(),
    })
}

fn parse_score(value: &str) -> Result<MatchScore, ReplyError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case(NOT_APPLICABLE) {
        return Ok(MatchScore::NotApplicable);
    }

    let percent = value
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .map_err(|_| ReplyError::InvalidPercentage(value.to_string()))?;

    if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
        return Err(ReplyError::InvalidPercentage(value.to_string()));
    }
    Ok(MatchScore::Percent(percent))
}

fn normalize_keywords<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}
