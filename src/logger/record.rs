/*
 * Responsibility
 * - 1 回のログ呼び出しで作られる Record (timestamp / level / message / fields)
 * - 生成後は不変。renderer が同期的に消費する
 */
use std::fmt;

use chrono::{DateTime, Local};
use tracing::Level;

/// A single key/value pair attached to a record.
///
/// The value is rendered through `Display` once, when the field is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub value: String,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            key: key.into(),
            value: value.to_string(),
        }
    }
}

/// Converts call-site pairs into owned fields, keeping their order.
pub fn fields_from(pairs: &[(&str, &dyn fmt::Display)]) -> Vec<Field> {
    pairs.iter().map(|(k, v)| Field::new(*k, v)).collect()
}

#[derive(Debug, Clone)]
pub struct Record {
    pub timestamp: DateTime<Local>,
    pub level: Level,
    pub message: String,
    pub fields: Vec<Field>,
}

impl Record {
    pub fn new(level: Level, message: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
            fields,
        }
    }
}
