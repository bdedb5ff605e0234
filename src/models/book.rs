//! Book record model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Full book record as stored on the shelf
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// 16-character random identifier
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_page: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading: Option<bool>,
    /// Computed at creation: `pageCount == readPage`
    pub finished: bool,
    #[serde(serialize_with = "iso8601::serialize")]
    #[schema(value_type = String, format = DateTime)]
    pub inserted_at: DateTime<Utc>,
    #[serde(serialize_with = "iso8601::serialize")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

/// Short representation for lists
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BookShort {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl From<&Book> for BookShort {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Request body for creating or updating a book.
///
/// Every field is optional on the wire; `name` is enforced by the add operation only.
/// The page counters keep an explicit `null` apart from a missing key
/// (`Some(None)` vs `None`): a `null` counter compares as zero.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub page_count: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub read_page: Option<Option<i32>>,
    pub reading: Option<bool>,
}

impl BookPayload {
    /// True when `readPage` is greater than `pageCount`.
    /// A missing counter never compares; a `null` one counts as zero.
    pub fn read_page_exceeds_page_count(&self) -> bool {
        match (self.read_page, self.page_count) {
            (Some(read), Some(count)) => read.unwrap_or(0) > count.unwrap_or(0),
            _ => false,
        }
    }

    /// A book is finished when both counters are equal.
    /// Two missing or two `null` counters are equal, a missing and a `null` one are not.
    pub fn is_finished(&self) -> bool {
        self.page_count == self.read_page
    }
}

/// Query parameters for listing books.
///
/// Each key may be repeated, so every field collects all of its values.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    #[serde(default)]
    pub name: Vec<String>,
    /// Numeric flag: any non-zero number selects books being read
    #[serde(default)]
    pub reading: Vec<String>,
    /// `1` selects finished books, any other value unfinished ones
    #[serde(default)]
    pub finished: Vec<String>,
}

impl BookQuery {
    /// Name filter from the last `name` value, ignored when empty
    pub fn name_filter(&self) -> Option<String> {
        self.name
            .last()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_lowercase())
    }

    /// A repeated `reading` key is never truthy
    pub fn reading_filter(&self) -> Option<bool> {
        match self.reading.as_slice() {
            [] => None,
            [value] => Some(numeric_truthiness(value)),
            _ => Some(false),
        }
    }

    /// A repeated `finished` key never equals `1`
    pub fn finished_filter(&self) -> Option<bool> {
        match self.finished.as_slice() {
            [] => None,
            [value] => Some(value == "1"),
            _ => Some(false),
        }
    }

    /// Whether a stored book passes every filter present in the query
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(name) = self.name_filter() {
            if !book.name.to_lowercase().contains(&name) {
                return false;
            }
        }
        if let Some(reading) = self.reading_filter() {
            if book.reading != Some(reading) {
                return false;
            }
        }
        if let Some(finished) = self.finished_filter() {
            if book.finished != finished {
                return false;
            }
        }
        true
    }
}

/// Reads a query value as a number literal and reports whether it is non-zero.
///
/// Accepts decimal and exponent forms, unsigned `0x`/`0o`/`0b` integers and the
/// spelling `Infinity`. Blank input counts as zero, anything else as not a number.
fn numeric_truthiness(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return false;
    }

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        let digits = trimmed
            .get(..2)
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map(|_| &trimmed[2..]);
        if let Some(digits) = digits {
            return !digits.is_empty()
                && digits.chars().all(|c| c.is_digit(radix))
                && digits.chars().any(|c| c != '0');
        }
    }

    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return true;
    }
    if !unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return false;
    }
    match trimmed.parse::<f64>() {
        Ok(value) => value != 0.0 && !value.is_nan(),
        Err(_) => false,
    }
}

/// Millisecond-precision UTC timestamps (`2026-10-19T08:30:00.123Z`)
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}
