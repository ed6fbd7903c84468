use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// A single scalar in a result table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Timestamp(DateTime<Utc>),
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Text(text) => f.write_str(text),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%dT%H:%M:%SZ")),
        }
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<DateTime<Utc>> for Cell {
    fn from(value: DateTime<Utc>) -> Self {
        Cell::Timestamp(value)
    }
}

/// Ordered rows of ordered cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Table {
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        Self { rows }
    }

    /// One value per row, the way a flat list lands in a spreadsheet column.
    pub fn column<I, C>(values: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        Self {
            rows: values.into_iter().map(|v| vec![v.into()]).collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What a spreadsheet-style function hands back to its caller.
///
/// `Empty` is the single "no result" value. It serializes to an empty string so
/// a host cell shows nothing; it is never an empty table.
#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Empty,
    Table(Table),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl Answer {
    pub fn is_empty(&self) -> bool {
        matches!(self, Answer::Empty)
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Answer::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match self {
            Answer::Object(map) => Some(map),
            _ => None,
        }
    }
}

impl Serialize for Answer {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Answer::Empty => serializer.serialize_str(""),
            Answer::Table(table) => table.serialize(serializer),
            Answer::Object(map) => map.serialize(serializer),
        }
    }
}

/// Insertion-ordered map keyed by language code.
///
/// Re-inserting an existing language overwrites its value but keeps its
/// original position, so output order is first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LanguageMap<V> {
    entries: IndexMap<String, V>,
}

impl<V> Default for LanguageMap<V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<V> LanguageMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, language: impl Into<String>, value: V) {
        self.entries.insert(language.into(), value);
    }

    pub fn get(&self, language: &str) -> Option<&V> {
        self.entries.get(language)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A caller-supplied date bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateArg {
    /// Already in the remote API's own format (e.g. `20240131`); sent as given.
    Raw(String),
    Date(NaiveDate),
}

impl DateArg {
    /// `YYYY-MM-DD` becomes a structured date, anything else is kept raw.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
            Ok(date) => DateArg::Date(date),
            Err(_) => DateArg::Raw(input.to_string()),
        }
    }
}

impl From<NaiveDate> for DateArg {
    fn from(date: NaiveDate) -> Self {
        DateArg::Date(date)
    }
}

/// How Wikidata claims with several values are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MultiValueMode {
    /// Only claims with exactly one value produce a row.
    #[default]
    Single,
    /// Multi-valued claims contribute their first value.
    First,
    /// Multi-valued claims contribute every value, one row each.
    All,
}

impl MultiValueMode {
    /// Case-insensitive `"first"` / `"all"`, matched exactly; anything else,
    /// padded variants included, is the default mode.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(str::to_ascii_lowercase).as_deref() {
            Some("first") => MultiValueMode::First,
            Some("all") => MultiValueMode::All,
            _ => MultiValueMode::Single,
        }
    }
}
