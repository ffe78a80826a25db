// src/flatten/mod.rs
//! Flattens a nested profile record into one fixed-width CSV row.
//!
//! Pure and deterministic: no I/O, same input always yields byte-identical
//! output. Repeating groups are truncated or padded to their slot bounds,
//! missing values render as empty strings.

pub mod columns;

pub use columns::{COLUMNS, COLUMN_COUNT, EDUCATION_SLOTS, EXPERIENCE_SLOTS, LANGUAGE_SLOTS};

use crate::types::{ExperienceEntry, PositionEntry, ProfileRecord};
use serde_json::Value;

/// One output row, values ordered exactly as [`COLUMNS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    values: Vec<String>,
}

impl CsvRow {
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Look up a value by column name. Intended for tests and callers that
    /// inspect single fields; serialization goes through `to_csv`.
    pub fn get(&self, column: &str) -> Option<&str> {
        COLUMNS
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i].as_str())
    }

    /// Bare column names, comma-joined.
    pub fn header() -> String {
        COLUMNS.join(",")
    }

    /// Header line plus the quoted data line, newline-separated. Every data
    /// field is double-quoted with embedded quotes doubled, empty fields
    /// included.
    pub fn to_csv(&self) -> String {
        format!("{}\n{}", Self::header(), quote_line(&self.values))
    }
}

fn quote_line(values: &[String]) -> String {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());
    writer
        .write_record(values)
        .expect("in-memory CSV write cannot fail");
    let bytes = writer
        .into_inner()
        .expect("in-memory CSV flush cannot fail");
    let line = String::from_utf8(bytes).expect("CSV output is valid UTF-8");
    line.trim_end_matches(['\r', '\n']).to_string()
}

/// Map a profile record to the fixed 104-column row.
pub fn flatten(record: &ProfileRecord) -> CsvRow {
    let mut values = Vec::with_capacity(COLUMN_COUNT);

    // Scalar identity columns.
    values.push(scalar_string(record.linkedin_num_id.as_ref()));
    values.push(String::new()); // id_type is reserved in the schema
    values.push(text(&record.linkedin_id));
    values.push(first_non_empty(&[
        record.url.as_deref(),
        record.input_url.as_deref(),
    ]));
    values.push(text(&record.name));
    let (first_name, last_name) = split_name(record.name.as_deref());
    values.push(first_name);
    values.push(last_name);
    values.push(text(&record.avatar));
    values.push(text(&record.position));
    values.push(text(&record.city));
    values.push(normalize_text(record.about.as_deref()));

    // Experience slots: positions expand to one record each, then the list
    // is truncated to the slot count and padded with empties.
    let experience = expand_experience(record);
    for slot in 0..EXPERIENCE_SLOTS {
        match experience.get(slot) {
            Some(entry) => {
                values.push(entry.organization.clone());
                values.push(slot_code(slot));
                values.push(entry.organization_url.clone());
                values.push(entry.title.clone());
                values.push(entry.start.clone());
                values.push(entry.end.clone());
                values.push(entry.description.clone());
            }
            None => values.extend(std::iter::repeat_with(String::new).take(7)),
        }
    }

    // Education slots map 1:1, first three entries only.
    let education = record.education.as_deref().unwrap_or(&[]);
    for slot in 0..EDUCATION_SLOTS {
        match education.get(slot) {
            Some(entry) => {
                values.push(text(&entry.title));
                values.push(text(&entry.degree));
                values.push(text(&entry.field));
                values.push(scalar_string(entry.start_year.as_ref()));
                values.push(scalar_string(entry.end_year.as_ref()));
            }
            None => values.extend(std::iter::repeat_with(String::new).take(5)),
        }
    }

    // Language slots, first three entries only.
    let languages = record.languages.as_deref().unwrap_or(&[]);
    for slot in 0..LANGUAGE_SLOTS {
        match languages.get(slot) {
            Some(entry) => {
                values.push(text(&entry.title));
                values.push(text(&entry.subtitle));
            }
            None => values.extend(std::iter::repeat_with(String::new).take(2)),
        }
    }

    // Summary columns are unbounded joins over the full input lists.
    values.push(
        languages
            .iter()
            .map(|l| l.title.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(", "),
    );
    values.push(
        record
            .skills
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|s| s.name.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(", "),
    );

    debug_assert_eq!(values.len(), COLUMN_COUNT);
    CsvRow { values }
}

struct ExperienceSlot {
    organization: String,
    organization_url: String,
    title: String,
    start: String,
    end: String,
    description: String,
}

/// Build the flattened experience list: an entry with positions emits one
/// record per position (inheriting the parent's organization and URL),
/// otherwise the entry itself becomes a single record. Input order is
/// preserved; truncation to the slot bound happens at fill time.
fn expand_experience(record: &ProfileRecord) -> Vec<ExperienceSlot> {
    let company_link = record
        .current_company
        .as_ref()
        .and_then(|c| c.link.as_deref());

    let mut slots = Vec::new();
    for entry in record.experience.as_deref().unwrap_or(&[]) {
        let organization = text(&entry.company);
        let organization_url = first_non_empty(&[entry.url.as_deref(), company_link]);

        match entry.positions.as_deref() {
            Some(positions) if !positions.is_empty() => {
                for position in positions {
                    slots.push(ExperienceSlot {
                        organization: organization.clone(),
                        organization_url: organization_url.clone(),
                        title: text(&position.title),
                        start: text(&position.start_date),
                        end: text(&position.end_date),
                        description: normalize_text(position_description(position, entry)),
                    });
                }
            }
            _ => slots.push(ExperienceSlot {
                organization,
                organization_url,
                title: text(&entry.title),
                start: text(&entry.start_date),
                end: text(&entry.end_date),
                description: normalize_text(entry_description(entry)),
            }),
        }
    }
    slots
}

// Description priority for a position row: its own description, then its
// HTML description, then the parent experience's description.
fn position_description<'a>(
    position: &'a PositionEntry,
    parent: &'a ExperienceEntry,
) -> Option<&'a str> {
    [
        position.description.as_deref(),
        position.description_html.as_deref(),
        parent.description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty())
}

fn entry_description(entry: &ExperienceEntry) -> Option<&str> {
    [
        entry.description.as_deref(),
        entry.description_html.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty())
}

/// Canonical free-text normalization: every line-break sequence becomes a
/// single space, then the result is trimmed.
fn normalize_text(text: Option<&str>) -> String {
    match text {
        Some(raw) => raw
            .replace("\r\n", " ")
            .replace(['\r', '\n'], " ")
            .trim()
            .to_string(),
        None => String::new(),
    }
}

/// Full name splits at the first space: first token, then the remainder.
fn split_name(name: Option<&str>) -> (String, String) {
    match name.filter(|n| !n.is_empty()) {
        Some(full) => match full.split_once(' ') {
            Some((first, rest)) => (first.to_string(), rest.to_string()),
            None => (full.to_string(), String::new()),
        },
        None => (String::new(), String::new()),
    }
}

/// Generated organization identifier for a populated slot: `1000 + index`,
/// rendered as its last four digits.
fn slot_code(index: usize) -> String {
    format!("{:04}", (1000 + index) % 10_000)
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn first_non_empty(candidates: &[Option<&str>]) -> String {
    candidates
        .iter()
        .copied()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn scalar_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
