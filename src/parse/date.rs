use chrono::NaiveDate;
use serde::Serializer;

/// Format used for every date written to the document (`dd/MM/yyyy`).
pub const WRITE_FORMAT: &str = "%d/%m/%Y";

/// Read formats, tried in order; the first one that parses wins.
/// `dd/MM/yyyy`, then `d/M/yyyy`, then ISO `yyyy-MM-dd` as sent by date inputs.
const READ_FORMATS: [&str; 3] = ["%d/%m/%Y", "%-d/%-m/%Y", "%Y-%m-%d"];

/// Parse a date literal. Empty or unparsable text yields the unset date (`None`).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    READ_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Format a date for the document. The unset date is written as `""`.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(WRITE_FORMAT).to_string())
        .unwrap_or_default()
}

/// `serialize_with` hook for `Task::due`
pub fn serialize<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_date(*date))
}
