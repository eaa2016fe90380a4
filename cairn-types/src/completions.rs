//! Autocomplete payloads and the parsers that unify them.
//!
//! Completion sources speak two wire formats: a JSON "ResultSet" envelope, and
//! a legacy pipe-delimited text blob. [`RawCompletions`] covers both and
//! produces one of two output shapes, a plain identifier list or a list of
//! [`Completion`] pairs.

use crate::ParseError;
use fake::{faker::lorem::en::Word, Fake};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single autocomplete suggestion.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Completion {
    /// The value to submit when this suggestion is picked.
    pub id: String,

    /// The value to display to the user.
    pub text: String,
}

impl<F> fake::Dummy<F> for Completion {
    fn dummy_with_rng<R: rand::Rng + ?Sized>(_config: &F, rng: &mut R) -> Self {
        let word: String = Word().fake_with_rng(rng);
        Self {
            id: word.to_lowercase(),
            text: word,
        }
    }
}

/// The envelope format expected by select-style autocomplete widgets.
///
/// Serializes as `{"results": [...]}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectResults {
    /// The suggestions, as id/text pairs.
    pub results: Vec<Completion>,
}

/// The outer layer of a ResultSet completion payload:
/// `{"ResultSet": {"Result": [...]}}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultSetEnvelope {
    /// The result set itself.
    #[serde(rename = "ResultSet")]
    pub result_set: ResultSet,
}

/// The record list inside a [`ResultSetEnvelope`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultSet {
    /// The result records, in server order.
    #[serde(rename = "Result")]
    pub results: Vec<CompletionRecord>,
}

/// One record of a ResultSet payload.
///
/// Each record is expected to carry exactly one of `Name` or `Format`,
/// depending on the source. A record with neither is malformed.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionRecord {
    /// The suggested name, for name-shaped sources such as tags.
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The suggested format, for format-shaped sources.
    #[serde(rename = "Format", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// A raw completion payload, in either of the two wire formats.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawCompletions {
    /// A JSON ResultSet envelope.
    ResultSet(ResultSetEnvelope),

    /// A legacy pipe-delimited text blob, one `display|identifier` per line.
    Legacy(String),
}

impl RawCompletions {
    /// Interpret a response body as a completion payload. Bodies that do not
    /// decode as a ResultSet envelope are taken to be legacy text.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self::Legacy(body.to_string()))
    }

    /// Parse the payload into a plain identifier list.
    ///
    /// ResultSet values are trimmed and case-insensitively deduplicated; the
    /// first-seen form of each value wins. Legacy payloads delegate to
    /// [`parse_legacy_identifiers`].
    pub fn identifiers(&self) -> Result<Vec<String>, ParseError> {
        match self {
            Self::ResultSet(envelope) => deduped_values(envelope),
            Self::Legacy(text) => parse_legacy_identifiers(text),
        }
    }

    /// Parse the payload into a list of [`Completion`] pairs.
    ///
    /// ResultSet values map each retained value `v` to `{id: v, text: v}`.
    /// Legacy payloads delegate to [`parse_legacy_objects`], which keeps the
    /// display and identifier halves distinct.
    pub fn objects(&self) -> Result<Vec<Completion>, ParseError> {
        match self {
            Self::ResultSet(envelope) => Ok(deduped_values(envelope)?
                .into_iter()
                .map(|value| Completion {
                    id: value.clone(),
                    text: value,
                })
                .collect()),
            Self::Legacy(text) => parse_legacy_objects(text),
        }
    }

    /// Parse the payload into the select-widget envelope.
    pub fn select_results(&self) -> Result<SelectResults, ParseError> {
        Ok(SelectResults {
            results: self.objects()?,
        })
    }
}

/// Extract the raw value of every record, trimmed, in first-occurrence order,
/// dropping values already seen under case-insensitive comparison.
fn deduped_values(envelope: &ResultSetEnvelope) -> Result<Vec<String>, ParseError> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for (index, record) in envelope.result_set.results.iter().enumerate() {
        let raw = record
            .name
            .as_deref()
            .or(record.format.as_deref())
            .ok_or(ParseError::EmptyRecord { index })?;
        let value = raw.trim();
        // The first-seen form is kept; later duplicates are dropped, not merged.
        if seen.insert(value.to_lowercase()) {
            values.push(value.to_string());
        }
    }
    Ok(values)
}

/// Parse a legacy completion blob into its identifiers, in input order.
///
/// The legacy format is assumed to be deduplicated by the server, so no
/// dedup is applied here.
pub fn parse_legacy_identifiers(text: &str) -> Result<Vec<String>, ParseError> {
    legacy_lines(text)
        .map(|line| split_legacy_line(line).map(|(_display, id)| id.to_string()))
        .collect()
}

/// Parse a legacy completion blob into [`Completion`] pairs, in input order.
pub fn parse_legacy_objects(text: &str) -> Result<Vec<Completion>, ParseError> {
    legacy_lines(text)
        .map(|line| {
            split_legacy_line(line).map(|(display, id)| Completion {
                id: id.to_string(),
                text: display.to_string(),
            })
        })
        .collect()
}

/// The non-empty lines of a legacy blob. Skipping empty segments covers the
/// trailing newline terminator.
fn legacy_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.is_empty())
}

/// Split a legacy line on its single `|` into `(display, identifier)`.
fn split_legacy_line(line: &str) -> Result<(&str, &str), ParseError> {
    let mut parts = line.splitn(3, '|');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(display), Some(id), None) => Ok((display, id)),
        _ => Err(ParseError::MalformedLine(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// A ResultSet fixture with a `Name` per record.
    fn names_payload(names: &[&str]) -> RawCompletions {
        serde_json::from_value(json!({
            "ResultSet": {
                "Result": names.iter().map(|n| json!({ "Name": n })).collect::<Vec<_>>(),
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_names_parse_in_order() {
        let data = names_payload(&["1 percent", "18thc", "19thcentury"]);
        assert_eq!(
            data.identifiers().unwrap(),
            vec!["1 percent", "18thc", "19thcentury"]
        );
    }

    #[test]
    fn test_dedup_is_case_insensitive_and_first_form_wins() {
        let data = names_payload(&[" Test", "test", "TEST"]);
        assert_eq!(data.identifiers().unwrap(), vec!["Test"]);
    }

    #[test]
    fn test_format_records_parse_as_objects() {
        let data: RawCompletions = serde_json::from_value(json!({
            "ResultSet": {
                "Result": [
                    { "Format": "json" },
                    { "Format": "csv" },
                    { "Format": "text" },
                ]
            }
        }))
        .unwrap();
        assert_eq!(
            data.objects().unwrap(),
            vec![
                Completion {
                    id: "json".to_string(),
                    text: "json".to_string()
                },
                Completion {
                    id: "csv".to_string(),
                    text: "csv".to_string()
                },
                Completion {
                    id: "text".to_string(),
                    text: "text".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_name_wins_when_both_fields_are_present() {
        let data: RawCompletions = serde_json::from_value(json!({
            "ResultSet": { "Result": [{ "Name": "economy", "Format": "csv" }] }
        }))
        .unwrap();
        assert_eq!(data.identifiers().unwrap(), vec!["economy"]);
    }

    #[test]
    fn test_empty_record_is_rejected_with_its_index() {
        let data: RawCompletions = serde_json::from_value(json!({
            "ResultSet": { "Result": [{ "Name": "economy" }, {}] }
        }))
        .unwrap();
        assert_eq!(
            data.identifiers().unwrap_err(),
            ParseError::EmptyRecord { index: 1 }
        );
    }

    #[test]
    fn test_legacy_identifiers() {
        let data = RawCompletions::Legacy(
            "Package 1|package-1\nPackage 2|package-2\nPackage 3|package-3\n".to_string(),
        );
        assert_eq!(
            data.identifiers().unwrap(),
            vec!["package-1", "package-2", "package-3"]
        );
    }

    #[test]
    fn test_legacy_objects_keep_display_and_id_distinct() {
        let objects =
            parse_legacy_objects("Package 1|package-1\nPackage 2|package-2\n").unwrap();
        assert_eq!(
            objects,
            vec![
                Completion {
                    id: "package-1".to_string(),
                    text: "Package 1".to_string()
                },
                Completion {
                    id: "package-2".to_string(),
                    text: "Package 2".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_legacy_line_without_separator_is_rejected() {
        assert_eq!(
            parse_legacy_identifiers("Package 1|package-1\nnot a pair\n").unwrap_err(),
            ParseError::MalformedLine("not a pair".to_string())
        );
    }

    #[test]
    fn test_legacy_line_with_two_separators_is_rejected() {
        assert_eq!(
            parse_legacy_identifiers("a|b|c\n").unwrap_err(),
            ParseError::MalformedLine("a|b|c".to_string())
        );
    }

    #[test]
    fn test_from_body_picks_the_result_set_shape_for_json() {
        let raw = RawCompletions::from_body(r#"{"ResultSet": {"Result": [{"Name": "tag"}]}}"#);
        assert!(matches!(raw, RawCompletions::ResultSet(_)));
        assert_eq!(raw.identifiers().unwrap(), vec!["tag"]);
    }

    #[test]
    fn test_from_body_falls_back_to_legacy_text() {
        let raw = RawCompletions::from_body("Package 1|package-1\n");
        assert_eq!(
            raw,
            RawCompletions::Legacy("Package 1|package-1\n".to_string())
        );
    }

    #[test]
    fn test_select_results_wrap_object_mode() {
        let data = names_payload(&["economy"]);
        let wrapped = data.select_results().unwrap();
        assert_eq!(
            serde_json::to_value(&wrapped).unwrap(),
            json!({ "results": [{ "id": "economy", "text": "economy" }] })
        );
    }
}
