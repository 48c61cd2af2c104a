// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Coercion of raw generator output into cards.
//!
//! Generators are asked for a bare JSON array but routinely wrap it in a code
//! fence, put a sentence in front of it, run out of tokens halfway through, or
//! emit literal newlines inside strings. Each of those is repaired here before
//! the JSON is parsed.

use log::debug;
use log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::card::Card;

const DEFAULT_CARD_TYPE: &str = "recall";

#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(default)]
    front: String,
    #[serde(default)]
    back: String,
    #[serde(rename = "type", default)]
    card_type: Option<String>,
}

/// Parse a generator response into cards tagged with `title` and their type.
///
/// Records missing a front or a back are skipped.
pub fn parse_cards(response: &str, title: &str) -> Fallible<Vec<Card>> {
    let json = extract_json(response)?;
    let json = escape_control_chars(&json);
    let value: Value = serde_json::from_str(&json)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.into_iter().find_map(|(_, v)| match v {
            Value::Array(items) => Some(items),
            _ => None,
        }) {
            Some(items) => items,
            None => return fail("JSON object in response contains no array of cards"),
        },
        _ => return fail("Response JSON is neither an array nor an object"),
    };

    let mut cards = Vec::new();
    for item in items {
        let raw: RawCard = match serde_json::from_value(item) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Skipping malformed card record: {e}");
                continue;
            }
        };
        let front = raw.front.trim();
        let back = raw.back.trim();
        if front.is_empty() || back.is_empty() {
            continue;
        }
        let card_type = raw
            .card_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CARD_TYPE.to_string());
        cards.push(Card::new(front, back, vec![title.to_string(), card_type]));
    }
    Ok(cards)
}

/// Cut the JSON document out of a response.
fn extract_json(response: &str) -> Fallible<String> {
    let text = strip_code_fence(response.trim());
    if text.starts_with('{') {
        return Ok(text.to_string());
    }
    let text = match text.find('[') {
        Some(0) => text,
        Some(start) => {
            debug!("Dropping {start} bytes of text before the JSON array.");
            &text[start..]
        }
        None => return fail("No JSON array found in response"),
    };
    let text = text.trim_end();
    if text.ends_with(']') {
        return Ok(text.to_string());
    }
    warn!("Response appears truncated, keeping the complete records.");
    match text.rfind('}') {
        Some(end) => Ok(format!("{}\n]", &text[..=end])),
        None => fail("Response is too truncated to parse"),
    }
}

/// Remove a surrounding markdown code fence, if there is one.
fn strip_code_fence(text: &str) -> &str {
    if !text.starts_with("```") {
        return text;
    }
    let body = match text.find('\n') {
        Some(newline) => &text[newline + 1..],
        None => return "",
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Escape raw control characters that appear inside JSON string literals.
fn escape_control_chars(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in json.chars() {
        if !in_string {
            if c == '"' {
                in_string = true;
            }
            out.push(c);
            continue;
        }
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_string = false;
                out.push(c);
            }
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_array() -> Fallible<()> {
        let response = r#"[{"front": "Q1", "back": "A1", "type": "command"}]"#;
        let cards = parse_cards(response, "Git")?;
        assert_eq!(cards, vec![Card::new("Q1", "A1", vec!["Git".into(), "command".into()])]);
        Ok(())
    }

    #[test]
    fn test_missing_type_defaults_to_recall() -> Fallible<()> {
        let cards = parse_cards(r#"[{"front": "Q", "back": "A"}]"#, "T")?;
        assert_eq!(cards[0].card_type(), Some("recall"));
        Ok(())
    }

    #[test]
    fn test_leading_prose_is_dropped() -> Fallible<()> {
        let response = "Here is the JSON array you asked for:\n[{\"front\": \"Q\", \"back\": \"A\"}]";
        let cards = parse_cards(response, "T")?;
        assert_eq!(cards.len(), 1);
        Ok(())
    }

    #[test]
    fn test_code_fence_is_stripped() -> Fallible<()> {
        let response = "```json\n[{\"front\": \"Q\", \"back\": \"A\"}]\n```";
        let cards = parse_cards(response, "T")?;
        assert_eq!(cards.len(), 1);
        Ok(())
    }

    #[test]
    fn test_truncated_response_keeps_complete_records() -> Fallible<()> {
        let response = r#"[{"front": "Q1", "back": "A1"}, {"front": "Q2", "back": "A2"}, {"front": "Q3", "ba"#;
        let cards = parse_cards(response, "T")?;
        let fronts: Vec<&str> = cards.iter().map(|c| c.front()).collect();
        assert_eq!(fronts, vec!["Q1", "Q2"]);
        Ok(())
    }

    #[test]
    fn test_hopelessly_truncated_response_fails() {
        let result = parse_cards(r#"[{"front": "Q1", "ba"#, "T");
        assert!(result.is_err());
    }

    #[test]
    fn test_no_array_fails() {
        let result = parse_cards("I could not produce any cards.", "T");
        assert_eq!(
            result.unwrap_err().to_string(),
            "error: No JSON array found in response"
        );
    }

    #[test]
    fn test_raw_newlines_inside_strings() -> Fallible<()> {
        let response = "[{\"front\": \"Q\", \"back\": \"```python\nprint(1)\n```\"}]";
        let cards = parse_cards(response, "T")?;
        assert_eq!(cards[0].back(), "```python\nprint(1)\n```");
        Ok(())
    }

    #[test]
    fn test_escaped_quotes_are_not_string_ends() -> Fallible<()> {
        let response = "[{\"front\": \"say \\\"hi\\\"\", \"back\": \"a\tb\"}]";
        let cards = parse_cards(response, "T")?;
        assert_eq!(cards[0].front(), "say \"hi\"");
        assert_eq!(cards[0].back(), "a\tb");
        Ok(())
    }

    #[test]
    fn test_object_wrapper() -> Fallible<()> {
        let response = r#"{"flashcards": [{"front": "Q", "back": "A"}]}"#;
        let cards = parse_cards(response, "T")?;
        assert_eq!(cards.len(), 1);
        Ok(())
    }

    #[test]
    fn test_incomplete_records_are_skipped() -> Fallible<()> {
        let response = r#"[{"front": "  ", "back": "A"}, {"front": "Q"}, {"front": 3, "back": "A"}, {"front": " Q ", "back": " A "}]"#;
        let cards = parse_cards(response, "T")?;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front(), "Q");
        assert_eq!(cards[0].back(), "A");
        Ok(())
    }
}
