//! Normalization of recipe directions.
//!
//! Directions are stored as an ordered list of steps. Forms collect them as
//! one free-text block and older documents may hold a single string; both
//! are folded into the list form here.

use serde::{Deserialize, Deserializer};

/// Split a free-text block into trimmed, non-empty steps.
///
/// Leading list markers (`1.`, `2)`, `-`, `*`, `•`) are stripped so that a
/// rendered list parses back into the same steps.
pub fn parse_block(block: &str) -> Vec<String> {
    block
        .lines()
        .map(|line| strip_marker(line.trim()).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Trim every step and drop the empty ones.
pub fn normalize_steps<I, S>(steps: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    steps
        .into_iter()
        .flat_map(|step| parse_block(step.as_ref()))
        .collect()
}

/// Render steps as the block an edit form starts with.
pub fn render(steps: &[String]) -> String {
    steps.join("\n")
}

fn strip_marker(line: &str) -> &str {
    for bullet in ["-", "*", "•"] {
        if let Some(rest) = line.strip_prefix(bullet) {
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                return rest;
            }
        }
    }

    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let rest = &line[digits..];
        for sep in ['.', ')'] {
            if let Some(after) = rest.strip_prefix(sep) {
                if after.is_empty() || after.starts_with(char::is_whitespace) {
                    return after;
                }
            }
        }
    }
    line
}

/// Either representation found in stored documents.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDirections {
    Block(String),
    Steps(Vec<String>),
}

/// Serde adapter accepting a string block or a list of steps.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StoredDirections::deserialize(deserializer)? {
        StoredDirections::Block(block) => parse_block(&block),
        StoredDirections::Steps(steps) => normalize_steps(steps),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_splits_on_lines() {
        assert_eq!(
            parse_block("Boil water\n\n  Add pasta  \r\nDrain"),
            ["Boil water", "Add pasta", "Drain"]
        );
    }

    #[test]
    fn single_line_block_is_one_step() {
        assert_eq!(parse_block("Mix everything and bake"), ["Mix everything and bake"]);
    }

    #[test]
    fn list_markers_are_stripped() {
        assert_eq!(
            parse_block("1. Preheat\n2) Mix\n- Pour\n* Bake\n• Cool"),
            ["Preheat", "Mix", "Pour", "Bake", "Cool"]
        );
    }

    #[test]
    fn numbers_that_are_not_markers_survive() {
        assert_eq!(parse_block("350 degrees for 20 min"), ["350 degrees for 20 min"]);
        assert_eq!(parse_block("-5 is too cold"), ["-5 is too cold"]);
    }

    #[test]
    fn render_round_trips() {
        let steps = parse_block("1. Chop\n2. Fry");
        assert_eq!(parse_block(&render(&steps)), steps);
    }

    #[test]
    fn blank_input_has_no_steps() {
        assert!(parse_block("  \n\n ").is_empty());
        assert!(normalize_steps(["", "  "]).is_empty());
    }

    #[test]
    fn deserializes_both_shapes() {
        #[derive(Deserialize)]
        struct Doc {
            #[serde(deserialize_with = "deserialize")]
            direction: Vec<String>,
        }

        let legacy: Doc = serde_json::from_str(r#"{"direction": "Stir\nServe"}"#).unwrap();
        assert_eq!(legacy.direction, ["Stir", "Serve"]);

        let seeded: Doc = serde_json::from_str(r#"{"direction": [" Stir ", "", "Serve"]}"#).unwrap();
        assert_eq!(seeded.direction, ["Stir", "Serve"]);
    }
}
