//! YAML front-matter extraction.

use serde_json::Value as JsonValue;

use allweneed_shared::{Result, SiteError};

/// Front-matter split off the top of a markdown document.
#[derive(Debug)]
pub struct FrontMatter<'a> {
    /// Parsed metadata; always a JSON object.
    pub data: JsonValue,
    /// Markdown body following the closing fence.
    pub body: &'a str,
}

/// Split a leading `---` fenced YAML block from `input`.
///
/// Leading blank lines and a UTF-8 BOM are skipped. A document without a
/// fence yields an empty object and the whole input as body.
pub fn split(input: &str) -> Result<FrontMatter<'_>> {
    let without_bom = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut cursor = 0usize;

    loop {
        let Some((line, next)) = next_line(without_bom, cursor) else {
            return Ok(empty(without_bom));
        };

        if line.trim().is_empty() {
            cursor = next;
            continue;
        }

        if !is_fence(line) {
            return Ok(empty(without_bom));
        }

        let block_start = next;
        let mut scan = next;
        loop {
            match next_line(without_bom, scan) {
                Some((block_line, after)) if is_fence(block_line) => {
                    let block = &without_bom[block_start..scan];
                    return Ok(FrontMatter {
                        data: parse_block(block)?,
                        body: &without_bom[after..],
                    });
                }
                Some((_, after)) => scan = after,
                None => {
                    return Err(SiteError::parse(
                        "unterminated front-matter: expected closing '---'",
                    ));
                }
            }
        }
    }
}

fn empty(body: &str) -> FrontMatter<'_> {
    FrontMatter {
        data: JsonValue::Object(Default::default()),
        body,
    }
}

fn parse_block(block: &str) -> Result<JsonValue> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(block)
        .map_err(|e| SiteError::parse(format!("front-matter YAML: {e}")))?;
    let json = serde_json::to_value(yaml)
        .map_err(|e| SiteError::parse(format!("front-matter YAML: {e}")))?;

    match json {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(json),
        _ => Err(SiteError::parse("front-matter must be a YAML mapping")),
    }
}

fn next_line(input: &str, start: usize) -> Option<(&str, usize)> {
    if start >= input.len() {
        return None;
    }

    match input[start..].find('\n') {
        Some(pos) => Some((&input[start..start + pos], start + pos + 1)),
        None => Some((&input[start..], input.len())),
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end_matches('\r').trim_end() == "---"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_front_matter() {
        let fm = split("# Title\nBody").unwrap();
        assert_eq!(fm.data, JsonValue::Object(Default::default()));
        assert_eq!(fm.body, "# Title\nBody");
    }

    #[test]
    fn parses_mapping_and_body() {
        let input = "---\ntitle: ripgrep\ntags:\n  - cli\n  - search\n---\n# Content\n";
        let fm = split(input).unwrap();
        assert_eq!(fm.data["title"], "ripgrep");
        assert_eq!(fm.data["tags"][1], "search");
        assert_eq!(fm.body, "# Content\n");
    }

    #[test]
    fn tolerates_bom_blank_lines_and_crlf() {
        let input = "\u{feff}\n  \n---\r\nfoo: bar\r\n---\r\nBody";
        let fm = split(input).unwrap();
        assert_eq!(fm.data["foo"], "bar");
        assert_eq!(fm.body, "Body");
    }

    #[test]
    fn empty_block_is_empty_object() {
        let fm = split("---\n---\nBody").unwrap();
        assert_eq!(fm.data, JsonValue::Object(Default::default()));
        assert_eq!(fm.body, "Body");
    }

    #[test]
    fn unterminated_block_errors() {
        let err = split("---\ntitle: x\n").unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn invalid_yaml_errors() {
        let err = split("---\ntags: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, SiteError::Parse { .. }), "{err:?}");
    }

    #[test]
    fn non_mapping_root_errors() {
        let err = split("---\n- a\n- b\n---\n").unwrap_err();
        assert!(err.to_string().contains("mapping"));
    }
}
