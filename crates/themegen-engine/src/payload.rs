//! Parsing and shape validation of raw model output.
//!
//! Models frequently wrap JSON in a markdown code fence; the fence is
//! stripped before parsing. A response that parses but lacks a `themes`
//! array of strings is malformed — the record fails even though the
//! remote call itself succeeded.

use themegen_types::PayloadError;

/// Strip a markdown code fence from `text`, if one is present.
///
/// Prefers a ```` ```json ```` fence, falls back to a bare ```` ``` ````
/// fence, and otherwise returns the trimmed input unchanged. A fence
/// without a closing marker yields everything after the opener.
fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + "```json".len()..];
        body.find("```").map_or(body, |end| &body[..end]).trim()
    } else if let Some(start) = trimmed.find("```") {
        let body = &trimmed[start + "```".len()..];
        body.find("```").map_or(body, |end| &body[..end]).trim()
    } else {
        trimmed
    }
}

/// Parse raw model output into the list of generated themes.
///
/// # Errors
///
/// Returns [`PayloadError`] when the text is not JSON, has no `themes`
/// field, or `themes` is not an array of strings.
pub fn parse_themes(text: &str) -> Result<Vec<String>, PayloadError> {
    let block = extract_json_block(text);
    let value: serde_json::Value = serde_json::from_str(block)?;

    let themes = value.get("themes").ok_or(PayloadError::MissingThemes)?;
    let items = themes
        .as_array()
        .ok_or(PayloadError::ThemesNotStrings)?;

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_owned)
                .ok_or(PayloadError::ThemesNotStrings)
        })
        .collect()
}
