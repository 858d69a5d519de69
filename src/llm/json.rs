//! JSON extraction for model output.
//!
//! Structured output usually arrives as a bare JSON object, but some models
//! and proxies wrap it in markdown fences or surrounding prose.

/// Extract a JSON object from a model response that may be wrapped in markdown.
///
/// Tries, in order:
/// 1. The whole trimmed response, if it already parses
/// 2. A ` ```json ` or bare ` ``` ` fenced block whose content starts with `{`
/// 3. The first balanced `{ ... }` span that parses
/// 4. The trimmed input unchanged
pub fn extract_json(response: &str) -> String {
    let trimmed = response.trim();

    if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return trimmed.to_string();
    }

    if let Some(inner) = fenced_block(trimmed)
        && inner.starts_with('{')
    {
        return inner.to_string();
    }

    for (start, _) in trimmed.match_indices('{') {
        if let Some(candidate) = balanced_object(&trimmed[start..])
            && serde_json::from_str::<serde_json::Value>(candidate).is_ok()
        {
            return candidate.to_string();
        }
    }

    trimmed.to_string()
}

/// Content of the first markdown code fence, with an optional `json` tag removed.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let rest = &text[open + 3..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let close = rest.find("```")?;
    Some(rest[..close].trim())
}

/// The prefix of `text` up to the brace closing its leading `{`.
///
/// Braces inside JSON string literals (including escaped quotes) are ignored.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}
