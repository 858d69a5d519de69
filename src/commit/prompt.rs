//! Prompt and response schema for commit message generation.

use serde_json::{Value, json};

/// Maximum bytes of diff text sent to the model.
pub const MAX_DIFF_LENGTH: usize = 30_000;

/// Name of the structured-output schema and its single field.
pub const SCHEMA_NAME: &str = "commit_message";

/// Fixed instruction sent as the system message.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a helpful assistant that generates commit messages for git commits.
- Write the commit message in the active voice.
- Keep the subject line to no more than 50 characters.
- Make it detailed enough to understand the changes made to the code.
- Use the Conventional Commits format: `type(scope): description`.
- If the diff contains several additions that are not related to the same thing, \
add a separate message for each addition in the description section.
Respond with the commit message in the `commit_message` field.";

/// Build the user message carrying the staged diff.
pub fn build_commit_prompt(diff: &str) -> String {
    let (diff_text, truncated) = truncate_diff(diff, MAX_DIFF_LENGTH);

    let truncation_note = if truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    format!(
        "Here is the diff of the files that are staged for commit:\n\n```diff\n{diff_text}\n```{truncation_note}"
    )
}

/// JSON schema constraining the response to one string field.
pub fn response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            SCHEMA_NAME: {
                "type": "string",
                "description": "The commit message"
            }
        },
        "required": [SCHEMA_NAME],
        "additionalProperties": false
    })
}

/// Cut `text` to at most `max_len` bytes on a char boundary.
fn truncate_diff(text: &str, max_len: usize) -> (&str, bool) {
    if text.len() <= max_len {
        return (text, false);
    }
    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..end], true)
}
