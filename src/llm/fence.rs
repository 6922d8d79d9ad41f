//! Unwrapping of Markdown code fences in LLM responses.
//!
//! Chat models often answer with the command wrapped in a fenced block,
//! sometimes with conversational text around it. Only the fence is peeled
//! off; the content itself is passed through untouched.

/// Return the body of the first fenced code block, or the trimmed input.
///
/// The info string after the opening fence (` ```bash `, ` ```sh `, ...) is
/// discarded. An unterminated fence is treated as plain text.
pub fn strip_code_fence(response: &str) -> String {
    let trimmed = response.trim();

    if let Some(start) = trimmed.find("```")
        && let Some(end) = trimmed[start + 3..].find("```")
    {
        let block = &trimmed[start + 3..start + 3 + end];
        let body = match block.find('\n') {
            Some(newline) if is_info_string(&block[..newline]) => &block[newline + 1..],
            _ => block,
        };
        return body.trim().to_string();
    }

    trimmed.to_string()
}

/// Whether the first line of a fenced block is a language tag.
fn is_info_string(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty()
        && line
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '+')
}
