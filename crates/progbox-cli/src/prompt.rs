//! Interactive prompts
//!
//! Line-based prompts for `edit` commands and delete confirmation.

use anyhow::Result;
use std::io::{self, Write};

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

/// Prompt with a default value, returns None if user keeps default
pub fn prompt_with_default(prompt: &str, default: &str) -> Result<Option<String>> {
    if default.is_empty() {
        print!("{}: ", prompt);
    } else {
        print!("{} [{}]: ", prompt, default);
    }
    read_answer()
}

/// Answer that clears an optional field in interactive edits
pub const CLEAR_ANSWER: &str = "-";

/// Like [`prompt_with_default`], but answering `-` yields `Some("")`, which
/// the stores treat as "clear this field"
pub fn prompt_clearable(prompt: &str, default: &str) -> Result<Option<String>> {
    let label = format!("{} ('{}' to clear)", prompt, CLEAR_ANSWER);
    Ok(clear_answer(prompt_with_default(&label, default)?))
}

fn clear_answer(answer: Option<String>) -> Option<String> {
    match answer {
        Some(a) if a == CLEAR_ANSWER => Some(String::new()),
        other => other,
    }
}

/// Prompt for optional value
pub fn prompt_optional(prompt: &str) -> Result<Option<String>> {
    print!("{}: ", prompt);
    read_answer()
}

fn read_answer() -> Result<Option<String>> {
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim();

    if input.is_empty() {
        Ok(None)
    } else {
        Ok(Some(input.to_string()))
    }
}

/// Split a comma-separated tag list, dropping blanks
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("rust, web ,,docs"), vec!["rust", "web", "docs"]);
        assert!(parse_tags("  ,  ").is_empty());
    }

    #[test]
    fn test_clear_answer() {
        assert_eq!(clear_answer(Some("-".to_string())), Some(String::new()));
        assert_eq!(clear_answer(Some("new".to_string())), Some("new".to_string()));
        // Empty input keeps the current value
        assert_eq!(clear_answer(None), None);
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes("YES"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
