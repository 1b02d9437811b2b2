//! Prompt builder: substitutes positional inputs into a template file.
//!
//! Templates contain markers of the form `!<INPUT i>!` where `i` is a
//! 0-based index into the inputs, plus an optional comment-block delimiter;
//! everything before the delimiter is template commentary and dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Delimiter separating template commentary from the prompt body.
pub const COMMENT_BLOCK_MARKER: &str = "<commentblockmarker>###</commentblockmarker>";

static INPUT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!<INPUT (\d+)>!").expect("input marker regex is valid"));

/// Prompt builder errors.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("failed to read prompt template: {0}")]
    Io(#[from] std::io::Error),
    #[error("template references input {index} but only {supplied} inputs were supplied")]
    InputOutOfRange { index: usize, supplied: usize },
}

/// Substitute `inputs` into an in-memory template. Every `!<INPUT i>!`
/// marker is replaced by `inputs[i]`; a marker whose index is out of range
/// is an error. Text before the comment-block delimiter (if present) is
/// dropped, and the result is trimmed.
pub fn fill_template(template: &str, inputs: &[&str]) -> Result<String, PromptError> {
    // Check all referenced indices before touching the text.
    for capture in INPUT_MARKER.captures_iter(template) {
        let index: usize = capture[1].parse().unwrap_or(usize::MAX);
        if index >= inputs.len() {
            return Err(PromptError::InputOutOfRange {
                index,
                supplied: inputs.len(),
            });
        }
    }

    let mut prompt = template.to_string();
    for (index, input) in inputs.iter().enumerate() {
        prompt = prompt.replace(&format!("!<INPUT {}>!", index), input);
    }

    if let Some((_, body)) = prompt.split_once(COMMENT_BLOCK_MARKER) {
        prompt = body.to_string();
    }

    Ok(prompt.trim().to_string())
}

/// Load a template file and substitute `inputs` into it.
pub fn build_prompt(inputs: &[&str], template_path: impl AsRef<Path>) -> Result<String, PromptError> {
    let template = fs::read_to_string(template_path)?;
    fill_template(&template, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_round_trip() {
        let result = fill_template("x !<INPUT 0>! y !<INPUT 1>! z", &["A", "B"]).unwrap();
        assert_eq!(result, "x A y B z");
    }

    #[test]
    fn test_comment_block_delimiter() {
        let template = "ignored<commentblockmarker>###</commentblockmarker>keep !<INPUT 0>!";
        let result = fill_template(template, &["Q"]).unwrap();
        assert_eq!(result, "keep Q");
    }

    #[test]
    fn test_result_is_trimmed() {
        let result = fill_template("  hello !<INPUT 0>!  \n", &["world"]).unwrap();
        assert_eq!(result, "hello world");
    }

    #[test]
    fn test_repeated_marker_replaced_everywhere() {
        let result = fill_template("!<INPUT 0>! and !<INPUT 0>!", &["twice"]).unwrap();
        assert_eq!(result, "twice and twice");
    }

    #[test]
    fn test_out_of_range_index_errors() {
        let err = fill_template("needs !<INPUT 2>!", &["only", "two"]).unwrap_err();
        match err {
            PromptError::InputOutOfRange { index, supplied } => {
                assert_eq!(index, 2);
                assert_eq!(supplied, 2);
            }
            other => panic!("expected InputOutOfRange, got {:?}", other),
        }
    }

    #[test]
    fn test_no_markers_passes_through() {
        let result = fill_template("static prompt", &[]).unwrap();
        assert_eq!(result, "static prompt");
    }

    #[test]
    fn test_build_prompt_from_file() {
        let path = env::temp_dir().join("llm_bridge_test_template.txt");
        fs::write(&path, "greet !<INPUT 0>! politely").unwrap();

        let result = build_prompt(&["Ada"], &path).unwrap();
        assert_eq!(result, "greet Ada politely");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = build_prompt(&[], "/no/such/template.txt").unwrap_err();
        assert!(matches!(err, PromptError::Io(_)));
    }
}
