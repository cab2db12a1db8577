// Copyright (c) 2026 NEXIS AI
// SPDX-License-Identifier: AGPL-3.0

// Prompt composition
//
// Folds attachment metadata into the text sent upstream. File contents are
// never read; only names are listed.

use super::chat::FileRef;

/// Build the provider-agnostic prompt for a request.
///
/// With no files the user input is returned verbatim. Otherwise a block
/// `"\n\nAttached files (<n>):"` follows, with one `"\n- <name>"` line per
/// file in input order.
pub fn compose(user_input: &str, files: &[FileRef]) -> String {
    if files.is_empty() {
        return user_input.to_string();
    }

    let mut prompt = String::with_capacity(user_input.len() + 32 + files.len() * 16);
    prompt.push_str(user_input);
    prompt.push_str(&format!("\n\nAttached files ({}):", files.len()));
    for file in files {
        prompt.push_str("\n- ");
        prompt.push_str(file.display_name());
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed_names(prompt: &str) -> Vec<&str> {
        prompt
            .lines()
            .filter_map(|line| line.strip_prefix("- "))
            .collect()
    }

    #[test]
    fn test_identity_without_files() {
        for input in ["", "hello", "line one\nline two", "- looks like a file"] {
            assert_eq!(compose(input, &[]), input);
        }
    }

    #[test]
    fn test_lists_files_in_order() {
        let files = vec![
            FileRef::named("a.txt"),
            FileRef::default(),
            FileRef::named("b.png"),
        ];

        let prompt = compose("summarize these", &files);

        assert!(prompt.starts_with("summarize these"));
        assert!(prompt.len() > "summarize these".len());
        assert!(prompt.contains("Attached files (3):"));
        assert_eq!(listed_names(&prompt), vec!["a.txt", "unknown", "b.png"]);
    }

    #[test]
    fn test_empty_input_with_files() {
        let prompt = compose("", &[FileRef::named("notes.md")]);
        assert_eq!(prompt, "\n\nAttached files (1):\n- notes.md");
    }

    #[test]
    fn test_deterministic() {
        let files = vec![FileRef::named("x"), FileRef::named("y")];
        assert_eq!(compose("q", &files), compose("q", &files));
    }
}
