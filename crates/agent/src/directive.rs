//! Directive extraction from model replies.
//!
//! Two kinds of directive are recognised:
//!
//! ```text
//! ```main.py            <- fence + label (word chars, optional .ext), newline
//! print("hi")           <- content, trimmed
//! ```                   <- closing fence
//!
//! $SHELL: python main.py   <- command, rest of the line, trimmed
//! ```
//!
//! Command lines are scanned over the whole reply, fenced blocks included.
//! A label seen twice keeps the later block's content.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

static FILE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(\w+(?:\.\w+)?)\n(.*?)```").expect("file block pattern is valid")
});

static SHELL_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\$SHELL:\s*(.+)$").expect("shell line pattern is valid")
});

/// A labeled content block to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDirective<'a> {
    pub name: &'a str,
    pub content: &'a str,
}

/// Everything actionable found in one reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    /// name → content, in order of each name's first appearance.
    files: IndexMap<String, String>,
    /// Command lines in textual order.
    commands: Vec<String>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file directive; an existing name is overwritten in place.
    pub fn insert_file(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }

    pub fn push_command(&mut self, command_line: impl Into<String>) {
        self.commands.push(command_line.into());
    }

    pub fn files(&self) -> impl Iterator<Item = FileDirective<'_>> {
        self.files.iter().map(|(name, content)| FileDirective {
            name: name.as_str(),
            content: content.as_str(),
        })
    }

    pub fn file(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.commands.is_empty()
    }
}

/// Extract file and command directives from `text`. Never fails; text
/// without directives yields an empty set.
pub fn parse(text: &str) -> Directives {
    let mut directives = Directives::new();

    for caps in FILE_BLOCK_RE.captures_iter(text) {
        let name = &caps[1];
        let content = caps[2].trim();
        directives.insert_file(name, content);
    }

    for caps in SHELL_LINE_RE.captures_iter(text) {
        let command_line = caps[1].trim();
        if !command_line.is_empty() {
            directives.push_command(command_line);
        }
    }

    directives
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_prose_has_no_directives() {
        let d = parse("Sure! Python is a great language. Let me know if you need more.");
        assert!(d.is_empty());
        assert_eq!(d, Directives::new());
    }

    #[test]
    fn parse_is_idempotent() {
        let text = "```a.py\nx = 1\n```\n$SHELL: python a.py\n```a.py\nx = 2\n```";
        assert_eq!(parse(text), parse(text));
    }

    #[test]
    fn extracts_labeled_block_trimmed() {
        let text = "Here you go:\n```main.py\n\n  print('hi')\n\n```\nDone.";
        let d = parse(text);
        assert_eq!(d.file_count(), 1);
        assert_eq!(d.file("main.py"), Some("print('hi')"));
    }

    #[test]
    fn later_block_with_same_label_wins() {
        let text = "```main.py\nprint(1)\n```\nthen\n```main.py\nprint(2)\n```";
        let d = parse(text);
        assert_eq!(d.file_count(), 1);
        assert_eq!(d.file("main.py"), Some("print(2)"));
    }

    #[test]
    fn overwritten_label_keeps_first_position() {
        let text = "```a.txt\none\n```\n```b.txt\ntwo\n```\n```a.txt\nthree\n```";
        let d = parse(text);
        let files: Vec<(&str, &str)> = d.files().map(|f| (f.name, f.content)).collect();
        assert_eq!(files, vec![("a.txt", "three"), ("b.txt", "two")]);
    }

    #[test]
    fn label_without_extension_is_accepted() {
        let d = parse("```Makefile\nall:\n\techo ok\n```");
        assert_eq!(d.file("Makefile"), Some("all:\n\techo ok"));
    }

    #[test]
    fn language_tag_is_treated_as_a_name() {
        let d = parse("```python\nprint('x')\n```");
        assert_eq!(d.file("python"), Some("print('x')"));
    }

    #[test]
    fn unlabeled_or_odd_labels_are_ignored() {
        assert!(parse("```\nplain\n```").is_empty());
        assert!(parse("```src/main.rs\nfn main() {}\n```").is_empty());
        assert!(parse("```my-file.txt\nx\n```").is_empty());
        assert!(parse("```a.b.c\nx\n```").is_empty());
        // Label must be followed directly by a newline.
        assert!(parse("```main.py extra\nx\n```").is_empty());
    }

    #[test]
    fn unicode_word_labels() {
        let d = parse("```données.txt\nbonjour\n```");
        assert_eq!(d.file("données.txt"), Some("bonjour"));
    }

    #[test]
    fn unterminated_block_is_ignored() {
        assert_eq!(parse("```main.py\nprint('never closed')").file_count(), 0);
    }

    #[test]
    fn commands_keep_textual_order() {
        let d = parse("first\n$SHELL: echo b\nsome prose\n$SHELL: echo a\n");
        assert_eq!(d.commands(), ["echo b", "echo a"]);
    }

    #[test]
    fn command_whitespace_is_trimmed() {
        let d = parse("$SHELL:    ls -la   \r\n");
        assert_eq!(d.commands(), ["ls -la"]);
    }

    #[test]
    fn command_prefix_mid_line_counts() {
        let d = parse("Run this: $SHELL: cargo test");
        assert_eq!(d.commands(), ["cargo test"]);
    }

    #[test]
    fn commands_inside_fences_are_scanned() {
        let text = "```run.sh\n$SHELL: echo inside\n```\n$SHELL: echo outside";
        let d = parse(text);
        assert_eq!(d.file("run.sh"), Some("$SHELL: echo inside"));
        assert_eq!(d.commands(), ["echo inside", "echo outside"]);
    }

    #[test]
    fn empty_command_at_end_is_skipped() {
        let d = parse("$SHELL:   ");
        assert!(d.commands().is_empty());
    }

    #[test]
    fn bare_prefix_takes_next_line() {
        // `\s*` spans the line break, so the following line is the command.
        let d = parse("$SHELL:\nls\n");
        assert_eq!(d.commands(), ["ls"]);
    }

    #[test]
    fn lowercase_prefix_is_not_a_command() {
        assert!(parse("$shell: ls").commands().is_empty());
    }

    #[test]
    fn files_and_commands_are_independent() {
        let text = "$SHELL: python hello.py\n```hello.py\nprint('hello')\n```\n$SHELL: cat hello.py";
        let d = parse(text);
        assert_eq!(d.file("hello.py"), Some("print('hello')"));
        assert_eq!(d.commands(), ["python hello.py", "cat hello.py"]);
    }
}
