//! Line-level diff of two byte sequences.
//!
//! Uses the `similar` crate (Myers diff) and groups changes into hunks with
//! [`CONTEXT_LINES`] lines of context. Line terminators are kept on every
//! line so a missing final newline survives into the rendered output.

use similar::{ChangeTag, TextDiff};

/// Context lines kept around each change.
pub const CONTEXT_LINES: usize = 3;

/// The result of diffing two versions of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineDiff {
    pub hunks: Vec<Hunk>,
    /// Line count of the old side (0 for binary content).
    pub old_lines: usize,
    /// Line count of the new side (0 for binary content).
    pub new_lines: usize,
    /// Either side was not valid UTF-8; the single hunk is synthetic.
    pub binary: bool,
}

impl LineDiff {
    /// Returns `true` if both sides are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    pub fn additions(&self) -> usize {
        self.count(|l| matches!(l, DiffLine::Added(_)))
    }

    pub fn deletions(&self) -> usize {
        self.count(|l| matches!(l, DiffLine::Removed(_)))
    }

    fn count(&self, pred: impl Fn(&DiffLine) -> bool) -> usize {
        self.hunks
            .iter()
            .flat_map(|h| &h.lines)
            .filter(|l| pred(l))
            .count()
    }
}

/// A contiguous region of changes.
///
/// Start positions follow unified-diff convention: 1-based, except that an
/// empty range names the line *before* it (so an empty old side is `0,0`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    pub lines: Vec<DiffLine>,
}

/// One line of a hunk, terminator included when the source had one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    Context(String),
    Added(String),
    Removed(String),
}

impl DiffLine {
    pub fn text(&self) -> &str {
        match self {
            Self::Context(t) | Self::Added(t) | Self::Removed(t) => t,
        }
    }

    /// Unified-diff prefix character.
    pub fn marker(&self) -> char {
        match self {
            Self::Context(_) => ' ',
            Self::Added(_) => '+',
            Self::Removed(_) => '-',
        }
    }
}

/// Diff `old` against `new`.
///
/// Non-UTF-8 input on either side yields one synthetic hunk describing the
/// sizes instead of a line diff.
pub fn diff_lines(old: &[u8], new: &[u8]) -> LineDiff {
    let (Ok(old_text), Ok(new_text)) = (std::str::from_utf8(old), std::str::from_utf8(new))
    else {
        return binary_diff(old, new);
    };

    let text_diff = TextDiff::from_lines(old_text, new_text);
    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(CONTEXT_LINES) {
        let Some(first) = group.first() else {
            continue;
        };
        let old_origin = first.old_range().start;
        let new_origin = first.new_range().start;
        let mut lines = Vec::new();
        let (mut old_count, mut new_count) = (0, 0);

        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = change.value().to_string();
                match change.tag() {
                    ChangeTag::Equal => {
                        old_count += 1;
                        new_count += 1;
                        lines.push(DiffLine::Context(text));
                    }
                    ChangeTag::Delete => {
                        old_count += 1;
                        lines.push(DiffLine::Removed(text));
                    }
                    ChangeTag::Insert => {
                        new_count += 1;
                        lines.push(DiffLine::Added(text));
                    }
                }
            }
        }

        hunks.push(Hunk {
            old_start: display_start(old_origin, old_count),
            old_count,
            new_start: display_start(new_origin, new_count),
            new_count,
            lines,
        });
    }

    LineDiff {
        hunks,
        old_lines: text_diff.old_slices().len(),
        new_lines: text_diff.new_slices().len(),
        binary: false,
    }
}

fn display_start(origin: usize, count: usize) -> usize {
    if count == 0 {
        origin
    } else {
        origin + 1
    }
}

fn binary_diff(old: &[u8], new: &[u8]) -> LineDiff {
    if old == new {
        return LineDiff {
            hunks: Vec::new(),
            old_lines: 0,
            new_lines: 0,
            binary: true,
        };
    }
    let mut lines = Vec::new();
    if !old.is_empty() {
        lines.push(DiffLine::Removed(format!("(binary content, {} bytes)\n", old.len())));
    }
    if !new.is_empty() {
        lines.push(DiffLine::Added(format!("(binary content, {} bytes)\n", new.len())));
    }
    let old_count = usize::from(!old.is_empty());
    let new_count = usize::from(!new.is_empty());
    LineDiff {
        hunks: vec![Hunk {
            old_start: display_start(0, old_count),
            old_count,
            new_start: display_start(0, new_count),
            new_count,
            lines,
        }],
        old_lines: 0,
        new_lines: 0,
        binary: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_content_has_no_hunks() {
        let diff = diff_lines(b"hello\nworld\n", b"hello\nworld\n");
        assert!(diff.is_empty());
        assert_eq!(diff.old_lines, 2);
    }

    #[test]
    fn appended_line() {
        let diff = diff_lines(b"x\n", b"x\ny\n");
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
        let hunk = &diff.hunks[0];
        assert_eq!((hunk.old_start, hunk.old_count), (1, 1));
        assert_eq!((hunk.new_start, hunk.new_count), (1, 2));
        assert_eq!(
            hunk.lines,
            vec![
                DiffLine::Context("x\n".into()),
                DiffLine::Added("y\n".into())
            ]
        );
    }

    #[test]
    fn empty_old_side_is_all_added() {
        let diff = diff_lines(b"", b"a\nb\n");
        assert_eq!(diff.deletions(), 0);
        assert_eq!(diff.additions(), 2);
        let hunk = &diff.hunks[0];
        assert_eq!((hunk.old_start, hunk.old_count), (0, 0));
        assert_eq!((hunk.new_start, hunk.new_count), (1, 2));
    }

    #[test]
    fn modification_removes_and_adds() {
        let diff = diff_lines(b"hello world\n", b"hello universe\n");
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn distant_changes_split_into_hunks() {
        let old: String = (1..=20).map(|n| format!("{n}\n")).collect();
        let new: String = (1..=20)
            .map(|n| match n {
                2 => "two\n".to_string(),
                19 => "nineteen\n".to_string(),
                n => format!("{n}\n"),
            })
            .collect();
        let diff = diff_lines(old.as_bytes(), new.as_bytes());
        assert_eq!(diff.hunks.len(), 2);
        assert_eq!(diff.hunks[1].old_start, 16);
    }

    #[test]
    fn missing_final_newline_is_kept() {
        let diff = diff_lines(b"a\nb", b"a\nc");
        let removed: Vec<&str> = diff.hunks[0]
            .lines
            .iter()
            .filter(|l| l.marker() == '-')
            .map(DiffLine::text)
            .collect();
        assert_eq!(removed, vec!["b"]);
    }

    #[test]
    fn binary_content_gets_synthetic_hunk() {
        let diff = diff_lines(&[0, 1, 0xff], &[0xfe, 0xfd]);
        assert!(diff.binary);
        assert_eq!(diff.hunks.len(), 1);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn identical_binary_is_empty() {
        let diff = diff_lines(&[0xff, 0x00], &[0xff, 0x00]);
        assert!(diff.binary);
        assert!(diff.is_empty());
    }
}
