//! Unified-diff rendering.

use std::fmt;

use crate::lines::{diff_lines, LineDiff};

const NO_NEWLINE: &str = "\\ No newline at end of file";

/// A line diff together with the labels of its two sides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnifiedDiff {
    pub old_label: String,
    pub new_label: String,
    pub diff: LineDiff,
}

impl UnifiedDiff {
    /// Diff `old` against `new` under the given labels.
    pub fn new(
        old_label: impl Into<String>,
        new_label: impl Into<String>,
        old: &[u8],
        new: &[u8],
    ) -> Self {
        Self {
            old_label: old_label.into(),
            new_label: new_label.into(),
            diff: diff_lines(old, new),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diff.is_empty()
    }

    /// The rendered diff; empty when both sides are identical.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for UnifiedDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diff.is_empty() {
            return Ok(());
        }
        writeln!(f, "--- {}", self.old_label)?;
        writeln!(f, "+++ {}", self.new_label)?;
        for hunk in &self.diff.hunks {
            writeln!(
                f,
                "@@ -{} +{} @@",
                range(hunk.old_start, hunk.old_count),
                range(hunk.new_start, hunk.new_count)
            )?;
            for line in &hunk.lines {
                let text = line.text();
                write!(f, "{}{}", line.marker(), text)?;
                if !text.ends_with('\n') {
                    writeln!(f)?;
                    writeln!(f, "{NO_NEWLINE}")?;
                }
            }
        }
        Ok(())
    }
}

fn range(start: usize, count: usize) -> String {
    if count == 1 {
        start.to_string()
    } else {
        format!("{start},{count}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sides_render_nothing() {
        let diff = UnifiedDiff::new("old", "new", b"same\n", b"same\n");
        assert!(diff.is_empty());
        assert_eq!(diff.render(), "");
    }

    #[test]
    fn renders_headers_hunk_and_prefixes() {
        let diff = UnifiedDiff::new("a.txt (commit)", "a.txt (working)", b"x\n", b"x\ny\n");
        assert_eq!(
            diff.render(),
            "--- a.txt (commit)\n+++ a.txt (working)\n@@ -1 +1,2 @@\n x\n+y\n"
        );
    }

    #[test]
    fn all_added_has_no_removals() {
        let rendered = UnifiedDiff::new("old", "new", b"", b"one\ntwo\n").render();
        let body: Vec<&str> = rendered.lines().skip(2).collect();
        assert_eq!(body, vec!["@@ -0,0 +1,2 @@", "+one", "+two"]);
        assert!(!body.iter().any(|l| l.starts_with('-')));
    }

    #[test]
    fn marks_missing_final_newline() {
        let rendered = UnifiedDiff::new("old", "new", b"a\n", b"a\nb").render();
        assert!(rendered.ends_with("+b\n\\ No newline at end of file\n"));
    }

    #[test]
    fn binary_renders_synthetic_lines() {
        let rendered = UnifiedDiff::new("old", "new", &[0xff], &[0xfe, 0x00]).render();
        assert!(rendered.contains("-(binary content, 1 bytes)\n"));
        assert!(rendered.contains("+(binary content, 2 bytes)\n"));
    }
}
