use crate::Result;
use std::fmt::Write;
use std::path::Path;

/// Result of comparing two snapshots
pub struct CompareResult {
    /// Byte-for-byte equal
    pub identical: bool,
    /// Fraction of lines that match position by position, 0.0 to 1.0
    pub similarity: f64,
}

/// Compare two markup files line by line
pub fn compare_snapshots(reference: &Path, captured: &Path) -> Result<CompareResult> {
    let reference = std::fs::read_to_string(reference)?;
    let captured = std::fs::read_to_string(captured)?;

    Ok(CompareResult {
        identical: reference == captured,
        similarity: line_similarity(&reference, &captured),
    })
}

fn line_similarity(reference: &str, captured: &str) -> f64 {
    let ref_lines: Vec<&str> = reference.lines().collect();
    let cap_lines: Vec<&str> = captured.lines().collect();

    let total = ref_lines.len().max(cap_lines.len());
    if total == 0 {
        return 1.0;
    }

    let matching = ref_lines
        .iter()
        .zip(&cap_lines)
        .filter(|(a, b)| a == b)
        .count();
    matching as f64 / total as f64
}

/// Write a line diff: unchanged lines are prefixed with a space, reference
/// lines with `-` and captured lines with `+`
pub fn generate_diff(reference: &Path, captured: &Path, output: &Path) -> Result<()> {
    let reference = std::fs::read_to_string(reference)?;
    let captured = std::fs::read_to_string(captured)?;
    std::fs::write(output, line_diff(&reference, &captured))?;
    Ok(())
}

fn line_diff(reference: &str, captured: &str) -> String {
    let ref_lines: Vec<&str> = reference.lines().collect();
    let cap_lines: Vec<&str> = captured.lines().collect();

    let mut out = String::new();
    for i in 0..ref_lines.len().max(cap_lines.len()) {
        match (ref_lines.get(i), cap_lines.get(i)) {
            (Some(a), Some(b)) if a == b => {
                let _ = writeln!(out, " {a}");
            }
            (a, b) => {
                if let Some(a) = a {
                    let _ = writeln!(out, "-{a}");
                }
                if let Some(b) = b {
                    let _ = writeln!(out, "+{b}");
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_snapshots_match_fully() {
        assert_eq!(line_similarity("<p>\n  a\n</p>\n", "<p>\n  a\n</p>\n"), 1.0);
        assert_eq!(line_similarity("", ""), 1.0);
    }

    #[test]
    fn test_similarity_counts_positional_lines() {
        assert_eq!(line_similarity("a\nb\nc\nd\n", "a\nx\nc\n"), 0.5);
    }

    #[test]
    fn test_missing_final_newline_is_a_mismatch() {
        let dir = crate::output_dir();
        std::fs::create_dir_all(&dir).unwrap();
        let reference = dir.join("compare_newline_reference.html");
        let captured = dir.join("compare_newline_captured.html");
        std::fs::write(&reference, "<p></p>\n").unwrap();
        std::fs::write(&captured, "<p></p>").unwrap();

        let result = compare_snapshots(&reference, &captured).unwrap();

        assert!(!result.identical);
        assert_eq!(result.similarity, 1.0);
    }

    #[test]
    fn test_line_diff_marks_changes() {
        assert_eq!(line_diff("a\nb\n", "a\nc\nd\n"), " a\n-b\n+c\n+d\n");
    }
}
