use crate::rewrite;
use crate::scan::scan_source;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Squashes blank lines inside the import block of one Go file, rewriting
/// it in place when anything changed.
pub fn squash_file(path: &Path) -> Result<()> {
    let data =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let squashed =
        squash_source(&data).with_context(|| format!("failed to parse {}", path.display()))?;

    match squashed {
        Some(contents) => rewrite::replace_file(path, &contents),
        None => Ok(()),
    }
}

/// Returns the rewritten source text, or `None` when the file needs no
/// change: fewer than two import specs, no interior blank lines, or a
/// comment touching the import block.
pub fn squash_source(data: &str) -> Result<Option<String>> {
    let scan = scan_source(data)?;

    // A single import cannot have an interior blank line to squash.
    let (imports_start, imports_end) =
        match (scan.import_lines.first(), scan.import_lines.last()) {
            (Some(&first), Some(&last)) if scan.import_lines.len() > 1 => (first, last),
            _ => return Ok(None),
        };

    for comment in &scan.comments {
        // A comment touching or bordering the import block may carry a
        // grouping convention this tool does not understand. Leave the
        // file alone.
        if comment.end_line == imports_start - 1
            || (comment.start_line >= imports_start && comment.start_line <= imports_end)
            || comment.start_line == imports_end + 1
        {
            tracing::debug!(
                "comment at lines {}-{} borders the import block at {}-{}, skipping",
                comment.start_line,
                comment.end_line,
                imports_start,
                imports_end
            );
            return Ok(None);
        }
    }

    let mut lines: Vec<&str> = data.split('\n').collect();
    let mut changed = false;

    // Delete from the bottom up so a deletion never shifts a line number
    // we have yet to visit.
    for line in (imports_start + 1..imports_end).rev() {
        if lines[line - 1].trim().is_empty() {
            lines.remove(line - 1);
            changed = true;
        }
    }

    if !changed {
        tracing::debug!("import block already contiguous");
        return Ok(None);
    }

    Ok(Some(lines.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_blank_line_squashed() {
        let src = "package main\n\nimport (\n\t\"a\"\n\n\t\"b\"\n)\n";
        let out = squash_source(src).unwrap().unwrap();
        assert_eq!(out, "package main\n\nimport (\n\t\"a\"\n\t\"b\"\n)\n");
    }

    #[test]
    fn test_single_import_untouched() {
        let src = "package main\n\nimport (\n\t\"a\"\n)\n";
        assert!(squash_source(src).unwrap().is_none());
    }

    #[test]
    fn test_contiguous_block_untouched() {
        let src = "package main\n\nimport (\n\t\"a\"\n\t\"b\"\n)\n";
        assert!(squash_source(src).unwrap().is_none());
    }

    #[test]
    fn test_consecutive_blanks_collapse_to_zero() {
        let src = "package main\n\nimport (\n\t\"a\"\n\n\n\n\t\"b\"\n\n\t\"c\"\n)\n";
        let out = squash_source(src).unwrap().unwrap();
        assert_eq!(out, "package main\n\nimport (\n\t\"a\"\n\t\"b\"\n\t\"c\"\n)\n");
    }

    #[test]
    fn test_idempotent() {
        let src = "package main\n\nimport (\n\t\"a\"\n\n\t\"b\"\n)\n";
        let once = squash_source(src).unwrap().unwrap();
        assert!(squash_source(&once).unwrap().is_none());
    }

    #[test]
    fn test_comment_immediately_before_block_disqualifies() {
        let src = "package main\n\n// pinned grouping\nimport (\n\t\"a\"\n\n\t\"b\"\n)\n";
        assert!(squash_source(src).unwrap().is_none());
    }

    #[test]
    fn test_comment_inside_block_disqualifies() {
        let src = "package main\n\nimport (\n\t\"a\"\n\n\t// stdlib below\n\t\"b\"\n)\n";
        assert!(squash_source(src).unwrap().is_none());
    }

    #[test]
    fn test_comment_immediately_after_block_disqualifies() {
        let src = "package main\n\nimport (\n\t\"a\"\n\n\t\"b\"\n// trailing\n)\n";
        assert!(squash_source(src).unwrap().is_none());
    }

    #[test]
    fn test_distant_comment_does_not_disqualify() {
        let src = "package main\n\n// doc comment two lines up\n\nimport (\n\t\"a\"\n\n\t\"b\"\n)\n\n// far below\n";
        let out = squash_source(src).unwrap().unwrap();
        assert!(out.contains("\t\"a\"\n\t\"b\""));
    }

    #[test]
    fn test_rest_of_file_preserved() {
        let src = "package main\n\nimport (\n\t\"a\"\n\n\t\"b\"\n)\n\nfunc main() {\n\n\tprintln( \"x\" )\n}\n";
        let out = squash_source(src).unwrap().unwrap();
        assert_eq!(
            out,
            "package main\n\nimport (\n\t\"a\"\n\t\"b\"\n)\n\nfunc main() {\n\n\tprintln( \"x\" )\n}\n"
        );
    }

    #[test]
    fn test_missing_trailing_newline_preserved() {
        let src = "package main\n\nimport (\n\t\"a\"\n\n\t\"b\"\n)";
        let out = squash_source(src).unwrap().unwrap();
        assert_eq!(out, "package main\n\nimport (\n\t\"a\"\n\t\"b\"\n)");
    }

    #[test]
    fn test_crlf_blank_lines_squashed() {
        let src = "package main\r\n\r\nimport (\r\n\t\"a\"\r\n\r\n\t\"b\"\r\n)\r\n";
        let out = squash_source(src).unwrap().unwrap();
        assert_eq!(out, "package main\r\n\r\nimport (\r\n\t\"a\"\r\n\t\"b\"\r\n)\r\n");
    }

    #[test]
    fn test_blank_between_single_import_declarations_squashed() {
        let src = "package main\n\nimport \"a\"\n\nimport \"b\"\n";
        let out = squash_source(src).unwrap().unwrap();
        assert_eq!(out, "package main\n\nimport \"a\"\nimport \"b\"\n");
    }

    #[test]
    fn test_raw_string_interior_never_squashed() {
        let src =
            "package main\n\nimport \"fmt\"\n\nvar tmpl = `\nimport (\n\t\"a\"\n\n\t\"b\"\n)\n`\n";
        assert!(squash_source(src).unwrap().is_none());
    }

    #[test]
    fn test_parse_error_propagates() {
        assert!(squash_source("import (\n\t\"a\"\n)\n").is_err());
    }
}
