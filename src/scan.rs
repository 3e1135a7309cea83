use anyhow::{Result, bail};
use regex::Regex;
use std::sync::LazyLock;

static PACKAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^package\s+[A-Za-z_][A-Za-z0-9_]*").unwrap());

static IMPORT_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^import\s*\(").unwrap());

static IMPORT_SINGLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^import\s+(?:[A-Za-z_][A-Za-z0-9_]*\s+|\.\s+)?(?:"(?:[^"\\]|\\.)*"|`[^`]*`)"#)
        .unwrap()
});

static IMPORT_SPEC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[A-Za-z_][A-Za-z0-9_]*\s+|\.\s+)?(?:"(?:[^"\\]|\\.)*"|`[^`]*`)$"#).unwrap()
});

/// Inclusive 1-based line span of one comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSpan {
    pub start_line: usize,
    pub end_line: usize,
}

/// Line-level index of a Go source file: where the import specs live and
/// where the comments live. The raw text is left to the caller.
#[derive(Debug, Default)]
pub struct SourceScan {
    /// 1-based source line of each import spec, in declaration order,
    /// flattened across all import declarations.
    pub import_lines: Vec<usize>,
    pub comments: Vec<CommentSpan>,
}

/// Scans Go source text for import spec lines and comment spans.
///
/// This is a line-oriented scanner, not a full parser: it tracks string
/// literals and comments exactly (so a `//` inside a string is never a
/// comment) but only recognizes the package clause and import surface of
/// the file. Everything else is opaque top-level code.
pub fn scan_source(data: &str) -> Result<SourceScan> {
    let mut scan = SourceScan::default();
    let mut block_start: Option<usize> = None;
    let mut in_raw_string = false;
    let mut seen_package = false;
    let mut in_group = false;

    for (idx, raw_line) in data.split('\n').enumerate() {
        let line_no = idx + 1;
        let code = strip_line(
            raw_line,
            line_no,
            &mut block_start,
            &mut in_raw_string,
            &mut scan.comments,
        )?;
        let code = code.trim();
        if code.is_empty() {
            continue;
        }

        if !seen_package {
            if !PACKAGE_RE.is_match(code) {
                bail!("line {line_no}: expected package clause");
            }
            seen_package = true;
            continue;
        }

        if in_group {
            in_group = group_specs(code, line_no, &mut scan.import_lines)?;
        } else if IMPORT_GROUP_RE.is_match(code)
            && let Some(open_paren) = code.find('(')
        {
            in_group = group_specs(code[open_paren + 1..].trim(), line_no, &mut scan.import_lines)?;
        } else if IMPORT_SINGLE_RE.is_match(code) {
            scan.import_lines.push(line_no);
        }
        // any other top-level code is irrelevant to the import block
    }

    if let Some(start_line) = block_start {
        bail!("line {start_line}: unterminated block comment");
    }
    if in_raw_string {
        bail!("unterminated raw string literal");
    }
    if in_group {
        bail!("missing ')' to close import group");
    }

    Ok(scan)
}

/// Consumes one line of an open `import ( ... )` group. Returns whether the
/// group is still open after this line.
fn group_specs(code: &str, line_no: usize, import_lines: &mut Vec<usize>) -> Result<bool> {
    let (specs, still_open) = match code.find(')') {
        Some(pos) => (&code[..pos], false),
        None => (code, true),
    };

    for spec in specs.split(';') {
        let spec = spec.trim();
        if spec.is_empty() {
            continue;
        }
        if !IMPORT_SPEC_RE.is_match(spec) {
            bail!("line {line_no}: malformed import spec: {spec}");
        }
        import_lines.push(line_no);
    }

    Ok(still_open)
}

/// Returns the code portion of one raw source line with comments removed
/// and string literal contents kept, updating the cross-line comment and
/// raw-string state and recording completed comment spans.
fn strip_line(
    raw: &str,
    line_no: usize,
    block_start: &mut Option<usize>,
    in_raw_string: &mut bool,
    comments: &mut Vec<CommentSpan>,
) -> Result<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut code = String::new();
    let mut i = 0;

    while i < chars.len() {
        if let Some(start_line) = *block_start {
            if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                comments.push(CommentSpan {
                    start_line,
                    end_line: line_no,
                });
                *block_start = None;
                i += 2;
            } else {
                i += 1;
            }
            continue;
        }

        if *in_raw_string {
            // raw string interiors are data, not code; keep only the
            // closing backtick so a single-line raw literal still reads
            // as an empty `` pair
            if chars[i] == '`' {
                *in_raw_string = false;
                code.push('`');
            }
            i += 1;
            continue;
        }

        match chars[i] {
            '`' => {
                *in_raw_string = true;
                code.push('`');
                i += 1;
            }
            quote @ ('"' | '\'') => {
                code.push(quote);
                i += 1;
                loop {
                    match chars.get(i) {
                        None => bail!("line {line_no}: unterminated string literal"),
                        Some('\\') => {
                            code.push('\\');
                            if let Some(&escaped) = chars.get(i + 1) {
                                code.push(escaped);
                            }
                            i += 2;
                        }
                        Some(&c) if c == quote => {
                            code.push(quote);
                            i += 1;
                            break;
                        }
                        Some(&c) => {
                            code.push(c);
                            i += 1;
                        }
                    }
                }
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                comments.push(CommentSpan {
                    start_line: line_no,
                    end_line: line_no,
                });
                // the rest of the line is comment text
                break;
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                *block_start = Some(line_no);
                i += 2;
            }
            c => {
                code.push(c);
                i += 1;
            }
        }
    }

    Ok(code)
}
