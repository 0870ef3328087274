//! Source text classification and block segmentation.
//!
//! Prose is split on blank-line separators; code is split at definition and
//! import boundaries so each block reads like one coherent unit of work.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextKind {
    Code,
    Prose,
}

/// Lines starting with one of these score heavily toward code.
const STRONG_CODE_PREFIXES: &[&str] = &[
    "import ", "def ", "class ", "#!", "//", "/*", "*/", "package ", "using ",
];

/// Control-flow keywords at the start of a line.
const CONTROL_FLOW_PREFIXES: &[&str] = &[
    "if ", "elif ", "else:", "for ", "while ", "return ", "try:", "except ", "finally:", "with ",
];

/// Structural line endings common in code.
const STRUCTURAL_SUFFIXES: &[&str] = &["{", "}", ");", "};", ":"];

fn is_import_line(trimmed: &str) -> bool {
    trimmed.starts_with("import ")
        || (trimmed.starts_with("from ") && trimmed.contains(" import "))
}

fn is_definition_line(trimmed: &str) -> bool {
    trimmed.starts_with("def ") || trimmed.starts_with("class ") || trimmed.starts_with("async def ")
}

fn line_score(line: &str) -> f64 {
    let trimmed = line.trim();

    if STRONG_CODE_PREFIXES.iter().any(|p| trimmed.starts_with(p)) || is_import_line(trimmed) {
        return 2.0;
    }
    if CONTROL_FLOW_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return 1.0;
    }
    if STRUCTURAL_SUFFIXES.iter().any(|s| trimmed.ends_with(s)) && !trimmed.ends_with(".:") {
        return 1.0;
    }

    let indented = line.starts_with(|c: char| c.is_whitespace());
    let lower_start = trimmed
        .chars()
        .next()
        .map(|c| !c.is_uppercase())
        .unwrap_or(false);
    if indented && !trimmed.is_empty() && lower_start {
        return 0.5;
    }

    0.0
}

/// Classify a text as code or prose from weighted per-line indicators.
/// The threshold is a strict `>`: a score ratio of exactly 0.15 is prose.
pub fn classify(text: &str) -> TextKind {
    let lines: Vec<&str> = text.split('\n').collect();
    let total_lines = lines.len().max(1) as f64;
    let score: f64 = lines.iter().map(|line| line_score(line)).sum();

    if score / total_lines > 0.15 {
        TextKind::Code
    } else {
        TextKind::Prose
    }
}

/// Split prose on runs of blank lines. Each kept block except the last gets
/// its paragraph separator reattached as a trailing double newline;
/// whitespace-only blocks are dropped.
fn segment_prose(text: &str) -> Vec<String> {
    let mut raw_blocks: Vec<&str> = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0usize;
    let mut idx = 0usize;

    // A separator is a newline, any run of whitespace-only lines, and a
    // closing newline.
    while idx < bytes.len() {
        if bytes[idx] == b'\n' {
            let mut j = idx + 1;
            let mut line_start = j;
            let mut saw_second_newline = false;
            while j < bytes.len() {
                match bytes[j] {
                    b'\n' => {
                        saw_second_newline = true;
                        line_start = j + 1;
                        j += 1;
                    }
                    b' ' | b'\t' | b'\r' => j += 1,
                    _ => break,
                }
            }
            if saw_second_newline {
                raw_blocks.push(&text[start..idx]);
                start = line_start;
                idx = line_start;
                continue;
            }
        }
        idx += 1;
    }
    raw_blocks.push(&text[start..]);

    let last_raw = raw_blocks.len() - 1;
    let mut blocks = Vec::new();
    for (i, block) in raw_blocks.into_iter().enumerate() {
        if block.trim().is_empty() {
            continue;
        }
        let mut owned = block.to_string();
        if i < last_raw {
            owned.push_str("\n\n");
        }
        blocks.push(owned);
    }

    if blocks.is_empty() {
        return vec![text.to_string()];
    }
    blocks
}

/// Scan code line by line, opening a new block at definition lines and at
/// import lines that follow non-import code. A run of blank lines is folded
/// into the tail of the current block, which is then flushed.
fn segment_code(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut i = 0usize;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if !current.is_empty() {
            if trimmed.is_empty() {
                // Absorb the whole blank run as the tail of this block.
                while i < lines.len() && lines[i].trim().is_empty() {
                    current.push(lines[i]);
                    i += 1;
                }
                blocks.push(current.join("\n"));
                current = Vec::new();
                continue;
            }

            let import_boundary = is_import_line(trimmed)
                && current.last().map_or(false, |prev| {
                    let prev = prev.trim();
                    !prev.is_empty() && !is_import_line(prev) && !prev.starts_with('#')
                });

            if is_definition_line(trimmed) || import_boundary {
                blocks.push(current.join("\n"));
                current = Vec::new();
            }
        }

        current.push(line);
        i += 1;
    }

    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    if blocks.is_empty() {
        return vec![text.to_string()];
    }
    blocks
}

/// Split source text into ordered typing blocks.
pub fn segment(text: &str) -> Vec<String> {
    match classify(text) {
        TextKind::Prose => segment_prose(text),
        TextKind::Code => segment_code(text),
    }
}
