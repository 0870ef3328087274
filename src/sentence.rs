//! Abbreviation-aware sentence boundary detection.

/// Words that end with a period without ending a sentence: titles, street
/// and unit abbreviations, and common Latin shorthand.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "ave", "blvd", "dept", "est", "govt",
    "inc", "corp", "ltd", "co", "vs", "etc", "approx", "assn", "div", "gen", "gov", "hon",
    "fig", "eq", "vol", "no", "op", "ed", "rev", "al", "e.g", "i.e",
];

/// Decide whether the punctuation mark at `i` genuinely ends a sentence.
///
/// `!` and `?` always do. A `.` is not a boundary after a known abbreviation
/// or a single initial, nor as part of an ellipsis; otherwise it is a
/// boundary at end of block or before a newline, or when the next non-space
/// character is upper-case.
pub fn is_sentence_end(block: &[char], i: usize) -> bool {
    let Some(&mark) = block.get(i) else {
        return false;
    };
    match mark {
        '!' | '?' => return true,
        '.' => {}
        _ => return false,
    }

    // Extract the word immediately before the period.
    let mut ws = i;
    while ws > 0 && block[ws - 1].is_alphabetic() {
        ws -= 1;
    }
    let word: String = block[ws..i].iter().collect::<String>().to_lowercase();

    if ABBREVIATIONS.contains(&word.as_str()) {
        return false;
    }
    if word.chars().count() == 1 && word.chars().all(|c| c.is_alphabetic()) {
        return false;
    }
    if i > 0 && block[i - 1] == '.' {
        return false;
    }

    let mut j = i + 1;
    while j < block.len() && block[j] == ' ' {
        j += 1;
    }
    if j >= block.len() || block[j] == '\n' {
        return true;
    }
    block[j].is_uppercase()
}
