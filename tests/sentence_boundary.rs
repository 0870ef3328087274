use ghostwriter::sentence::is_sentence_end;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

fn mark_at(s: &str, needle: char, occurrence: usize) -> usize {
    s.chars()
        .enumerate()
        .filter(|&(_, c)| c == needle)
        .nth(occurrence)
        .map(|(i, _)| i)
        .expect("mark not found")
}

#[test]
fn abbreviation_period_is_not_a_boundary() {
    let block = chars("Dr. Smith arrived.");
    let dr_period = mark_at("Dr. Smith arrived.", '.', 0);
    let final_period = mark_at("Dr. Smith arrived.", '.', 1);

    assert!(!is_sentence_end(&block, dr_period));
    assert!(is_sentence_end(&block, final_period));
}

#[test]
fn period_before_uppercase_is_a_boundary() {
    let block = chars("It works. Great.");
    let first = mark_at("It works. Great.", '.', 0);
    assert!(is_sentence_end(&block, first));
}

#[test]
fn period_before_lowercase_is_not_a_boundary() {
    let block = chars("see ver. two for details");
    let idx = mark_at("see ver. two for details", '.', 0);
    assert!(!is_sentence_end(&block, idx));
}

#[test]
fn exclamation_and_question_always_end() {
    let block = chars("Really! are you sure? yes");
    assert!(is_sentence_end(&block, mark_at("Really! are you sure? yes", '!', 0)));
    assert!(is_sentence_end(&block, mark_at("Really! are you sure? yes", '?', 0)));
}

#[test]
fn single_initial_is_not_a_boundary() {
    let block = chars("John Q. Public spoke.");
    let initial = mark_at("John Q. Public spoke.", '.', 0);
    assert!(!is_sentence_end(&block, initial));
}

#[test]
fn ellipsis_periods_are_not_boundaries() {
    let text = "Well... Maybe.";
    let block = chars(text);
    // The second and third dots have a preceding dot.
    assert!(!is_sentence_end(&block, mark_at(text, '.', 1)));
    assert!(!is_sentence_end(&block, mark_at(text, '.', 2)));
}

#[test]
fn period_before_newline_is_a_boundary() {
    let text = "Done here.\nnext line";
    let block = chars(text);
    assert!(is_sentence_end(&block, mark_at(text, '.', 0)));
}

#[test]
fn non_punctuation_is_never_a_boundary() {
    let block = chars("abc");
    assert!(!is_sentence_end(&block, 1));
    assert!(!is_sentence_end(&block, 99));
}
