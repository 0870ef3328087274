use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ghostwriter::control::RunControl;
use ghostwriter::discovery::{attempt, find_editable_word};
use ghostwriter::events::EventSender;
use ghostwriter::sink::{BufferSink, InputSink};
use ghostwriter::timing::TimingModel;

#[test]
fn short_region_finds_nothing() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(find_editable_word("teh cat sat", &mut rng).is_none());
}

#[test]
fn finds_a_known_typo() {
    let typed = "It was teh best of times, it was the worst of times.";
    // Only one replacement-table word is present, so every seed finds it.
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let edit = find_editable_word(typed, &mut rng).expect("typo should be found");
        assert_eq!(edit.found, "teh");
        assert_eq!(edit.replacement, "the");
        // "teh" starts 7 chars in; distance runs to the end of the buffer.
        assert_eq!(edit.distance, typed.chars().count() - 7);
    }

    // The other "the" is a whole word too, but it is not in the table.
    assert!(!typed[7 + 3..].contains("teh"));
}

#[test]
fn preserves_leading_capitalization() {
    let typed = "Becuase the weather turned, everyone left the park early.";
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let edit = find_editable_word(typed, &mut rng).expect("typo should be found");
        assert_eq!(edit.found, "Becuase");
        assert_eq!(edit.replacement, "Because");
    }
}

#[test]
fn matches_whole_words_only() {
    // "useful" contains "use" but must not match it.
    let typed = "A genuinely useful widget appeared on the workbench today.";
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert!(find_editable_word(typed, &mut rng).is_none());
    }
}

#[test]
fn attempt_applies_the_correction_everywhere() {
    let typed_initial =
        "The plan seperate from the others was finished ahead of schedule today.";

    let mut sink = BufferSink::new();
    for c in typed_initial.chars() {
        sink.insert_char(c).unwrap();
    }

    let mut typed = typed_initial.to_string();
    let timing = TimingModel::new(200, 0, 0);
    let control = RunControl::new();
    let (events, _rx) = EventSender::channel();
    let mut rng = StdRng::seed_from_u64(5);

    attempt(&mut sink, &mut typed, &timing, &control, &events, &mut rng).unwrap();

    let expected = typed_initial.replace("seperate", "separate");
    assert_eq!(typed, expected);
    // The sink saw the same navigate-select-replace choreography.
    assert_eq!(sink.text(), expected);
    // Cursor restored to the live typing position.
    assert_eq!(sink.cursor(), expected.chars().count());
}

#[test]
fn attempt_without_a_match_is_a_no_op() {
    let typed_initial = "Nothing from the replacement vocabulary appears within this sentence.";

    let mut sink = BufferSink::new();
    for c in typed_initial.chars() {
        sink.insert_char(c).unwrap();
    }

    let mut typed = typed_initial.to_string();
    let timing = TimingModel::new(200, 0, 0);
    let control = RunControl::new();
    let (events, _rx) = EventSender::channel();
    let mut rng = StdRng::seed_from_u64(6);

    attempt(&mut sink, &mut typed, &timing, &control, &events, &mut rng).unwrap();

    assert_eq!(typed, typed_initial);
    assert_eq!(sink.text(), typed_initial);
}
