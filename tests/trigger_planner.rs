use rand::rngs::StdRng;
use rand::SeedableRng;

use ghostwriter::config::SimConfig;
use ghostwriter::triggers::{sentence_end_offsets, TriggerSet};

fn long_source(sentences: usize) -> String {
    let mut out = String::new();
    for i in 0..sentences {
        out.push_str(&format!("Sentence number {i} has a few words in it. "));
    }
    out
}

fn full_config() -> SimConfig {
    SimConfig {
        false_starts_enabled: true,
        false_start_count: 5,
        mistake_discovery_enabled: true,
        edit_frequency: 5,
        ..SimConfig::default()
    }
}

#[test]
fn sentence_end_offsets_follow_mark_plus_whitespace() {
    let offsets = sentence_end_offsets("One. Two! Three? Done");
    assert_eq!(offsets, vec![5, 10, 17]);
}

#[test]
fn sentence_end_offsets_ignore_trailing_mark() {
    // No whitespace after the final period, so it yields no offset.
    assert!(sentence_end_offsets("Done.").is_empty());
}

#[test]
fn trigger_sets_are_disjoint() {
    let source = long_source(40);
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let set = TriggerSet::plan(&source, &full_config(), &mut rng);

        assert!(set
            .false_start_offsets()
            .is_disjoint(set.discovery_offsets()));
    }
}

#[test]
fn triggers_never_exceed_eligible_positions() {
    // Long enough to pass the 200-char gate but with only a couple of
    // eligible sentence ends.
    let source = format!(
        "{} middle. {} end. {}",
        "a".repeat(85),
        "b".repeat(60),
        "c".repeat(80)
    );
    let cfg = full_config();
    let mut rng = StdRng::seed_from_u64(11);
    let set = TriggerSet::plan(&source, &cfg, &mut rng);

    assert!(set.pending_false_starts() <= cfg.false_start_count);
    assert!(set.pending_discoveries() <= cfg.edit_frequency);

    let total = source.chars().count();
    for &p in set.false_start_offsets() {
        assert!(p > 80 && p < total - 60);
    }
    for &p in set.discovery_offsets() {
        assert!(p > 80 && p < total - 40);
    }
}

#[test]
fn short_sources_schedule_nothing() {
    let source = "Short text. With sentences. But under the size gate.";
    let mut rng = StdRng::seed_from_u64(1);
    let set = TriggerSet::plan(source, &full_config(), &mut rng);

    assert_eq!(set.pending_false_starts(), 0);
    assert_eq!(set.pending_discoveries(), 0);
}

#[test]
fn disabled_features_schedule_nothing() {
    let source = long_source(40);
    let cfg = SimConfig {
        false_starts_enabled: false,
        mistake_discovery_enabled: false,
        ..SimConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(2);
    let set = TriggerSet::plan(&source, &cfg, &mut rng);

    assert_eq!(set.pending_false_starts(), 0);
    assert_eq!(set.pending_discoveries(), 0);
}

#[test]
fn take_consumes_a_trigger_once() {
    let source = long_source(40);
    let mut rng = StdRng::seed_from_u64(3);
    let mut set = TriggerSet::plan(&source, &full_config(), &mut rng);

    let &offset = set
        .false_start_offsets()
        .iter()
        .next()
        .expect("expected at least one false start");
    assert!(set.take_false_start(offset));
    assert!(!set.take_false_start(offset));
}
