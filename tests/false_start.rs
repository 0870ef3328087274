use anyhow::{anyhow, Result};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ghostwriter::control::RunControl;
use ghostwriter::events::EventSender;
use ghostwriter::false_start::attempt;
use ghostwriter::llm::{
    sanitize_fragment, FragmentGenerator, FragmentRequest, DEFAULT_MODELS,
};
use ghostwriter::sink::{BufferSink, InputSink};
use ghostwriter::timing::TimingModel;

struct FixedGenerator {
    reply: &'static str,
    requests: Vec<FragmentRequest>,
}

impl FragmentGenerator for FixedGenerator {
    fn generate(&mut self, request: &FragmentRequest) -> Result<String> {
        self.requests.push(request.clone());
        Ok(self.reply.to_string())
    }
}

struct FailingGenerator {
    calls: usize,
}

impl FragmentGenerator for FailingGenerator {
    fn generate(&mut self, _request: &FragmentRequest) -> Result<String> {
        self.calls += 1;
        Err(anyhow!("generator unreachable"))
    }
}

fn seeded_sink(text: &str) -> BufferSink {
    let mut sink = BufferSink::new();
    for c in text.chars() {
        sink.insert_char(c).unwrap();
    }
    sink
}

#[test]
fn sanitize_keeps_first_line_and_strips_quotes() {
    assert_eq!(
        sanitize_fragment("\"Maybe we should consider\"\nsecond line"),
        Some("Maybe we should consider".to_string())
    );
    assert_eq!(sanitize_fragment("  'one liner'  "), Some("one liner".to_string()));
    assert_eq!(sanitize_fragment("\n\n"), None);
    assert_eq!(sanitize_fragment("\"\""), None);
}

#[test]
fn fragment_is_typed_and_fully_deleted() {
    let before = "The report covers last quarter. ";
    let mut sink = seeded_sink(before);
    let mut typed = before.to_string();
    let mut generator = FixedGenerator {
        reply: "Perhaps the numbers",
        requests: Vec::new(),
    };

    let timing = TimingModel::new(200, 0, 0);
    let control = RunControl::new();
    let (events, rx) = EventSender::channel();
    let mut rng = StdRng::seed_from_u64(8);

    attempt(
        &mut sink,
        &mut generator,
        &mut typed,
        &timing,
        &control,
        &events,
        &mut rng,
    )
    .unwrap();

    // The excursion fully reverts: buffer and sink both match the original.
    assert_eq!(typed, before);
    assert_eq!(sink.text(), before);

    // But the fragment was visibly typed along the way.
    let grew = rx.try_iter().any(|event| {
        matches!(event, ghostwriter::events::Event::TextUpdated(text)
            if text.len() > before.len())
    });
    assert!(grew, "expected the buffer to grow while the fragment was typed");

    assert_eq!(generator.requests.len(), 1);
    assert_eq!(generator.requests[0].model, DEFAULT_MODELS[0]);
    assert!(generator.requests[0].prompt.contains(before.trim()));
}

#[test]
fn generator_failure_is_absorbed() {
    let before = "Some context that was already typed out. ";
    let mut sink = seeded_sink(before);
    let mut typed = before.to_string();
    let mut generator = FailingGenerator { calls: 0 };

    let timing = TimingModel::new(200, 0, 0);
    let control = RunControl::new();
    let (events, _rx) = EventSender::channel();
    let mut rng = StdRng::seed_from_u64(9);

    attempt(
        &mut sink,
        &mut generator,
        &mut typed,
        &timing,
        &control,
        &events,
        &mut rng,
    )
    .unwrap();

    // Every configured model was tried before giving up.
    assert_eq!(generator.calls, DEFAULT_MODELS.len());
    assert_eq!(typed, before);
    assert_eq!(sink.text(), before);
}
