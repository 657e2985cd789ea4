use std::cell::RefCell;
use std::collections::HashMap;

use proptest::prelude::*;

use super::*;
use crate::mx::{self, LookupMx, MxRecord, MxSelection};
use crate::smtp::{Probe, ProbeError, SmtpReply};

#[derive(Default)]
struct FakeResolver {
    answers: HashMap<String, Vec<MxRecord>>,
    queries: RefCell<Vec<String>>,
}

impl FakeResolver {
    fn with(mut self, domain: &str, records: Vec<MxRecord>) -> Self {
        self.answers.insert(domain.to_string(), records);
        self
    }

    fn calls(&self) -> usize {
        self.queries.borrow().len()
    }
}

impl LookupMx for FakeResolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, mx::Error> {
        self.queries.borrow_mut().push(domain.to_string());
        Ok(self.answers.get(domain).cloned().unwrap_or_default())
    }
}

type ProbeFn = dyn Fn(&str, &str) -> Result<SmtpReply, ProbeError>;

struct FakeProber {
    on_probe: Box<ProbeFn>,
    seen: RefCell<Vec<(String, String)>>,
}

impl FakeProber {
    fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &str) -> Result<SmtpReply, ProbeError> + 'static,
    {
        Self {
            on_probe: Box::new(f),
            seen: RefCell::new(Vec::new()),
        }
    }

    fn replying(code: u16, text: &'static str) -> Self {
        Self::new(move |_, _| Ok(SmtpReply::new(code, text)))
    }

    fn calls(&self) -> usize {
        self.seen.borrow().len()
    }
}

impl Probe for FakeProber {
    fn probe(&self, host: &str, address: &str) -> Result<SmtpReply, ProbeError> {
        self.seen
            .borrow_mut()
            .push((host.to_string(), address.to_string()));
        (self.on_probe)(host, address)
    }
}

#[derive(Default)]
struct CountingPacer {
    pauses: usize,
}

impl Pacer for CountingPacer {
    fn pause(&mut self, _delay: &DelayRange) {
        self.pauses += 1;
    }
}

#[derive(Default)]
struct RecordingProgress {
    lines: Vec<String>,
}

impl Progress for RecordingProgress {
    fn on_result(&mut self, index: usize, total: usize, result: &VerificationResult) {
        self.lines.push(progress_line(index, total, result));
    }
}

fn example_resolver() -> FakeResolver {
    FakeResolver::default().with("example.com", vec![MxRecord::new(10, "mx.example.com")])
}

fn run<R: LookupMx, P: Probe>(
    verifier: &Verifier<R, P>,
    inputs: &[InputValue],
) -> (Vec<VerificationResult>, CountingPacer, RecordingProgress) {
    let mut pacer = CountingPacer::default();
    let mut progress = RecordingProgress::default();
    let results =
        verifier.process_email_list(inputs, &DelayRange::none(), &mut pacer, &mut progress);
    (results, pacer, progress)
}

#[test]
fn invalid_format_short_circuits() {
    let resolver = example_resolver();
    let prober = FakeProber::replying(250, "Ok");
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());

    let verdict = verifier.verify_email("not-an-email");
    assert!(!verdict.is_valid);
    assert!(verdict.message.starts_with("Invalid email format:"), "{}", verdict.message);
    assert_eq!(resolver.calls(), 0);
    assert_eq!(prober.calls(), 0);
}

#[test]
fn missing_mx_skips_probe() {
    let resolver = FakeResolver::default();
    let prober = FakeProber::replying(250, "Ok");
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());

    let verdict = verifier.verify_email("user@nomx.example");
    assert_eq!(verdict, Verdict::invalid("Domain MX record not found"));
    assert_eq!(resolver.calls(), 1);
    assert_eq!(prober.calls(), 0);
}

#[test]
fn rcpt_250_is_valid() {
    let resolver = example_resolver();
    let prober = FakeProber::replying(250, "2.1.5 Ok");
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());

    let verdict = verifier.verify_email("User@Example.com");
    assert_eq!(verdict, Verdict::valid());
    assert_eq!(verdict.message, "Email address is valid");
    assert_eq!(
        prober.seen.borrow().as_slice(),
        &[("mx.example.com".to_string(), "User@example.com".to_string())]
    );
}

#[test]
fn rcpt_550_reports_code_and_text() {
    let resolver = example_resolver();
    let prober = FakeProber::replying(550, "5.1.1 User unknown");
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());

    let verdict = verifier.verify_email("ghost@example.com");
    assert!(!verdict.is_valid);
    assert!(verdict.message.contains("550"));
    assert_eq!(verdict.message, "Server response: 550 5.1.1 User unknown");
}

#[test]
fn other_2xx_codes_are_not_valid() {
    let resolver = example_resolver();
    let prober = FakeProber::replying(251, "User not local; will forward");
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());
    assert!(!verifier.verify_email("user@example.com").is_valid);
}

#[test]
fn probe_errors_become_messages() {
    let resolver = example_resolver();
    let cases: Vec<(FakeProber, &str)> = vec![
        (
            FakeProber::new(|host, _| {
                Err(ProbeError::Connect {
                    host: host.to_string(),
                    reason: "connection refused".to_string(),
                })
            }),
            "SMTP connection error:",
        ),
        (
            FakeProber::new(|host, _| {
                Err(ProbeError::Disconnected {
                    host: host.to_string(),
                })
            }),
            "SMTP server disconnected:",
        ),
        (
            FakeProber::new(|host, _| {
                Err(ProbeError::Io {
                    host: host.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out"),
                })
            }),
            "Error during verification:",
        ),
        (
            FakeProber::new(|host, _| {
                Err(ProbeError::connect_failed(
                    host,
                    &"192.0.2.1:25".parse().expect("addr"),
                    std::io::Error::new(std::io::ErrorKind::TimedOut, "connect timed out"),
                ))
            }),
            "Error during verification:",
        ),
    ];

    for (prober, prefix) in cases {
        let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());
        let verdict = verifier.verify_email("user@example.com");
        assert!(!verdict.is_valid);
        assert!(verdict.message.starts_with(prefix), "{}", verdict.message);
    }
}

#[test]
fn lowest_preference_selection_is_honoured() {
    let resolver = FakeResolver::default().with(
        "example.com",
        vec![
            MxRecord::new(20, "backup.example.com"),
            MxRecord::new(5, "primary.example.com"),
        ],
    );
    let prober = FakeProber::replying(250, "Ok");
    let options = VerifierOptions {
        mx_selection: MxSelection::LowestPreference,
        ..VerifierOptions::default()
    };
    let verifier = Verifier::new(&resolver, &prober, options);
    verifier.verify_email("user@example.com");
    assert_eq!(prober.seen.borrow()[0].0, "primary.example.com");

    let prober = FakeProber::replying(250, "Ok");
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());
    verifier.verify_email("user@example.com");
    assert_eq!(prober.seen.borrow()[0].0, "backup.example.com");
}

#[test]
fn non_text_input_is_answered_without_network() {
    let resolver = example_resolver();
    let prober = FakeProber::replying(250, "Ok");
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());

    let (results, pacer, progress) = run(&verifier, &[InputValue::Integer(12345)]);
    assert_eq!(
        results,
        vec![VerificationResult {
            input: InputValue::Integer(12345),
            is_valid: false,
            message: "Invalid email type".to_string(),
        }]
    );
    assert_eq!(results[0].input.to_string(), "12345");
    assert_eq!(resolver.calls(), 0);
    assert_eq!(prober.calls(), 0);
    assert_eq!(pacer.pauses, 0);
    assert!(progress.lines.is_empty());
}

#[test]
fn batch_keeps_order_and_pauses_between_items() {
    let resolver = example_resolver();
    let prober = FakeProber::new(|_, address| {
        if address.starts_with("good") {
            Ok(SmtpReply::new(250, "Ok"))
        } else {
            Ok(SmtpReply::new(550, "No such user"))
        }
    });
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());
    let inputs: Vec<InputValue> = vec![
        "good@example.com".into(),
        "bad@example.com".into(),
        "broken".into(),
        "good2@example.com".into(),
    ];

    let (results, pacer, progress) = run(&verifier, &inputs);
    assert_eq!(results.len(), 4);
    let got: Vec<(String, bool)> = results
        .iter()
        .map(|r| (r.input.to_string(), r.is_valid))
        .collect();
    assert_eq!(
        got,
        vec![
            ("good@example.com".to_string(), true),
            ("bad@example.com".to_string(), false),
            ("broken".to_string(), false),
            ("good2@example.com".to_string(), true),
        ]
    );
    assert_eq!(pacer.pauses, 3);
    assert_eq!(progress.lines.len(), 4);
    assert!(progress.lines[0].starts_with("[1/4] Email: good@example.com, Valid: true"));
    assert!(progress.lines[3].starts_with("[4/4]"));
    assert_eq!(BatchSummary::from_results(&results).to_string(), "2/4 emails are valid (50.0%)");
}

#[test]
fn non_text_item_consumes_no_pause() {
    let resolver = example_resolver();
    let prober = FakeProber::replying(250, "Ok");
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());
    let inputs = vec![
        InputValue::from("a@example.com"),
        InputValue::Boolean(true),
        InputValue::from("b@example.com"),
    ];
    let (results, pacer, _) = run(&verifier, &inputs);
    assert_eq!(results.len(), 3);
    // pause after a@, none for the boolean, none after the last item
    assert_eq!(pacer.pauses, 1);
}

#[test]
fn zero_delay_with_real_pacer_completes() {
    let resolver = example_resolver();
    let prober = FakeProber::replying(250, "Ok");
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());
    let inputs: Vec<InputValue> = (0..20)
        .map(|i| InputValue::from(format!("user{i}@example.com")))
        .collect();
    let started = std::time::Instant::now();
    let results = verifier.process_email_list(
        &inputs,
        &DelayRange::new(0.0, 0.0).unwrap(),
        &mut ThreadPacer,
        &mut SilentProgress,
    );
    assert_eq!(results.len(), 20);
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
}

#[test]
fn rerun_is_identical() {
    let resolver = example_resolver();
    let prober = FakeProber::new(|_, address| {
        Ok(SmtpReply::new(
            if address.len() % 2 == 0 { 250 } else { 450 },
            "deterministic",
        ))
    });
    let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());
    let inputs: Vec<InputValue> = vec![
        "a@example.com".into(),
        "bb@example.com".into(),
        InputValue::Float(1.5),
        "nope".into(),
        "c@nomx.example".into(),
    ];
    let (first, _, _) = run(&verifier, &inputs);
    let (second, _, _) = run(&verifier, &inputs);
    assert_eq!(first, second);
}

fn input_strategy() -> impl Strategy<Value = InputValue> {
    prop_oneof![
        any::<i64>().prop_map(InputValue::Integer),
        any::<bool>().prop_map(InputValue::Boolean),
        "[a-z]{0,6}(@[a-z]{0,6}(\\.com)?)?".prop_map(InputValue::Text),
    ]
}

proptest! {
    #[test]
    fn one_result_per_input_in_order(inputs in prop::collection::vec(input_strategy(), 0..24)) {
        let resolver = example_resolver();
        let prober = FakeProber::replying(550, "No");
        let verifier = Verifier::new(&resolver, &prober, VerifierOptions::default());
        let (results, _, _) = run(&verifier, &inputs);
        prop_assert_eq!(results.len(), inputs.len());
        for (result, input) in results.iter().zip(&inputs) {
            prop_assert_eq!(&result.input, input);
        }
    }
}
