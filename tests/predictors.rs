//! Direction prediction and training behavior for every scheme.

use bpsim::*;
use bpsim::sim;
use bpsim::synth::*;
use proptest::prelude::*;
use rstest::rstest;

fn records(seq: &[(u32, Outcome)]) -> Vec<BranchRecord> {
    seq.iter().map(|(pc, o)| BranchRecord::new(*pc, *o)).collect()
}

fn small_perceptron() -> PerceptronPredictor {
    PerceptronConfig {
        history_length: 4,
        bits_per_weight: 8,
        pc_index_bits: 6,
        storage_budget_bits: 5 * 8 * 64,
    }.build().unwrap()
}

fn mixed_program(seed: u64) -> Vec<BranchRecord> {
    let mut p = SyntheticProgram::new(0x1000, 4, seed);
    let a = p.add_branch(BranchPattern::TakenPeriodic(5));
    p.add_branch(BranchPattern::Random(0.3));
    p.add_branch(BranchPattern::Correlated(a));
    p.add_branch(BranchPattern::Pattern(vec![Outcome::T, Outcome::N, Outcome::N]));
    p.simulate_for(2000)
}

// ══════════════════════════════════════════════════════════
// Gshare
// ══════════════════════════════════════════════════════════

#[test]
fn gshare_short_trace_walks_fresh_counters() {
    let mut p = GsharePredictor::new(2);
    let trace = records(&[
        (0, Outcome::T), (0, Outcome::T), (0, Outcome::N), (0, Outcome::T),
    ]);
    // History moves the index through 0, 1, 3 and 2
    let preds = sim::predictions(&mut p, &trace);
    assert_eq!(preds, vec![Outcome::N; 4]);
    let values: Vec<u8> = p.table().iter().map(|c| c.value()).collect();
    assert_eq!(values, vec![2, 2, 2, 0]);
    assert_eq!(p.ghist(), 0b01);
}

#[test]
fn gshare_pinned_index_follows_counter() {
    let mut p = GsharePredictor::new(0);
    let trace = records(&[
        (0, Outcome::T), (0, Outcome::T), (0, Outcome::N), (0, Outcome::T),
    ]);
    let preds = sim::predictions(&mut p, &trace);
    assert_eq!(preds, vec![Outcome::N, Outcome::T, Outcome::T, Outcome::T]);
    assert_eq!(p.table().get_entry(0).value(), 3);
}

#[test]
fn gshare_learns_always_taken() {
    let mut p = GsharePredictor::new(4);
    for _ in 0..8 {
        p.train(0x1000, Outcome::T);
    }
    // History is saturated with 'taken', so one entry has been trained
    // repeatedly
    assert_eq!(p.ghist(), 0b1111);
    let idx = p.index(0x1000);
    assert_eq!(p.table().get_entry(idx).value(), 3);
    assert_eq!(p.predict(0x1000), Outcome::T);
}

// ══════════════════════════════════════════════════════════
// Tournament
// ══════════════════════════════════════════════════════════

#[test]
fn tournament_local_right_global_wrong() {
    // One global context and a local side that separates two branches.
    let mut p = TournamentPredictor::new(0, 1, 1);
    let (a, b) = (0x0, 0x1);

    // Warm up: 'a' always taken, 'b' always not-taken. Each branch has its
    // own local history row, so the local tables learn both branches while
    // the single global counter bounces between them.
    let mut last_choice = p.choice_table().get_entry(0).value();
    for _ in 0..32 {
        p.train(a, Outcome::T);
        p.train(b, Outcome::N);
        let choice = p.choice_table().get_entry(0).value();
        assert!(choice <= last_choice);
        last_choice = choice;
    }
    assert_eq!(last_choice, 0);
    assert_eq!(p.predict(a), Outcome::T);
    assert_eq!(p.predict(b), Outcome::N);
    let votes = p.votes(a);
    assert!(!votes.use_global);
    assert_eq!(votes.outcome(), votes.local);
}

#[test]
fn tournament_global_right_local_wrong() {
    let mut p = TournamentPredictor::new(2, 0, 0);
    // A single local counter sees an alternating stream and stays useless,
    // while global history separates the two phases.
    for _ in 0..64 {
        p.train(0x40, Outcome::T);
        p.train(0x40, Outcome::N);
    }
    assert_eq!(p.choice_table().get_entry(p.global_index(0x40)).value(), 3);
}

// ══════════════════════════════════════════════════════════
// Perceptron
// ══════════════════════════════════════════════════════════

#[test]
fn perceptron_zero_weights_predict_taken() {
    let p = small_perceptron();
    assert_eq!(p.threshold(), 22);
    assert_eq!(p.predict(0x10), Outcome::T);
}

#[test]
fn perceptron_first_training_step() {
    let mut p = small_perceptron();
    p.train(0x10, Outcome::T);
    let w = p.weights(p.index(0x10));
    assert_eq!(w[4], 1);
    assert!(w[..4].iter().all(|&x| x == -1));
    // Other rows are untouched
    assert!(p.weights(p.index(0x11)).iter().all(|&x| x == 0));
}

#[test]
fn perceptron_learns_alternating_branch() {
    let mut p = small_perceptron();
    let trace: Vec<BranchRecord> = (0..200)
        .map(|i| BranchRecord::new(0x20, Outcome::from(i % 2 == 0)))
        .collect();
    let stat = sim::replay(&mut p, &trace[..100]);
    assert!(stat.global_miss() > 0);
    let stat = sim::replay(&mut p, &trace[100..]);
    assert_eq!(stat.global_miss(), 0);
}

#[test]
fn perceptron_stops_training_when_confident() {
    let mut p = small_perceptron();
    for _ in 0..200 {
        p.train(0x30, Outcome::T);
    }
    let idx = p.index(0x30);
    let snapshot = p.weights(idx).to_vec();
    assert!(p.output(idx) > p.threshold());
    p.train(0x30, Outcome::T);
    assert_eq!(p.weights(idx), snapshot.as_slice());
}

#[test]
fn perceptron_trains_on_confident_miss() {
    let mut p = small_perceptron();
    for _ in 0..200 {
        p.train(0x30, Outcome::T);
    }
    let idx = p.index(0x30);
    let before = p.weights(idx).to_vec();
    assert!(p.output(idx) > p.threshold());
    assert_eq!(p.predict(0x30), Outcome::T);

    p.train(0x30, Outcome::N);
    let after = p.weights(idx);
    assert_ne!(after, before.as_slice());
    assert_eq!(after[4], -1);
    // History was all 'taken', so every weight moves down by one
    for (a, b) in after[..4].iter().zip(before[..4].iter()) {
        assert_eq!(*a, b - 1);
    }
}

// ══════════════════════════════════════════════════════════
// Facade
// ══════════════════════════════════════════════════════════

#[test]
fn static_always_taken() {
    let mut p = BranchPredictor::new(&PredictorConfig::default()).unwrap();
    for pc in [0, 0x1000, u32::MAX] {
        p.train(pc, Outcome::N);
        assert_eq!(p.predict(pc), Outcome::T);
    }
    assert_eq!(p.storage_bits(), 0);
}

#[test]
fn facade_builds_only_the_requested_scheme() {
    let p = BranchPredictor::new(&PredictorConfig::gshare(4)).unwrap();
    assert!(matches!(p, BranchPredictor::Gshare(_)));
    assert_eq!(p.storage_bits(), 16 * 2 + 4);

    let cfg = PredictorConfig::new(Scheme::Custom, 1, 1, 1);
    let p = BranchPredictor::new(&cfg).unwrap();
    assert_eq!(p.name(), "CustomTournamentPredictor");

    let cfg = PredictorConfig::new(Scheme::Perceptron, 2, 2, 2);
    match BranchPredictor::new(&cfg).unwrap() {
        BranchPredictor::Perceptron(p) => {
            assert_eq!(p.config(), &PerceptronConfig::default());
            assert_eq!(p.num_perceptrons(), 42);
        },
        other => panic!("unexpected {:?}", other.scheme()),
    }
}

#[test]
fn facade_rejects_oversized_tables() {
    let cfg = PredictorConfig::tournament(4, 29, 4);
    assert!(matches!(BranchPredictor::new(&cfg),
        Err(ConfigError::TableTooLarge { bits: 29, .. })));
}

#[test]
fn instances_are_independent() {
    let cfg = PredictorConfig::gshare(6);
    let mut a = BranchPredictor::new(&cfg).unwrap();
    let b = BranchPredictor::new(&cfg).unwrap();
    for _ in 0..10 {
        a.train(0x8, Outcome::T);
    }
    let fresh: Vec<Outcome> = (0..64).map(|pc| b.predict(pc)).collect();
    assert!(fresh.iter().all(|o| *o == Outcome::N));
}

#[rstest]
#[case::static_bp("static")]
#[case::gshare("gshare:6")]
#[case::tournament("tournament:4:5:3")]
#[case::custom("custom")]
#[case::perceptron("perceptron")]
fn replay_is_deterministic(#[case] desc: &str) {
    let cfg: PredictorConfig = desc.parse().unwrap();
    let trace = mixed_program(11);
    let mut a = BranchPredictor::new(&cfg).unwrap();
    let mut b = BranchPredictor::new(&cfg).unwrap();
    assert_eq!(sim::predictions(&mut a, &trace), sim::predictions(&mut b, &trace));
}

#[rstest]
#[case::gshare("gshare:6")]
#[case::tournament("tournament:4:5:3")]
#[case::custom("custom")]
#[case::perceptron("perceptron")]
fn dynamic_schemes_beat_static(#[case] desc: &str) {
    let trace = mixed_program(3);
    let mut baseline = BranchPredictor::new(&PredictorConfig::default()).unwrap();
    let base = sim::replay(&mut baseline, &trace);

    let cfg: PredictorConfig = desc.parse().unwrap();
    let mut p = BranchPredictor::new(&cfg).unwrap();
    let stat = sim::replay(&mut p, &trace);
    assert!(stat.global_miss() < base.global_miss(),
        "{} missed {} (static missed {})",
        desc, stat.global_miss(), base.global_miss());
}

// ══════════════════════════════════════════════════════════
// Properties
// ══════════════════════════════════════════════════════════

fn branch_stream() -> impl Strategy<Value = Vec<(u32, bool)>> {
    prop::collection::vec((0u32..64, any::<bool>()), 0..400)
}

proptest! {
    #[test]
    fn counters_stay_saturated(stream in branch_stream()) {
        let mut g = GsharePredictor::new(3);
        let mut t = TournamentPredictor::new(3, 3, 2);
        for (pc, taken) in stream {
            g.train(pc, taken.into());
            t.train(pc, taken.into());
        }
        let tables = [g.table(), t.local_table(), t.global_table(),
            t.choice_table()];
        for table in tables {
            prop_assert!(table.iter().all(|c| c.value() <= 3));
        }
    }

    #[test]
    fn predict_has_no_side_effects(stream in branch_stream(), pc in any::<u32>()) {
        for desc in ["gshare:5", "tournament:4:4:4", "custom", "perceptron"] {
            let cfg: PredictorConfig = desc.parse().unwrap();
            let mut p = BranchPredictor::new(&cfg).unwrap();
            for (pc, taken) in stream.iter() {
                p.train(*pc, (*taken).into());
            }
            let first = p.predict(pc);
            prop_assert_eq!(first, p.predict(pc));
        }
    }

    #[test]
    fn replay_twice_matches(stream in branch_stream()) {
        let trace: Vec<BranchRecord> = stream.iter()
            .map(|(pc, taken)| BranchRecord::new(*pc, (*taken).into()))
            .collect();
        for desc in ["gshare:5", "tournament:4:4:4", "custom", "perceptron"] {
            let cfg: PredictorConfig = desc.parse().unwrap();
            let mut a = BranchPredictor::new(&cfg).unwrap();
            let mut b = BranchPredictor::new(&cfg).unwrap();
            prop_assert_eq!(sim::predictions(&mut a, &trace),
                sim::predictions(&mut b, &trace));
        }
    }
}
