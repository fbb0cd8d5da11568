use dfatm::{
    compile, enumerate_dfas, is_empty, run, shortest_accepted, validate, Dfa, ExampleCatalog,
    Label, TapeSymbol, ValidDfa, Verdict, DEFAULT_MAX_STEPS,
};

/// Every word over `alphabet` of length at most `max_len`, shortest first.
fn words<A: Clone>(alphabet: &[A], max_len: usize) -> Vec<Vec<A>> {
    let mut all = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];

    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|word: &Vec<A>| {
                alphabet.iter().map(move |symbol| {
                    let mut longer = word.clone();
                    longer.push(symbol.clone());
                    longer
                })
            })
            .collect();
        all.extend(frontier.iter().cloned());
    }

    all
}

fn labels(word: &str) -> Vec<Label> {
    word.chars().map(Label::from).collect()
}

fn example(name: &str) -> ValidDfa<Label, Label> {
    ExampleCatalog::get_by_name(name)
        .unwrap()
        .dfa
        .clone()
        .validated()
        .unwrap()
}

#[test]
fn test_emptiness_matches_brute_force_for_every_enumerated_dfa() {
    for (index, dfa) in enumerate_dfas().enumerate() {
        let dfa = dfa.validated().unwrap();

        // A shortest accepted word is at most one symbol long here; length 4 is generous
        let accepts_something = words(&dfa.alphabet, 4).iter().any(|w| dfa.accepts(w));

        assert_eq!(is_empty(&dfa), !accepts_something, "DFA #{index}");
        assert_eq!(shortest_accepted(&dfa).is_none(), !accepts_something, "DFA #{index}");
    }
}

#[test]
fn test_compiled_machine_matches_dfa_for_every_enumerated_dfa() {
    for (index, dfa) in enumerate_dfas().enumerate() {
        let dfa = dfa.validated().unwrap();
        let program = compile(&dfa);

        for word in words(&dfa.alphabet, 4) {
            let report = run(&program, &word, word.len() + 1).unwrap();
            let expected = if dfa.accepts(&word) {
                Verdict::Accept
            } else {
                Verdict::Reject
            };

            assert_eq!(report.verdict, expected, "DFA #{index} on {word:?}");
            assert_eq!(report.step_count, word.len() + 1);
        }
    }
}

#[test]
fn test_reachable_scenario() {
    assert!(!is_empty(&example("reachable")));
    assert!(is_empty(&example("unreachable")));
}

#[test]
fn test_run_on_single_symbol_accepts_in_two_steps() {
    let program = compile(&example("reachable"));

    let report = run(&program, &labels("a"), DEFAULT_MAX_STEPS).unwrap();

    assert_eq!(report.verdict, Verdict::Accept);
    assert_eq!(report.step_count, 2);
    assert_eq!(
        report.final_tape,
        vec![TapeSymbol::Input(Label::from('a')), TapeSymbol::Blank]
    );

    // Halting on the last permitted step still counts
    let bounded = run(&program, &labels("a"), 2).unwrap();
    assert_eq!(bounded.verdict, Verdict::Accept);
    assert_eq!(bounded.step_count, 2);
}

#[test]
fn test_empty_input_resolves_in_one_step() {
    let program = compile(&example("reachable"));

    let report = run(&program, &[], 1).unwrap();

    assert_eq!(report.verdict, Verdict::Reject);
    assert_eq!(report.step_count, 1);
    assert_eq!(report.final_tape, vec![TapeSymbol::Blank]);
}

#[test]
fn test_zero_step_bound_times_out() {
    let program = compile(&example("reachable"));

    let report = run(&program, &labels("ab"), 0).unwrap();

    assert_eq!(report.verdict, Verdict::Timeout);
    assert_eq!(report.step_count, 0);
    assert_eq!(
        report.final_tape,
        vec![
            TapeSymbol::Input(Label::from('a')),
            TapeSymbol::Input(Label::from('b'))
        ]
    );
}

#[test]
fn test_parity_example_runs() {
    let program = compile(&example("parity"));

    for (input, expected) in [
        ("", Verdict::Accept),
        ("b", Verdict::Reject),
        ("ab", Verdict::Accept),
        ("abba", Verdict::Accept),
        ("aab", Verdict::Reject),
    ] {
        let report = run(&program, &labels(input), DEFAULT_MAX_STEPS).unwrap();
        assert_eq!(report.verdict, expected, "input {input:?}");
    }
}

#[test]
fn test_invalid_examples_are_rejected() {
    for name in ["missing-transition", "bad-target"] {
        let dfa = &ExampleCatalog::get_by_name(name).unwrap().dfa;

        assert!(!validate(dfa), "{name}");
        assert!(dfa.clone().validated().is_err(), "{name}");
    }
}

#[test]
fn test_dfa_from_json_end_to_end() {
    let json = r#"{
        "states": ["even", "odd"],
        "alphabet": ["1"],
        "transitions": {"even": {"1": "odd"}, "odd": {"1": "even"}},
        "start_state": "even",
        "accept_states": ["odd"]
    }"#;

    let dfa: Dfa<Label, Label> = Dfa::from_json(json).unwrap();
    let program = compile(&dfa.validated().unwrap());

    let report = run(&program, &labels("111"), DEFAULT_MAX_STEPS).unwrap();
    assert_eq!(report.verdict, Verdict::Accept);

    // '0' is not part of the alphabet
    assert!(run(&program, &labels("10"), DEFAULT_MAX_STEPS).is_err());
}
