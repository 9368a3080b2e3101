//! Seeded randomized sweep: every declared pattern must be accepted with
//! the value of its last declaration, and any input that leaves the
//! declared alphabet must reject absorbingly.
//!
//! Override the sweep size with MATCHGEN_SWEEP_PATTERNS / MATCHGEN_SWEEP_SEED.

use std::collections::HashMap;

use matchgen::automaton::{Declaration, MachineMode, Symbol, compile};
use matchgen::dispatch::encode;
use rand::{Rng, SeedableRng, rngs::StdRng};

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(default)
}

const ALPHABET: &[char] = &['a', 'b', 'c', 'd', 'e'];

#[test]
fn random_patterns_accept_with_last_declared_value() {
    let n_patterns = env_u64("MATCHGEN_SWEEP_PATTERNS", 200) as usize;
    let seed = env_u64("MATCHGEN_SWEEP_SEED", 0xA1B2);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut decls = Vec::with_capacity(n_patterns);
    let mut expected: HashMap<String, usize> = HashMap::new();
    for i in 0..n_patterns {
        let len = rng.random_range(1..=6);
        let pattern: String = (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
            .collect();
        expected.insert(pattern.clone(), i);
        decls.push(Declaration::text(&pattern, i));
    }

    let automaton = compile(MachineMode::Plain, decls).unwrap();
    let table = encode(&automaton);
    let mut m = table.machine();

    for (pattern, value) in &expected {
        m.reset();
        let mut last_accept = None;
        for c in pattern.chars() {
            m.step(&Symbol::Char(c));
            last_accept = m.state().value.copied();
        }
        assert_eq!(
            last_accept,
            Some(*value),
            "pattern {pattern:?} (seed {seed:#x}) must report its last declared value"
        );
    }
}

#[test]
fn leaving_the_alphabet_rejects_absorbingly() {
    let seed = env_u64("MATCHGEN_SWEEP_SEED", 0xA1B2);
    let mut rng = StdRng::seed_from_u64(seed);

    let decls: Vec<_> = (0..50)
        .map(|i| {
            let len = rng.random_range(1..=5);
            let pattern: String = (0..len)
                .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
                .collect();
            Declaration::text(&pattern, i)
        })
        .collect();

    let automaton = compile(MachineMode::Plain, decls).unwrap();
    let table = encode(&automaton);
    let mut m = table.machine();

    for _ in 0..100 {
        m.reset();
        // Walk a few in-alphabet symbols, then one that no pattern uses.
        for _ in 0..rng.random_range(0..4) {
            m.step(&Symbol::Char(ALPHABET[rng.random_range(0..ALPHABET.len())]));
        }
        m.step(&Symbol::Char('z'));
        assert!(!m.state().accept, "'z' is outside every declared pattern");
        assert!(m.state().is_terminal);
        assert!(!m.step(&Symbol::Char('a')), "rejected is absorbing");
    }
}
