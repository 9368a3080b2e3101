// src/automaton/compile.rs
// Builds an Automaton from an ordered declaration list by maximal prefix
// sharing, plus the declaration-level validation that runs before any
// state is allocated.

use std::error::Error;
use std::fmt;

use serde_json::Value;

use super::symbol::{Symbol, SymbolKind};
use super::trie::Automaton;

/// How heterogeneous symbol kinds across declarations are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineMode {
    /// All declarations must agree on a single symbol kind.
    Plain,
    /// Mixed kinds are legal; the dispatch encoder splits them into one
    /// entry point per kind.
    KindWise,
}

/// One (pattern, output value) association. Declaration order matters:
/// later declarations win ties (see [`compile`]).
#[derive(Debug, Clone)]
pub struct Declaration<V> {
    pub pattern: Vec<Symbol>,
    pub value: V,
}

impl<V> Declaration<V> {
    /// Literal character-sequence pattern.
    pub fn text(pattern: &str, value: V) -> Self {
        Declaration {
            pattern: pattern.chars().map(Symbol::Char).collect(),
            value,
        }
    }

    /// Explicit symbol-list pattern.
    pub fn symbols(pattern: Vec<Symbol>, value: V) -> Self {
        Declaration { pattern, value }
    }
}

impl Declaration<String> {
    /// Decodes one declaration from its JSON form.
    ///
    /// `pattern` is either a literal string (one symbol per character) or
    /// an array whose items are an integer, a one-character string, a
    /// longer string (kept as an opaque literal), or null for the
    /// wildcard. `value` is any JSON scalar, kept as its literal text.
    pub fn from_json(index: usize, pattern: &Value, value: &Value) -> Result<Self, CompileError> {
        let unsupported = |detail: String| CompileError::UnsupportedPattern { index, detail };

        let symbols = match pattern {
            Value::String(s) => s.chars().map(Symbol::Char).collect(),
            Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(match item {
                        Value::Null => Symbol::Wildcard,
                        Value::Number(n) => match n.as_i64() {
                            Some(v) => Symbol::Int(v),
                            None => return Err(unsupported(format!("non-integer number {n}"))),
                        },
                        Value::String(s) => {
                            let mut chars = s.chars();
                            match (chars.next(), chars.next()) {
                                (Some(c), None) => Symbol::Char(c),
                                _ => Symbol::Str(s.clone()),
                            }
                        }
                        other => return Err(unsupported(format!("unsupported symbol {other}"))),
                    });
                }
                out
            }
            other => return Err(unsupported(format!("pattern must be a string or an array, got {other}"))),
        };

        let value = match value {
            Value::String(s) => s.clone(),
            Value::Null | Value::Bool(_) | Value::Number(_) => value.to_string(),
            other => return Err(unsupported(format!("unsupported value {other}"))),
        };

        Ok(Declaration {
            pattern: symbols,
            value,
        })
    }
}

/// User-facing compilation failures. Deterministic for a given input;
/// never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The declaration's pattern is neither a literal sequence of a
    /// supported primitive kind nor an explicit symbol list.
    UnsupportedPattern { index: usize, detail: String },
    /// Declarations disagree on the symbol kind while the machine is
    /// kind-locked.
    AmbiguousKind {
        index: usize,
        expected: SymbolKind,
        found: SymbolKind,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnsupportedPattern { index, detail } => {
                write!(f, "declaration {index}: unsupported pattern shape: {detail}")
            }
            CompileError::AmbiguousKind {
                index,
                expected,
                found,
            } => write!(
                f,
                "declaration {index}: symbol kind {found} conflicts with {expected} used by earlier declarations"
            ),
        }
    }
}

impl Error for CompileError {}

/// Compiles the declarations, in order, into a populated automaton.
///
/// Patterns sharing a prefix share the state chain for that prefix, so
/// the trie size is bounded by the sum of pattern lengths. A duplicate
/// pattern overwrites the earlier output value (last declaration wins);
/// the overwrite is logged so callers can diagnose unintended duplicates.
pub fn compile<V>(
    mode: MachineMode,
    declarations: Vec<Declaration<V>>,
) -> Result<Automaton<V>, CompileError> {
    if mode == MachineMode::Plain {
        check_single_kind(&declarations)?;
    }

    let mut automaton = Automaton::new();
    for (index, decl) in declarations.into_iter().enumerate() {
        insert(&mut automaton, index, decl);
    }
    Ok(automaton)
}

/// Every non-wildcard symbol across all declarations must share one kind.
fn check_single_kind<V>(declarations: &[Declaration<V>]) -> Result<(), CompileError> {
    let mut expected: Option<SymbolKind> = None;
    for (index, decl) in declarations.iter().enumerate() {
        for sym in &decl.pattern {
            let Some(found) = sym.kind() else { continue };
            match expected {
                None => expected = Some(found),
                Some(e) if e != found => {
                    return Err(CompileError::AmbiguousKind {
                        index,
                        expected: e,
                        found,
                    });
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

fn insert<V>(automaton: &mut Automaton<V>, index: usize, decl: Declaration<V>) {
    let Declaration { mut pattern, value } = decl;

    let Some(last) = pattern.pop() else {
        // Zero-length pattern: the machine accepts before any input.
        if automaton.associate_initial(value).is_some() {
            log::warn!("declaration {index} overwrites the value of an earlier empty pattern");
        }
        return;
    };
    let body = pattern;

    // Consume whatever prefix already exists in the trie.
    let mut state = automaton.initial();
    let mut consumed = 0;
    while consumed < body.len() {
        let (next, _) = automaton.transition(state, &body[consumed]);
        if next < 0 {
            break;
        }
        state = next;
        consumed += 1;
    }

    // Grow fresh states for the unshared remainder. This is the only
    // place new states are created.
    while consumed < body.len() {
        let dst = automaton.allocate_state();
        automaton.connect(state, body[consumed].clone(), dst);
        state = dst;
        consumed += 1;
    }

    // The final symbol carries the payload; the edge is created here when
    // no longer pattern has laid it down already.
    if automaton.associate(state, last, value).is_some() {
        log::warn!("declaration {index} overwrites the value of an earlier duplicate pattern");
    }
}
