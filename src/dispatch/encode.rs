// src/dispatch/encode.rs
// Lowers a compiled automaton into the nested decision structure the
// runtime machine executes: per state, a branch per distinct symbol plus
// exactly one fallback. Heterogeneous pattern sets get one entry point
// per symbol kind over a shared state numbering.

use std::hash::Hash;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, NO_STATE, StateId, Symbol, SymbolKind};

/// One explicit (symbol -> destination) decision. `value` indexes
/// [`DispatchTable::values`] when this edge completes a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub symbol: Symbol,
    pub dst: StateId,
    pub value: Option<u32>,
}

/// Taken when no branch matches: the state's wildcard edge when it has
/// one (`explicit`), otherwise the synthetic rejecting fallback with
/// destination NO_STATE and no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallback {
    pub explicit: bool,
    pub dst: StateId,
    pub value: Option<u32>,
}

impl Fallback {
    fn reject() -> Self {
        Fallback {
            explicit: false,
            dst: NO_STATE,
            value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDispatch {
    pub state: StateId,
    pub branches: Vec<Branch>,
    pub fallback: Fallback,
}

/// A self-contained decision table over one symbol kind's alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindTable {
    pub kind: SymbolKind,
    /// Sorted by state id for lookup at runtime.
    pub states: Vec<StateDispatch>,
}

impl KindTable {
    pub fn find(&self, state: StateId) -> Option<&StateDispatch> {
        self.states
            .binary_search_by_key(&state, |s| s.state)
            .ok()
            .map(|i| &self.states[i])
    }
}

/// The encoded automaton: everything the runtime machine needs, with
/// output values interned into a side table so branches carry compact
/// ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchTable<V> {
    pub initial: StateId,
    pub initial_terminal: bool,
    pub initial_value: Option<u32>,
    pub kinds: Vec<KindTable>,
    pub values: Vec<V>,
}

// Values -> compact ids so branches stay small and serializable.
struct ValueInterner<V> {
    values: Vec<V>,
    ids: HashMap<V, u32>,
}

impl<V: Clone + Eq + Hash> ValueInterner<V> {
    fn new() -> Self {
        ValueInterner {
            values: Vec::new(),
            ids: HashMap::new(),
        }
    }

    fn intern(&mut self, value: Option<&V>) -> Option<u32> {
        let value = value?;
        if let Some(&id) = self.ids.get(value) {
            return Some(id);
        }
        let id = self.values.len() as u32;
        self.values.push(value.clone());
        self.ids.insert(value.clone(), id);
        Some(id)
    }
}

/// Walks the finished automaton and emits its dispatch table.
///
/// The walk order is the automaton's deterministic pre-order, so a fixed
/// declaration order always encodes to the same table. The wildcard is
/// kindless and becomes the fallback of every kind's entry point for its
/// state.
pub fn encode<V: Clone + Eq + Hash>(automaton: &Automaton<V>) -> DispatchTable<V> {
    let mut interner = ValueInterner::new();

    // Alphabet kinds in first-seen order.
    let mut present: Vec<SymbolKind> = Vec::new();
    for (_, sym, _, _) in automaton.flat_walk() {
        if let Some(kind) = sym.kind() {
            if !present.contains(&kind) {
                present.push(kind);
            }
        }
    }
    // A wildcard-only (or empty) automaton still dispatches: emit a
    // single entry point so the machine always has a table to step.
    if present.is_empty() {
        present.push(SymbolKind::Char);
    }

    let initial_value = interner.intern(automaton.initial_value());

    let mut kinds: Vec<KindTable> = present
        .into_iter()
        .map(|kind| KindTable {
            kind,
            states: Vec::new(),
        })
        .collect();

    for (state, connections) in automaton.walk() {
        let fallback = match connections.get(&Symbol::Wildcard) {
            Some(t) => Fallback {
                explicit: true,
                dst: t.dst,
                value: interner.intern(t.value.as_ref()),
            },
            None => Fallback::reject(),
        };

        for table in kinds.iter_mut() {
            let mut branches = Vec::new();
            for (sym, t) in connections.iter() {
                if sym.kind() != Some(table.kind) {
                    continue;
                }
                branches.push(Branch {
                    symbol: sym.clone(),
                    dst: t.dst,
                    value: interner.intern(t.value.as_ref()),
                });
            }
            table.states.push(StateDispatch {
                state,
                branches,
                fallback,
            });
        }
    }

    for table in kinds.iter_mut() {
        table.states.sort_by_key(|s| s.state);
    }

    log::debug!(
        "dispatch encoding: {} kind table(s), {} states, {} distinct values",
        kinds.len(),
        automaton.live_states(),
        interner.values.len()
    );

    DispatchTable {
        initial: automaton.initial(),
        initial_terminal: automaton.is_terminal(automaton.initial()),
        initial_value,
        kinds,
        values: interner.values,
    }
}
