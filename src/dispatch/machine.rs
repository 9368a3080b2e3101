// src/dispatch/machine.rs
// The runtime step function over an encoded dispatch table. One Machine
// per input stream; the table itself is shared immutably, so any number
// of machines can run over it concurrently.

use crate::automaton::{NO_STATE, StateId, Symbol};

use super::encode::{DispatchTable, Fallback};

/// Observable machine state after `reset` and after each `step`.
#[derive(Debug, PartialEq, Eq)]
pub struct MachineState<'t, V> {
    /// The machine cannot advance any further from here.
    pub is_terminal: bool,
    /// The symbols consumed so far complete a pattern.
    pub accept: bool,
    /// The completed pattern's output value when `accept` is true.
    pub value: Option<&'t V>,
}

impl<V> Clone for MachineState<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<V> Copy for MachineState<'_, V> {}

pub struct Machine<'t, V> {
    table: &'t DispatchTable<V>,
    current: StateId,
    state: MachineState<'t, V>,
}

impl<'t, V> Machine<'t, V> {
    pub fn new(table: &'t DispatchTable<V>) -> Self {
        let mut machine = Machine {
            table,
            current: NO_STATE,
            state: MachineState {
                is_terminal: true,
                accept: false,
                value: None,
            },
        };
        machine.reset();
        machine
    }

    /// Returns to the initial state and re-derives its flags; a declared
    /// zero-length pattern is accepting immediately after this call,
    /// before any input.
    pub fn reset(&mut self) {
        self.current = self.table.initial;
        self.state = MachineState {
            is_terminal: self.table.initial_terminal,
            accept: self.table.initial_value.is_some(),
            value: self.value_at(self.table.initial_value),
        };
    }

    pub fn state(&self) -> MachineState<'t, V> {
        self.state
    }

    /// Consumes one symbol. Returns false when the machine can no longer
    /// advance: the matched pattern was exhausted on this edge (its value,
    /// if any, is still surfaced through `state`), or nothing matched and
    /// the machine is now rejected. Stepping a rejected machine stays
    /// rejected and keeps returning false.
    pub fn step(&mut self, sym: &Symbol) -> bool {
        if self.current < 0 {
            return self.reject();
        }
        // The wildcard is a table-side sentinel, not an input symbol.
        let Some(kind) = sym.kind() else {
            return self.reject();
        };
        let Some(table) = self.table.kinds.iter().find(|t| t.kind == kind) else {
            return self.reject();
        };
        let Some(dispatch) = table.find(self.current) else {
            return self.reject();
        };
        for branch in &dispatch.branches {
            if branch.symbol == *sym {
                return self.take(branch.dst, branch.value);
            }
        }
        let Fallback { dst, value, .. } = dispatch.fallback;
        self.take(dst, value)
    }

    fn take(&mut self, dst: StateId, value: Option<u32>) -> bool {
        self.current = dst;
        self.state = MachineState {
            is_terminal: dst < 0,
            accept: value.is_some(),
            value: self.value_at(value),
        };
        dst >= 0
    }

    fn reject(&mut self) -> bool {
        self.current = NO_STATE;
        self.state = MachineState {
            is_terminal: true,
            accept: false,
            value: None,
        };
        false
    }

    fn value_at(&self, idx: Option<u32>) -> Option<&'t V> {
        idx.map(|i| &self.table.values[i as usize])
    }
}

impl<V> DispatchTable<V> {
    /// A fresh machine positioned at the initial state.
    pub fn machine(&self) -> Machine<'_, V> {
        Machine::new(self)
    }
}
