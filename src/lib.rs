//! matchgen: compiles declarative (pattern, value) associations into
//! dispatch tables executed by a per-stream state machine.
//!
//! The pipeline is offline: `automaton::compile` turns the declaration
//! list into a trie of states, `dispatch::encode` lowers the trie into a
//! nested decision table, and `dispatch::Machine` steps that table one
//! symbol at a time. Tables can be saved and reloaded via `dispatch::io`
//! so the compile step never runs where the matching happens.

pub mod automaton;
pub mod dispatch;
