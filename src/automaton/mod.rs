// src/automaton/mod.rs
pub mod arena;
pub mod compile;
pub mod symbol;
pub mod trie;

// Re-exports to keep the external API flat.
pub use arena::{NO_STATE, StateArena, StateId, Transition};
pub use compile::{CompileError, Declaration, MachineMode, compile};
pub use symbol::{Symbol, SymbolKind};
pub use trie::{Automaton, Walk};
