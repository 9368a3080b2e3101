// src/dispatch/mod.rs
pub mod encode;
pub mod io;
pub mod machine;

// Re-exports to keep the external API flat.
pub use encode::{Branch, DispatchTable, Fallback, KindTable, StateDispatch, encode};
pub use io::{load_table_bin_bytes, load_table_json_bytes, save_table_bin, save_table_json};
pub use machine::{Machine, MachineState};
