// src/dispatch/io.rs
// (De)serialization for dispatch tables: JSON for inspection/tooling and
// a compact little-endian binary for embedding:
//   magic: 8 bytes = "MGDSPT01"
//   i32:   initial state
//   u8:    initial_terminal (0/1)
//   u32:   initial value id (0xFFFFFFFF = none)
//   u32:   n_values, then per value u32 byte-len + UTF-8 bytes
//   u32:   n_kinds, then per kind: u8 kind tag, u32 n_states,
//          per state: i32 state, u32 n_branches,
//          per branch: u8 symbol tag + payload, i32 dst, u32 value id,
//          fallback: u8 explicit, i32 dst, u32 value id

use std::{
    io::{BufWriter, Write},
    path::Path,
};

use serde::{Serialize, de::DeserializeOwned};

use super::encode::{Branch, DispatchTable, Fallback, KindTable, StateDispatch};
use crate::automaton::{Symbol, SymbolKind};

// -------------------- JSON (de)serialization --------------------

pub fn save_table_json<V: Serialize>(path: &Path, table: &DispatchTable<V>) -> std::io::Result<()> {
    // Stream to disk to avoid giant intermediate strings.
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer(&mut w, table)?;
    w.flush()
}

pub fn load_table_json_bytes<V: DeserializeOwned>(data: &[u8]) -> Result<DispatchTable<V>, String> {
    serde_json::from_slice(data).map_err(|e| format!("Failed to parse dispatch table JSON: {e}"))
}

// -------------------- Compact binary --------------------

const BIN_MAGIC: &[u8; 8] = b"MGDSPT01";
const NONE_ID: u32 = u32::MAX;

const SYM_CHAR: u8 = 0;
const SYM_INT: u8 = 1;
const SYM_STR: u8 = 2;

fn kind_tag(kind: SymbolKind) -> u8 {
    match kind {
        SymbolKind::Char => 0,
        SymbolKind::Int => 1,
        SymbolKind::Str => 2,
    }
}

fn kind_from_tag(tag: u8) -> Result<SymbolKind, String> {
    match tag {
        0 => Ok(SymbolKind::Char),
        1 => Ok(SymbolKind::Int),
        2 => Ok(SymbolKind::Str),
        other => Err(format!("bad kind tag {other} in tables .bin")),
    }
}

fn value_id(value: Option<u32>) -> u32 {
    value.unwrap_or(NONE_ID)
}

fn invalid<T>(msg: &str) -> std::io::Result<T> {
    Err(std::io::Error::new(std::io::ErrorKind::InvalidData, msg))
}

/// Saves the table in the compact binary layout. Values must already be
/// interned strings; other value types go through the JSON form.
pub fn save_table_bin(path: &Path, table: &DispatchTable<String>) -> std::io::Result<()> {
    let f = std::fs::File::create(path)?;
    let mut w = BufWriter::new(f);

    w.write_all(BIN_MAGIC)?;
    w.write_all(&table.initial.to_le_bytes())?;
    w.write_all(&[table.initial_terminal as u8])?;
    w.write_all(&value_id(table.initial_value).to_le_bytes())?;

    w.write_all(&(table.values.len() as u32).to_le_bytes())?;
    for value in &table.values {
        w.write_all(&(value.len() as u32).to_le_bytes())?;
        w.write_all(value.as_bytes())?;
    }

    w.write_all(&(table.kinds.len() as u32).to_le_bytes())?;
    for kind_table in &table.kinds {
        w.write_all(&[kind_tag(kind_table.kind)])?;
        w.write_all(&(kind_table.states.len() as u32).to_le_bytes())?;
        for dispatch in &kind_table.states {
            w.write_all(&dispatch.state.to_le_bytes())?;
            w.write_all(&(dispatch.branches.len() as u32).to_le_bytes())?;
            for branch in &dispatch.branches {
                match &branch.symbol {
                    Symbol::Char(c) => {
                        w.write_all(&[SYM_CHAR])?;
                        w.write_all(&(*c as u32).to_le_bytes())?;
                    }
                    Symbol::Int(v) => {
                        w.write_all(&[SYM_INT])?;
                        w.write_all(&v.to_le_bytes())?;
                    }
                    Symbol::Str(s) => {
                        w.write_all(&[SYM_STR])?;
                        w.write_all(&(s.len() as u32).to_le_bytes())?;
                        w.write_all(s.as_bytes())?;
                    }
                    Symbol::Wildcard => {
                        return invalid("wildcard in branch list; it belongs in the fallback");
                    }
                }
                w.write_all(&branch.dst.to_le_bytes())?;
                w.write_all(&value_id(branch.value).to_le_bytes())?;
            }
            w.write_all(&[dispatch.fallback.explicit as u8])?;
            w.write_all(&dispatch.fallback.dst.to_le_bytes())?;
            w.write_all(&value_id(dispatch.fallback.value).to_le_bytes())?;
        }
    }

    w.flush()
}

#[inline]
fn take_u8(buf: &mut &[u8]) -> Result<u8, String> {
    let (&first, rest) = buf.split_first().ok_or("truncated u8")?;
    *buf = rest;
    Ok(first)
}

#[inline]
fn take_u32(buf: &mut &[u8]) -> Result<u32, String> {
    if buf.len() < 4 {
        return Err("truncated u32".into());
    }
    let mut le = [0u8; 4];
    le.copy_from_slice(&buf[..4]);
    *buf = &buf[4..];
    Ok(u32::from_le_bytes(le))
}

#[inline]
fn take_i32(buf: &mut &[u8]) -> Result<i32, String> {
    take_u32(buf).map(|v| v as i32)
}

#[inline]
fn take_i64(buf: &mut &[u8]) -> Result<i64, String> {
    if buf.len() < 8 {
        return Err("truncated i64".into());
    }
    let mut le = [0u8; 8];
    le.copy_from_slice(&buf[..8]);
    *buf = &buf[8..];
    Ok(i64::from_le_bytes(le))
}

fn take_string(buf: &mut &[u8]) -> Result<String, String> {
    let len = take_u32(buf)? as usize;
    if buf.len() < len {
        return Err("truncated string".into());
    }
    let (bytes, rest) = buf.split_at(len);
    *buf = rest;
    String::from_utf8(bytes.to_vec()).map_err(|_| "non-UTF-8 string in tables .bin".into())
}

fn take_value_id(buf: &mut &[u8], n_values: usize) -> Result<Option<u32>, String> {
    let id = take_u32(buf)?;
    if id == NONE_ID {
        return Ok(None);
    }
    if id as usize >= n_values {
        return Err(format!("value id {id} out of range ({n_values} values)"));
    }
    Ok(Some(id))
}

pub fn load_table_bin_bytes(mut data: &[u8]) -> Result<DispatchTable<String>, String> {
    if data.len() < 8 {
        return Err("bin too short".into());
    }
    let mut magic = [0u8; 8];
    magic.copy_from_slice(&data[..8]);
    if &magic != BIN_MAGIC {
        return Err("bad magic in tables .bin".into());
    }
    data = &data[8..];

    let initial = take_i32(&mut data)?;
    let initial_terminal = take_u8(&mut data)? != 0;
    let initial_id = take_u32(&mut data)?;

    let n_values = take_u32(&mut data)? as usize;
    let mut values = Vec::with_capacity(n_values);
    for _ in 0..n_values {
        values.push(take_string(&mut data)?);
    }

    let initial_value = if initial_id == NONE_ID {
        None
    } else if (initial_id as usize) < n_values {
        Some(initial_id)
    } else {
        return Err(format!("initial value id {initial_id} out of range"));
    };

    let n_kinds = take_u32(&mut data)? as usize;
    let mut kinds = Vec::with_capacity(n_kinds);
    for _ in 0..n_kinds {
        let kind = kind_from_tag(take_u8(&mut data)?)?;
        let n_states = take_u32(&mut data)? as usize;
        let mut states = Vec::with_capacity(n_states);
        for _ in 0..n_states {
            let state = take_i32(&mut data)?;
            let n_branches = take_u32(&mut data)? as usize;
            let mut branches = Vec::with_capacity(n_branches);
            for _ in 0..n_branches {
                let symbol = match take_u8(&mut data)? {
                    SYM_CHAR => {
                        let scalar = take_u32(&mut data)?;
                        Symbol::Char(
                            char::from_u32(scalar)
                                .ok_or_else(|| format!("bad char scalar {scalar:#x}"))?,
                        )
                    }
                    SYM_INT => Symbol::Int(take_i64(&mut data)?),
                    SYM_STR => Symbol::Str(take_string(&mut data)?),
                    other => return Err(format!("bad symbol tag {other} in tables .bin")),
                };
                let dst = take_i32(&mut data)?;
                let value = take_value_id(&mut data, n_values)?;
                branches.push(Branch { symbol, dst, value });
            }
            let explicit = take_u8(&mut data)? != 0;
            let dst = take_i32(&mut data)?;
            let value = take_value_id(&mut data, n_values)?;
            states.push(StateDispatch {
                state,
                branches,
                fallback: Fallback {
                    explicit,
                    dst,
                    value,
                },
            });
        }
        kinds.push(KindTable { kind, states });
    }

    Ok(DispatchTable {
        initial,
        initial_terminal,
        initial_value,
        kinds,
        values,
    })
}
