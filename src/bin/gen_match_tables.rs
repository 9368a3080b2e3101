// Generate dispatch tables from a JSON declaration file.
//
// Input is either a bare array of {"pattern": ..., "value": ...} objects
// (plain mode) or {"mode": "plain"|"kindwise", "declarations": [...]}.

use std::{env, fs, path::PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use matchgen::automaton::{Declaration, MachineMode, compile};
use matchgen::dispatch::{encode, save_table_bin, save_table_json};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let input = args
        .next()
        .context("usage: gen_match_tables <decls.json> [out_dir]")?;
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "tables".into()));

    let data = fs::read(&input).with_context(|| format!("read {input}"))?;
    let root: Value = serde_json::from_slice(&data).context("parse declaration JSON")?;

    let (mode, decls_json) = match &root {
        Value::Array(items) => (MachineMode::Plain, items.as_slice()),
        Value::Object(map) => {
            let mode = match map.get("mode").and_then(Value::as_str) {
                None | Some("plain") => MachineMode::Plain,
                Some("kindwise") => MachineMode::KindWise,
                Some(other) => bail!("unknown mode {other:?}"),
            };
            let decls = map
                .get("declarations")
                .and_then(Value::as_array)
                .context("missing \"declarations\" array")?;
            (mode, decls.as_slice())
        }
        _ => bail!("expected an array of declarations or an object with \"declarations\""),
    };

    let mut decls = Vec::with_capacity(decls_json.len());
    for (i, item) in decls_json.iter().enumerate() {
        let pattern = item
            .get("pattern")
            .with_context(|| format!("declaration {i}: missing \"pattern\""))?;
        let value = item
            .get("value")
            .with_context(|| format!("declaration {i}: missing \"value\""))?;
        decls.push(Declaration::from_json(i, pattern, value)?);
    }

    println!("[gen_match] compiling {} declarations...", decls.len());
    let automaton = compile(mode, decls)?;
    println!(
        "[gen_match] automaton has {} live states",
        automaton.live_states()
    );

    let table = encode(&automaton);
    println!(
        "[gen_match] encoded {} kind table(s), {} distinct values",
        table.kinds.len(),
        table.values.len()
    );

    fs::create_dir_all(&out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let json_path = out_dir.join("match_tables.json");
    save_table_json(&json_path, &table).with_context(|| format!("write {}", json_path.display()))?;
    let bin_path = out_dir.join("match_tables.bin");
    save_table_bin(&bin_path, &table).with_context(|| format!("write {}", bin_path.display()))?;
    println!(
        "[gen_match] wrote {} and {}",
        json_path.display(),
        bin_path.display()
    );
    Ok(())
}
