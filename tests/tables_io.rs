//! Round-trips for the table artifacts: the machine stepping a reloaded
//! table must behave exactly like the one stepping the freshly encoded
//! table, for both the JSON and the compact binary form.

use std::fs;

use matchgen::automaton::{Declaration, MachineMode, Symbol, compile};
use matchgen::dispatch::{
    DispatchTable, encode, load_table_bin_bytes, load_table_json_bytes, save_table_bin,
    save_table_json,
};

fn sample_table() -> DispatchTable<String> {
    let automaton = compile(
        MachineMode::KindWise,
        vec![
            Declaration::text("\r", "CR".to_string()),
            Declaration::text("\r\n", "CRLF".to_string()),
            Declaration::symbols(vec![Symbol::Int(27), Symbol::Int(91)], "CSI".to_string()),
            Declaration::symbols(vec![Symbol::Wildcard], "OTHER".to_string()),
            Declaration::symbols(
                vec![Symbol::Str("Esc".into()), Symbol::Str("Esc".into())],
                "DOUBLE".to_string(),
            ),
        ],
    )
    .unwrap();
    encode(&automaton)
}

fn trace(table: &DispatchTable<String>, input: &[Symbol]) -> Vec<(bool, bool, Option<String>)> {
    let mut m = table.machine();
    let mut out = Vec::new();
    for sym in input {
        let advanced = m.step(sym);
        out.push((advanced, m.state().accept, m.state().value.cloned()));
    }
    out
}

fn traces(table: &DispatchTable<String>) -> Vec<Vec<(bool, bool, Option<String>)>> {
    let inputs: Vec<Vec<Symbol>> = vec![
        vec![Symbol::Char('\r'), Symbol::Char('\n')],
        vec![Symbol::Int(27), Symbol::Int(91)],
        vec![Symbol::Char('q')],
        vec![Symbol::Str("Esc".into()), Symbol::Str("Esc".into())],
        vec![Symbol::Int(27), Symbol::Char('x')],
    ];
    inputs.iter().map(|input| trace(table, input)).collect()
}

#[test]
fn json_round_trip_preserves_behavior() {
    let table = sample_table();
    let path = std::env::temp_dir().join("matchgen_tables_roundtrip.json");

    save_table_json(&path, &table).expect("save json");
    let data = fs::read(&path).expect("read back json");
    let loaded: DispatchTable<String> = load_table_json_bytes(&data).expect("load json");

    assert_eq!(loaded, table);
    assert_eq!(traces(&loaded), traces(&table));
}

#[test]
fn bin_round_trip_preserves_behavior() {
    let table = sample_table();
    let path = std::env::temp_dir().join("matchgen_tables_roundtrip.bin");

    save_table_bin(&path, &table).expect("save bin");
    let data = fs::read(&path).expect("read back bin");
    let loaded = load_table_bin_bytes(&data).expect("load bin");

    assert_eq!(loaded, table);
    assert_eq!(traces(&loaded), traces(&table));
}

#[test]
fn bin_loader_reports_malformed_input() {
    assert!(load_table_bin_bytes(b"short").is_err(), "too short");
    assert!(
        load_table_bin_bytes(b"WRONGMAG\x00\x00\x00\x00\x00\x00\x00\x00\x00").is_err(),
        "bad magic"
    );

    // Truncating a valid image anywhere must error, never panic.
    let table = sample_table();
    let path = std::env::temp_dir().join("matchgen_tables_truncate.bin");
    save_table_bin(&path, &table).expect("save bin");
    let data = fs::read(&path).expect("read back bin");
    for cut in [9, 17, data.len() / 2, data.len() - 1] {
        assert!(
            load_table_bin_bytes(&data[..cut]).is_err(),
            "truncation at {cut} must be detected"
        );
    }
}

#[test]
fn json_loader_reports_malformed_input() {
    assert!(load_table_json_bytes::<String>(b"{not json").is_err());
    assert!(load_table_json_bytes::<String>(b"{\"initial\": 0}").is_err(), "missing fields");
}
