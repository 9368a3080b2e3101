// src/automaton/symbol.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical kind of a non-wildcard symbol.
///
/// Kind is metadata used for dispatch grouping; it takes no part in
/// symbol equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    Char,
    Int,
    Str,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Char => "char",
            SymbolKind::Int => "int",
            SymbolKind::Str => "str",
        })
    }
}

/// One unit of input consumed per step.
///
/// `Wildcard` is the reserved sentinel: at any state it matches every
/// symbol that has no explicit transition of its own. `Str` is the
/// opaque-literal fallback for enum members and named constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Wildcard,
    Char(char),
    Int(i64),
    Str(String),
}

impl Symbol {
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Symbol::Wildcard)
    }

    /// `None` for the wildcard, which belongs to every alphabet.
    pub fn kind(&self) -> Option<SymbolKind> {
        match self {
            Symbol::Wildcard => None,
            Symbol::Char(_) => Some(SymbolKind::Char),
            Symbol::Int(_) => Some(SymbolKind::Int),
            Symbol::Str(_) => Some(SymbolKind::Str),
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Symbol::Char(c)
    }
}

impl From<i64> for Symbol {
    fn from(v: i64) -> Self {
        Symbol::Int(v)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::Str(s.to_owned())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Wildcard => f.write_str("_"),
            Symbol::Char(c) => write!(f, "{c:?}"),
            Symbol::Int(v) => write!(f, "{v}"),
            Symbol::Str(s) => write!(f, "{s}"),
        }
    }
}
