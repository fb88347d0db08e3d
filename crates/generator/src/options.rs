//! Typed mesh-generation options
//!
//! Options arrive over HTTP as raw strings. Each generator declares a schema
//! (option name -> expected kind), and a single parsing step converts and
//! validates the raw values, failing cleanly on unknown names or kind
//! mismatches instead of guessing types from string patterns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::GeneratorError;

/// A fully typed option set, keyed by option name.
///
/// `BTreeMap` keeps iteration deterministic, which keeps exported payloads
/// and log lines stable across runs.
pub type MeshOptions = BTreeMap<String, OptionValue>;

/// A single option value: integer, float, or boolean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::Int(_) => OptionKind::Int,
            OptionValue::Float(_) => OptionKind::Float,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value as a float; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Float(v) => Some(*v),
            OptionValue::Int(v) => Some(*v as f64),
            OptionValue::Bool(_) => None,
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(v) => write!(f, "{}", v),
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Declared type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Bool,
    Int,
    Float,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionKind::Bool => write!(f, "a boolean"),
            OptionKind::Int => write!(f, "an integer"),
            OptionKind::Float => write!(f, "a float"),
        }
    }
}

/// Option schema for one generator: name -> expected kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSchema {
    fields: BTreeMap<String, OptionKind>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a schema from a default option set: each option expects the
    /// kind of its default value.
    pub fn from_defaults(defaults: &MeshOptions) -> Self {
        let fields = defaults
            .iter()
            .map(|(name, value)| (name.clone(), value.kind()))
            .collect();
        Self { fields }
    }

    pub fn field(mut self, name: impl Into<String>, kind: OptionKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn kind_of(&self, name: &str) -> Option<OptionKind> {
        self.fields.get(name).copied()
    }

    /// Parse raw string parameters against this schema.
    ///
    /// Every supplied name must be declared and every value must parse as
    /// the declared kind. Integer literals are accepted where a float is
    /// declared (widening only, never the reverse).
    pub fn parse<'a, I>(&self, raw: I) -> Result<MeshOptions, GeneratorError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut options = MeshOptions::new();
        for (name, value) in raw {
            let kind = self
                .fields
                .get(name)
                .copied()
                .ok_or_else(|| GeneratorError::UnknownOption(name.to_string()))?;
            let parsed = parse_value(name, kind, value)?;
            options.insert(name.to_string(), parsed);
        }
        Ok(options)
    }
}

fn parse_value(name: &str, kind: OptionKind, value: &str) -> Result<OptionValue, GeneratorError> {
    let mismatch = || GeneratorError::TypeMismatch {
        name: name.to_string(),
        expected: kind,
        value: value.to_string(),
    };

    match kind {
        OptionKind::Bool => match value {
            "true" => Ok(OptionValue::Bool(true)),
            "false" => Ok(OptionValue::Bool(false)),
            _ => Err(mismatch()),
        },
        OptionKind::Int => value
            .parse::<i64>()
            .map(OptionValue::Int)
            .map_err(|_| mismatch()),
        OptionKind::Float => value
            .parse::<f64>()
            .map(OptionValue::Float)
            .map_err(|_| mismatch()),
    }
}

/// Merge request options over defaults; request values win on collision.
pub fn merge_options(defaults: MeshOptions, supplied: MeshOptions) -> MeshOptions {
    let mut merged = defaults;
    merged.extend(supplied);
    merged
}
