use crate::error::{DartsError, DartsResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
        }
    }
}

pub type GameOptions = BTreeMap<String, OptionValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Int { choices: Vec<i64> },
}

/// One typed, enumerable entry of a variant's options schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    pub default: OptionValue,
}

impl OptionSpec {
    pub fn flag(name: &'static str, default: bool) -> Self {
        Self {
            name,
            kind: OptionKind::Bool,
            default: OptionValue::Bool(default),
        }
    }

    pub fn range(name: &'static str, choices: std::ops::RangeInclusive<i64>, default: i64) -> Self {
        Self {
            name,
            kind: OptionKind::Int {
                choices: choices.collect(),
            },
            default: OptionValue::Int(default),
        }
    }

    fn accepts(&self, value: &OptionValue) -> bool {
        match (&self.kind, value) {
            (OptionKind::Bool, OptionValue::Bool(_)) => true,
            (OptionKind::Int { choices }, OptionValue::Int(i)) => choices.contains(i),
            _ => false,
        }
    }
}

/// Options common to every variant.
pub fn match_options() -> Vec<OptionSpec> {
    vec![
        OptionSpec::range("legs_to_set", 1..=9, 3),
        OptionSpec::range("sets_to_match", 1..=9, 1),
    ]
}

/// Checks `options` against `schema` and fills in defaults.
pub fn resolve(schema: &[OptionSpec], options: &GameOptions) -> DartsResult<GameOptions> {
    for name in options.keys() {
        if !schema.iter().any(|spec| spec.name == name) {
            return Err(DartsError::Config(format!("unknown option '{}'", name)));
        }
    }

    let mut resolved = GameOptions::new();
    for spec in schema {
        let value = options.get(spec.name).copied().unwrap_or(spec.default);
        if !spec.accepts(&value) {
            return Err(DartsError::Config(format!(
                "invalid value {} for option '{}'",
                value, spec.name
            )));
        }
        resolved.insert(spec.name.to_string(), value);
    }
    Ok(resolved)
}

pub fn get_bool(options: &GameOptions, name: &str) -> bool {
    matches!(options.get(name), Some(OptionValue::Bool(true)))
}

pub fn get_int(options: &GameOptions, name: &str, fallback: i64) -> i64 {
    match options.get(name) {
        Some(OptionValue::Int(i)) => *i,
        _ => fallback,
    }
}

/// Parses `key=value` pairs (`x=5`, `double_out=true`) as given on the command line.
pub fn parse_pairs<'a, I>(pairs: I) -> DartsResult<GameOptions>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut options = GameOptions::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| DartsError::Config(format!("expected key=value, got '{}'", pair)))?;
        let raw = raw.trim();
        let value = match raw {
            "true" => OptionValue::Bool(true),
            "false" => OptionValue::Bool(false),
            _ => OptionValue::Int(raw.parse().map_err(|_| {
                DartsError::Config(format!("invalid value '{}' for option '{}'", raw, key))
            })?),
        };
        options.insert(key.trim().to_string(), value);
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_filled_in() {
        let schema = vec![OptionSpec::flag("double_out", false), OptionSpec::range("x", 1..=9, 3)];
        let resolved = resolve(&schema, &GameOptions::new()).unwrap();
        assert_eq!(resolved["x"], OptionValue::Int(3));
        assert_eq!(resolved["double_out"], OptionValue::Bool(false));
    }

    #[test]
    fn out_of_range_and_unknown_are_rejected() {
        let schema = vec![OptionSpec::range("x", 1..=9, 3)];
        let mut opts = GameOptions::new();
        opts.insert("x".into(), OptionValue::Int(12));
        assert!(resolve(&schema, &opts).is_err());

        let mut opts = GameOptions::new();
        opts.insert("y".into(), OptionValue::Int(1));
        assert!(resolve(&schema, &opts).is_err());
    }

    #[test]
    fn pairs_parse() {
        let opts = parse_pairs(["x=5", "double_out=true"]).unwrap();
        assert_eq!(opts["x"], OptionValue::Int(5));
        assert_eq!(opts["double_out"], OptionValue::Bool(true));
        assert!(parse_pairs(["x"]).is_err());
    }
}
