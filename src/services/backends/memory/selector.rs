
use anyhow::bail;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Requirement {
    Equals(String, String),
    NotEquals(String, String),
    Exists(String),
    NotExists(String),
}

/// Equality-based selector as used for labels and fields.
/// Set-based expressions (`in`, `notin`) are not supported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    requirements: Vec<Requirement>,
}

impl Selector {
    pub fn parse(expression: &str) -> anyhow::Result<Self> {
        let mut requirements = Vec::new();
        for term in expression.split(',').map(str::trim).filter(|term| !term.is_empty()) {
            if term.contains('(') {
                bail!("set-based selector '{}' is not supported", term);
            }
            let requirement = if let Some((key, value)) = term.split_once("!=") {
                Requirement::NotEquals(checked_key(key)?, value.trim().to_string())
            } else if let Some((key, value)) = term.split_once("==") {
                Requirement::Equals(checked_key(key)?, value.trim().to_string())
            } else if let Some((key, value)) = term.split_once('=') {
                Requirement::Equals(checked_key(key)?, value.trim().to_string())
            } else if let Some(key) = term.strip_prefix('!') {
                Requirement::NotExists(checked_key(key)?)
            } else {
                Requirement::Exists(checked_key(term)?)
            };
            requirements.push(requirement);
        }
        Ok(Selector { requirements })
    }

    pub fn parse_optional(expression: Option<&str>) -> anyhow::Result<Self> {
        expression.map_or_else(|| Ok(Selector::default()), Selector::parse)
    }

    pub fn matches(&self, values: &BTreeMap<String, String>) -> bool {
        self.requirements.iter().all(|requirement| match requirement {
            Requirement::Equals(key, value) => values.get(key) == Some(value),
            Requirement::NotEquals(key, value) => values.get(key) != Some(value),
            Requirement::Exists(key) => values.contains_key(key),
            Requirement::NotExists(key) => !values.contains_key(key),
        })
    }
}

fn checked_key(key: &str) -> anyhow::Result<String> {
    let key = key.trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        bail!("invalid selector key '{}'", key);
    }
    Ok(key.to_string())
}
