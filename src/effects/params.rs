use crate::foundation::error::{SlidewaveError, SlidewaveResult};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A single effect parameter as written in a show description.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Flag(bool),
    Number(f64),
    Pair(f64, f64),
    Text(String),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Flag(_) => "boolean",
            Self::Number(_) => "number",
            Self::Pair(..) => "pair",
            Self::Text(_) => "string",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<(f64, f64)> for ParamValue {
    fn from(v: (f64, f64)) -> Self {
        Self::Pair(v.0, v.1)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

/// Named effect parameters with typed accessors.
///
/// Accessors return a validation error when a key is present with the wrong type, so malformed
/// shows fail when the effect is built rather than mid-render.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EffectParams(BTreeMap<String, ParamValue>);

impl EffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Fail on keys outside `allowed`.
    pub fn ensure_only(&self, allowed: &[&str]) -> SlidewaveResult<()> {
        if let Some(k) = self.keys().find(|k| !allowed.contains(k)) {
            return Err(SlidewaveError::validation(format!(
                "unknown parameter '{k}' (expected one of: {})",
                allowed.join(", ")
            )));
        }
        Ok(())
    }

    pub fn number(&self, key: &str) -> SlidewaveResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::Number(v)) if v.is_finite() => Ok(Some(*v)),
            Some(ParamValue::Number(v)) => Err(SlidewaveError::validation(format!(
                "parameter '{key}' must be finite, got {v}"
            ))),
            Some(other) => Err(type_error(key, "number", other)),
        }
    }

    pub fn number_or(&self, key: &str, default: f64) -> SlidewaveResult<f64> {
        Ok(self.number(key)?.unwrap_or(default))
    }

    pub fn pair_or(&self, key: &str, default: (f64, f64)) -> SlidewaveResult<(f64, f64)> {
        match self.get(key) {
            None => Ok(default),
            Some(ParamValue::Pair(a, b)) if a.is_finite() && b.is_finite() => Ok((*a, *b)),
            Some(ParamValue::Pair(..)) => Err(SlidewaveError::validation(format!(
                "parameter '{key}' must hold finite numbers"
            ))),
            Some(other) => Err(type_error(key, "pair", other)),
        }
    }

    pub fn text(&self, key: &str) -> SlidewaveResult<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(ParamValue::Text(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(type_error(key, "string", other)),
        }
    }

    /// Parse a string parameter, falling back to `default` when absent.
    pub fn parse_or<T>(&self, key: &str, default: T) -> SlidewaveResult<T>
    where
        T: FromStr<Err = SlidewaveError>,
    {
        match self.text(key)? {
            None => Ok(default),
            Some(s) => s
                .parse()
                .map_err(|e: SlidewaveError| match e {
                    SlidewaveError::Validation(msg) => {
                        SlidewaveError::validation(format!("parameter '{key}': {msg}"))
                    }
                    other => other,
                }),
        }
    }

    pub fn count_or(&self, key: &str, default: u32) -> SlidewaveResult<u32> {
        match self.number(key)? {
            None => Ok(default),
            Some(v) if v >= 1.0 && v.fract() == 0.0 && v <= f64::from(u32::MAX) => Ok(v as u32),
            Some(v) => Err(SlidewaveError::validation(format!(
                "parameter '{key}' must be a positive integer, got {v}"
            ))),
        }
    }
}

fn type_error(key: &str, expected: &str, got: &ParamValue) -> SlidewaveError {
    SlidewaveError::validation(format!(
        "parameter '{key}' must be a {expected}, got a {}",
        got.kind()
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/params.rs"]
mod tests;
