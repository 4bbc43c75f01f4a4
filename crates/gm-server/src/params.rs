//! Request parameters: a named collection of typed values.
//!
//! Parameters arrive as an unordered bag. Lookups are by name with typed
//! accessors; a missing key or a value of the wrong type is reported as a
//! [`ParamError`] naming the key, so callers can map it back to the request.

use std::collections::BTreeMap;

use crate::error::{ParamError, ParamResult};

/// A single parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Int(i64),
    Bool(bool),
    Params(Params),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            ParamValue::String(_) => "string",
            ParamValue::Int(_) => "int",
            ParamValue::Bool(_) => "bool",
            ParamValue::Params(_) => "params",
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(value.into())
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Params> for ParamValue {
    fn from(value: Params) -> Self {
        ParamValue::Params(value)
    }
}

/// Named parameter bag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn get(&self, name: &str) -> ParamResult<&ParamValue> {
        self.values
            .get(name)
            .ok_or_else(|| ParamError::new(name, "not set"))
    }

    pub fn get_string(&self, name: &str) -> ParamResult<String> {
        match self.get(name)? {
            ParamValue::String(s) => Ok(s.clone()),
            other => Err(type_mismatch(name, "string", other)),
        }
    }

    pub fn get_int(&self, name: &str) -> ParamResult<i64> {
        match self.get(name)? {
            ParamValue::Int(i) => Ok(*i),
            other => Err(type_mismatch(name, "int", other)),
        }
    }

    pub fn get_bool(&self, name: &str) -> ParamResult<bool> {
        match self.get(name)? {
            ParamValue::Bool(b) => Ok(*b),
            other => Err(type_mismatch(name, "bool", other)),
        }
    }

    pub fn get_params(&self, name: &str) -> ParamResult<&Params> {
        match self.get(name)? {
            ParamValue::Params(p) => Ok(p),
            other => Err(type_mismatch(name, "params", other)),
        }
    }

    /// Build a parameter bag from a JSON object.
    ///
    /// Strings, booleans and integral numbers map onto their `ParamValue`
    /// counterparts and nested objects become nested bags. Anything else
    /// (arrays, null, fractional numbers) is rejected with the offending key.
    pub fn from_json(value: serde_json::Value) -> ParamResult<Self> {
        match value {
            serde_json::Value::Object(map) => {
                let mut params = Params::new();
                for (key, value) in map {
                    let converted = match value {
                        serde_json::Value::String(s) => ParamValue::String(s),
                        serde_json::Value::Bool(b) => ParamValue::Bool(b),
                        serde_json::Value::Number(n) => match n.as_i64() {
                            Some(i) => ParamValue::Int(i),
                            None => return Err(ParamError::new(key, "must be an integer")),
                        },
                        nested @ serde_json::Value::Object(_) => {
                            let nested = Params::from_json(nested).map_err(|e| e.prefixed(&key))?;
                            ParamValue::Params(nested)
                        }
                        serde_json::Value::Array(_) | serde_json::Value::Null => {
                            return Err(ParamError::new(key, "unsupported value type"));
                        }
                    };
                    params.values.insert(key, converted);
                }
                Ok(params)
            }
            _ => Err(ParamError::new("", "must be an object")),
        }
    }
}

fn type_mismatch(name: &str, expected: &str, found: &ParamValue) -> ParamError {
    ParamError::new(name, format!("not a {expected} (found {})", found.kind()))
}
