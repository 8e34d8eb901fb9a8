//! Named operator parameters.
//!
//! [`Properties`] is a flat string map with typed getters, used by the
//! [`OperatorRegistry`](crate::variation::OperatorRegistry) to look up keys
//! such as `sbx.rate` or `pm.distributionIndex`.

use crate::error::{MoeaError, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

/// String key/value parameters with typed accessors.
///
/// Lookups of missing keys return `Ok(None)`. A present value that does not
/// parse as the requested type is an [`MoeaError::InvalidParameter`].
///
/// # Examples
///
/// ```
/// use u_moea::config::Properties;
///
/// let props = Properties::parse("sbx.rate = 0.9\n# comment\npm.distributionIndex=25").unwrap();
/// assert_eq!(props.get_f64("sbx.rate").unwrap(), Some(0.9));
/// assert_eq!(props.get_f64_or("pm.rate", 0.1).unwrap(), 0.1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `key=value` lines. Blank lines and lines starting with `#`
    /// or `!` are ignored; keys and values are trimmed.
    pub fn parse(text: &str) -> Result<Self> {
        let mut props = Self::new();
        for (number, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let (key, value) = line.split_once('=').ok_or_else(|| {
                MoeaError::parameter(
                    format!("line {}", number + 1),
                    format!("expected key=value, got '{line}'"),
                )
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(MoeaError::parameter(
                    format!("line {}", number + 1),
                    "empty key",
                ));
            }
            props.set(key, value.trim());
        }
        Ok(props)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        self.values.insert(key.into(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get_f64(&self, key: &str) -> Result<Option<f64>> {
        self.get_parsed(key)
    }

    pub fn get_usize(&self, key: &str) -> Result<Option<usize>> {
        self.get_parsed(key)
    }

    /// Accepts `true`/`false` in any letter case.
    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(MoeaError::parameter(key, format!("'{raw}' is not a boolean"))),
            },
        }
    }

    pub fn get_f64_or(&self, key: &str, default: f64) -> Result<f64> {
        Ok(self.get_f64(key)?.unwrap_or(default))
    }

    pub fn get_usize_or(&self, key: &str, default: usize) -> Result<usize> {
        Ok(self.get_usize(key)?.unwrap_or(default))
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.get_bool(key)?.unwrap_or(default))
    }

    fn get_parsed<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| MoeaError::parameter(key, format!("'{raw}': {e}")))
            })
            .transpose()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (k, v) in iter {
            props.set(k, v);
        }
        props
    }
}
