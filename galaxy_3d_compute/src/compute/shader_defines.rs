/// ShaderDefines - `#define` values injected in front of a compute shader

use std::collections::BTreeMap;

/// Name to value map of preprocessor defines
///
/// Defines are kept sorted by name, so two maps with the same entries
/// compare equal and produce the same source prefix whatever the order
/// they were filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ShaderDefines {
    values: BTreeMap<String, String>,
}

impl ShaderDefines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a define, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.values.insert(name.into(), value.to_string());
        self
    }

    /// Builder form of `set`
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Defines sorted by name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for ShaderDefines {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut defines = Self::new();
        for (name, value) in iter {
            defines.set(name, value);
        }
        defines
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for ShaderDefines {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
#[path = "shader_defines_tests.rs"]
mod tests;
