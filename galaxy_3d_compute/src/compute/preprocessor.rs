/// ShaderPreprocessor - `#version`/`#define` prefix and `#include` expansion
///
/// Supported directives:
///
/// - `#include <name>` is replaced by a newline followed by the chunk
///   registered under `name`, itself preprocessed.
/// - `#include <name>[COUNT]` repeats the chunk `COUNT` times, where
///   `COUNT` is the name of a define. Every occurrence of the index
///   placeholder (`{i}` by default) in the expanded chunk is replaced by
///   the 0-based repetition index. When `COUNT` is not defined, or is 0,
///   the directive expands to nothing. Blanks are allowed between `>`
///   and `[`. Counts above the configured maximum are rejected.
///
/// Expansion is purely textual: directives inside comments are expanded
/// too.

use std::sync::LazyLock;
use regex::{Captures, Regex};
use rustc_hash::FxHashMap;

use crate::compute::{ComputeConfig, ShaderDefines};
use crate::error::{Error, Result};

/// `#include <name>` with an optional `[COUNT]` suffix
static INCLUDE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#include[ \t]*<([^>\n]*)>(?:[ \t]*\[([^\]\n]*)\])?")
        .expect("include directive pattern is valid")
});

/// Include chunk library and expansion settings
#[derive(Debug, Clone)]
pub struct ShaderPreprocessor {
    includes: FxHashMap<String, String>,
    glsl_version: String,
    index_placeholder: String,
    max_include_depth: usize,
    max_repeat_count: usize,
}

impl ShaderPreprocessor {
    pub fn new(config: &ComputeConfig) -> Self {
        Self {
            includes: FxHashMap::default(),
            glsl_version: config.glsl_version.clone(),
            index_placeholder: config.index_placeholder.clone(),
            max_include_depth: config.max_include_depth,
            max_repeat_count: config.max_repeat_count,
        }
    }

    /// Register (or replace) an include chunk
    pub fn add_include(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.includes.insert(name.into(), source.into());
    }

    pub fn include(&self, name: &str) -> Option<&str> {
        self.includes.get(name).map(String::as_str)
    }

    pub fn include_count(&self) -> usize {
        self.includes.len()
    }

    /// `#version` directive followed by one `#define` line per define
    pub fn prefix(&self, defines: &ShaderDefines) -> String {
        let mut prefix = format!("#version {}\n", self.glsl_version);
        for (name, value) in defines.iter() {
            prefix.push_str(&format!("#define {} {}\n", name, value));
        }
        prefix
    }

    /// Build the final source of a compute shader
    ///
    /// # Errors
    ///
    /// `Error::PreprocessFailed` if a chunk is missing, a repeat count is
    /// not a non-negative integer or exceeds the configured maximum, or
    /// includes nest deeper than the configured maximum
    pub fn preprocess(&self, source: &str, defines: &ShaderDefines) -> Result<String> {
        let mut output = self.prefix(defines);
        output.push_str(&self.expand_includes(source, defines, 0)?);
        Ok(output)
    }

    /// Expand the include directives of `source` (no prefix)
    pub fn expand_includes(&self, source: &str, defines: &ShaderDefines, depth: usize) -> Result<String> {
        let mut output = String::with_capacity(source.len());
        let mut last = 0;
        for captures in INCLUDE_DIRECTIVE.captures_iter(source) {
            let Some(directive) = captures.get(0) else {
                continue;
            };
            output.push_str(&source[last..directive.start()]);
            last = directive.end();
            output.push_str(&self.expand_directive(&captures, defines, depth)?);
        }
        output.push_str(&source[last..]);
        Ok(output)
    }

    fn expand_directive(&self, captures: &Captures<'_>, defines: &ShaderDefines, depth: usize) -> Result<String> {
        let name = captures.get(1).map_or("", |m| m.as_str().trim());
        let count_define = captures
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|define| !define.is_empty());

        // The count define is resolved before the chunk: an undefined
        // count disables the include even when the chunk does not exist
        let repeat = match count_define {
            None => None,
            Some(define) => match defines.get(define) {
                None => return Ok(String::new()),
                Some(value) => Some(value.trim().parse::<usize>().map_err(|_| {
                    Error::PreprocessFailed(format!(
                        "Include <{}>: repeat count {} = '{}' is not a non-negative integer",
                        name, define, value
                    ))
                })?),
            },
        };
        match repeat {
            Some(0) => return Ok(String::new()),
            Some(count) if count > self.max_repeat_count => {
                return Err(Error::PreprocessFailed(format!(
                    "Include <{}>: repeat count {} exceeds the maximum of {}",
                    name, count, self.max_repeat_count
                )));
            }
            _ => {}
        }

        if depth >= self.max_include_depth {
            return Err(Error::PreprocessFailed(format!(
                "Include <{}> exceeds the maximum include depth of {}",
                name, self.max_include_depth
            )));
        }

        let chunk = self.includes.get(name).ok_or_else(|| {
            Error::PreprocessFailed(format!("Include <{}> not found", name))
        })?;
        let expanded = format!("\n{}", self.expand_includes(chunk, defines, depth + 1)?);

        match repeat {
            Some(count) if !self.index_placeholder.is_empty() => Ok((0..count)
                .map(|index| expanded.replace(&self.index_placeholder, &index.to_string()))
                .collect()),
            Some(count) => Ok(expanded.repeat(count)),
            None => Ok(expanded),
        }
    }
}

#[cfg(test)]
#[path = "preprocessor_tests.rs"]
mod tests;
