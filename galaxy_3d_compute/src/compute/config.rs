/// Compute manager configuration

/// Configuration for ComputeManager creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeConfig {
    /// GLSL version written in the `#version` directive of every program
    pub glsl_version: String,
    /// Text replaced by the repetition index in repeated includes
    pub index_placeholder: String,
    /// Maximum nesting of `#include` directives
    pub max_include_depth: usize,
    /// Maximum repeat count of `#include <name>[COUNT]`
    pub max_repeat_count: usize,
    /// Maximum number of compiled programs kept (None = unbounded)
    pub max_cached_programs: Option<usize>,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            // Compute shaders and std430 need 4.30
            glsl_version: "430 core".to_string(),
            index_placeholder: "{i}".to_string(),
            max_include_depth: 32,
            max_repeat_count: 1024,
            max_cached_programs: None,
        }
    }
}
