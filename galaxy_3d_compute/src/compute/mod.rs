/// Compute module - shader preprocessing, program cache and dispatch

// Module declarations
pub mod config;
pub mod shader_defines;
pub mod compute_spec;
pub mod preprocessor;
pub mod compute_manager;

// Re-export main types
pub use config::ComputeConfig;
pub use shader_defines::ShaderDefines;
pub use compute_spec::{ComputeSpec, CompiledProgram};
pub use preprocessor::ShaderPreprocessor;
pub use compute_manager::ComputeManager;
