/// ComputeSpec - identifies one compiled variant of a compute program

use crate::buffer::BufferObjects;
use crate::compute::ShaderDefines;
use crate::graphics_device::ProgramHandle;

/// Program name, defines and bound buffers of a compute program variant
///
/// Two specs are equal when their names, defines and buffer registries
/// are equal (registries compare buffer ids). Cloning copies the defines
/// and the registry map; buffer objects stay shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputeSpec {
    /// Name of the program registered with `ComputeManager::add_program`
    pub name: String,
    /// Defines injected in front of the shader source
    pub defines: ShaderDefines,
    /// Buffers bound when the program is built
    pub buffer_objects: BufferObjects,
}

impl ComputeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_defines(mut self, defines: ShaderDefines) -> Self {
        self.defines = defines;
        self
    }

    pub fn with_buffer_objects(mut self, buffer_objects: BufferObjects) -> Self {
        self.buffer_objects = buffer_objects;
        self
    }
}

/// Program compiled for a spec
#[derive(Debug)]
pub struct CompiledProgram {
    pub handle: ProgramHandle,
    pub spec: ComputeSpec,
    /// Manager tick of the last activation
    pub last_used: u64,
}

#[cfg(test)]
#[path = "compute_spec_tests.rs"]
mod tests;
