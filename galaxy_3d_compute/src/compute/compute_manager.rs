/// ComputeManager - compute shader registry, program cache and dispatch
///
/// Shaders are registered by name, programs map a program name to a
/// shader, and include chunks feed the preprocessor. `set_program`
/// activates the program variant described by a `ComputeSpec`, compiling
/// it on first use; `compute` dispatches the active program and runs the
/// host callbacks of its storage buffers.
///
/// # Example
///
/// ```no_run
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
/// use galaxy_3d_compute::galaxy3d::{Engine, compute::*, graphics_device::WorkGroups};
///
/// let device = Engine::graphics_device()?;
/// let mut manager = ComputeManager::new(device, ComputeConfig::default());
/// manager.add_shader_source("blur_cs", "layout(local_size_x = 64) in; void main() {}");
/// manager.add_program("blur", "blur_cs");
///
/// let spec = ComputeSpec::new("blur").with_defines(ShaderDefines::from([("RADIUS", "4")]));
/// manager.set_program(&spec)?;
/// manager.compute(WorkGroups::new(16, 1, 1), Duration::from_millis(16))?;
/// # Ok::<(), galaxy_3d_compute::galaxy3d::Error>(())
/// ```

use std::sync::{Arc, Mutex};
use std::time::Duration;
use rustc_hash::FxHashMap;

use crate::compute::{CompiledProgram, ComputeConfig, ComputeSpec, ShaderPreprocessor};
use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, MemoryBarrier, ProgramHandle, WorkGroups};

pub struct ComputeManager {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    config: ComputeConfig,
    preprocessor: ShaderPreprocessor,
    /// Shader name -> source template
    shaders: FxHashMap<String, String>,
    /// Program name -> shader name
    programs: FxHashMap<String, String>,
    /// Compiled variants, in creation order
    compiled: Vec<CompiledProgram>,
    /// Active program and the spec it was activated for
    current: Option<(ProgramHandle, ComputeSpec)>,
    /// Incremented at each activation, drives LRU eviction
    tick: u64,
}

impl ComputeManager {
    pub fn new(device: Arc<Mutex<dyn GraphicsDevice>>, config: ComputeConfig) -> Self {
        let preprocessor = ShaderPreprocessor::new(&config);
        Self {
            device,
            config,
            preprocessor,
            shaders: FxHashMap::default(),
            programs: FxHashMap::default(),
            compiled: Vec::new(),
            current: None,
            tick: 0,
        }
    }

    // ===== REGISTRATION =====

    /// Register (or replace) a compute shader source template
    pub fn add_shader_source(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.shaders.insert(name.into(), source.into());
    }

    /// Associate a program name with a registered shader
    pub fn add_program(&mut self, program: impl Into<String>, shader: impl Into<String>) {
        self.programs.insert(program.into(), shader.into());
    }

    /// Register (or replace) an include chunk usable by `#include <name>`
    pub fn add_include(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.preprocessor.add_include(name, source);
    }

    // ===== ACCESSORS =====

    /// Spec of the active program
    pub fn current_spec(&self) -> Option<&ComputeSpec> {
        self.current.as_ref().map(|(_, spec)| spec)
    }

    pub fn active_program(&self) -> Option<ProgramHandle> {
        self.current.as_ref().map(|(handle, _)| *handle)
    }

    /// Number of program variants kept compiled
    pub fn compiled_program_count(&self) -> usize {
        self.compiled.len()
    }

    pub fn device(&self) -> Arc<Mutex<dyn GraphicsDevice>> {
        Arc::clone(&self.device)
    }

    pub fn config(&self) -> &ComputeConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> &ShaderPreprocessor {
        &self.preprocessor
    }

    // ===== PROGRAM SELECTION =====

    /// Activate the program variant described by `spec`
    ///
    /// A variant already compiled is reused; otherwise the shader is
    /// preprocessed with the spec defines, compiled, and the spec buffers
    /// are bound. On failure the active program and spec are unchanged.
    ///
    /// # Returns
    ///
    /// `false` if `spec` equals the current spec (nothing to do),
    /// `true` if the active program changed
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` if the program or its shader is unknown
    /// - `Error::PreprocessFailed` / `Error::CompilationFailed`
    /// - the aggregated bind error of the spec buffers
    pub fn set_program(&mut self, spec: &ComputeSpec) -> Result<bool> {
        if self.current_spec() == Some(spec) {
            return Ok(false);
        }

        let device = Arc::clone(&self.device);
        let mut device = device.lock().map_err(|_| {
            crate::engine_err!("galaxy3d::ComputeManager", "Graphics device lock poisoned")
        })?;

        self.tick += 1;
        let tick = self.tick;

        if let Some(cached) = self.compiled.iter_mut().find(|program| program.spec == *spec) {
            device.use_program(cached.handle);
            cached.last_used = tick;
            self.current = Some((cached.handle, spec.clone()));
            crate::engine_trace!(
                "galaxy3d::ComputeManager",
                "Switched to compiled program '{}'",
                spec.name
            );
            return Ok(true);
        }

        let handle = self.generate_program(&mut *device, spec)?;

        // Buffers must be bound before the program runs
        if let Err(error) = spec.buffer_objects.bind(&mut *device) {
            device.delete_program(handle);
            return Err(error);
        }
        device.use_program(handle);

        self.compiled.push(CompiledProgram { handle, spec: spec.clone(), last_used: tick });
        self.current = Some((handle, spec.clone()));
        self.evict_least_recently_used(&mut *device);

        Ok(true)
    }

    /// Preprocess and compile the shader of `spec`
    fn generate_program(&self, device: &mut dyn GraphicsDevice, spec: &ComputeSpec) -> Result<ProgramHandle> {
        let shader_name = self.programs.get(&spec.name).ok_or_else(|| {
            Error::InvalidResource(format!("Program '{}' not found", spec.name))
        })?;
        let template = self.shaders.get(shader_name).ok_or_else(|| {
            Error::InvalidResource(format!("Compute shader '{}' not found", shader_name))
        })?;

        let source = self.preprocessor.preprocess(template, &spec.defines)?;
        let handle = device.create_compute_program(&source)?;

        crate::engine_debug!(
            "galaxy3d::ComputeManager",
            "Compiled compute program '{}' from shader '{}' ({} defines, {} buffers)",
            spec.name, shader_name, spec.defines.len(), spec.buffer_objects.len()
        );

        Ok(handle)
    }

    /// Drop least recently used programs beyond `max_cached_programs`
    ///
    /// The active program is never evicted.
    fn evict_least_recently_used(&mut self, device: &mut dyn GraphicsDevice) {
        let Some(max) = self.config.max_cached_programs else {
            return;
        };
        let active = self.active_program();

        while self.compiled.len() > max {
            let victim = self
                .compiled
                .iter()
                .enumerate()
                .filter(|(_, program)| Some(program.handle) != active)
                .min_by_key(|(_, program)| program.last_used)
                .map(|(index, _)| index);
            let Some(index) = victim else {
                break;
            };

            let evicted = self.compiled.remove(index);
            device.delete_program(evicted.handle);
            crate::engine_debug!(
                "galaxy3d::ComputeManager",
                "Evicted compute program '{}' ({} kept)",
                evicted.spec.name, self.compiled.len()
            );
        }
    }

    // ===== DISPATCH =====

    /// Dispatch the active program and process its storage buffers
    ///
    /// Buffer callbacks run while the graphics device is locked and must
    /// not lock it again.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` if no program is active
    /// - the aggregated error of the buffers that failed to process
    pub fn compute(&self, work_groups: WorkGroups, delta_time: Duration) -> Result<()> {
        let Some((_, spec)) = &self.current else {
            return Err(Error::InvalidResource(
                "No compute program set. Call ComputeManager::set_program() first.".to_string(),
            ));
        };

        let mut device = self.device.lock().map_err(|_| {
            crate::engine_err!("galaxy3d::ComputeManager", "Graphics device lock poisoned")
        })?;

        device.dispatch_compute(work_groups.x, work_groups.y, work_groups.z);
        // Shader writes must land before the buffers are mapped
        device.memory_barrier(MemoryBarrier::SHADER_STORAGE);
        spec.buffer_objects.process(&mut *device, delta_time)
    }

    // ===== CLEANUP =====

    /// Delete every compiled program and forget the current spec
    ///
    /// Storage buffers are left untouched.
    pub fn delete_programs(&mut self) -> Result<()> {
        let device = Arc::clone(&self.device);
        let mut device = device.lock().map_err(|_| {
            crate::engine_err!("galaxy3d::ComputeManager", "Graphics device lock poisoned")
        })?;

        for program in self.compiled.drain(..) {
            device.delete_program(program.handle);
        }
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
#[path = "compute_manager_tests.rs"]
mod tests;
