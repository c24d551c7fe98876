/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Buffer storage lives in host memory, every call is recorded, and
/// failures (mapping, unmapping, compilation) can be injected. A closure
/// can stand in for the compute shader and mutate the buffers bound to
/// binding points when a dispatch is issued.

use std::ptr::NonNull;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::graphics_device::{
    BufferAccess, BufferTarget, BufferUsage, GraphicsDevice, MemoryBarrier, ProgramHandle,
};

// ============================================================================
// Mock buffer storage
// ============================================================================

#[derive(Debug, Default)]
pub struct MockBufferStorage {
    /// Contents as seen by the GPU
    pub data: Vec<u8>,
    /// Usage of the last allocation (None until allocated)
    pub usage: Option<BufferUsage>,
    /// Access of the current mapping (None when not mapped)
    pub mapped: Option<BufferAccess>,
    /// Host copy handed out for read-only mappings, discarded on unmap
    shadow: Option<Vec<u8>>,
}

/// Buffers reachable from a dispatch, by binding point
pub struct MockBindings<'a> {
    buffers: &'a mut FxHashMap<u32, MockBufferStorage>,
    binding_points: &'a FxHashMap<u32, u32>,
}

impl MockBindings<'_> {
    /// Storage of the buffer bound at `index`
    pub fn storage(&mut self, index: u32) -> Option<&mut [u8]> {
        let buffer_id = self.binding_points.get(&index)?;
        self.buffers.get_mut(buffer_id).map(|b| b.data.as_mut_slice())
    }
}

type MockShader = Box<dyn FnMut(&mut MockBindings<'_>, (u32, u32, u32)) + Send>;

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Mock GraphicsDevice that tracks buffers and programs without GPU
pub struct MockGraphicsDevice {
    next_buffer_id: u32,
    next_program_id: u32,
    /// Live buffers by id
    pub buffers: FxHashMap<u32, MockBufferStorage>,
    /// Ids passed to delete_buffers, in call order
    pub deleted_buffers: Vec<u32>,
    /// Buffer bound to each generic target (absent = unbound)
    pub bound_targets: FxHashMap<BufferTarget, u32>,
    /// Buffer bound to each indexed binding point
    pub binding_points: FxHashMap<u32, u32>,
    /// Linked programs and the source they were built from
    pub programs: FxHashMap<ProgramHandle, String>,
    /// Programs passed to delete_program
    pub deleted_programs: Vec<ProgramHandle>,
    /// Program made current by the last use_program
    pub current_program: Option<ProgramHandle>,
    /// Number of successful compilations
    pub compile_count: usize,
    /// Recorded dispatches
    pub dispatches: Vec<(u32, u32, u32)>,
    /// Recorded memory barriers
    pub barriers: Vec<MemoryBarrier>,
    /// Names of every call, in order
    pub commands: Vec<String>,
    /// Buffer ids whose mapping fails
    pub fail_map: FxHashSet<u32>,
    /// Make unmap report corruption
    pub fail_unmap: bool,
    /// Make every compilation fail with this log
    pub fail_compile: Option<String>,
    shader: Option<MockShader>,
}

impl MockGraphicsDevice {
    /// Create a new mock device
    pub fn new() -> Self {
        Self {
            next_buffer_id: 1,
            next_program_id: 1,
            buffers: FxHashMap::default(),
            deleted_buffers: Vec::new(),
            bound_targets: FxHashMap::default(),
            binding_points: FxHashMap::default(),
            programs: FxHashMap::default(),
            deleted_programs: Vec::new(),
            current_program: None,
            compile_count: 0,
            dispatches: Vec::new(),
            barriers: Vec::new(),
            commands: Vec::new(),
            fail_map: FxHashSet::default(),
            fail_unmap: false,
            fail_compile: None,
            shader: None,
        }
    }

    /// Run `shader` on every dispatch, in place of the compiled program
    pub fn set_shader<F>(&mut self, shader: F)
    where
        F: FnMut(&mut MockBindings<'_>, (u32, u32, u32)) + Send + 'static,
    {
        self.shader = Some(Box::new(shader));
    }

    /// GPU-side contents of a buffer
    pub fn buffer_data(&self, buffer_id: u32) -> Option<&[u8]> {
        self.buffers.get(&buffer_id).map(|b| b.data.as_slice())
    }

    /// GPU-side contents of a buffer, writable (simulates shader writes)
    pub fn buffer_data_mut(&mut self, buffer_id: u32) -> Option<&mut Vec<u8>> {
        self.buffers.get_mut(&buffer_id).map(|b| &mut b.data)
    }

    /// Number of calls recorded under `name`
    pub fn command_count(&self, name: &str) -> usize {
        self.commands.iter().filter(|c| c.as_str() == name).count()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn gen_buffer(&mut self) -> Result<u32> {
        self.commands.push("gen_buffer".to_string());
        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.buffers.insert(id, MockBufferStorage::default());
        Ok(id)
    }

    fn bind_buffer(&mut self, target: BufferTarget, buffer_id: u32) {
        self.commands.push("bind_buffer".to_string());
        if buffer_id == 0 {
            self.bound_targets.remove(&target);
        } else {
            self.bound_targets.insert(target, buffer_id);
        }
    }

    fn named_buffer_data(
        &mut self,
        buffer_id: u32,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<()> {
        self.commands.push("named_buffer_data".to_string());
        let storage = self.buffers.get_mut(&buffer_id).ok_or_else(|| {
            Error::BackendError(format!("Unknown buffer {}", buffer_id))
        })?;
        let mut contents = vec![0u8; size as usize];
        if let Some(data) = data {
            let n = data.len().min(contents.len());
            contents[..n].copy_from_slice(&data[..n]);
        }
        storage.data = contents;
        storage.usage = Some(usage);
        Ok(())
    }

    fn bind_buffer_base(&mut self, _target: BufferTarget, index: u32, buffer_id: u32) {
        self.commands.push("bind_buffer_base".to_string());
        self.binding_points.insert(index, buffer_id);
    }

    fn map_named_buffer(&mut self, buffer_id: u32, access: BufferAccess) -> Option<NonNull<u8>> {
        self.commands.push("map_named_buffer".to_string());
        if self.fail_map.contains(&buffer_id) {
            return None;
        }
        let storage = self.buffers.get_mut(&buffer_id)?;
        if storage.mapped.is_some() || storage.usage.is_none() {
            return None;
        }
        storage.mapped = Some(access);
        let bytes = if access.writes_back() {
            &mut storage.data
        } else {
            storage.shadow.insert(storage.data.clone())
        };
        NonNull::new(bytes.as_mut_ptr())
    }

    fn unmap_named_buffer(&mut self, buffer_id: u32) -> bool {
        self.commands.push("unmap_named_buffer".to_string());
        if let Some(storage) = self.buffers.get_mut(&buffer_id) {
            storage.mapped = None;
            storage.shadow = None;
        }
        !self.fail_unmap
    }

    fn delete_buffers(&mut self, buffer_ids: &[u32]) {
        self.commands.push("delete_buffers".to_string());
        for id in buffer_ids {
            self.buffers.remove(id);
            self.binding_points.retain(|_, bound| bound != id);
            self.deleted_buffers.push(*id);
        }
    }

    fn memory_barrier(&mut self, barriers: MemoryBarrier) {
        self.commands.push("memory_barrier".to_string());
        self.barriers.push(barriers);
    }

    fn create_compute_program(&mut self, source: &str) -> Result<ProgramHandle> {
        self.commands.push("create_compute_program".to_string());
        if let Some(log) = &self.fail_compile {
            return Err(Error::CompilationFailed(log.clone()));
        }
        let handle = ProgramHandle(self.next_program_id);
        self.next_program_id += 1;
        self.programs.insert(handle, source.to_string());
        self.compile_count += 1;
        Ok(handle)
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.commands.push("delete_program".to_string());
        self.programs.remove(&program);
        self.deleted_programs.push(program);
        if self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.commands.push("use_program".to_string());
        self.current_program = Some(program);
    }

    fn dispatch_compute(&mut self, x: u32, y: u32, z: u32) {
        self.commands.push("dispatch_compute".to_string());
        self.dispatches.push((x, y, z));
        if let Some(shader) = self.shader.as_mut() {
            let mut bindings = MockBindings {
                buffers: &mut self.buffers,
                binding_points: &self.binding_points,
            };
            shader(&mut bindings, (x, y, z));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
