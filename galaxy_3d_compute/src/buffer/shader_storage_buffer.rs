/// ShaderStorageBuffer - GPU buffer shared between the host and compute shaders
///
/// The buffer owns a device buffer id, the binding index declared in the
/// shader (`layout(std430, binding = N)`), usage and access modes, an
/// optional initial payload and the host callback run after each dispatch.
///
/// Lifecycle: Unbound -> Bound -> (processing) -> Bound ... -> Deleted.

use std::fmt;
use std::time::Duration;

use crate::buffer::{BufferObject, BufferView};
use crate::error::{Error, Result};
use crate::graphics_device::{BufferAccess, BufferTarget, BufferUsage, GraphicsDevice};

/// Host callback run while the buffer is mapped
///
/// The view is only valid for the duration of the call.
pub type BufferCallback = Box<dyn FnMut(&mut BufferView<'_>, Duration) -> Result<()> + Send>;

/// Describes a shader storage buffer to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderStorageBufferDesc {
    /// Binding point index, must match `binding = N` in the shader
    pub binding_index: u32,
    /// Usage hint applied at every bind
    pub usage: BufferUsage,
    /// Host access requested when mapping
    pub access: BufferAccess,
    /// Storage size in bytes
    pub size: u32,
}

/// Lifecycle state of a storage buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// Buffer id allocated, no storage yet
    Unbound,
    /// Storage allocated and attached to its binding point
    Bound,
    /// Device buffer released
    Deleted,
}

pub struct ShaderStorageBuffer {
    buffer_id: u32,
    binding_index: u32,
    usage: BufferUsage,
    access: BufferAccess,
    size: u32,
    initial_data: Option<Vec<u8>>,
    callback: BufferCallback,
    state: BufferState,
}

impl ShaderStorageBuffer {
    /// Create a storage buffer
    ///
    /// # Arguments
    ///
    /// * `device` - Device allocating the buffer id
    /// * `desc` - Binding index, usage, access and size
    /// * `callback` - Run with a view of the mapped storage by `process`
    ///
    /// # Errors
    ///
    /// Returns the device error if no buffer id could be allocated
    pub fn new<F>(
        device: &mut dyn GraphicsDevice,
        desc: ShaderStorageBufferDesc,
        callback: F,
    ) -> Result<Self>
    where
        F: FnMut(&mut BufferView<'_>, Duration) -> Result<()> + Send + 'static,
    {
        let buffer_id = device.gen_buffer()?;

        crate::engine_trace!(
            "galaxy3d::ShaderStorageBuffer",
            "Created storage buffer {} (binding {}, {} bytes)",
            buffer_id, desc.binding_index, desc.size
        );

        Ok(Self {
            buffer_id,
            binding_index: desc.binding_index,
            usage: desc.usage,
            access: desc.access,
            size: desc.size,
            initial_data: None,
            callback: Box::new(callback),
            state: BufferState::Unbound,
        })
    }

    // ===== ACCESSORS =====

    pub fn buffer_id(&self) -> u32 {
        self.buffer_id
    }

    pub fn binding_index(&self) -> u32 {
        self.binding_index
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    pub fn access(&self) -> BufferAccess {
        self.access
    }

    /// Storage size in bytes
    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn state(&self) -> BufferState {
        self.state
    }

    // ===== INITIAL DATA =====

    /// Set the payload uploaded by the next bind
    ///
    /// Bytes beyond the buffer size are dropped at upload. A shorter
    /// payload fills the beginning of the storage, the rest is zeroed.
    pub fn set_initial_data(&mut self, data: Vec<u8>) -> &mut Self {
        self.initial_data = Some(data);
        self
    }

    /// Drop the pending payload
    pub fn clear_initial_data(&mut self) -> &mut Self {
        self.initial_data = None;
        self
    }

    /// Whether a payload is waiting for the next bind
    pub fn has_initial_data(&self) -> bool {
        self.initial_data.is_some()
    }

    // ===== LIFECYCLE =====

    /// Allocate the storage and attach the buffer to its binding point
    ///
    /// Uploads and consumes the pending payload. Calling bind again
    /// reallocates the storage with the same size and usage.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` if the buffer was deleted
    /// - the device error if the storage could not be allocated (the
    ///   payload is kept for the next attempt)
    pub fn bind(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        if self.state == BufferState::Deleted {
            return Err(Error::InvalidResource(format!(
                "Cannot bind deleted storage buffer {}",
                self.buffer_id
            )));
        }

        let data = self.initial_data.take();
        let size = self.size as usize;
        if let Some(bytes) = &data {
            if bytes.len() > size {
                crate::engine_debug!(
                    "galaxy3d::ShaderStorageBuffer",
                    "Initial data of storage buffer {} truncated from {} to {} bytes",
                    self.buffer_id, bytes.len(), size
                );
            }
        }

        device.bind_buffer(BufferTarget::ShaderStorage, self.buffer_id);
        let payload = data.as_deref().map(|bytes| &bytes[..bytes.len().min(size)]);
        if let Err(error) = device.named_buffer_data(self.buffer_id, self.size, payload, self.usage) {
            device.bind_buffer(BufferTarget::ShaderStorage, 0);
            self.initial_data = data;
            return Err(error);
        }
        device.bind_buffer_base(BufferTarget::ShaderStorage, self.binding_index, self.buffer_id);
        device.bind_buffer(BufferTarget::ShaderStorage, 0);

        self.state = BufferState::Bound;
        Ok(())
    }

    /// Map the storage and run the callback on it
    ///
    /// The storage is unmapped and the generic target unbound on every
    /// exit path, including a failing or panicking callback.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidResource` if the buffer is not bound
    /// - `Error::MappingFailed` if the device could not map the storage
    ///   (the callback is not run)
    /// - any error returned by the callback
    pub fn process(&mut self, device: &mut dyn GraphicsDevice, delta_time: Duration) -> Result<()> {
        match self.state {
            BufferState::Bound => {}
            BufferState::Unbound => {
                return Err(Error::InvalidResource(format!(
                    "Storage buffer {} must be bound before processing",
                    self.buffer_id
                )));
            }
            BufferState::Deleted => {
                return Err(Error::InvalidResource(format!(
                    "Cannot process deleted storage buffer {}",
                    self.buffer_id
                )));
            }
        }

        device.bind_buffer(BufferTarget::ShaderStorage, self.buffer_id);
        let Some(ptr) = device.map_named_buffer(self.buffer_id, self.access) else {
            device.bind_buffer(BufferTarget::ShaderStorage, 0);
            crate::engine_error!(
                "galaxy3d::ShaderStorageBuffer",
                "Could not map storage buffer {}",
                self.buffer_id
            );
            return Err(Error::MappingFailed { buffer_id: self.buffer_id });
        };

        // Declared before the view so the view is dropped first
        let _mapping = MappedStorage { device, buffer_id: self.buffer_id };

        // SAFETY: the device guarantees `size` bytes at `ptr` until the
        // unmap issued by `_mapping`, which outlives the view
        let mut view = unsafe { BufferView::from_raw_parts(ptr.as_ptr(), self.size as usize) };

        (self.callback)(&mut view, delta_time)
    }

    /// Release the device buffer
    ///
    /// Deleting twice is a no-op.
    pub fn delete(&mut self, device: &mut dyn GraphicsDevice) {
        if self.state == BufferState::Deleted {
            return;
        }
        device.delete_buffers(&[self.buffer_id]);
        self.initial_data = None;
        self.state = BufferState::Deleted;

        crate::engine_trace!(
            "galaxy3d::ShaderStorageBuffer",
            "Deleted storage buffer {}",
            self.buffer_id
        );
    }
}

impl BufferObject for ShaderStorageBuffer {
    fn buffer_id(&self) -> u32 {
        self.buffer_id
    }

    fn bind(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        ShaderStorageBuffer::bind(self, device)
    }

    fn process(&mut self, device: &mut dyn GraphicsDevice, delta_time: Duration) -> Result<()> {
        ShaderStorageBuffer::process(self, device, delta_time)
    }

    fn delete(&mut self, device: &mut dyn GraphicsDevice) {
        ShaderStorageBuffer::delete(self, device)
    }
}

impl fmt::Debug for ShaderStorageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderStorageBuffer")
            .field("buffer_id", &self.buffer_id)
            .field("binding_index", &self.binding_index)
            .field("usage", &self.usage)
            .field("access", &self.access)
            .field("size", &self.size)
            .field("has_initial_data", &self.initial_data.is_some())
            .field("state", &self.state)
            .finish()
    }
}

// ===== MAPPING GUARD =====

/// Unmaps and unbinds a storage buffer when dropped
struct MappedStorage<'d> {
    device: &'d mut dyn GraphicsDevice,
    buffer_id: u32,
}

impl Drop for MappedStorage<'_> {
    fn drop(&mut self) {
        if !self.device.unmap_named_buffer(self.buffer_id) {
            crate::engine_warn!(
                "galaxy3d::ShaderStorageBuffer",
                "Contents of storage buffer {} were corrupted while mapped",
                self.buffer_id
            );
        }
        self.device.bind_buffer(BufferTarget::ShaderStorage, 0);
    }
}

#[cfg(test)]
#[path = "shader_storage_buffer_tests.rs"]
mod tests;
