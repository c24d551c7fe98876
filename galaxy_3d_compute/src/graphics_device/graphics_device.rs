/// GraphicsDevice trait - capability surface of the graphics driver

use std::ptr::NonNull;

use crate::error::Result;
use crate::graphics_device::{
    BufferAccess, BufferTarget, BufferUsage, MemoryBarrier, ProgramHandle,
};

/// Graphics driver capabilities used by storage buffers and compute programs
///
/// Implemented by backend-specific devices (an OpenGL context binding,
/// a software device for tests, ...). Every call happens on the thread
/// owning the graphics context.
pub trait GraphicsDevice: Send {
    /// Allocate a new buffer identifier
    ///
    /// # Returns
    ///
    /// A non-zero buffer id
    fn gen_buffer(&mut self) -> Result<u32>;

    /// Bind a buffer to a generic target slot
    ///
    /// Passing `0` as `buffer_id` unbinds the target.
    fn bind_buffer(&mut self, target: BufferTarget, buffer_id: u32);

    /// Allocate (or reallocate) the storage of a buffer
    ///
    /// # Arguments
    ///
    /// * `buffer_id` - Buffer to allocate storage for
    /// * `size` - Storage size in bytes
    /// * `data` - Optional initial contents. At most `size` bytes are
    ///   copied; storage not covered by `data` is zero-filled
    /// * `usage` - Usage hint
    fn named_buffer_data(
        &mut self,
        buffer_id: u32,
        size: u32,
        data: Option<&[u8]>,
        usage: BufferUsage,
    ) -> Result<()>;

    /// Bind a buffer to an indexed binding point (`layout(binding = N)`)
    fn bind_buffer_base(&mut self, target: BufferTarget, index: u32, buffer_id: u32);

    /// Map the storage of a buffer into host memory
    ///
    /// # Returns
    ///
    /// A pointer to at least `size` bytes (the size given to the last
    /// `named_buffer_data`), valid until `unmap_named_buffer`, or `None`
    /// when the driver could not map the buffer
    fn map_named_buffer(&mut self, buffer_id: u32, access: BufferAccess) -> Option<NonNull<u8>>;

    /// Release a mapping obtained with `map_named_buffer`
    ///
    /// # Returns
    ///
    /// `false` if the contents became corrupt while mapped
    fn unmap_named_buffer(&mut self, buffer_id: u32) -> bool;

    /// Delete buffers and release their storage
    fn delete_buffers(&mut self, buffer_ids: &[u32]);

    /// Order memory transactions issued before the barrier
    fn memory_barrier(&mut self, barriers: MemoryBarrier);

    /// Compile and link a program made of a single compute stage
    ///
    /// # Errors
    ///
    /// Returns `Error::CompilationFailed` with the driver log on failure
    fn create_compute_program(&mut self, source: &str) -> Result<ProgramHandle>;

    /// Delete a linked program
    fn delete_program(&mut self, program: ProgramHandle);

    /// Make a program current
    fn use_program(&mut self, program: ProgramHandle);

    /// Dispatch the current compute program over (x, y, z) workgroups
    fn dispatch_compute(&mut self, x: u32, y: u32, z: u32);
}
