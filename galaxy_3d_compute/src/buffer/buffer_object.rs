/// BufferObject trait - GPU buffer managed by a compute program

use std::time::Duration;

use crate::error::Result;
use crate::graphics_device::GraphicsDevice;

/// Buffer that a compute program binds, processes after each dispatch and
/// eventually deletes
///
/// Registries hold buffer objects as `Arc<Mutex<dyn BufferObject>>` so the
/// same buffer can belong to several compute specs.
pub trait BufferObject: Send {
    /// Device buffer id, also the registry key
    fn buffer_id(&self) -> u32;

    /// Allocate storage and attach the buffer to its binding point
    fn bind(&mut self, device: &mut dyn GraphicsDevice) -> Result<()>;

    /// Run the host side of the buffer after a dispatch
    fn process(&mut self, device: &mut dyn GraphicsDevice, delta_time: Duration) -> Result<()>;

    /// Release the device buffer
    fn delete(&mut self, device: &mut dyn GraphicsDevice);
}
