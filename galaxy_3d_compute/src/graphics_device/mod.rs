/// Graphics device module - driver capability trait and the types it consumes

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod dispatch;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use dispatch::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
