/*!
# Galaxy 3D Compute

Shader storage buffers and compute pipeline for the Galaxy 3D engine.

This crate manages GPU buffers shared between the host and compute shaders
(SSBOs), maps them into typed, bounds-checked views laid out per std430,
and drives compute programs: `#include` preprocessing, a program cache
keyed by program name, defines and bound buffers, dispatch and memory
barriers. The graphics driver is consumed through the `GraphicsDevice`
trait; backends provide the concrete device.

## Architecture

- **GraphicsDevice**: Capability trait of the graphics driver
- **BufferView**: Typed view over mapped buffer memory
- **ShaderStorageBuffer**: Storage buffer with a host callback
- **BufferObjects**: Registry batching bind/process/delete
- **ComputeManager**: Program registry, cache and dispatch
- **Engine**: Singleton holding the graphics device and the logger
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod buffer;
pub mod compute;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Graphics device trait
    pub use crate::graphics_device::GraphicsDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Graphics device sub-module with the types the driver consumes
    pub mod graphics_device {
        pub use crate::graphics_device::*;
    }

    // Buffer sub-module
    pub mod buffer {
        pub use crate::buffer::*;
    }

    // Compute sub-module
    pub mod compute {
        pub use crate::compute::*;
    }
}

// Re-export math library at crate root
pub use glam;
