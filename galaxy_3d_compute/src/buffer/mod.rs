/// Buffer module - std430 layout, mapped views, storage buffers and registries

// Module declarations
pub mod type_size;
pub mod buffer_view;
pub mod buffer_object;
pub mod shader_storage_buffer;
pub mod buffer_objects;

// Re-export main types
pub use type_size::{TypeSize, Std430Element};
pub use buffer_view::{BufferView, Elements};
pub use buffer_object::BufferObject;
pub use shader_storage_buffer::{
    ShaderStorageBuffer, ShaderStorageBufferDesc, BufferState, BufferCallback,
};
pub use buffer_objects::{BufferObjects, SharedBufferObject};
