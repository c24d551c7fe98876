/// Buffer enums consumed by the graphics device

/// Binding target of a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Shader storage buffer (SSBO)
    ShaderStorage,
}

/// Usage hint passed when (re)allocating buffer storage
///
/// Frequency (stream / static / dynamic) × nature (draw / read / copy).
/// Use a dynamic usage when the host modifies the contents every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    StreamDraw,
    StreamRead,
    StreamCopy,
    StaticDraw,
    StaticRead,
    StaticCopy,
    DynamicDraw,
    DynamicRead,
    DynamicCopy,
}

/// Host access requested when mapping a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferAccess {
    /// Host writes are not reflected to shaders
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl BufferAccess {
    /// Whether host writes through a mapping reach the GPU
    pub fn writes_back(&self) -> bool {
        !matches!(self, BufferAccess::ReadOnly)
    }
}
