/// Compute program handles, workgroup counts and memory barriers

use bitflags::bitflags;

/// Opaque handle of a linked program, assigned by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Number of workgroups dispatched along each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkGroups {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl WorkGroups {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

impl Default for WorkGroups {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

bitflags! {
    /// Memory barrier kinds (OpenGL `glMemoryBarrier` bits)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MemoryBarrier: u32 {
        const SHADER_STORAGE = 0x0000_2000;
    }
}
