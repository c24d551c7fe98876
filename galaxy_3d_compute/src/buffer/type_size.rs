/// std430 type sizes and the element trait used by typed buffer access.
///
/// Sizes follow the GLSL naming (bool, int, uint, float, double, vecN,
/// dvecN, matCxR). Vector and matrix sizes are plain multiples of their
/// scalar size: std430 array alignment (e.g. vec3 arrays padded to 16
/// bytes) is not modeled and stays the caller's responsibility.

use glam::{DVec2, DVec3, DVec4, IVec2, IVec3, IVec4, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

// ===== TYPE SIZE =====

/// GLSL data type, sized under std430
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeSize {
    // Scalars
    Bool,
    Int,
    UInt,
    Float,
    Double,

    // Boolean vectors
    BVec2,
    BVec3,
    BVec4,

    // Integer vectors
    IVec2,
    IVec3,
    IVec4,

    // Unsigned integer vectors
    UVec2,
    UVec3,
    UVec4,

    // Single precision vectors
    Vec2,
    Vec3,
    Vec4,

    // Double precision vectors
    DVec2,
    DVec3,
    DVec4,

    // Single precision matrices
    Mat3,
    Mat2x3,
    Mat3x2,
    Mat4,
    Mat2x4,
    Mat3x4,
    Mat4x2,
    Mat4x3,
}

impl TypeSize {
    /// Size in bytes (std430)
    pub const fn size_bytes(&self) -> usize {
        const BOOL: usize = 4; // GLSL bool is 32-bit in buffers
        const INT: usize = 4;
        const UINT: usize = 4;
        const FLOAT: usize = 4;
        const DOUBLE: usize = 8;

        match self {
            TypeSize::Bool => BOOL,
            TypeSize::Int => INT,
            TypeSize::UInt => UINT,
            TypeSize::Float => FLOAT,
            TypeSize::Double => DOUBLE,

            TypeSize::BVec2 => 2 * BOOL,
            TypeSize::BVec3 => 3 * BOOL,
            TypeSize::BVec4 => 4 * BOOL,

            TypeSize::IVec2 => 2 * INT,
            TypeSize::IVec3 => 3 * INT,
            TypeSize::IVec4 => 4 * INT,

            TypeSize::UVec2 => 2 * UINT,
            TypeSize::UVec3 => 3 * UINT,
            TypeSize::UVec4 => 4 * UINT,

            TypeSize::Vec2 => 2 * FLOAT,
            TypeSize::Vec3 => 3 * FLOAT,
            TypeSize::Vec4 => 4 * FLOAT,

            TypeSize::DVec2 => 2 * DOUBLE,
            TypeSize::DVec3 => 3 * DOUBLE,
            TypeSize::DVec4 => 4 * DOUBLE,

            TypeSize::Mat3 => 3 * 3 * FLOAT,
            TypeSize::Mat2x3 => 2 * 3 * FLOAT,
            TypeSize::Mat3x2 => 3 * 2 * FLOAT,
            TypeSize::Mat4 => 4 * 4 * FLOAT,
            TypeSize::Mat2x4 => 2 * 4 * FLOAT,
            TypeSize::Mat3x4 => 3 * 4 * FLOAT,
            TypeSize::Mat4x2 => 4 * 2 * FLOAT,
            TypeSize::Mat4x3 => 4 * 3 * FLOAT,
        }
    }

    /// GLSL type of a host element type
    pub const fn of<T: Std430Element>() -> TypeSize {
        T::TYPE_SIZE
    }
}

// ===== ELEMENT TRAIT =====

/// Host type that can be read from and written to a std430 buffer
///
/// `read_from` and `write_to` receive slices of exactly
/// `TYPE_SIZE.size_bytes()` bytes, not necessarily aligned.
pub trait Std430Element: Sized {
    /// GLSL type this host type maps to
    const TYPE_SIZE: TypeSize;

    /// Decode one element
    fn read_from(bytes: &[u8]) -> Self;

    /// Encode one element
    fn write_to(&self, bytes: &mut [u8]);
}

/// GLSL booleans are 32-bit integers: 1 is true, anything else is false
impl Std430Element for bool {
    const TYPE_SIZE: TypeSize = TypeSize::Bool;

    fn read_from(bytes: &[u8]) -> Self {
        bytemuck::pod_read_unaligned::<i32>(bytes) == 1
    }

    fn write_to(&self, bytes: &mut [u8]) {
        let value: i32 = if *self { 1 } else { 0 };
        bytes.copy_from_slice(bytemuck::bytes_of(&value));
    }
}

macro_rules! impl_pod_element {
    ($($ty:ty => $size:ident),* $(,)?) => {
        $(
            impl Std430Element for $ty {
                const TYPE_SIZE: TypeSize = TypeSize::$size;

                fn read_from(bytes: &[u8]) -> Self {
                    bytemuck::pod_read_unaligned(bytes)
                }

                fn write_to(&self, bytes: &mut [u8]) {
                    bytes.copy_from_slice(bytemuck::bytes_of(self));
                }
            }
        )*
    };
}

impl_pod_element! {
    i32 => Int,
    u32 => UInt,
    f32 => Float,
    f64 => Double,
    IVec2 => IVec2,
    IVec3 => IVec3,
    IVec4 => IVec4,
    UVec2 => UVec2,
    UVec3 => UVec3,
    UVec4 => UVec4,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    DVec2 => DVec2,
    DVec3 => DVec3,
    DVec4 => DVec4,
    Mat3 => Mat3,
    Mat4 => Mat4,
}

#[cfg(test)]
#[path = "type_size_tests.rs"]
mod tests;
