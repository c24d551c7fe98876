/// Typed, bounds-checked view over mapped buffer memory.
///
/// A BufferView only exists while a storage buffer is mapped: the buffer
/// builds it right after the device maps the storage and hands it to the
/// processing callback as `&mut BufferView<'_>`, so it cannot outlive
/// the mapping.
///
/// Every access checks `offset + length <= len()` before touching memory.
/// Typed accessors address elements, not bytes: element `index` of type
/// `T` starts at byte `index * size_of(T)`.

use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::Range;

use crate::buffer::{Std430Element, TypeSize};
use crate::error::{Error, Result};

/// Mapped buffer memory
pub struct BufferView<'a> {
    bytes: &'a mut [u8],
}

impl<'a> BufferView<'a> {
    /// View over host memory
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self { bytes }
    }

    /// View over memory returned by a device mapping
    ///
    /// # Safety
    ///
    /// - `ptr` must be valid for reads and writes of `len` bytes for `'a`
    /// - nothing else may access that memory during `'a`
    /// - the mapping must not be released before the view is dropped
    pub(crate) unsafe fn from_raw_parts(ptr: *mut u8, len: usize) -> Self {
        Self { bytes: std::slice::from_raw_parts_mut(ptr, len) }
    }

    /// Size of the view in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the view is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn checked_range(&self, offset: usize, length: usize) -> Result<Range<usize>> {
        let size = self.bytes.len();
        match offset.checked_add(length) {
            Some(end) if end <= size => Ok(offset..end),
            _ => Err(Error::OutOfBounds { offset, length, size }),
        }
    }

    fn element_range<T: Std430Element>(&self, index: usize) -> Result<Range<usize>> {
        let length = TypeSize::of::<T>().size_bytes();
        let offset = index.checked_mul(length).ok_or(Error::OutOfBounds {
            offset: usize::MAX,
            length,
            size: self.bytes.len(),
        })?;
        self.checked_range(offset, length)
    }

    // ===== RAW BYTES =====

    /// `length` bytes starting at byte `offset`
    pub fn get_bytes(&self, offset: usize, length: usize) -> Result<&[u8]> {
        let range = self.checked_range(offset, length)?;
        Ok(&self.bytes[range])
    }

    /// Copy `data` into the view at byte `offset`
    ///
    /// Nothing is written when `data` does not fit.
    pub fn set_bytes(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let range = self.checked_range(offset, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// The whole view
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes
    }

    /// The whole view, writable
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.bytes
    }

    // ===== TYPED ACCESS =====

    /// Element `index` of an array of `T`
    pub fn get<T: Std430Element>(&self, index: usize) -> Result<T> {
        let range = self.element_range::<T>(index)?;
        Ok(T::read_from(&self.bytes[range]))
    }

    /// Overwrite element `index` of an array of `T`
    pub fn set<T: Std430Element>(&mut self, index: usize, value: T) -> Result<()> {
        let range = self.element_range::<T>(index)?;
        value.write_to(&mut self.bytes[range]);
        Ok(())
    }

    /// Number of whole `T` elements that fit in the view
    pub fn element_count<T: Std430Element>(&self) -> usize {
        self.bytes.len() / TypeSize::of::<T>().size_bytes()
    }

    /// Iterate the view as an array of `T`, yielding `(index, value)`
    ///
    /// Trailing bytes that do not form a whole element are skipped.
    pub fn iter<T: Std430Element>(&self) -> Elements<'_, T> {
        Elements {
            bytes: self.bytes,
            index: 0,
            _marker: PhantomData,
        }
    }
}

impl std::fmt::Debug for BufferView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferView").field("len", &self.bytes.len()).finish()
    }
}

// ===== ELEMENT ITERATOR =====

/// Lazy iterator over the elements of a BufferView
pub struct Elements<'v, T> {
    bytes: &'v [u8],
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Std430Element> Elements<'_, T> {
    fn remaining(&self) -> usize {
        (self.bytes.len() / TypeSize::of::<T>().size_bytes()).saturating_sub(self.index)
    }
}

impl<T: Std430Element> Iterator for Elements<'_, T> {
    type Item = (usize, T);

    fn next(&mut self) -> Option<Self::Item> {
        let size = TypeSize::of::<T>().size_bytes();
        let start = self.index.checked_mul(size)?;
        let chunk = self.bytes.get(start..start.checked_add(size)?)?;
        let item = (self.index, T::read_from(chunk));
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T: Std430Element> ExactSizeIterator for Elements<'_, T> {}

impl<T: Std430Element> FusedIterator for Elements<'_, T> {}

#[cfg(test)]
#[path = "buffer_view_tests.rs"]
mod tests;
