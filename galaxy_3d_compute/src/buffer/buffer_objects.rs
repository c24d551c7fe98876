/// BufferObjects - registry of buffer objects keyed by buffer id
///
/// Batch operations (bind, process) visit every buffer in ascending id
/// order and never stop at the first failure: every failure is collected
/// and returned as a single `Error::Aggregate`.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use rustc_hash::FxHashMap;

use crate::buffer::BufferObject;
use crate::error::{Error, Result};
use crate::graphics_device::GraphicsDevice;

/// Shared handle to a buffer object
pub type SharedBufferObject = Arc<Mutex<dyn BufferObject>>;

/// Read the id of a buffer object, even through a poisoned lock
fn buffer_id_of(object: &SharedBufferObject) -> u32 {
    object.lock().unwrap_or_else(PoisonError::into_inner).buffer_id()
}

#[derive(Clone, Default)]
pub struct BufferObjects {
    objects: FxHashMap<u32, SharedBufferObject>,
}

impl BufferObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a buffer object under its own buffer id
    ///
    /// Replaces any object already registered under that id.
    ///
    /// # Returns
    ///
    /// The buffer id used as key
    pub fn set(&mut self, object: SharedBufferObject) -> u32 {
        let buffer_id = buffer_id_of(&object);
        self.objects.insert(buffer_id, object);
        buffer_id
    }

    pub fn get(&self, buffer_id: u32) -> Option<&SharedBufferObject> {
        self.objects.get(&buffer_id)
    }

    /// Remove a buffer object (the device buffer is left untouched)
    pub fn unset(&mut self, buffer_id: u32) -> Option<SharedBufferObject> {
        self.objects.remove(&buffer_id)
    }

    /// Registered buffer objects, in no particular order
    pub fn values(&self) -> impl Iterator<Item = &SharedBufferObject> {
        self.objects.values()
    }

    /// Registered buffer ids, ascending
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.objects.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, buffer_id: u32) -> bool {
        self.objects.contains_key(&buffer_id)
    }

    /// Merge another registry into this one
    ///
    /// On a shared id, the object from `other` wins.
    pub fn add(&mut self, other: &BufferObjects) -> &mut Self {
        for (buffer_id, object) in &other.objects {
            self.objects.insert(*buffer_id, Arc::clone(object));
        }
        self
    }

    // ===== BATCH OPERATIONS =====

    /// Bind every buffer
    ///
    /// # Errors
    ///
    /// `Error::Aggregate` listing every buffer that failed to bind
    pub fn bind(&self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let failures = self.for_each_locked(|object| object.bind(device));
        if !failures.is_empty() {
            crate::engine_error!(
                "galaxy3d::BufferObjects",
                "{} of {} storage buffers failed to bind",
                failures.len(), self.objects.len()
            );
        }
        Error::from_failures(failures)
    }

    /// Process every buffer
    ///
    /// A buffer that fails (mapping, callback, ...) does not prevent the
    /// others from being processed.
    ///
    /// # Errors
    ///
    /// `Error::Aggregate` listing every buffer that failed
    pub fn process(&self, device: &mut dyn GraphicsDevice, delta_time: Duration) -> Result<()> {
        let failures = self.for_each_locked(|object| object.process(device, delta_time));
        if !failures.is_empty() {
            crate::engine_error!(
                "galaxy3d::BufferObjects",
                "{} of {} storage buffers failed to process",
                failures.len(), self.objects.len()
            );
        }
        Error::from_failures(failures)
    }

    /// Delete every buffer and empty the registry
    pub fn delete_all(&mut self, device: &mut dyn GraphicsDevice) {
        for buffer_id in self.ids() {
            if let Some(object) = self.objects.get(&buffer_id) {
                object.lock().unwrap_or_else(PoisonError::into_inner).delete(device);
            }
        }
        self.objects.clear();
    }

    /// Run `op` on every buffer in ascending id order, collecting failures
    fn for_each_locked<F>(&self, mut op: F) -> Vec<Error>
    where
        F: FnMut(&mut dyn BufferObject) -> Result<()>,
    {
        let mut failures = Vec::new();
        for buffer_id in self.ids() {
            let Some(object) = self.objects.get(&buffer_id) else {
                continue;
            };
            match object.lock() {
                Ok(mut guard) => {
                    if let Err(error) = op(&mut *guard) {
                        failures.push(error);
                    }
                }
                Err(_) => failures.push(Error::BackendError(format!(
                    "Storage buffer {} lock poisoned",
                    buffer_id
                ))),
            }
        }
        failures
    }
}

impl FromIterator<SharedBufferObject> for BufferObjects {
    fn from_iter<I: IntoIterator<Item = SharedBufferObject>>(iter: I) -> Self {
        let mut objects = Self::new();
        for object in iter {
            objects.set(object);
        }
        objects
    }
}

/// Equal when both registries hold the same ids and every entry reports
/// the same buffer id (buffer contents are not compared)
impl PartialEq for BufferObjects {
    fn eq(&self, other: &Self) -> bool {
        self.objects.len() == other.objects.len()
            && self.objects.iter().all(|(buffer_id, object)| {
                other
                    .objects
                    .get(buffer_id)
                    .is_some_and(|theirs| buffer_id_of(theirs) == buffer_id_of(object))
            })
    }
}

impl fmt::Debug for BufferObjects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferObjects").field("ids", &self.ids()).finish()
    }
}

#[cfg(test)]
#[path = "buffer_objects_tests.rs"]
mod tests;
