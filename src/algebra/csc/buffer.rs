use std::fmt;
use std::ops::{Deref, DerefMut};

/// Backing storage for one of the three CSC arrays.
///
/// A buffer either owns its data or mutably borrows an array that belongs
/// to the caller.  Owned data is released when the buffer is dropped;
/// borrowed data is never released and must outlive the buffer.
///
/// Cloning always produces an owned deep copy, so two owning buffers never
/// share one array.
pub enum CscBuffer<'a, T> {
    /// data allocated and released by the matrix
    Owned(Vec<T>),
    /// data held by the caller
    Borrowed(&'a mut [T]),
}

impl<'a, T> CscBuffer<'a, T> {
    /// true if the data is released together with the buffer
    pub fn is_owned(&self) -> bool {
        matches!(self, CscBuffer::Owned(_))
    }
}

impl<T> Default for CscBuffer<'_, T> {
    fn default() -> Self {
        CscBuffer::Owned(Vec::new())
    }
}

impl<T> Deref for CscBuffer<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match self {
            CscBuffer::Owned(v) => v,
            CscBuffer::Borrowed(s) => s,
        }
    }
}

impl<T> DerefMut for CscBuffer<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        match self {
            CscBuffer::Owned(v) => v,
            CscBuffer::Borrowed(s) => s,
        }
    }
}

impl<T: Clone> Clone for CscBuffer<'_, T> {
    fn clone(&self) -> Self {
        CscBuffer::Owned(self.to_vec())
    }
}

impl<T: fmt::Debug> fmt::Debug for CscBuffer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = if self.is_owned() { "Owned" } else { "Borrowed" };
        f.debug_tuple(tag).field(&self.deref()).finish()
    }
}

impl<T> From<Vec<T>> for CscBuffer<'_, T> {
    fn from(v: Vec<T>) -> Self {
        CscBuffer::Owned(v)
    }
}

impl<'a, T> From<&'a mut [T]> for CscBuffer<'a, T> {
    fn from(s: &'a mut [T]) -> Self {
        CscBuffer::Borrowed(s)
    }
}

#[test]
fn test_buffer_clone_is_owned() {
    let mut data = vec![1, 2, 3];
    let b: CscBuffer<'_, i32> = CscBuffer::from(data.as_mut_slice());
    assert!(!b.is_owned());

    let c = b.clone();
    assert!(c.is_owned());
    assert_eq!(&*c, &[1, 2, 3]);
}
