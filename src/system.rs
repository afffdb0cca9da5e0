//! The system-level aligned allocation primitive.
//!
//! [`AlignedAllocator`](crate::AlignedAllocator) never calls into libc
//! directly; it goes through an [`AlignedAlloc`] value it owns. The default is
//! [`LibcAlloc`]. [`CountingAlloc`] wraps any primitive and records what passes
//! through it.

use std::{
  collections::HashMap,
  ffi::c_void,
  sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
  },
};

/// A source of aligned memory blocks.
///
/// # Safety
///
/// A non-null pointer returned by `aligned_alloc(alignment, size)` must be
/// aligned to `alignment`, valid for `size` bytes, and stay valid until it is
/// passed to `free` on the same primitive or a clone of it.
pub unsafe trait AlignedAlloc: Clone {
  /// Requests `size` bytes aligned to `alignment`. Returns null on failure.
  fn aligned_alloc(
    &self,
    alignment: usize,
    size: usize,
  ) -> *mut u8;

  /// Releases a block. Null is a no-op.
  ///
  /// # Safety
  ///
  /// `ptr` must be null or a live pointer from `aligned_alloc` on this
  /// primitive or a clone of it.
  unsafe fn free(
    &self,
    ptr: *mut u8,
  );
}

/// `aligned_alloc(3)` / `free(3)` from the C library.
///
/// Thread safety is whatever the C library guarantees for those calls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LibcAlloc;

unsafe impl AlignedAlloc for LibcAlloc {
  #[inline]
  fn aligned_alloc(
    &self,
    alignment: usize,
    size: usize,
  ) -> *mut u8 {
    unsafe { libc::aligned_alloc(alignment, size) as *mut u8 }
  }

  #[inline]
  unsafe fn free(
    &self,
    ptr: *mut u8,
  ) {
    unsafe { libc::free(ptr as *mut c_void) }
  }
}

/// Counters shared by every clone of a [`CountingAlloc`].
#[derive(Debug, Default)]
pub struct AllocStats {
  allocations: AtomicUsize,
  failures: AtomicUsize,
  frees: AtomicUsize,
  // address -> size
  live: Mutex<HashMap<usize, usize>>,
}

impl AllocStats {
  /// Calls to `aligned_alloc`, including failed ones.
  pub fn allocations(&self) -> usize {
    self.allocations.load(Ordering::Relaxed)
  }

  /// Calls to `aligned_alloc` that returned null.
  pub fn failures(&self) -> usize {
    self.failures.load(Ordering::Relaxed)
  }

  /// Calls to `free` with a non-null pointer.
  pub fn frees(&self) -> usize {
    self.frees.load(Ordering::Relaxed)
  }

  pub fn live_blocks(&self) -> usize {
    self.live().len()
  }

  pub fn live_bytes(&self) -> usize {
    self.live().values().sum()
  }

  /// Size of the live block starting at `ptr`, if any.
  pub fn block_size<T>(
    &self,
    ptr: *mut T,
  ) -> Option<usize> {
    self.live().get(&(ptr as usize)).copied()
  }

  fn live(&self) -> std::sync::MutexGuard<'_, HashMap<usize, usize>> {
    self.live.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

/// Wraps a primitive and counts calls, live blocks and live bytes.
#[derive(Debug, Clone, Default)]
pub struct CountingAlloc<S = LibcAlloc> {
  inner: S,
  stats: Arc<AllocStats>,
}

impl<S> CountingAlloc<S> {
  pub fn new(inner: S) -> Self {
    Self {
      inner,
      stats: Arc::default(),
    }
  }

  pub fn stats(&self) -> &AllocStats {
    &self.stats
  }

  pub fn inner(&self) -> &S {
    &self.inner
  }
}

unsafe impl<S: AlignedAlloc> AlignedAlloc for CountingAlloc<S> {
  fn aligned_alloc(
    &self,
    alignment: usize,
    size: usize,
  ) -> *mut u8 {
    let ptr = self.inner.aligned_alloc(alignment, size);

    self.stats.allocations.fetch_add(1, Ordering::Relaxed);
    if ptr.is_null() {
      self.stats.failures.fetch_add(1, Ordering::Relaxed);
    } else {
      self.stats.live().insert(ptr as usize, size);
    }

    ptr
  }

  unsafe fn free(
    &self,
    ptr: *mut u8,
  ) {
    if !ptr.is_null() {
      self.stats.frees.fetch_add(1, Ordering::Relaxed);
      self.stats.live().remove(&(ptr as usize));
    }

    unsafe { self.inner.free(ptr) }
  }
}
