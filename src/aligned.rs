use std::{any, fmt, marker::PhantomData, mem, ptr, ptr::NonNull};

use allocator_api2::alloc::{AllocError, Allocator, Layout};
use log::trace;

use crate::{
  align::{align_up, is_aligned},
  error::{Error, Result},
  system::{AlignedAlloc, LibcAlloc},
};

/// Alignment used by [`AlignedAllocator::default`].
pub const DEFAULT_ALIGNMENT: usize = 1024;

/// Pointer and usable element count returned by
/// [`AlignedAllocator::allocate_at_least`].
///
/// Owns nothing: the block belongs to whoever holds `ptr` until it is passed
/// back to [`AlignedAllocator::deallocate`].
pub struct AllocationResult<T> {
  pub ptr: *mut T,
  pub count: usize,
}

impl<T> Clone for AllocationResult<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for AllocationResult<T> {}

impl<T> PartialEq for AllocationResult<T> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    self.ptr == other.ptr && self.count == other.count
  }
}

impl<T> Eq for AllocationResult<T> {}

impl<T> fmt::Debug for AllocationResult<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("AllocationResult")
      .field("ptr", &self.ptr)
      .field("count", &self.count)
      .finish()
  }
}

/// Allocator handing out blocks of `T` aligned to a fixed byte boundary.
///
/// Every request is rounded up to a multiple of the alignment and forwarded to
/// the system primitive `S`. The allocator itself holds no memory and no
/// locks; it is a copyable alignment value plus the primitive.
///
/// `alignment` is expected to be a power of two. This is not checked: a
/// primitive that rejects the value reports it as
/// [`Error::AllocationFailed`].
pub struct AlignedAllocator<T, S = LibcAlloc> {
  alignment: usize,
  system: S,
  _marker: PhantomData<fn() -> T>,
}

impl<T> AlignedAllocator<T> {
  /// Creates an allocator over the C library primitive.
  pub fn new(alignment: usize) -> Self {
    Self::with_system(alignment, LibcAlloc)
  }
}

impl<T, S> AlignedAllocator<T, S> {
  /// Creates an allocator that obtains its blocks from `system`.
  pub fn with_system(
    alignment: usize,
    system: S,
  ) -> Self {
    debug_assert_ne!(alignment, 0, "alignment must be positive");
    Self {
      alignment,
      system,
      _marker: PhantomData,
    }
  }

  #[inline]
  pub fn alignment(&self) -> usize {
    self.alignment
  }

  #[inline]
  pub fn system(&self) -> &S {
    &self.system
  }

  /// Same alignment and primitive, different element type.
  pub fn rebind<U>(&self) -> AlignedAllocator<U, S>
  where
    S: Clone,
  {
    AlignedAllocator::with_system(self.alignment, self.system.clone())
  }

  /// Byte size of `n` elements rounded up to the alignment.
  fn aligned_size(
    &self,
    n: usize,
  ) -> Result<usize> {
    let elem_size = mem::size_of::<T>();

    n.checked_mul(elem_size)
      .and_then(|bytes| align_up(bytes, self.alignment))
      .ok_or(Error::Length {
        count: n,
        elem_size,
      })
  }
}

impl<T, S: AlignedAlloc> AlignedAllocator<T, S> {
  /// Allocates room for `n` elements.
  ///
  /// Returns null for `n == 0` without touching the primitive. The block is
  /// `n * size_of::<T>()` rounded up to the alignment, and never smaller than
  /// one alignment unit, so zero-sized `T` still get a block any equal
  /// allocator can release.
  ///
  /// # Errors
  ///
  /// [`Error::Length`] if the byte size overflows `usize`,
  /// [`Error::AllocationFailed`] if the primitive returns null.
  pub fn allocate(
    &self,
    n: usize,
  ) -> Result<*mut T> {
    if n == 0 {
      return Ok(ptr::null_mut());
    }

    let size = self.aligned_size(n)?.max(self.alignment);
    let ptr = self.system.aligned_alloc(self.alignment, size);

    if ptr.is_null() {
      return Err(Error::AllocationFailed {
        size,
        alignment: self.alignment,
      });
    }

    trace!(
      "allocated {} bytes aligned to {} at {:?}",
      size, self.alignment, ptr
    );

    Ok(ptr.cast())
  }

  /// Allocates at least `n` elements and reports how many fit.
  ///
  /// The rounded byte size of `n` elements is itself passed to
  /// [`allocate`](Self::allocate) as an element count, so the block obtained
  /// is usually much larger than `count` elements. `count` is the rounded byte
  /// size divided by `size_of::<T>()`; the block always covers it. When
  /// `size_of::<T>()` does not divide the alignment, `count` may fall short of
  /// a full alignment multiple but still covers `n`.
  pub fn allocate_at_least(
    &self,
    n: usize,
  ) -> Result<AllocationResult<T>> {
    let elem_size = mem::size_of::<T>();

    if elem_size == 0 {
      return Ok(AllocationResult {
        ptr: self.allocate(n)?,
        count: n,
      });
    }

    let size = self.aligned_size(n)?;

    Ok(AllocationResult {
      ptr: self.allocate(size)?,
      count: size / elem_size,
    })
  }

  /// Returns a block to the primitive. `_n` is ignored.
  ///
  /// # Safety
  ///
  /// `p` must be null or a pointer obtained from `allocate` or
  /// `allocate_at_least` on an allocator equal to this one, not yet released.
  /// Nothing of this is verified beyond a debug-only alignment check.
  pub unsafe fn deallocate(
    &self,
    p: *mut T,
    _n: usize,
  ) {
    if p.is_null() {
      return;
    }

    debug_assert!(
      is_aligned(p as usize, self.alignment),
      "{p:?} was not allocated with alignment {}",
      self.alignment
    );
    trace!("releasing {:?}", p);

    unsafe { self.system.free(p.cast()) }
  }
}

impl<T, S: Default> Default for AlignedAllocator<T, S> {
  fn default() -> Self {
    Self::with_system(DEFAULT_ALIGNMENT, S::default())
  }
}

impl<T, U, S: Clone> From<&AlignedAllocator<U, S>> for AlignedAllocator<T, S> {
  fn from(other: &AlignedAllocator<U, S>) -> Self {
    other.rebind()
  }
}

impl<T, S: Clone> Clone for AlignedAllocator<T, S> {
  fn clone(&self) -> Self {
    Self::with_system(self.alignment, self.system.clone())
  }
}

impl<T, S: Copy> Copy for AlignedAllocator<T, S> {}

/// Memory from one allocator may be released by any allocator that compares
/// equal to it, whatever the element types.
impl<T, U, S> PartialEq<AlignedAllocator<U, S>> for AlignedAllocator<T, S> {
  fn eq(
    &self,
    other: &AlignedAllocator<U, S>,
  ) -> bool {
    self.alignment == other.alignment
  }
}

impl<T, S> Eq for AlignedAllocator<T, S> {}

impl<T, S: fmt::Debug> fmt::Debug for AlignedAllocator<T, S> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("AlignedAllocator")
      .field("value", &any::type_name::<T>())
      .field("alignment", &self.alignment)
      .field("system", &self.system)
      .finish()
  }
}

// Byte-level allocation for `allocator_api2` collections. The element type
// plays no part here; the layout decides the size.
unsafe impl<T, S: AlignedAlloc> Allocator for AlignedAllocator<T, S> {
  fn allocate(
    &self,
    layout: Layout,
  ) -> std::result::Result<NonNull<[u8]>, AllocError> {
    let alignment = self.alignment.max(layout.align());

    if layout.size() == 0 {
      let dangling =
        NonNull::new(ptr::without_provenance_mut::<u8>(alignment)).ok_or(AllocError)?;
      return Ok(NonNull::slice_from_raw_parts(dangling, 0));
    }

    let size = align_up(layout.size(), alignment).ok_or(AllocError)?;
    let ptr = NonNull::new(self.system.aligned_alloc(alignment, size)).ok_or(AllocError)?;

    trace!(
      "allocated {} bytes aligned to {} at {:?}",
      size, alignment, ptr
    );

    Ok(NonNull::slice_from_raw_parts(ptr, size))
  }

  unsafe fn deallocate(
    &self,
    ptr: NonNull<u8>,
    layout: Layout,
  ) {
    if layout.size() == 0 {
      return;
    }

    trace!("releasing {:?}", ptr);
    unsafe { self.system.free(ptr.as_ptr()) }
  }
}
