use crate::{
  aligned::{AlignedAllocator, AllocationResult},
  error::Result,
  system::AlignedAlloc,
};

/// What a container needs from a pluggable allocation strategy.
///
/// Two instances comparing equal may release each other's blocks.
pub trait AllocatorContract: Clone + PartialEq {
  type Value;

  fn allocate(
    &self,
    n: usize,
  ) -> Result<*mut Self::Value>;

  fn allocate_at_least(
    &self,
    n: usize,
  ) -> Result<AllocationResult<Self::Value>>;

  /// # Safety
  ///
  /// `p` must be null or come from `allocate`/`allocate_at_least` on an
  /// instance equal to `self`, and must not have been released yet.
  unsafe fn deallocate(
    &self,
    p: *mut Self::Value,
    n: usize,
  );
}

impl<T, S: AlignedAlloc> AllocatorContract for AlignedAllocator<T, S> {
  type Value = T;

  #[inline]
  fn allocate(
    &self,
    n: usize,
  ) -> Result<*mut T> {
    AlignedAllocator::allocate(self, n)
  }

  #[inline]
  fn allocate_at_least(
    &self,
    n: usize,
  ) -> Result<AllocationResult<T>> {
    AlignedAllocator::allocate_at_least(self, n)
  }

  #[inline]
  unsafe fn deallocate(
    &self,
    p: *mut T,
    n: usize,
  ) {
    unsafe { AlignedAllocator::deallocate(self, p, n) }
  }
}
