/// Rounds `value` up to the next multiple of `alignment`.
///
/// Returns `None` when the rounded value does not fit in a `usize`.
/// `alignment` must be non-zero but does not have to be a power of two.
///
/// # Examples
///
/// ```rust
/// use aligned_alloc::align::align_up;
///
/// assert_eq!(align_up(0, 64), Some(0));
/// assert_eq!(align_up(1, 64), Some(64));
/// assert_eq!(align_up(64, 64), Some(64));
/// assert_eq!(align_up(65, 64), Some(128));
/// assert_eq!(align_up(10, 3), Some(12));
/// assert_eq!(align_up(usize::MAX, 64), None);
/// ```
#[inline]
pub const fn align_up(
  value: usize,
  alignment: usize,
) -> Option<usize> {
  debug_assert!(alignment != 0);
  value.div_ceil(alignment).checked_mul(alignment)
}

/// Returns `true` if `addr` lies on an `alignment` boundary.
#[inline]
pub const fn is_aligned(
  addr: usize,
  alignment: usize,
) -> bool {
  addr % alignment == 0
}
