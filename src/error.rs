use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure of an allocation request. Neither kind is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
  /// `count` elements of `elem_size` bytes cannot be expressed as an
  /// aligned byte size.
  #[error("allocation length overflow: {count} elements of {elem_size} bytes")]
  Length { count: usize, elem_size: usize },

  /// The system primitive could not provide the block.
  #[error("failed to allocate {size} bytes aligned to {alignment}")]
  AllocationFailed { size: usize, alignment: usize },
}
