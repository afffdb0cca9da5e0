//! # aligned-alloc - An Alignment-Rounding Allocator
//!
//! This crate provides [`AlignedAllocator`], an allocator that hands out
//! blocks aligned to a configurable byte boundary (1024 by default) and whose
//! sizes are rounded up to a multiple of that boundary.
//!
//! ## Overview
//!
//! Every request is turned into a single call to the system's aligned
//! allocation primitive:
//!
//! ```text
//!   allocate(n) for T, alignment A:
//!
//!   n elements ──► n * size_of::<T>() ──► round up to multiple of A ──► aligned_alloc(A, bytes)
//!                        │                        │                             │
//!                   overflow? ──► Length     overflow? ──► Length         null? ──► AllocationFailed
//!
//!   Resulting block (A = 64, T = u32, n = 10):
//!
//!   addr % 64 == 0
//!   ▼
//!   ┌────────────────────────────────────────┬──────────────────────────┐
//!   │        40 bytes requested (10 x u32)   │     24 bytes padding     │
//!   └────────────────────────────────────────┴──────────────────────────┘
//!   ◄──────────────────────── 64 bytes allocated ───────────────────────►
//! ```
//!
//! There is no pooling, no free list and no caching: `deallocate` hands the
//! block straight back to the system.
//!
//! ## Crate Structure
//!
//! ```text
//!   aligned_alloc
//!   ├── align      - Round-up and alignment checks for any boundary
//!   ├── aligned    - AlignedAllocator, AllocationResult
//!   ├── contract   - AllocatorContract, the interface containers consume
//!   ├── error      - Error, Result
//!   └── system     - AlignedAlloc primitive, LibcAlloc, CountingAlloc
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use aligned_alloc::AlignedAllocator;
//!
//! let allocator = AlignedAllocator::<i32>::default();
//!
//! let result = allocator.allocate_at_least(2).unwrap();
//! assert_eq!(result.ptr as usize % 1024, 0);
//! assert!(result.count >= 2);
//!
//! unsafe { allocator.deallocate(result.ptr, result.count) };
//! ```
//!
//! With `allocator-api2` collections:
//!
//! ```rust
//! use aligned_alloc::AlignedAllocator;
//! use allocator_api2::vec::Vec;
//!
//! let mut values = Vec::new_in(AlignedAllocator::<u8>::new(64));
//! values.extend_from_slice(&[1u64, 2, 3]);
//! assert_eq!(values.as_ptr() as usize % 64, 0);
//! ```
//!
//! ## Equality
//!
//! Two allocators are equal when their alignments are, whatever their
//! element types. Equal allocators may release each other's blocks:
//!
//! ```rust
//! use aligned_alloc::AlignedAllocator;
//!
//! assert!(AlignedAllocator::<u8>::new(32) == AlignedAllocator::<String>::new(32));
//! assert!(AlignedAllocator::<u8>::new(32) != AlignedAllocator::<u8>::new(64));
//! ```
//!
//! ## Limitations
//!
//! - **Unchecked alignment**: the alignment should be a power of two; other
//!   values are passed to the system primitive as is
//! - **Unchecked release**: `deallocate` trusts that the pointer came from an
//!   equal allocator
//! - **No locking**: thread safety is that of the system primitive
//! - **Unix-only**: the default primitive is `aligned_alloc(3)` from `libc`
//!
//! ## Safety
//!
//! Allocation is safe to call; releasing memory is `unsafe` because the
//! allocator cannot tell where a pointer came from.

pub mod align;
mod aligned;
mod contract;
mod error;
pub mod system;

pub use aligned::{AlignedAllocator, AllocationResult, DEFAULT_ALIGNMENT};
pub use contract::AllocatorContract;
pub use error::{Error, Result};
pub use system::{AlignedAlloc, CountingAlloc, LibcAlloc};
