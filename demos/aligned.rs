use aligned_alloc::{AlignedAllocator, CountingAlloc, Error, LibcAlloc};
use allocator_api2::{boxed::Box, vec::Vec};

/// Prints an address together with its offset from the allocator's boundary.
fn print_block<T>(
  label: &str,
  ptr: *mut T,
  alignment: usize,
) {
  println!(
    "[{}] address = {:?}, addr % {} = {}",
    label,
    ptr,
    alignment,
    ptr as usize % alignment
  );
}

fn main() -> Result<(), Error> {
  // Counting wrapper around libc so the demo can show what reached the system.
  let allocator = AlignedAllocator::<i32, _>::with_system(1024, CountingAlloc::new(LibcAlloc));
  let stats = allocator.system().stats();

  // --------------------------------------------------------------------
  // 1) allocate(0) never reaches the system.
  // --------------------------------------------------------------------
  let empty = allocator.allocate(0)?;
  println!("[1] allocate(0) = {:?}, system calls = {}", empty, stats.allocations());

  // --------------------------------------------------------------------
  // 2) Two ints still take a whole 1024-byte block.
  // --------------------------------------------------------------------
  let pair = allocator.allocate(2)?;
  print_block("2", pair, allocator.alignment());
  println!("[2] block size = {:?} bytes", stats.block_size(pair));

  // --------------------------------------------------------------------
  // 3) allocate_at_least reports the capacity granted by rounding.
  // --------------------------------------------------------------------
  let result = allocator.allocate_at_least(2)?;
  print_block("3", result.ptr, allocator.alignment());
  println!("[3] requested 2, usable count = {}", result.count);

  unsafe {
    for i in 0..result.count {
      result.ptr.add(i).write(i as i32);
    }
    println!("[3] last value = {}", result.ptr.add(result.count - 1).read());
  }

  // --------------------------------------------------------------------
  // 4) Requests that cannot be expressed in bytes fail before any call.
  // --------------------------------------------------------------------
  match allocator.allocate(usize::MAX) {
    Ok(_) => println!("[4] unexpected success"),
    Err(err) => println!("[4] allocate(usize::MAX): {}", err),
  }

  // --------------------------------------------------------------------
  // 5) Release through a rebound allocator: same alignment, so equal.
  // --------------------------------------------------------------------
  let bytes = allocator.rebind::<u8>();
  println!("[5] rebound allocator equal? {}", bytes == allocator);

  unsafe {
    allocator.deallocate(pair, 2);
    bytes.deallocate(result.ptr.cast(), result.count);
  }
  println!("[5] live blocks = {}", stats.live_blocks());

  // --------------------------------------------------------------------
  // 6) Containers from allocator-api2.
  // --------------------------------------------------------------------
  let mut values = Vec::with_capacity_in(4, allocator.rebind::<u64>());
  values.extend([1u64, 2, 3, 4, 5]);
  print_block("6", values.as_mut_ptr(), allocator.alignment());

  let boxed = Box::new_in(7u64, allocator.clone());
  print_block("6", &*boxed as *const u64 as *mut u64, allocator.alignment());
  println!("[6] live blocks = {}", stats.live_blocks());

  drop(values);
  drop(boxed);

  println!(
    "\n[7] system calls = {}, frees = {}, live blocks = {}",
    stats.allocations(),
    stats.frees(),
    stats.live_blocks()
  );

  Ok(())
}
