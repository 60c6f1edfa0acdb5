//! Process-wide memory locking.
//!
//! Page faults on the RT path would show up as scheduling-latency noise in
//! the measurements, so the whole process image (current and future
//! allocations) is locked before any experiment thread exists.

use std::io;

use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("mlockall failed: {source}")]
pub struct MemoryLockError {
    source: io::Error,
}

/// Locks current and future pages of the process into RAM.
/// Called exactly once at bootstrap, before any thread is started.
pub fn lock_process_memory() -> Result<(), MemoryLockError> {
    let ret = unsafe { libc::mlockall(libc::MCL_CURRENT | libc::MCL_FUTURE) };
    if ret != 0 {
        return Err(MemoryLockError {
            source: io::Error::last_os_error(),
        });
    }

    info!("process memory locked (current + future pages)");
    Ok(())
}
