//! A fixed-size byte region backed by a POSIX shared memory object
//!
//! ShmRegion maps a named shared memory object (`/dev/shm/<name>` on Linux) into the process, so
//! that other processes opening the same name observe every byte written through the region
//! immediately, and writes made by them are visible to the next read. This is what allows a test
//! harness to seed and inspect simulated hardware state without talking to the simulator.
//!
//! All accesses are volatile, because the mapped bytes may change underneath the process at any
//! time.
//!
//! # Example
//! ```rust
//! use shmregion::ShmRegion;
//!
//! let mut a = ShmRegion::open("__doc_example", 4).unwrap();
//! let b = ShmRegion::open("__doc_example", 4).unwrap();
//! a.set(2, 0xab);
//! assert_eq!(b.get(2), Some(0xab));
//! # ShmRegion::unlink("__doc_example").unwrap();
//! ```

use std::{ffi::CString, io, ptr::NonNull};

#[derive(Debug)]
pub struct ShmRegion {
    ptr: NonNull<u8>,
    len: usize,
    name: String,
}

// Safety: the mapping is owned by this value and only accessed through volatile reads/writes
unsafe impl Send for ShmRegion {}

impl ShmRegion {
    /// Opens the shared memory object `name`, creating it if it does not exist yet, and maps
    /// `len` bytes of it. The object is resized to exactly `len` bytes; existing content within
    /// that range is kept, new bytes are zero.
    ///
    /// A leading `/` is added to `name` if missing.
    pub fn open(name: &str, len: usize) -> io::Result<Self> {
        if len == 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "region must not be empty"));
        }
        let c_name = Self::object_name(name)?;

        let fd = unsafe {
            libc::shm_open(c_name.as_ptr(), libc::O_CREAT | libc::O_RDWR, 0o664 as libc::mode_t)
        };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        let result = Self::map(fd, len);
        unsafe { libc::close(fd) };
        let ptr = result?;

        Ok(ShmRegion { ptr, len, name: name.trim_start_matches('/').to_string() })
    }

    fn map(fd: libc::c_int, len: usize) -> io::Result<NonNull<u8>> {
        if unsafe { libc::ftruncate(fd, len as libc::off_t) } < 0 {
            return Err(io::Error::last_os_error());
        }

        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd,
                0,
            )
        };
        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        NonNull::new(ptr as *mut u8).ok_or_else(|| io::Error::other("mmap returned null"))
    }

    fn object_name(name: &str) -> io::Result<CString> {
        let trimmed = name.trim_start_matches('/');
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid shared memory name {name:?}"),
            ));
        }
        CString::new(format!("/{trimmed}"))
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "name contains NUL"))
    }

    /// Removes the shared memory object `name`. Existing mappings stay valid until dropped.
    pub fn unlink(name: &str) -> io::Result<()> {
        let c_name = Self::object_name(name)?;
        if unsafe { libc::shm_unlink(c_name.as_ptr()) } < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    /// The object name without its leading `/`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads the byte at `index`, or [None] if it lies outside the region.
    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= self.len {
            return None;
        }
        Some(unsafe { self.ptr.as_ptr().add(index).read_volatile() })
    }

    /// Writes `value` at `index`. Returns false and leaves the region untouched if `index` lies
    /// outside the region.
    pub fn set(&mut self, index: usize, value: u8) -> bool {
        if index >= self.len {
            return false;
        }
        unsafe { self.ptr.as_ptr().add(index).write_volatile(value) };
        true
    }

    /// Writes `bytes` starting at `offset`. Nothing is written if the range does not fit.
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) -> io::Result<()> {
        let fits = offset.checked_add(bytes.len()).is_some_and(|end| end <= self.len);
        if !fits {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} bytes at {offset} exceed region of {}", bytes.len(), self.len),
            ));
        }
        for (i, b) in bytes.iter().enumerate() {
            self.set(offset + i, *b);
        }
        Ok(())
    }

    pub fn fill(&mut self, value: u8) {
        for i in 0..self.len {
            self.set(i, value);
        }
    }

    /// Copies the current content of the region
    pub fn to_vec(&self) -> Vec<u8> {
        (0..self.len).filter_map(|i| self.get(i)).collect()
    }

    /// Synchronously flushes the mapping to the backing object
    pub fn flush(&self) -> io::Result<()> {
        let result =
            unsafe { libc::msync(self.ptr.as_ptr() as *mut libc::c_void, self.len, libc::MS_SYNC) };
        if result < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Drop for ShmRegion {
    fn drop(&mut self) {
        unsafe { libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.len) };
    }
}
