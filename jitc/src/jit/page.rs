//! Mapped memory regions.
//!
//! A region is mapped read+write as a [`WritablePage`], filled, then
//! transitioned once to read+execute as a [`CodeObject`]. No region is ever
//! writable and executable at the same time.
use std::{fmt, io, mem, ptr::NonNull, slice};

use log::{debug, warn};

use super::{CodegenError, CodegenResult};

/// Size of a memory page as reported by the OS.
pub fn page_size() -> CodegenResult<usize> {
    // SAFETY: sysconf has no preconditions.
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size <= 0 {
        return Err(CodegenError::PageSize(io::Error::last_os_error()));
    }
    Ok(size as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    /// Read and write, never execute.
    Writable,
    /// Read and execute, never write.
    Executable,
}

impl Protection {
    fn flags(self) -> libc::c_int {
        match self {
            Protection::Writable => libc::PROT_READ | libc::PROT_WRITE,
            Protection::Executable => libc::PROT_READ | libc::PROT_EXEC,
        }
    }
}

impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Protection::Writable => write!(f, "rw-"),
            Protection::Executable => write!(f, "r-x"),
        }
    }
}

/// Private anonymous mapping, unmapped on drop.
struct Region {
    ptr: NonNull<u8>,
    len: usize,
}

impl Region {
    fn map(len: usize, protection: Protection) -> CodegenResult<Self> {
        debug_assert!(len > 0);

        // SAFETY: Anonymous mapping at an address of the kernel's choosing,
        // no existing memory is affected.
        let addr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                protection.flags(),
                libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
                -1,
                0,
            )
        };
        if addr == libc::MAP_FAILED {
            return Err(CodegenError::Map {
                len,
                source: io::Error::last_os_error(),
            });
        }

        let ptr = NonNull::new(addr.cast::<u8>()).ok_or_else(|| CodegenError::Map {
            len,
            source: io::Error::new(io::ErrorKind::Other, "mapped at null"),
        })?;
        debug!("mapped {len} bytes at {:p} {protection}", ptr);

        Ok(Self { ptr, len })
    }

    fn protect(&self, protection: Protection) -> io::Result<()> {
        // SAFETY: The range is exactly the mapping owned by this region.
        let result = unsafe { libc::mprotect(self.ptr.as_ptr().cast(), self.len, protection.flags()) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        debug!("protected {} bytes at {:p} {protection}", self.len, self.ptr);
        Ok(())
    }

    /// Unmap without going through drop, so the error can be reported.
    fn unmap(self) -> io::Result<()> {
        let region = mem::ManuallyDrop::new(self);
        region.munmap()
    }

    fn munmap(&self) -> io::Result<()> {
        // SAFETY: The mapping is owned by this region and no references into
        // it outlive it.
        let result = unsafe { libc::munmap(self.ptr.as_ptr().cast(), self.len) };
        if result != 0 {
            return Err(io::Error::last_os_error());
        }
        debug!("unmapped {} bytes at {:p}", self.len, self.ptr);
        Ok(())
    }
}

impl Drop for Region {
    fn drop(&mut self) {
        if let Err(err) = self.munmap() {
            warn!("failed to unmap {} bytes at {:p}: {err}", self.len, self.ptr);
        }
    }
}

/// Region being filled with instructions.
pub(crate) struct WritablePage {
    region: Region,
    used: usize,
}

impl WritablePage {
    pub(crate) fn map(len: usize) -> CodegenResult<Self> {
        Ok(Self {
            region: Region::map(len, Protection::Writable)?,
            used: 0,
        })
    }

    /// Copy bytes into the region starting at offset 0.
    pub(crate) fn fill(&mut self, bytes: &[u8]) -> CodegenResult<()> {
        if bytes.len() > self.region.len {
            return Err(CodegenError::TooLarge {
                len: bytes.len(),
                capacity: self.region.len,
            });
        }

        // SAFETY: The region is mapped read+write and was checked to be
        // large enough. Nothing else refers to it.
        let dst = unsafe { slice::from_raw_parts_mut(self.region.ptr.as_ptr(), self.region.len) };
        dst[..bytes.len()].copy_from_slice(bytes);
        self.used = bytes.len();

        Ok(())
    }

    /// Drop write access and grant execute access.
    ///
    /// On failure the region is unmapped before the error is returned.
    pub(crate) fn into_executable(self) -> CodegenResult<CodeObject> {
        let WritablePage { region, used } = self;
        region
            .protect(Protection::Executable)
            .map_err(CodegenError::Protect)?;
        Ok(CodeObject { region, used })
    }
}

/// Executable machine code, entered at offset 0.
///
/// Only the code generator can build one. The memory can't be written to
/// anymore, and is unmapped when the object is dropped or
/// [`released`](CodeObject::release).
pub struct CodeObject {
    region: Region,
    used: usize,
}

// SAFETY: The region is immutable once executable and owned
// exclusively by this object.
unsafe impl Send for CodeObject {}

impl CodeObject {
    /// Enter the code at offset 0 and run it until it returns.
    pub fn call(&self) {
        // SAFETY: The region is executable and holds code emitted by the code
        // generator, which always ends in a return instruction. Statement
        // lowerings are bound by the contract of the unsafe `Lower` trait.
        let entry: extern "C" fn() = unsafe { mem::transmute(self.region.ptr.as_ptr()) };
        entry()
    }

    /// Size of the mapped region, a whole number of pages.
    #[inline]
    pub fn len(&self) -> usize {
        self.region.len
    }

    /// Number of bytes occupied by instructions.
    #[inline]
    pub fn bytes_used(&self) -> usize {
        self.used
    }

    /// The emitted instructions.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: The region is readable and `used` never exceeds its length.
        unsafe { slice::from_raw_parts(self.region.ptr.as_ptr(), self.used) }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.region.ptr.as_ptr()
    }

    #[inline]
    pub fn protection(&self) -> Protection {
        Protection::Executable
    }

    /// Unmap the region, reporting failure.
    pub fn release(self) -> CodegenResult<()> {
        self.region.unmap().map_err(CodegenError::Unmap)
    }
}

impl fmt::Debug for CodeObject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CodeObject")
            .field("ptr", &self.region.ptr)
            .field("len", &self.region.len)
            .field("used", &self.used)
            .finish()
    }
}
