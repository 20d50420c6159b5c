//! Just-in-time code generation.
//!
//! Statements are lowered into a [`CodeBuffer`], terminated with a return
//! instruction, and copied into freshly mapped pages which are then made
//! executable. The result is a [`CodeObject`] that can be called directly.
mod page;
pub mod x86;

use std::{error, fmt, io};

use log::debug;

use crate::program::Lower;

pub use self::page::{page_size, CodeObject, Protection};
use self::page::WritablePage;

pub type CodegenResult<T> = std::result::Result<T, CodegenError>;

/// Code generator configuration.
#[derive(Debug, Clone, Copy)]
pub struct GenConf {
    /// Minimum number of pages mapped for a code object.
    ///
    /// Values below 1 are treated as 1.
    pub min_pages: usize,
}

impl Default for GenConf {
    fn default() -> Self {
        Self { min_pages: 1 }
    }
}

/// Machine code emitted while lowering statements.
///
/// Bytes are buffered on the heap and only copied into executable memory
/// once lowering is done.
#[derive(Debug, Default)]
pub struct CodeBuffer {
    bytes: Vec<u8>,
}

impl CodeBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn emit(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    #[inline]
    pub fn emit_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Offset of the next emitted byte.
    #[inline]
    pub fn offset(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Code generator.
#[derive(Debug, Default)]
pub struct CodeGen {
    conf: GenConf,
}

impl CodeGen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conf(conf: GenConf) -> Self {
        Self { conf }
    }

    /// Lower the statements into a callable code object.
    ///
    /// Statements without any machine code of their own leave only the
    /// final return instruction, so the code object is a no-op.
    ///
    /// # Errors
    ///
    /// Fails when the page size can't be queried, or when the pages can't be
    /// mapped or made executable. No memory stays mapped on failure.
    pub fn generate<'s, S, I>(&self, stmts: I) -> CodegenResult<CodeObject>
    where
        S: Lower + 's,
        I: IntoIterator<Item = &'s S>,
    {
        let page_size = page_size()?;

        let mut buf = CodeBuffer::new();
        let mut count = 0_usize;
        for stmt in stmts {
            stmt.lower(&mut buf);
            count += 1;
        }
        buf.emit(x86::RET);

        let len = self.mapping_len(buf.offset(), page_size)?;
        debug!(
            "lowered {count} statements into {} bytes, mapping {len} bytes",
            buf.offset()
        );

        let mut page = WritablePage::map(len)?;
        page.fill(buf.as_bytes())?;
        page.into_executable()
    }

    /// Whole number of pages that fit the code, at least the
    /// configured minimum.
    fn mapping_len(&self, code_len: usize, page_size: usize) -> CodegenResult<usize> {
        let pages = code_len.div_ceil(page_size).max(self.conf.min_pages).max(1);
        pages.checked_mul(page_size).ok_or(CodegenError::TooLarge {
            len: code_len,
            capacity: usize::MAX,
        })
    }
}

#[derive(Debug)]
pub enum CodegenError {
    /// The OS page size couldn't be determined.
    PageSize(io::Error),
    Map { len: usize, source: io::Error },
    /// Transition to executable was refused.
    Protect(io::Error),
    Unmap(io::Error),
    /// Code doesn't fit the mapped region.
    TooLarge { len: usize, capacity: usize },
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use CodegenError as E;
        match self {
            E::PageSize(err) => write!(f, "failed to query page size: {err}"),
            E::Map { len, source } => write!(f, "failed to map {len} bytes: {source}"),
            E::Protect(err) => write!(f, "failed to make code executable: {err}"),
            E::Unmap(err) => write!(f, "failed to unmap code: {err}"),
            E::TooLarge { len, capacity } => {
                write!(f, "{len} bytes of code don't fit in {capacity} bytes")
            }
        }
    }
}

impl error::Error for CodegenError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        use CodegenError as E;
        match self {
            E::PageSize(err) | E::Protect(err) | E::Unmap(err) => Some(err),
            E::Map { source, .. } => Some(source),
            E::TooLarge { .. } => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mapping_len() {
        let gen = CodeGen::new();
        assert_eq!(gen.mapping_len(1, 4096).unwrap(), 4096);
        assert_eq!(gen.mapping_len(4096, 4096).unwrap(), 4096);
        assert_eq!(gen.mapping_len(4097, 4096).unwrap(), 8192);

        let gen = CodeGen::with_conf(GenConf { min_pages: 3 });
        assert_eq!(gen.mapping_len(1, 4096).unwrap(), 3 * 4096);

        let gen = CodeGen::with_conf(GenConf { min_pages: 0 });
        assert_eq!(gen.mapping_len(1, 4096).unwrap(), 4096);
    }

    #[test]
    fn test_mapping_len_overflow() {
        let gen = CodeGen::with_conf(GenConf {
            min_pages: usize::MAX,
        });
        assert!(matches!(
            gen.mapping_len(1, 4096),
            Err(CodegenError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_code_buffer() {
        let mut buf = CodeBuffer::new();
        buf.emit(x86::NOP);
        buf.emit_bytes(&[x86::NOP, x86::RET]);
        assert_eq!(buf.offset(), 3);
        assert_eq!(buf.as_bytes(), &[0x90, 0x90, 0xC3]);
    }
}
