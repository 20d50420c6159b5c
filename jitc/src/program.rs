//! Structured program handed from the parser to the code generator.
use std::fmt;

use log::debug;

use crate::{
    jit::CodeBuffer,
    seq::{Sequence, Storage},
};

/// Lowering of a statement into machine code.
///
/// # Safety
///
/// The emitted bytes are executed as is. Implementations must emit valid
/// machine code for the host that preserves callee saved registers and the
/// stack, and falls through to whatever follows it. Emitting nothing is
/// always sound.
pub unsafe trait Lower {
    fn lower(&self, buf: &mut CodeBuffer);
}

/// Statement node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Empty,
    /// `var name type = value`
    Var(VarDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    pub ty: String,
    /// Initial value expression; absent means the value defaults to zero.
    pub value: Option<String>,
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Stmt::Empty => write!(f, ";"),
            Stmt::Var(decl) => match &decl.value {
                Some(value) => write!(f, "var {} {} = {}", decl.name, decl.ty, value),
                None => write!(f, "var {} {}", decl.name, decl.ty),
            },
        }
    }
}

// SAFETY: No machine code is emitted.
unsafe impl Lower for Stmt {
    fn lower(&self, buf: &mut CodeBuffer) {
        // Declarations reserve no storage yet, so nothing is actionable.
        debug!("{:#06x}: {self}", buf.offset());
    }
}

/// Ordered sequence of statements.
pub struct Program {
    stmts: Box<dyn Sequence<Stmt>>,
}

impl Program {
    pub fn new() -> Self {
        Self::with_storage(Storage::Array)
    }

    pub fn with_storage(storage: Storage) -> Self {
        Self {
            stmts: storage.build(),
        }
    }

    pub fn push(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stmts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    /// Iterate the statements in program order.
    pub fn iter(&self) -> impl Iterator<Item = &Stmt> + '_ {
        self.stmts.iter()
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Stmt> for Program {
    fn from_iter<T: IntoIterator<Item = Stmt>>(iter: T) -> Self {
        let mut program = Program::new();
        for stmt in iter {
            program.push(stmt);
        }
        program
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Stmt;
    type IntoIter = Box<dyn Iterator<Item = &'a Stmt> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.stmts.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn decl(name: &str, value: Option<&str>) -> Stmt {
        Stmt::Var(VarDecl {
            name: name.to_string(),
            ty: "int".to_string(),
            value: value.map(str::to_string),
        })
    }

    #[test]
    fn test_program_order() {
        for storage in [Storage::Array, Storage::Stack] {
            let mut program = Program::with_storage(storage);
            program.push(decl("a", Some("1")));
            program.push(Stmt::Empty);
            program.push(decl("b", None));

            let text = program.iter().map(Stmt::to_string).collect::<Vec<_>>();
            assert_eq!(text, vec!["var a int = 1", ";", "var b int"]);
        }
    }

    #[test]
    fn test_stmt_lowers_nothing() {
        let mut buf = CodeBuffer::new();
        decl("x", Some("5")).lower(&mut buf);
        Stmt::Empty.lower(&mut buf);
        assert_eq!(buf.offset(), 0);
    }
}
