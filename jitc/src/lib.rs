//! Source text to executable machine code.
//!
//! - [`tokenize`] runs the tokenizer state machine over the source.
//! - An external parser turns the token stream into a [`Program`](program::Program).
//! - `jit` lowers the program into pages of executable memory.
//!
//! Intermediate structures are accumulated through the storage agnostic
//! [`Sequence`](seq::Sequence) trait.
#[cfg(not(all(unix, target_arch = "x86_64")))]
compile_error!("code generation only targets x86-64 unix hosts");

mod error;
pub mod jit;
pub mod lex;
pub mod map;
pub mod program;
pub mod seq;
pub mod tokens;

use self::{
    jit::{CodeGen, CodeObject, CodegenResult, GenConf},
    lex::{LexConf, Lexer, TokenStream},
    program::Program,
};

pub use self::error::{JitcError, JitcResult};

pub const IMPL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Pipeline configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct JitcConf {
    pub lex: LexConf,
    pub gen: GenConf,
}

/// Tokenize source text with the default configuration.
pub fn tokenize(source_code: impl AsRef<str>) -> TokenStream {
    Lexer::new(source_code.as_ref()).run()
}

pub fn tokenize_with(source_code: impl AsRef<str>, conf: LexConf) -> TokenStream {
    Lexer::with_conf(source_code.as_ref(), conf).run()
}

/// Generate executable code for a parsed program.
pub fn generate(program: &Program) -> CodegenResult<CodeObject> {
    CodeGen::new().generate(program)
}

/// Run the whole pipeline, using the given function as the parser.
///
/// Lexical errors don't stop the pipeline, they reach the parser as error
/// tokens.
pub fn compile_with<F>(source_code: impl AsRef<str>, conf: JitcConf, parse: F) -> JitcResult<CodeObject>
where
    F: FnOnce(TokenStream) -> Program,
{
    let tokens = tokenize_with(source_code, conf.lex);
    let program = parse(tokens);
    let code = CodeGen::with_conf(conf.gen).generate(&program)?;
    Ok(code)
}

pub mod prelude {
    pub use super::{
        compile_with,
        error::{JitcError, JitcResult},
        generate,
        jit::{CodeGen, CodeObject, CodegenError, GenConf},
        lex::{LexConf, LexError, Lexer, TokenStream},
        program::{Lower, Program, Stmt, VarDecl},
        seq::{Sequence, Storage},
        tokens::{Keyword, Token, TokenKind},
        tokenize, tokenize_with, JitcConf,
    };
}
