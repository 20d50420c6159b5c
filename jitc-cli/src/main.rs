//! Entrypoint for CLI
use std::{env, error::Error, fs, time::Instant};

use jitc::{prelude::*, IMPL_VERSION};
use log::{error, info, warn};

static USAGE: &str = r#"
usage: jitc CMD [OPTIONS] FILE

commands:
    lex     Print the tokens of the source file
    run     Compile the source file into machine code and run it

options:
    --stack       Accumulate tokens in a linked stack instead of an array
    --pages N     Map at least N pages for the generated code

examples:
    jitc lex decls.jc
    jitc run --pages 2 decls.jc
"#;

fn read_source(filepath: impl AsRef<str>) -> JitcResult<String> {
    let file_bytes = fs::read(filepath.as_ref())?;
    Ok(String::from_utf8(file_bytes)?)
}

fn run_lexer(filepath: impl AsRef<str>, conf: JitcConf) -> JitcResult<()> {
    info!("running lexer with {} storage", conf.lex.storage);

    let source_code = read_source(filepath)?;
    let stream = tokenize_with(source_code.as_str(), conf.lex);

    println!("line:col | token       | text ");
    for token in &stream {
        let position = format!("{}:{}", token.line(), token.column());
        let kind = token.kind().to_string();
        let text = token.text();
        println!("{position: <8} | {kind: <11} | \"{text}\"");
    }

    let error_count = stream.errors().count();
    println!("{} tokens, {} errors", stream.len(), error_count);

    Ok(())
}

fn run_program(filepath: impl AsRef<str>, conf: JitcConf) -> JitcResult<()> {
    info!("running compiler");

    let source_code = read_source(filepath)?;

    let start = Instant::now();
    let code = compile_with(source_code.as_str(), conf, |tokens| {
        for token in tokens.errors() {
            warn!("{}:{} {}", token.line(), token.column(), token.text());
        }
        // Parsing is left to an external parser; without one the program is empty.
        Program::new()
    })?;
    let end = Instant::now();

    info!(
        "generated {} bytes of code in {} page bytes",
        code.bytes_used(),
        code.len()
    );
    println!(
        "time taken: {}ms",
        end.duration_since(start).as_nanos() as f64 / 1000000.0
    ); // to millis

    code.call();
    code.release()?;

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new().env().init()?;

    let result = match parse_args(env::args().skip(1)) {
        Some(Cmd::Lex { filepath, conf }) => run_lexer(filepath, conf),
        Some(Cmd::Run { filepath, conf }) => run_program(filepath, conf),
        None => {
            print_usage();
            // FreeBSD EX_USAGE (64)
            std::process::exit(64)
        }
    };

    if let Err(err) = result {
        error!("{err}");
        std::process::exit(1)
    }

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Cmd> {
    let cmd = args.next()?;

    let mut conf = JitcConf::default();
    let mut filepath = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--stack" => conf.lex.storage = Storage::Stack,
            "--pages" => conf.gen.min_pages = args.next()?.parse().ok()?,
            _ if arg.starts_with("--") => return None,
            _ => filepath = Some(arg),
        }
    }
    let filepath = filepath?;

    match cmd.as_str() {
        "lex" => Some(Cmd::Lex { filepath, conf }),
        "run" => Some(Cmd::Run { filepath, conf }),
        _ => None,
    }
}

fn print_usage() {
    println!("jitc v{IMPL_VERSION}");
    println!("{USAGE}");
}

enum Cmd {
    /// Print tokens
    Lex { filepath: String, conf: JitcConf },
    /// Compile and run
    Run { filepath: String, conf: JitcConf },
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(line: &str) -> impl Iterator<Item = String> + '_ {
        line.split_whitespace().map(str::to_string)
    }

    #[test]
    fn test_parse_pages() {
        match parse_args(args("run --pages 3 decls.jc")) {
            Some(Cmd::Run { filepath, conf }) => {
                assert_eq!(filepath, "decls.jc");
                assert_eq!(conf.gen.min_pages, 3);
                assert_eq!(conf.lex.storage, Storage::Array);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_parse_stack_flag() {
        match parse_args(args("lex decls.jc --stack")) {
            Some(Cmd::Lex { filepath, conf }) => {
                assert_eq!(filepath, "decls.jc");
                assert_eq!(conf.lex.storage, Storage::Stack);
            }
            _ => panic!("expected lex command"),
        }
    }

    #[test]
    fn test_parse_bad_usage() {
        assert!(parse_args(args("run decls.jc --pages")).is_none());
        assert!(parse_args(args("run --pages many decls.jc")).is_none());
        assert!(parse_args(args("run --fast decls.jc")).is_none());
        assert!(parse_args(args("build decls.jc")).is_none());
        assert!(parse_args(args("run")).is_none());
        assert!(parse_args(args("")).is_none());
    }
}
