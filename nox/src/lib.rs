pub mod builtin_functions;

use nox_interp::{Interpreter, InterpreterConfig, RunOutcome, RuntimeError};
use nox_parser::{parse_source, SyntaxError};
use nox_source::Diagnostic;
use std::io::Write;
use std::sync::Once;

/// Exit status for a program that does not lex or parse.
pub const EXIT_SYNTAX_ERROR: i32 = 65;
/// Exit status for a program that failed while running.
pub const EXIT_RUNTIME_ERROR: i32 = 70;

/// Any error a run can end with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Process exit status reported for this error.
    pub fn exit_status(&self) -> i32 {
        match self {
            Error::Syntax(_) => EXIT_SYNTAX_ERROR,
            Error::Runtime(_) => EXIT_RUNTIME_ERROR,
        }
    }
}

impl Diagnostic for Error {
    fn offset(&self) -> Option<usize> {
        match self {
            Error::Syntax(err) => err.offset(),
            Error::Runtime(_) => None,
        }
    }
}

/// Parses and runs `source` with the default builtins, writing program output to `out`.
/// Nothing is evaluated if the source does not parse.
pub fn run_source(
    source: &str,
    out: impl Write,
    config: InterpreterConfig,
) -> Result<RunOutcome, Error> {
    let program = parse_source(source)?;
    let mut interpreter =
        Interpreter::with_output(builtin_functions::builtins(), out).with_config(config);
    Ok(interpreter.run(program)?)
}

/// Maps the result of a run to the status the process exits with.
pub fn exit_status(result: &Result<RunOutcome, Error>) -> i32 {
    match result {
        Ok(outcome) => outcome.status(),
        Err(err) => err.exit_status(),
    }
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times.
/// Enable with `RUST_LOG=nox_interp=debug` or `RUST_LOG=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
