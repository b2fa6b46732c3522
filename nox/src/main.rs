use nox::builtin_functions::builtins;
use nox_interp::{Interpreter, InterpreterConfig};
use nox_source::Source;
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::process;

const EXIT_USAGE: i32 = 64;
const EXIT_NO_INPUT: i32 = 66;
const EXIT_IO: i32 = 74;

fn main() {
    nox::init_tracing();
    let config = config_from_env();

    let args: Vec<String> = env::args().collect();
    let status = match args.len() {
        1 => run_prompt(config),
        2 => run_file(&args[1], config),
        _ => {
            eprintln!("Usage: nox [script]");
            EXIT_USAGE
        }
    };
    process::exit(status);
}

/// Reads overrides from the environment. Invalid values are ignored.
fn config_from_env() -> InterpreterConfig {
    let mut config = InterpreterConfig::default();
    if let Some(depth) = depth_from_env("NOX_MAX_CALL_DEPTH") {
        config.max_call_depth = depth;
    }
    if let Some(depth) = depth_from_env("NOX_MAX_EVAL_DEPTH") {
        config.max_eval_depth = depth;
    }
    config
}

fn depth_from_env(var: &str) -> Option<usize> {
    let depth = env::var(var).ok()?;
    match depth.parse() {
        Ok(depth) => Some(depth),
        Err(_) => {
            tracing::warn!(var, %depth, "ignoring invalid depth override");
            None
        }
    }
}

fn run_file(path: &str, config: InterpreterConfig) -> i32 {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("cannot read {}: {}", path, err);
            return EXIT_NO_INPUT;
        }
    };
    let source = Source::with_name(path, &content);

    let result = nox::run_source(&content, io::stdout(), config);
    if let Err(err) = &result {
        eprint!("{}", source.report(err));
    }
    nox::exit_status(&result)
}

/// Line oriented REPL. Declarations persist between lines.
fn run_prompt(config: InterpreterConfig) -> i32 {
    let mut interpreter = Interpreter::new(builtins()).with_config(config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut input = String::new();

    loop {
        print!("> ");
        if stdout.flush().is_err() {
            return EXIT_IO;
        }

        input.clear();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => return 0, // end of input
            Ok(_) => {}
            Err(err) => {
                eprintln!("cannot read input: {}", err);
                return EXIT_IO;
            }
        }

        let source = Source::with_name("<repl>", &input);
        let program = match nox_parser::parse_source(&input) {
            Ok(program) => program,
            Err(err) => {
                eprint!("{}", source.report(&err));
                continue;
            }
        };

        match interpreter.run(program) {
            Ok(nox_interp::RunOutcome::Completed) => {}
            Ok(nox_interp::RunOutcome::Exited(status)) => return status,
            Err(err) => eprint!("{}", source.report(&nox::Error::from(err))),
        }
    }
}
