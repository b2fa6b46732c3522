use nox_value::{Builtins, NativeError, Value};
use std::convert::TryFrom;
use std::io::Write;
use std::sync::OnceLock;

/// Status used by `exit()` when called without an argument.
pub const DEFAULT_EXIT_STATUS: i32 = 1;

/// Returns the process-wide [`Builtins`] table. Built on first use, read-only afterwards.
pub fn builtins() -> &'static Builtins {
    static BUILTINS: OnceLock<Builtins> = OnceLock::new();
    BUILTINS.get_or_init(default_builtins)
}

/// Returns the default [`Builtins`] that should be used.
pub fn default_builtins() -> Builtins {
    let mut builtins = Builtins::new();
    builtins.add_native_fn("three", three, 0..=0);
    builtins.add_native_fn("exit", exit, 0..=1);
    builtins.add_native_fn("print", print, 1..=1);
    builtins.add_native_fn("println", println, 1..=1);
    builtins
}

/// Diagnostic function, always returns `3`.
pub fn three(_out: &mut dyn Write, _args: &[Value]) -> Result<Value, NativeError> {
    Ok(Value::Int(3))
}

pub fn exit(_out: &mut dyn Write, args: &[Value]) -> Result<Value, NativeError> {
    let status = match args.first() {
        None => DEFAULT_EXIT_STATUS,
        Some(arg) => {
            let status = arg.cast_to_int().ok_or_else(|| {
                NativeError::Type(format!(
                    "exit status must be an int, not {}",
                    arg.type_name()
                ))
            })?;
            i32::try_from(status).map_err(|_| {
                NativeError::Type(format!("exit status {} is out of range", status))
            })?
        }
    };
    Err(NativeError::Exit(status))
}

pub fn print(out: &mut dyn Write, args: &[Value]) -> Result<Value, NativeError> {
    write!(out, "{}", args[0])?;
    Ok(Value::Null)
}

pub fn println(out: &mut dyn Write, args: &[Value]) -> Result<Value, NativeError> {
    writeln!(out, "{}", args[0])?;
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_shared() {
        assert!(std::ptr::eq(builtins(), builtins()));
        for ident in &["three", "exit", "print", "println"] {
            assert!(builtins().contains(ident), "missing builtin {}", ident);
        }
    }

    #[test]
    fn exit_status() {
        let mut out = Vec::new();
        assert!(matches!(exit(&mut out, &[]), Err(NativeError::Exit(1))));
        assert!(matches!(
            exit(&mut out, &[Value::Int(42)]),
            Err(NativeError::Exit(42))
        ));
        assert!(matches!(
            exit(&mut out, &[Value::Float(1.0)]),
            Err(NativeError::Type(_))
        ));
        assert!(matches!(
            exit(&mut out, &[Value::Int(i64::MAX)]),
            Err(NativeError::Type(_))
        ));
    }

    #[test]
    fn print_writes_display_form() {
        let mut out = Vec::new();
        print(&mut out, &[Value::Float(2.0)]).unwrap();
        println(&mut out, &[Value::String("x".to_string())]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2.0x\n");
    }
}
