//! Tree-walking evaluator.

use crate::env::{AssignError, Environment, Mutability};
use crate::ops;
use crate::error::{DepthKind, RuntimeError};
use nox_parser::ast::{Decl, Expr, FuncDecl, Program, Stmt};
use nox_value::{Builtins, NativeError, NativeFn, Value};
use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

/// Interpreter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum number of nested user function calls before a [`RuntimeError::Recursion`].
    pub max_call_depth: usize,
    /// Maximum number of nested expression evaluations and calls combined.
    /// Keeps deep expressions inside deep call chains off the native stack limit.
    pub max_eval_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 128,
            max_eval_depth: 512,
        }
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every declaration was evaluated.
    Completed,
    /// A native function requested termination with this status.
    Exited(i32),
}

impl RunOutcome {
    /// Process exit status for this outcome.
    pub fn status(self) -> i32 {
        match self {
            RunOutcome::Completed => 0,
            RunOutcome::Exited(status) => status,
        }
    }
}

/// Reason evaluation stopped early.
#[derive(Debug)]
enum Halt {
    Exit(i32),
    Error(RuntimeError),
}

impl From<RuntimeError> for Halt {
    fn from(err: RuntimeError) -> Self {
        Halt::Error(err)
    }
}

type EvalResult<T> = Result<T, Halt>;

/// Result of executing one statement.
#[derive(Debug, PartialEq)]
enum Outcome {
    Normal,
    Returning(Value),
}

pub struct Interpreter<'a> {
    builtins: &'a Builtins,
    config: InterpreterConfig,
    globals: Environment,
    /// Declared functions. Shared so a call can run while the table is borrowed.
    functions: HashMap<String, Rc<FuncDecl>>,
    /// One local environment per active call.
    call_stack: Vec<Environment>,
    /// Active `eval_expr` and `call_function` frames.
    depth: usize,
    out: Box<dyn Write + 'a>,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter that writes program output to stdout.
    pub fn new(builtins: &'a Builtins) -> Self {
        Self::with_output(builtins, io::stdout())
    }

    /// Create an interpreter that writes program output to `out`.
    pub fn with_output(builtins: &'a Builtins, out: impl Write + 'a) -> Self {
        Self {
            builtins,
            config: InterpreterConfig::default(),
            globals: Environment::new(),
            functions: HashMap::new(),
            call_stack: Vec::new(),
            depth: 0,
            out: Box::new(out),
        }
    }

    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the value of a global variable, if declared.
    pub fn global(&self, ident: &str) -> Option<&Value> {
        self.globals.get(ident)
    }

    /// Evaluates the declarations of `program` in source order.
    /// Functions are registered before any global initializer runs.
    /// Globals and functions are kept, so `run` can be called again with more declarations.
    pub fn run(&mut self, program: Program) -> Result<RunOutcome, RuntimeError> {
        let result = self.run_decls(program);
        self.call_stack.clear();
        self.depth = 0;
        self.out.flush().map_err(RuntimeError::Io)?;

        match result {
            Ok(()) => Ok(RunOutcome::Completed),
            Err(Halt::Exit(status)) => {
                tracing::debug!(status, "exit requested");
                Ok(RunOutcome::Exited(status))
            }
            Err(Halt::Error(err)) => Err(err),
        }
    }

    fn run_decls(&mut self, program: Program) -> EvalResult<()> {
        let mut globals = Vec::new();
        for decl in program.decls {
            match decl {
                Decl::FuncDecl(func) => self.declare_function(func)?,
                decl => globals.push(decl),
            }
        }

        for decl in globals {
            match decl {
                Decl::GlobalConst { ident, initializer } => {
                    let value = self.eval_expr(&initializer)?;
                    self.declare_global(&ident, value, Mutability::Immutable)?;
                }
                Decl::GlobalVar { ident, initializer } => {
                    let value = match initializer {
                        Some(initializer) => self.eval_expr(&initializer)?,
                        None => Value::Null,
                    };
                    self.declare_global(&ident, value, Mutability::Mutable)?;
                }
                Decl::FuncDecl(_) => {} // registered above
            }
        }

        Ok(())
    }

    /// Checks that `ident` is free in the global namespace (variables, functions and builtins).
    fn check_global_free(&self, ident: &str) -> Result<(), RuntimeError> {
        if self.globals.contains(ident)
            || self.functions.contains_key(ident)
            || self.builtins.contains(ident)
        {
            return Err(RuntimeError::DuplicateDeclaration(ident.to_string()));
        }
        Ok(())
    }

    fn declare_function(&mut self, func: FuncDecl) -> Result<(), RuntimeError> {
        self.check_global_free(&func.ident)?;
        tracing::trace!(ident = %func.ident, "declare function");
        self.functions.insert(func.ident.clone(), Rc::new(func));
        Ok(())
    }

    fn declare_global(
        &mut self,
        ident: &str,
        value: Value,
        mutability: Mutability,
    ) -> Result<(), RuntimeError> {
        self.check_global_free(ident)?;
        tracing::trace!(ident, %value, "declare global");
        self.globals.declare(ident, value, mutability)
    }
}

/// Statements
impl<'a> Interpreter<'a> {
    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Outcome> {
        match stmt {
            Stmt::ConstDecl { ident, initializer } => {
                let value = self.eval_expr(initializer)?;
                self.current_env().declare(ident, value, Mutability::Immutable)?;
            }
            Stmt::VarDecl { ident, initializer } => {
                let value = self.eval_expr(initializer)?;
                self.current_env().declare(ident, value, Mutability::Mutable)?;
            }
            Stmt::VarSet { ident, value } => {
                let value = self.eval_expr(value)?;
                self.assign(ident, value)?;
            }
            Stmt::Return(expr) => return Ok(Outcome::Returning(self.eval_expr(expr)?)),
            Stmt::ExprStmt(expr) => {
                self.eval_expr(expr)?; // throw away result
            }
        }
        Ok(Outcome::Normal)
    }

    /// The innermost environment: the active call's, or the global one outside calls.
    fn current_env(&mut self) -> &mut Environment {
        match self.call_stack.last_mut() {
            Some(local) => local,
            None => &mut self.globals,
        }
    }

    /// Assigns to `ident` in the active call's environment, falling back to globals.
    fn assign(&mut self, ident: &str, value: Value) -> Result<(), RuntimeError> {
        let env = match self.call_stack.last_mut() {
            Some(local) if local.contains(ident) => local,
            _ => &mut self.globals,
        };
        env.assign(ident, value).map_err(|err| match err {
            AssignError::Immutable => RuntimeError::ImmutableAssignment(ident.to_string()),
            AssignError::Undefined => RuntimeError::Name(ident.to_string()),
        })
    }
}

/// Expressions
impl<'a> Interpreter<'a> {
    fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.descend()?;
        let value = self.eval_expr_kind(expr);
        self.depth -= 1;
        value
    }

    /// Accounts for one more nested evaluation frame.
    fn descend(&mut self) -> Result<(), RuntimeError> {
        if self.depth >= self.config.max_eval_depth {
            return Err(RuntimeError::Recursion {
                kind: DepthKind::Evaluation,
                max: self.config.max_eval_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Null => Ok(Value::Null),
            Expr::Int(val) => Ok(Value::Int(*val)),
            Expr::Float(val) => Ok(Value::Float(*val)),
            Expr::String(val) => Ok(Value::String(val.clone())),
            Expr::Name(ident) => Ok(self.lookup(ident)?),
            Expr::Unary { op, operand } => {
                let operand = self.eval_expr(operand)?;
                Ok(ops::unary(*op, operand)?)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval_expr(lhs)?;
                let rhs = self.eval_expr(rhs)?;
                Ok(ops::binary(*op, &lhs, &rhs)?)
            }
            Expr::FuncCall { callee, args } => self.eval_call(callee, args),
        }
    }

    /// Reads a variable from the active call's environment, then from globals.
    fn lookup(&self, ident: &str) -> Result<Value, RuntimeError> {
        let local = self.call_stack.last().and_then(|env| env.get(ident));
        if let Some(value) = local.or_else(|| self.globals.get(ident)) {
            return Ok(value.clone());
        }

        if self.functions.contains_key(ident) || self.builtins.contains(ident) {
            Err(RuntimeError::Type(format!(
                "`{}` is a function, not a value",
                ident
            )))
        } else {
            Err(RuntimeError::Name(ident.to_string()))
        }
    }

    fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> EvalResult<Value> {
        let ident = match callee {
            Expr::Name(ident) => ident,
            callee => {
                let value = self.eval_expr(callee)?;
                return Err(RuntimeError::Type(format!(
                    "{} value is not callable",
                    value.type_name()
                ))
                .into());
            }
        };

        if let Some(func) = self.functions.get(ident).cloned() {
            let args = self.eval_args(args)?;
            return self.call_function(&func, args);
        }

        let builtins = self.builtins;
        if let Some(native) = builtins.get(ident) {
            let args = self.eval_args(args)?;
            return self.call_native(native, args);
        }

        if self.lookup(ident).is_ok() {
            Err(RuntimeError::Type(format!("`{}` is not a function", ident)).into())
        } else {
            Err(RuntimeError::Name(ident.to_string()).into())
        }
    }

    fn call_native(&mut self, native: &NativeFn, args: Vec<Value>) -> EvalResult<Value> {
        if !native.arity.contains(&args.len()) {
            return Err(RuntimeError::arity(&native.ident, &native.arity, args.len()).into());
        }

        tracing::debug!(ident = %native.ident, args = args.len(), "call native function");
        match (native.func)(&mut *self.out, &args) {
            Ok(value) => Ok(value),
            Err(NativeError::Exit(status)) => Err(Halt::Exit(status)),
            Err(NativeError::Type(message)) => Err(RuntimeError::Type(message).into()),
            Err(NativeError::Io(err)) => Err(RuntimeError::Io(err).into()),
        }
    }

    #[tracing::instrument(level = "debug", skip(self, func, args), fields(function = %func.ident))]
    fn call_function(&mut self, func: &FuncDecl, args: Vec<Value>) -> EvalResult<Value> {
        let (min, max) = func.arity();
        if args.len() < min || args.len() > max {
            return Err(RuntimeError::arity(&func.ident, &(min..=max), args.len()).into());
        }
        if self.call_stack.len() >= self.config.max_call_depth {
            return Err(RuntimeError::Recursion {
                kind: DepthKind::Call,
                max: self.config.max_call_depth,
            }
            .into());
        }
        self.descend()?;

        self.call_stack.push(Environment::new());
        let result = self.exec_function_body(func, args);
        self.call_stack.pop();
        self.depth -= 1;
        result
    }

    /// Binds parameters in the fresh call environment, then runs the body until the first `return`.
    fn exec_function_body(&mut self, func: &FuncDecl, args: Vec<Value>) -> EvalResult<Value> {
        let mut args = args.into_iter();

        for (param, value) in func.required_params.iter().zip(&mut args) {
            self.current_env().declare(param, value, Mutability::Mutable)?;
        }
        for param in &func.optional_params {
            // Defaults are evaluated in the call's environment, so they can see earlier parameters.
            let value = match args.next() {
                Some(value) => value,
                None => self.eval_expr(&param.default)?,
            };
            self.current_env()
                .declare(&param.ident, value, Mutability::Mutable)?;
        }

        for stmt in &func.body {
            if let Outcome::Returning(value) = self.exec_stmt(stmt)? {
                return Ok(value);
            }
        }
        Ok(Value::Null)
    }
}
