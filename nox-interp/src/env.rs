//! Variable bindings for one scope.

use crate::RuntimeError;
use nox_value::Value;
use std::collections::HashMap;

/// Whether a variable binding can be reassigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mutability {
    /// Binding can be reassigned (`var x = ...`).
    Mutable,
    /// Binding cannot be reassigned (`const x = ...`).
    Immutable,
}

/// Error returned by [`Environment::assign`] when assignment fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignError {
    /// Variable exists but is immutable.
    Immutable,
    /// Variable not found in this scope.
    Undefined,
}

#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    mutability: Mutability,
}

/// Maps identifiers to values. The interpreter keeps one for globals and one per active call.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `ident`. Fails if the name is already bound in this scope.
    pub fn declare(
        &mut self,
        ident: &str,
        value: Value,
        mutability: Mutability,
    ) -> Result<(), RuntimeError> {
        if self.bindings.contains_key(ident) {
            return Err(RuntimeError::DuplicateDeclaration(ident.to_string()));
        }
        self.bindings
            .insert(ident.to_string(), Binding { value, mutability });
        Ok(())
    }

    pub fn get(&self, ident: &str) -> Option<&Value> {
        self.bindings.get(ident).map(|binding| &binding.value)
    }

    pub fn contains(&self, ident: &str) -> bool {
        self.bindings.contains_key(ident)
    }

    /// Updates an existing mutable binding in place.
    pub fn assign(&mut self, ident: &str, value: Value) -> Result<(), AssignError> {
        match self.bindings.get_mut(ident) {
            Some(binding) if binding.mutability == Mutability::Mutable => {
                binding.value = value;
                Ok(())
            }
            Some(_) => Err(AssignError::Immutable),
            None => Err(AssignError::Undefined),
        }
    }
}
