use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Lexical scope handle
///
/// Cloning an `Environment` clones the handle, not the scope: every clone sees the same
/// bindings, which is how closures share the scope they captured. A closure stored in the
/// very scope it captured forms a reference cycle that is never reclaimed.
#[derive(Clone)]
pub struct Environment {
    scope: Rc<RefCell<Scope>>,
}

/// Single scope in the chain
struct Scope {
    /// Variables defined in this scope
    variables: HashMap<String, Value>,
    /// Enclosing scope (None for the global scope)
    parent: Option<Environment>,
}

impl Environment {
    /// Creates a new global scope
    pub fn new() -> Self {
        Environment {
            scope: Rc::new(RefCell::new(Scope {
                variables: HashMap::new(),
                parent: None,
            })),
        }
    }

    /// Creates a child scope whose parent is `self`
    pub fn extend(&self) -> Environment {
        Environment {
            scope: Rc::new(RefCell::new(Scope {
                variables: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Reads a variable, walking outward through enclosing scopes
    pub fn get(&self, name: &str) -> Result<Value> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.scope.borrow();
            if let Some(value) = scope.variables.get(name) {
                return Ok(value.clone());
            }
            current = scope.parent.clone();
        }

        Err(Error::UndefinedVariable {
            name: name.to_string(),
        })
    }

    /// Assigns to an existing variable in the scope that defines it
    ///
    /// Fails with [`Error::UndefinedVariable`] when no scope defines `name`, unless
    /// `self` is the global scope, where the assignment creates the binding.
    pub fn set(&self, name: &str, value: Value) -> Result<Value> {
        let target = match self.lookup(name) {
            Some(env) => env,
            None if self.is_root() => self.clone(),
            None => {
                return Err(Error::UndefinedVariable {
                    name: name.to_string(),
                })
            }
        };

        tracing::trace!(name, depth = target.depth(), "set variable");
        target
            .scope
            .borrow_mut()
            .variables
            .insert(name.to_string(), value.clone());
        Ok(value)
    }

    /// Defines a variable in this scope, shadowing any outer binding
    pub fn def(&self, name: &str, value: Value) -> Value {
        tracing::trace!(name, depth = self.depth(), "define variable");
        self.scope
            .borrow_mut()
            .variables
            .insert(name.to_string(), value.clone());
        value
    }

    /// True for the global scope
    pub fn is_root(&self) -> bool {
        self.scope.borrow().parent.is_none()
    }

    /// Checks if a variable is visible from this scope
    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Number of scopes in the chain (1 for the global scope)
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.scope.borrow().parent.clone();
        while let Some(env) = current {
            depth += 1;
            current = env.scope.borrow().parent.clone();
        }
        depth
    }

    /// Sorted names of every variable visible from this scope
    pub fn names(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.scope.borrow();
            names.extend(scope.variables.keys().cloned());
            current = scope.parent.clone();
        }
        names.into_iter().collect()
    }

    /// Innermost scope defining `name`
    fn lookup(&self, name: &str) -> Option<Environment> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.scope.borrow();
            if scope.variables.contains_key(name) {
                return Some(env.clone());
            }
            current = scope.parent.clone();
        }
        None
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

// Values may hold closures that capture this scope, so bindings are listed by name only
impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let scope = self.scope.borrow();
        let mut names: Vec<_> = scope.variables.keys().collect();
        names.sort();
        f.debug_struct("Environment")
            .field("variables", &names)
            .field("depth", &self.depth())
            .finish()
    }
}
