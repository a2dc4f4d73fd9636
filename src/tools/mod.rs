//! Tool system
//!
//! Host functions are [`Tool`]s. A [`ToolRegistry`] collects them and installs them into a
//! global [`Environment`], where scripts call them like any other function.

#[cfg(feature = "stdlib")]
pub mod stdlib;

use crate::error::{Error, Result};
use crate::runtime::{Environment, NativeFunction, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Host function callable from scripts
pub trait Tool: Send + Sync {
    /// Name the tool is bound to in the environment
    fn name(&self) -> &str;

    /// One-line summary, logged when the tool is installed
    fn description(&self) -> &str;

    /// Execute the tool
    fn execute(&self, args: &[Value]) -> Result<Value>;

    /// Exact argument count, checked before `execute` runs
    fn arity(&self) -> Option<usize> {
        None // None means variadic
    }
}

/// Adapts a Rust closure into a [`Tool`]
///
/// ```rust
/// use lambda_script::tools::{FnTool, Tool};
/// use lambda_script::Value;
///
/// let negate = FnTool::new("negate", Some(1), |args| {
///     Ok(Value::Number(-args[0].as_number().unwrap_or(0.0)))
/// });
/// assert_eq!(negate.execute(&[Value::Number(2.0)]).unwrap(), Value::Number(-2.0));
/// ```
pub struct FnTool<F> {
    name: String,
    description: String,
    arity: Option<usize>,
    func: F,
}

impl<F> FnTool<F>
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync,
{
    /// Creates a tool; `arity` of `None` accepts any number of arguments
    pub fn new(name: impl Into<String>, arity: Option<usize>, func: F) -> Self {
        FnTool {
            name: name.into(),
            description: String::new(),
            arity,
            func,
        }
    }

    /// Sets the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl<F> Tool for FnTool<F>
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }

    fn arity(&self) -> Option<usize> {
        self.arity
    }
}

/// Tool registry
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create new registry with the standard library (when the `stdlib` feature is on)
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut registry = ToolRegistry::empty();

        #[cfg(feature = "stdlib")]
        stdlib::register_all(&mut registry);

        registry
    }

    /// Create empty registry
    pub fn empty() -> Self {
        ToolRegistry {
            tools: HashMap::new(),
        }
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Looks up a tool by name, failing with [`Error::UndefinedTool`]
    pub fn get(&self, name: &str) -> Result<Arc<dyn Tool>> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UndefinedTool {
                name: name.to_string(),
            })
    }

    /// Check if tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all tool names
    pub fn list_tools(&self) -> Vec<String> {
        let mut names: Vec<_> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get tool count
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Defines every registered tool in `env` as a builtin value
    pub fn install(&self, env: &Environment) {
        for (name, tool) in &self.tools {
            define(env, name, tool);
        }
        tracing::debug!(count = self.tools.len(), "installed tools");
    }

    /// Defines only the named tools in `env`
    ///
    /// Nothing is defined when any name is unregistered.
    pub fn install_only(&self, env: &Environment, names: &[&str]) -> Result<()> {
        let selected = names
            .iter()
            .map(|name| self.get(name).map(|tool| (*name, tool)))
            .collect::<Result<Vec<_>>>()?;

        for (name, tool) in &selected {
            define(env, name, tool);
        }
        tracing::debug!(count = selected.len(), "installed tools");
        Ok(())
    }
}

fn define(env: &Environment, name: &str, tool: &Arc<dyn Tool>) {
    tracing::trace!(tool = name, description = tool.description(), "installing tool");
    env.def(name, Value::Native(NativeFunction::new(Arc::clone(tool))));
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
