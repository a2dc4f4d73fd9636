//! Console output

use crate::error::Result;
use crate::runtime::Value;
use crate::tools::{Tool, ToolRegistry};

/// `print(a, b, ...)` - writes its arguments space-separated, then a newline, to stdout
///
/// Returns the first argument so calls can be nested inside expressions, or `false`
/// when called with none.
pub struct PrintTool;

impl Tool for PrintTool {
    fn name(&self) -> &str {
        "print"
    }

    fn description(&self) -> &str {
        "Print values with newline to stdout"
    }

    fn execute(&self, args: &[Value]) -> Result<Value> {
        println!("{}", render_line(args));
        Ok(args.first().cloned().unwrap_or(Value::FALSE))
    }
}

/// Joins display forms with single spaces
fn render_line(args: &[Value]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Register console tools
pub fn register(registry: &mut ToolRegistry) {
    registry.register(PrintTool);
}
