use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use crate::lexer::Operator;

/// Abstract syntax tree node
///
/// Produced once by the parser and read-only afterwards. Lambda bodies sit behind an
/// `Rc` so every closure created from the node shares the same body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Numeric literal
    Number(f64),
    /// String literal
    String(String),
    /// `true` / `false`
    Boolean(bool),
    /// Variable reference
    Identifier(String),
    /// `target = value`
    ///
    /// The parser accepts any expression as the target; the evaluator rejects
    /// everything except an [`Node::Identifier`].
    Assignment {
        /// Left of `=`
        target: Box<Node>,
        /// Right of `=`
        value: Box<Node>,
    },
    /// Binary operator application
    BinaryOp {
        /// Operator
        operator: Operator,
        /// Left operand
        left: Box<Node>,
        /// Right operand
        right: Box<Node>,
    },
    /// `if cond then a else b`
    Conditional {
        /// Condition expression
        condition: Box<Node>,
        /// Evaluated when the condition is truthy
        then_branch: Box<Node>,
        /// Evaluated otherwise, if present
        else_branch: Option<Box<Node>>,
    },
    /// `lambda(a, b) body`
    Lambda {
        /// Parameter names in order
        params: Vec<String>,
        /// Function body
        body: Rc<Node>,
    },
    /// `callee(arg, ...)`
    Call {
        /// Expression producing the function
        callee: Box<Node>,
        /// Arguments in order
        arguments: Vec<Node>,
    },
    /// Program or block: statements evaluated in order
    Sequence(Vec<Node>),
}

impl Node {
    /// Creates an identifier node
    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Identifier(name.into())
    }

    /// Creates a string literal node
    pub fn string(value: impl Into<String>) -> Self {
        Node::String(value.into())
    }

    /// Creates an assignment node
    pub fn assignment(target: Node, value: Node) -> Self {
        Node::Assignment {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    /// Creates a binary operator node
    pub fn binary(operator: Operator, left: Node, right: Node) -> Self {
        Node::BinaryOp {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a conditional node
    pub fn conditional(condition: Node, then_branch: Node, else_branch: Option<Node>) -> Self {
        Node::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }

    /// Creates a lambda node
    pub fn lambda(params: Vec<String>, body: Node) -> Self {
        Node::Lambda {
            params,
            body: Rc::new(body),
        }
    }

    /// Creates a call node
    pub fn call(callee: Node, arguments: Vec<Node>) -> Self {
        Node::Call {
            callee: Box::new(callee),
            arguments,
        }
    }

    /// Variant name, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Boolean(_) => "boolean",
            Node::Identifier(_) => "identifier",
            Node::Assignment { .. } => "assignment",
            Node::BinaryOp { .. } => "binary expression",
            Node::Conditional { .. } => "conditional",
            Node::Lambda { .. } => "lambda",
            Node::Call { .. } => "call",
            Node::Sequence(_) => "sequence",
        }
    }
}

/// Renders source text that parses back to the same tree
///
/// Lambdas and conditionals are parenthesized so a trailing operator or `else` cannot
/// extend them, and a call used as a callee is parenthesized because only two call
/// suffixes may follow an atom.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            // The lexer has no exponent syntax; an overflowing literal reads back as infinity
            Node::Number(n) if n.is_infinite() => write!(f, "1{}", "0".repeat(309)),
            Node::Number(n) => write!(f, "{}", n),
            Node::String(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    if c == '"' || c == '\\' {
                        write!(f, "\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                write!(f, "\"")
            }
            Node::Boolean(b) => write!(f, "{}", b),
            Node::Identifier(name) => write!(f, "{}", name),
            Node::Assignment { target, value } => write!(f, "({} = {})", target, value),
            Node::BinaryOp {
                operator,
                left,
                right,
            } => write!(f, "({} {} {})", left, operator, right),
            Node::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "(if {} then {}", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {}", else_branch)?;
                }
                write!(f, ")")
            }
            Node::Lambda { params, body } => {
                write!(f, "(lambda({}) {})", params.join(", "), body)
            }
            Node::Call { callee, arguments } => {
                match callee.as_ref() {
                    Node::Call { .. } => write!(f, "({})(", callee)?,
                    _ => write!(f, "{}(", callee)?,
                }
                for (i, arg) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Node::Sequence(statements) => {
                write!(f, "{{")?;
                for (i, stmt) in statements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ";")?;
                    }
                    write!(f, " {}", stmt)?;
                }
                write!(f, " }}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_binary_operands() {
        let node = Node::binary(
            Operator::Plus,
            Node::Number(1.0),
            Node::binary(Operator::Star, Node::Number(2.0), Node::Number(3.0)),
        );
        assert_eq!(node.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn test_display_lambda_and_call() {
        let node = Node::call(
            Node::lambda(
                vec!["x".to_string()],
                Node::binary(Operator::Plus, Node::identifier("x"), Node::Number(1.0)),
            ),
            vec![Node::Number(2.0)],
        );
        assert_eq!(node.to_string(), "(lambda(x) (x + 1))(2)");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Node::Sequence(vec![]).kind_name(), "sequence");
        assert_eq!(Node::Number(1.0).kind_name(), "number");
        assert_eq!(
            Node::conditional(Node::Boolean(true), Node::Number(1.0), None).kind_name(),
            "conditional"
        );
    }

    #[test]
    fn test_display_escapes_only_quote_and_backslash() {
        let node = Node::string("say \"hi\"\n\\");
        assert_eq!(node.to_string(), "\"say \\\"hi\\\"\n\\\\\"");
    }

    #[test]
    fn test_display_parenthesizes_nested_callee() {
        let inner = Node::call(Node::identifier("f"), vec![]);
        let node = Node::call(inner, vec![Node::Number(1.0)]);
        assert_eq!(node.to_string(), "(f())(1)");
    }

    #[test]
    fn test_display_conditional() {
        let node = Node::conditional(
            Node::identifier("a"),
            Node::Number(1.0),
            Some(Node::Number(2.0)),
        );
        assert_eq!(node.to_string(), "(if a then 1 else 2)");
        assert_eq!(
            Node::conditional(Node::Boolean(true), Node::string("x"), None).to_string(),
            "(if true then \"x\")"
        );
    }
}
