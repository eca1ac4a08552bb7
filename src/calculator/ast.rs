//! Syntax tree for calculator expressions.
//!
//! The tree can only represent the permitted constructs: number literals,
//! the arithmetic operators and calls to the built-in functions. Anything
//! else is rejected while parsing, so the evaluator never sees it.

use std::fmt;

/// Binary arithmetic operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Unary sign operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Pos,
}

/// Built-in single-argument functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sqrt,
    Log,
    Ln,
    Exp,
    Abs,
    Sin,
    Cos,
    Tan,
}

impl Function {
    /// Look up a function by the name used in expressions.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "sqrt" => Self::Sqrt,
            "log" => Self::Log,
            "ln" => Self::Ln,
            "exp" => Self::Exp,
            "abs" => Self::Abs,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Log => "log",
            Self::Ln => "ln",
            Self::Exp => "exp",
            Self::Abs => "abs",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
        }
    }
}

/// A parsed expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        function: Function,
        argument: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Self::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn call(function: Function, argument: Expr) -> Self {
        Self::Call {
            function,
            argument: Box::new(argument),
        }
    }

    /// Nodes this variant stands for in a conventional expression AST,
    /// children excluded: a literal is one node, an operation carries a
    /// separate operator node, and a call carries the callee name and its
    /// load context.
    pub fn own_weight(&self) -> usize {
        match self {
            Self::Number(_) => 1,
            Self::Binary { .. } | Self::Unary { .. } => 2,
            Self::Call { .. } => 3,
        }
    }

    /// Node count of a whole expression with this tree as its body,
    /// including the enclosing expression root.
    pub fn node_count(&self) -> usize {
        1 + self.weight()
    }

    fn weight(&self) -> usize {
        self.own_weight()
            + match self {
                Self::Number(_) => 0,
                Self::Binary { left, right, .. } => left.weight() + right.weight(),
                Self::Unary { operand, .. } => operand.weight(),
                Self::Call { argument, .. } => argument.weight(),
            }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "**",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Neg => "-",
            Self::Pos => "+",
        })
    }
}

/// Fully parenthesized rendering, used in debug logs.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Binary { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Self::Unary { op, operand } => write!(f, "({}{})", op, operand),
            Self::Call { function, argument } => write!(f, "{}({})", function.name(), argument),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names_round_trip() {
        for name in ["sqrt", "log", "ln", "exp", "abs", "sin", "cos", "tan"] {
            let function = Function::from_name(name).unwrap();
            assert_eq!(function.name(), name);
        }
        assert_eq!(Function::from_name("pow"), None);
        assert_eq!(Function::from_name("SQRT"), None);
    }

    #[test]
    fn test_node_count() {
        let expr = Expr::binary(
            BinaryOp::Add,
            Expr::Number(1.0),
            Expr::call(Function::Sqrt, Expr::unary(UnaryOp::Neg, Expr::Number(4.0))),
        );
        // Root, add + operator, 1, call + name + context, negation + operator, 4.
        assert_eq!(expr.node_count(), 10);
        assert_eq!(Expr::Number(3.0).node_count(), 2);
        assert_eq!(Expr::Number(3.0).own_weight(), 1);
    }

    #[test]
    fn test_display() {
        let expr = Expr::binary(
            BinaryOp::Pow,
            Expr::unary(UnaryOp::Neg, Expr::Number(2.0)),
            Expr::Number(0.5),
        );
        assert_eq!(expr.to_string(), "((-2) ** 0.5)");
    }
}
