use std::fmt::{self, Display, Formatter};

use scanner::{LiteralValue, Token};

/// Expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Literal(LiteralValue<'a>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
    Ternary { condition: Box<Expr<'a>>, if_true: Box<Expr<'a>>, if_false: Box<Expr<'a>> },
}

/// Fully parenthesized prefix form, e.g. `(* (group (+ 1 2)) 3)`.
impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Binary { left, operator, right } => {
                write!(f, "({} {} {})", operator.lexeme, left, right)
            }
            Expr::Grouping(expression) => {
                write!(f, "(group {})", expression)
            }
            Expr::Literal(value) => {
                write!(f, "{}", value)
            }
            Expr::Unary { operator, right } => {
                write!(f, "({} {})", operator.lexeme, right)
            }
            Expr::Ternary { condition, if_true, if_false } => {
                write!(f, "(if {} {} {})", condition, if_true, if_false)
            }
        }
    }
}
