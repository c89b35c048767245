//! Expression evaluation against live page scope: dotted-path lookup,
//! the restricted condition language, and the JSON coercion rules they
//! share.

pub mod condition;
pub mod path;
pub mod type_coercion;

pub use condition::{
    evaluate_condition, evaluate_expr, evaluate_value, parse_condition, ConditionError,
    ConditionExpr, Operand,
};
pub use path::{PathError, Scope};
pub use type_coercion::{is_truthy, loosely_equal, value_to_f64, value_to_string};
