//! Capture filter expressions
//!
//! Builds expressions out of `host`, `port` and `portrange` primitives joined
//! with `and`/`or`/`not` and parentheses.

pub mod builder;
#[cfg(feature = "libpcap")]
pub mod compile;
pub mod operator;
pub mod validator;

pub use builder::ExpressionBuilder;
pub use operator::Operator;
pub use validator::Validation;
