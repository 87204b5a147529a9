//! Packet-capture filter expressions and the command lines that carry them
//!
//! [`filter::ExpressionBuilder`] assembles `host`/`port`/`portrange`
//! expressions, [`command::CommandAssembler`] turns capture options and an
//! expression into a command line, and [`models::plan::CapturePlan`] ties the
//! two together from a JSON description.

pub mod command;
pub mod filter;
pub mod models;
pub mod utils;
