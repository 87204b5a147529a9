pub mod options;
pub mod plan;
