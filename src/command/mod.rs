//! Capture command lines built from options and a filter expression

pub mod assembler;

pub use assembler::CommandAssembler;
