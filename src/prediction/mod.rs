pub mod assembler;
pub mod engine;
pub mod error;
pub mod export;
