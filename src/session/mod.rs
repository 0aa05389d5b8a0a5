pub mod error;
pub mod identity;
pub mod machine;
pub mod state;
