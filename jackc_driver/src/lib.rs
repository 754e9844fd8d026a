pub mod batch;
pub mod tokens;
