pub mod check;
pub mod patterns;
pub mod resolve;
