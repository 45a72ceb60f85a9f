pub mod generation;
pub mod upload;
pub mod validation;
