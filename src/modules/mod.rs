pub mod generation;
pub mod health;

mod router;
pub use router::get_router;
