mod handler;
mod router;
mod types;

pub use router::get_router;
