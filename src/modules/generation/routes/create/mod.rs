mod handler;
mod router;
mod service;
mod types;

pub use router::get_router;

#[cfg(test)]
mod tests;
