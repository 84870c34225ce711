pub mod fallback;
pub mod subscribers;
