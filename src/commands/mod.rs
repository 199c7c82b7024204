pub mod crawl;
pub mod schedule;

// Re-export command functions for convenience
pub use crawl::crawl;
pub use schedule::schedule;
