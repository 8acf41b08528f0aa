// Domain types and value objects
mod stock;

// Re-export commonly used types to the world
pub use stock::Stock;
