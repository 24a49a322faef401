pub mod memory;

pub use memory::InMemoryUserCache;
