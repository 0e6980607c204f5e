pub mod core;


// Re-export the primary type so `crate::engine::Engine` works.
pub use self::core::Engine;
