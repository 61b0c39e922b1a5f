pub mod db;
pub mod normalizer;

// Re-export all from each module namespace
pub use db::*;
pub use normalizer::*;
