// Middleware shared by the media endpoints

pub mod cors;

pub use cors::*;
