//! Admin service models

pub mod product;
pub mod user;

// Re-export for convenience
pub use product::{Product, ProductInput};
pub use user::{NewUser, User};
