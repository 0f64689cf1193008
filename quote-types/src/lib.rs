pub mod errors;
pub mod game;
pub mod quote;
pub mod user;

// Re-export all types
pub use errors::*;
pub use game::*;
pub use quote::*;
pub use user::*;
