pub mod book;
pub mod game;
pub mod snapshot;

// Re-export main components
pub use book::*;
pub use game::*;
pub use snapshot::*;
