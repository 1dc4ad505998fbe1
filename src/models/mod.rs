//! Domain data models for the admiralty board.

pub mod assignment;
pub mod board;
pub mod campaign;
pub mod ship;

pub use assignment::Assignment;
pub use board::BoardState;
pub use campaign::Campaign;
pub use ship::Ship;
