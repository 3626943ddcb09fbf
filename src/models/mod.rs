// Core data models for Dealtrack
// These structs represent the domain entities

pub mod customer;
pub mod stage;
pub mod todo;

pub use customer::*;
pub use stage::*;
pub use todo::*;
