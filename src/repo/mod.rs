pub mod customer;
pub mod todo;

pub use customer::*;
pub use todo::*;
