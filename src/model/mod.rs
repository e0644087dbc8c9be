pub mod customer;
pub mod paging;

pub use customer::*;
pub use paging::*;
