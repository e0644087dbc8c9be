pub mod customer;

pub use customer::CustomerService;
