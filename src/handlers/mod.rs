//! HTTP handlers for the API root, customer CRUD and customer search.

pub mod customer;
pub mod root;
pub mod search;
