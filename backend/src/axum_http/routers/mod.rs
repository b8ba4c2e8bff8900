pub mod admin;
pub mod adoptions;
pub mod catalog;
pub mod payments;
