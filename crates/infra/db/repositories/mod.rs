pub mod adoptions;
pub mod locations;
pub mod packages;
pub mod payments;
pub mod plants;
pub mod users;
