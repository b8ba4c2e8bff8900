pub mod adoptions;
pub mod bamboo_plants;
pub mod environmental_data;
pub mod growth_records;
pub mod locations;
pub mod packages;
pub mod payments;
pub mod users;
