pub mod adoptions;
pub mod catalog;
pub mod enums;
pub mod growth;
pub mod payments;
pub mod plants;
pub mod references;
