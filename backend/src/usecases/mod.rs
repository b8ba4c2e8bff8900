pub mod adoptions;
pub mod catalog;
pub mod growth;
pub mod payments;
pub mod reconciliation;
pub mod reference_resolver;
pub mod registry;

#[cfg(test)]
mod in_memory;
#[cfg(test)]
mod scenarios;
