pub mod growth_stages;
pub mod package_periods;
pub mod payment_statuses;
pub mod plant_statuses;
