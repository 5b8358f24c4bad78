pub mod factory;
pub mod providers;
