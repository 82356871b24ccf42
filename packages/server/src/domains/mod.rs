// Business domains
pub mod blog;
pub mod clients;
pub mod orders;
pub mod portfolio;
pub mod services;
