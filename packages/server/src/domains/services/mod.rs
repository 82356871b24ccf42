pub mod activities;
pub mod models;

pub use models::{NewService, Service, ServiceDeletion, ServiceUpdate};
