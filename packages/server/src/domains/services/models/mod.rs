pub mod service;

pub use service::{NewService, Service, ServiceDeletion, ServiceUpdate};
