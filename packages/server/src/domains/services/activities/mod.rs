pub mod explain;

pub use explain::explain_service;
