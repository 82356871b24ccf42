pub mod models;

pub use models::Client;
