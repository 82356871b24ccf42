pub mod submit_order;

pub use submit_order::{admin_message, submit_order, OrderError};
