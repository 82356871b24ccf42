pub mod order;

pub use order::{CreateOrder, Order, OrderStatus};
