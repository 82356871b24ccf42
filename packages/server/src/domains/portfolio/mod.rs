pub mod models;

pub use models::{NewPortfolioItem, PortfolioItem, PortfolioItemUpdate};
