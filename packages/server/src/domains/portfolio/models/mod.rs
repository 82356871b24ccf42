pub mod portfolio_item;

pub use portfolio_item::{NewPortfolioItem, PortfolioItem, PortfolioItemUpdate};
