pub mod cache;
pub mod market;
pub mod stock;
