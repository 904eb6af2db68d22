pub mod connection;
pub mod models;
pub mod prices;

pub use connection::DbClient;
pub use models::{PriceQuery, PriceRecord};
