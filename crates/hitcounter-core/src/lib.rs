pub mod db;
pub mod error;
pub mod greeting;
pub mod history;
pub mod memory;
pub mod model;
pub mod params;
pub mod store;

pub use db::DynamoStore;
pub use error::CoreError;
pub use memory::MemoryStore;
pub use model::{HitKey, HitRecord};
pub use params::{Params, ParamsError};
pub use store::HitStore;
