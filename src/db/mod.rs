mod migrate;
mod store;

pub use migrate::migrate;
pub use store::PgSaveStore;
