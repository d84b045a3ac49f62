pub mod database;
pub mod sources;
pub mod error;

pub use database::Database;
pub use sources::{FileSource, HttpSource, StaticSource, TextSource};
