// src/lib.rs
// Modules principaux
pub mod api;
pub mod cli;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod utils;

// Ré-exports pour faciliter l'utilisation
pub use api::AppState;
pub use infrastructure::database::Database;
pub use infrastructure::error::{AppError, AppResult};
pub use utils::config::Config;

// Version de l'application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "Annotator";
