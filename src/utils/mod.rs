// utils/mod.rs
pub mod config;
pub mod security;

// Ré-exports pour faciliter l'import
pub use config::Config;
pub use security::{
    generate_session_token, verify_session_token,
    hash_password, verify_password,
    SessionClaims,
};
