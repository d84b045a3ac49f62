pub mod auth;
pub mod instructions;
pub mod labels;
pub mod middleware;
