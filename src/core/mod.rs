// core/mod.rs
pub mod access;
pub mod import;
pub mod provisioning;

// Ré-exports pour faciliter l'import
pub use access::{assert_rights_to_problem, authorize};
pub use import::{persist_batches, ImportBatch, ImportReport};
pub use provisioning::{add_user, create_standard_user};
