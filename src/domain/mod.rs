//! # Domain Models Module
//!
//! Ce module contient les entités métier de l'outil d'annotation.
//! Elles sont partagées par les commandes CLI, les repositories et l'API.
//!
//! ## Structure
//! - `user.rs`: utilisateurs (annotateurs et super-utilisateurs)
//! - `problem.rs`: problèmes de classification, labels et droits d'accès
//! - `dataset.rs`: éléments textuels à annoter
//! - `label_event.rs`: historique des annotations
//!
//! ## Conventions
//! - Les identifiants utilisent `uuid::Uuid`
//! - Les timestamps utilisent `chrono::DateTime<chrono::Utc>`
//! - Les hash de mots de passe ne sont jamais sérialisés

pub mod user;
pub mod problem;
pub mod dataset;
pub mod label_event;

// Ré-export des types principaux pour une utilisation facile
pub use user::{NewUser, User, UserLogin};
pub use problem::{ClassificationType, NewProblem, NewProblemLabel, Problem, ProblemLabel, UserProblem};
pub use dataset::{Dataset, ExtractedItem};
pub use label_event::{LabelEvent, NewLabelEvent};
