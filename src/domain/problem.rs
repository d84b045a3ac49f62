use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::infrastructure::error::{validation_error, AppResult};

/// Type de classification d'un problème
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationType {
    Binary,
    MultiLabel,
    MultiClass,
}

impl Default for ClassificationType {
    fn default() -> Self {
        ClassificationType::Binary
    }
}

impl ClassificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationType::Binary => "binary",
            ClassificationType::MultiLabel => "multi-label",
            ClassificationType::MultiClass => "multi-class",
        }
    }
}

impl fmt::Display for ClassificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "binary" => Ok(ClassificationType::Binary),
            "multi-label" => Ok(ClassificationType::MultiLabel),
            "multi-class" => Ok(ClassificationType::MultiClass),
            other => Err(format!("type de classification inconnu: {}", other)),
        }
    }
}

/// Un problème de classification
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Problem {
    pub id: Uuid,
    pub name: String,
    pub classification_type: ClassificationType,
    pub created_at: DateTime<Utc>,
}

/// Un choix de label appartenant à un problème
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProblemLabel {
    pub id: Uuid,
    pub problem_id: Uuid,
    pub label: String,
    /// Ordre d'affichage, unique par problème
    pub order_index: i32,
}

/// Droit d'un utilisateur à annoter un problème
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProblem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub problem_id: Uuid,
}

/// Label à créer avec un nouveau problème
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProblemLabel {
    pub label: String,
    pub order_index: i32,
}

impl NewProblemLabel {
    pub fn new(label: impl Into<String>, order_index: i32) -> Self {
        Self {
            label: label.into(),
            order_index,
        }
    }
}

/// Problème à créer, avec son jeu de labels
#[derive(Debug, Clone)]
pub struct NewProblem {
    pub name: String,
    pub classification_type: ClassificationType,
    pub labels: Vec<NewProblemLabel>,
}

impl NewProblem {
    /// Construit un problème dont les labels sont numérotés à partir de 1,
    /// dans l'ordre donné.
    pub fn with_labels(
        name: impl Into<String>,
        classification_type: ClassificationType,
        labels: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            classification_type,
            labels: labels
                .iter()
                .zip(1..)
                .map(|(label, order_index)| NewProblemLabel::new(*label, order_index))
                .collect(),
        }
    }

    /// Vérifie que le problème est enregistrable: nom non vide, au moins un
    /// label, labels non vides et `order_index` uniques.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(validation_error("Le nom du problème est vide"));
        }
        if self.labels.is_empty() {
            return Err(validation_error(format!(
                "Le problème '{}' n'a aucun label",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for label in &self.labels {
            if label.label.trim().is_empty() {
                return Err(validation_error(format!(
                    "Label vide dans le problème '{}'",
                    self.name
                )));
            }
            if !seen.insert(label.order_index) {
                return Err(validation_error(format!(
                    "order_index {} dupliqué dans le problème '{}'",
                    label.order_index, self.name
                )));
            }
        }

        Ok(())
    }
}
