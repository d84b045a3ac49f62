pub mod schema;
pub mod lifecycle;
pub mod users;
pub mod problems;
pub mod label_events;

pub use users::UserRepository;
pub use problems::ProblemRepository;
pub use label_events::LabelEventRepository;

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::infrastructure::error::AppResult;

/// Gestion de la connexion à la base de données
#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    /// Crée une nouvelle connexion à la base de données
    pub async fn new(database_url: &str, max_connections: u32) -> AppResult<Self> {
        info!("🔌 Connexion à la base de données PostgreSQL...");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await?;
        info!("✅ Connexion établie avec succès");

        Ok(Self { pool })
    }

    /// Création à partir d'un pool existant (tests, commandes composées)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Pool qui ne se connecte qu'à la première requête
    pub fn new_lazy(database_url: &str) -> AppResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    pub fn problems(&self) -> ProblemRepository {
        ProblemRepository::new(self.pool.clone())
    }

    pub fn label_events(&self) -> LabelEventRepository {
        LabelEventRepository::new(self.pool.clone())
    }
}
