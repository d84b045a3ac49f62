// core/provisioning.rs
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::{
    domain::problem::UserProblem,
    domain::user::{NewUser, User},
    infrastructure::database::{ProblemRepository, UserRepository},
    infrastructure::error::{not_found, AppResult},
};

/// `add-user`: crée un super-utilisateur
pub async fn add_user(pool: &PgPool, username: &str, password: &str) -> AppResult<User> {
    let user = UserRepository::new(pool.clone())
        .create(&NewUser::superuser(username, password))
        .await?;

    info!(user_id = %user.id, "👤 Super-utilisateur '{}' créé", user.username);
    Ok(user)
}

/// `create-standard-user`: crée un utilisateur normal et lui attribue les
/// problèmes donnés. Tout est annulé si l'un des problèmes n'existe pas.
pub async fn create_standard_user(
    pool: &PgPool,
    username: &str,
    password: &str,
    problem_ids: &[Uuid],
) -> AppResult<(User, Vec<UserProblem>)> {
    let mut tx = pool.begin().await?;

    let user = UserRepository::insert(&mut tx, &NewUser::standard(username, password)).await?;

    let mut grants = Vec::with_capacity(problem_ids.len());
    for problem_id in problem_ids {
        if !ProblemRepository::exists(&mut tx, problem_id).await? {
            return Err(not_found(format!("Problème {}", problem_id)));
        }
        if grants.iter().any(|g: &UserProblem| g.problem_id == *problem_id) {
            continue;
        }
        grants.push(UserRepository::grant_problem(&mut tx, &user.id, problem_id).await?);
    }

    tx.commit().await?;

    info!(
        user_id = %user.id,
        grants = grants.len(),
        "👤 Utilisateur '{}' créé",
        user.username
    );
    Ok((user, grants))
}
