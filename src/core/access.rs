// core/access.rs
use uuid::Uuid;

use crate::{
    domain::problem::Problem,
    domain::user::User,
    infrastructure::database::Database,
    infrastructure::error::{forbidden, not_found, AppResult},
};

/// Un utilisateur peut voir un problème s'il est super-utilisateur ou s'il
/// possède un droit explicite dessus.
pub fn authorize(user: &User, has_grant: bool) -> AppResult<()> {
    if user.is_superuser || has_grant {
        Ok(())
    } else {
        Err(forbidden(format!(
            "l'utilisateur '{}' n'a pas accès à ce problème",
            user.username
        )))
    }
}

/// Charge le problème puis vérifie les droits de l'utilisateur.
/// Un problème inexistant donne toujours `NotFound`, jamais `Forbidden`.
pub async fn assert_rights_to_problem(
    db: &Database,
    user: &User,
    problem_id: &Uuid,
) -> AppResult<Problem> {
    let problem = db
        .problems()
        .get_by_id(problem_id)
        .await?
        .ok_or_else(|| not_found("Problème"))?;

    let has_grant = if user.is_superuser {
        true
    } else {
        db.users().has_grant(&user.id, &problem.id).await?
    };

    authorize(user, has_grant)?;
    Ok(problem)
}
