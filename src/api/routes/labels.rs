use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    api::routes::{instructions::parse_problem_id, middleware::CurrentUser},
    api::AppState,
    core::access::assert_rights_to_problem,
    domain::label_event::NewLabelEvent,
    domain::problem::ProblemLabel,
    infrastructure::error::{not_found, validation_error, AppResult},
};

fn parse_dataset_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| not_found("Élément"))
}

/// Un label soumis doit appartenir au problème; `None` est toujours accepté
pub fn check_label(label: Option<&str>, labels: &[ProblemLabel]) -> AppResult<()> {
    match label {
        None => Ok(()),
        Some(value) if labels.iter().any(|l| l.label == value) => Ok(()),
        Some(value) => Err(validation_error(format!(
            "le label '{}' n'appartient pas à ce problème",
            value
        ))),
    }
}

/// Enregistre une annotation sur un élément
#[post("/{problem_id}/datasets/{dataset_id}/labels")]
pub async fn record_label(
    current_user: CurrentUser,
    path: web::Path<(String, String)>,
    payload: web::Json<NewLabelEvent>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let (raw_problem_id, raw_dataset_id) = path.into_inner();
    let problem_id = parse_problem_id(&raw_problem_id)?;
    let dataset_id = parse_dataset_id(&raw_dataset_id)?;
    let user = current_user.into_inner();

    let problem = assert_rights_to_problem(&state.db, &user, &problem_id).await?;
    let dataset = state
        .db
        .problems()
        .get_dataset(&problem.id, &dataset_id)
        .await?
        .ok_or_else(|| not_found("Élément"))?;

    let labels = state.db.problems().labels(&problem.id).await?;
    let label = payload.into_inner().label;
    check_label(label.as_deref(), &labels)?;

    let event = state
        .db
        .label_events()
        .record(&user.id, &dataset.id, label.as_deref())
        .await?;

    tracing::info!(
        user_id = %user.id,
        dataset_id = %dataset.id,
        "🏷️ Annotation enregistrée: {}",
        event.label.as_deref().unwrap_or("(aucun)")
    );

    Ok(HttpResponse::Created().json(event))
}

/// Historique des annotations de l'utilisateur courant sur un élément
#[get("/{problem_id}/datasets/{dataset_id}/labels")]
pub async fn list_labels(
    current_user: CurrentUser,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let (raw_problem_id, raw_dataset_id) = path.into_inner();
    let problem_id = parse_problem_id(&raw_problem_id)?;
    let dataset_id = parse_dataset_id(&raw_dataset_id)?;
    let user = current_user.into_inner();

    let problem = assert_rights_to_problem(&state.db, &user, &problem_id).await?;
    let dataset = state
        .db
        .problems()
        .get_dataset(&problem.id, &dataset_id)
        .await?
        .ok_or_else(|| not_found("Élément"))?;

    let events = state
        .db
        .label_events()
        .list_for_dataset(&user.id, &dataset.id)
        .await?;

    Ok(HttpResponse::Ok().json(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::error::AppError;

    fn labels() -> Vec<ProblemLabel> {
        let problem_id = Uuid::new_v4();
        ["Risk", "Control", "Neither"]
            .iter()
            .enumerate()
            .map(|(i, text)| ProblemLabel {
                id: Uuid::new_v4(),
                problem_id,
                label: text.to_string(),
                order_index: i as i32 + 1,
            })
            .collect()
    }

    #[test]
    fn known_label_is_accepted() {
        assert!(check_label(Some("Control"), &labels()).is_ok());
    }

    #[test]
    fn explicit_no_label_is_accepted() {
        assert!(check_label(None, &labels()).is_ok());
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = check_label(Some("control"), &labels()).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
