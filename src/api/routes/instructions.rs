use actix_web::{get, http::header::ContentType, web, HttpResponse};
use uuid::Uuid;

use crate::{
    api::routes::middleware::CurrentUser,
    api::AppState,
    core::access::assert_rights_to_problem,
    domain::problem::{Problem, ProblemLabel},
    infrastructure::error::{not_found, AppResult},
};

/// Un identifiant mal formé est traité comme un problème inexistant
pub fn parse_problem_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| not_found("Problème"))
}

/// Page d'instructions d'un problème
#[get("/{problem_id}/instructions")]
pub async fn instructions(
    current_user: CurrentUser,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let problem_id = parse_problem_id(&path.into_inner())?;
    let user = current_user.into_inner();

    let problem = assert_rights_to_problem(&state.db, &user, &problem_id).await?;
    let labels = state.db.problems().labels(&problem.id).await?;

    tracing::debug!(user_id = %user.id, problem_id = %problem.id, "📖 Instructions consultées");

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(render_instructions(&problem, &labels)))
}

/// Rend la page: nom du problème, type de classification, labels dans
/// l'ordre d'affichage.
pub fn render_instructions(problem: &Problem, labels: &[ProblemLabel]) -> String {
    let mut ordered: Vec<&ProblemLabel> = labels.iter().collect();
    ordered.sort_by_key(|label| label.order_index);

    let items = ordered
        .iter()
        .map(|label| format!("    <li>{}</li>\n", escape_html(&label.label)))
        .collect::<String>();

    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{name}</title></head>\n<body>\n\
<h1>{name}</h1>\n<p>Classification: {kind}</p>\n<ol>\n{items}</ol>\n</body>\n</html>\n",
        name = escape_html(&problem.name),
        kind = problem.classification_type,
        items = items,
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
