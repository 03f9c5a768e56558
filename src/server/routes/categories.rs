use std::collections::BTreeMap;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::queries::{categories, questions};
use crate::db::Question;
use crate::server::app::AppState;

use super::{ApiError, ApiResponse};

#[derive(Serialize)]
struct CategoriesReply {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsReply {
    success: bool,
    questions: Vec<Question>,
    question_num: usize,
    current_category_name: String,
    current_category: i64,
}

// the id-to-type map shared by the category and question listings; an empty
// category table is a not-found condition for both
pub(super) async fn category_map(pool: &SqlitePool) -> Result<BTreeMap<i64, String>, ApiError> {
    let categories = categories::get_categories(pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(categories.into_iter().map(|c| (c.id, c.kind)).collect())
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesReply> {
    let categories = category_map(&pool).await?;
    Ok(Json(CategoriesReply {
        success: true,
        categories,
    }))
}

// the category id segment is strictly typed, but a segment that is not an
// integer has to look like a missing resource, not a malformed request
async fn category_questions(
    State(pool): State<SqlitePool>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResponse<CategoryQuestionsReply> {
    let Path(category_id) = path.map_err(|_| ApiError::NotFound)?;
    let questions = questions::get_questions_for_category(&pool, category_id)
        .await
        .map_err(|_| ApiError::NotFound)?;
    let category = categories::get_category(&pool, category_id)
        .await
        .map_err(|_| ApiError::NotFound)?;

    Ok(Json(CategoryQuestionsReply {
        success: true,
        question_num: questions.len(),
        questions,
        current_category_name: category.kind,
        current_category: category_id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{category_id}/questions", get(category_questions))
        .with_state(state)
}
