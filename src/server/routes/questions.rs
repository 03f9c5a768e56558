use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::db::queries::questions;
use crate::db::Question;
use crate::server::app::AppState;
use crate::server::deserializers::deserialize_lenient_u32;

use super::categories::category_map;
use super::{ApiError, ApiResponse};

const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Deserialize)]
struct ListParams {
    #[serde(default, deserialize_with = "deserialize_lenient_u32")]
    page: Option<u32>,
}

// category and difficulty are sent as numbers by some clients and as numeric
// strings by others, so both are accepted
#[derive(Deserialize)]
struct NewQuestion {
    question: Option<String>,
    answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    difficulty: Option<i64>,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionListReply {
    success: bool,
    questions: Vec<Question>,
    question_num: usize,
    categories: BTreeMap<i64, String>,
    current_category: Option<i64>,
}

#[derive(Serialize)]
struct CreatedReply {
    success: bool,
    created: i64,
}

#[derive(Serialize)]
struct DeletedReply {
    success: bool,
    deleted: String,
}

#[derive(Serialize)]
struct SearchReply {
    success: bool,
    questions: Vec<Question>,
    question_num: usize,
}

fn paginate(questions: &[Question], page: u32) -> Vec<Question> {
    let page = page.max(1) as usize;
    let start = (page - 1).saturating_mul(QUESTIONS_PER_PAGE);
    questions
        .iter()
        .skip(start)
        .take(QUESTIONS_PER_PAGE)
        .cloned()
        .collect()
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    Query(params): Query<ListParams>,
) -> ApiResponse<QuestionListReply> {
    let all = questions::get_questions(&pool).await?;
    let current = paginate(&all, params.page.unwrap_or(1));
    let categories = category_map(&pool).await?;

    Ok(Json(QuestionListReply {
        success: true,
        question_num: all.len(),
        questions: current,
        categories,
        current_category: None,
    }))
}

// presence alone is not enough: blank prompts and zero-valued numbers are
// rejected the same way as missing fields
async fn create_question(
    State(pool): State<SqlitePool>,
    Json(body): Json<NewQuestion>,
) -> ApiResponse<CreatedReply> {
    let question = body.question.filter(|q| !q.is_empty());
    let answer = body.answer.filter(|a| !a.is_empty());
    let category = body.category.filter(|c| *c != 0);
    let difficulty = body.difficulty.filter(|d| *d != 0);
    let (Some(question), Some(answer), Some(category), Some(difficulty)) =
        (question, answer, category, difficulty)
    else {
        return Err(ApiError::Unprocessable);
    };

    let created = questions::create_question(&pool, &question, &answer, category, difficulty)
        .await
        .map_err(|_| ApiError::Unprocessable)?;

    Ok(Json(CreatedReply {
        success: true,
        created,
    }))
}

// the id segment is taken as an opaque string; anything that does not resolve
// to a stored row reads as a missing resource, and the raw segment is echoed
// back on success
async fn delete_question(
    State(pool): State<SqlitePool>,
    Path(question_id): Path<String>,
) -> ApiResponse<DeletedReply> {
    let id = question_id.parse::<i64>().map_err(|_| ApiError::NotFound)?;
    questions::get_question(&pool, id).await?;
    questions::delete_question(&pool, id)
        .await
        .map_err(|_| ApiError::Unprocessable)?;

    Ok(Json(DeletedReply {
        success: true,
        deleted: question_id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    Json(body): Json<SearchBody>,
) -> ApiResponse<SearchReply> {
    let term = body
        .search_term
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::NotFound)?;
    let questions = questions::search_questions(&pool, &term).await?;

    Ok(Json(SearchReply {
        success: true,
        question_num: questions.len(),
        questions,
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{question_id}", delete(delete_question))
        .with_state(state)
}
