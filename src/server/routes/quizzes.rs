use axum::{extract::State, routing::post, Json, Router};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::SqlitePool;

use crate::db::queries::questions;
use crate::db::Question;
use crate::server::app::AppState;
use crate::telemetry::QUIZ_CNTR;

use super::{ApiError, ApiResponse};

// id 0 is the "all categories" sentinel the quiz frontend sends
const ALL_CATEGORIES: i64 = 0;

const NO_MORE_QUESTIONS: &str = "There is no more new question.";

#[derive(Deserialize)]
struct QuizBody {
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
}

// the frontend sends the id either as a number or as a numeric string
#[derive(Deserialize)]
struct QuizCategory {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum QuizReply {
    Next { success: bool, question: Question },
    Done { success: bool, done: &'static str },
}

// both fields gate the request, and an empty previous list counts as missing;
// first-round clients are expected to cope with the rejection
async fn play_quiz(
    State(pool): State<SqlitePool>,
    Json(body): Json<QuizBody>,
) -> ApiResponse<QuizReply> {
    let category_id = body
        .quiz_category
        .and_then(|c| c.id)
        .ok_or(ApiError::BadRequest)?;
    let previous = match body.previous_questions {
        Some(previous) if !previous.is_empty() => previous,
        _ => return Err(ApiError::BadRequest),
    };

    let candidates = if category_id == ALL_CATEGORIES {
        questions::get_questions(&pool).await?
    } else {
        questions::get_questions_for_category(&pool, category_id).await?
    };

    let mut unseen: Vec<Question> = candidates
        .into_iter()
        .filter(|q| !previous.contains(&q.id))
        .collect();
    if unseen.is_empty() {
        return Ok(Json(QuizReply::Done {
            success: true,
            done: NO_MORE_QUESTIONS,
        }));
    }

    let pick = rand::thread_rng().gen_range(0..unseen.len());
    let question = unseen.swap_remove(pick);
    QUIZ_CNTR
        .with_label_values(&[&question.category.to_string()])
        .inc();

    Ok(Json(QuizReply::Next {
        success: true,
        question,
    }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}
