//! Axum route handlers for the assessment API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::advisory::generator::generate_advisory;
use crate::errors::AppError;
use crate::models::report::AssessmentReport;
use crate::models::submission::{AssessmentSubmission, MAX_QUESTION_SCORE};
use crate::scoring::engine::{calculate_scores, tier_distribution};
use crate::scoring::tiers::Tier;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    pub score: f64,
    pub tier: Tier,
    pub questions_answered: u32,
    pub total_questions: u32,
}

#[derive(Debug, Serialize)]
pub struct AssessResponse {
    pub overall_score: f64,
    pub overall_tier: Tier,
    pub priority_categories: Vec<String>,
    pub category_details: IndexMap<String, CategoryDetail>,
    /// Generated advisory text, or an inline error message when the
    /// generation call failed.
    pub recommendations: String,
    pub tier_distribution: IndexMap<Tier, u32>,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/assessment/questions
///
/// Exposes the raw question catalog for the frontend to render.
pub async fn handle_get_questions(State(state): State<AppState>) -> Json<Value> {
    Json(state.reference.questions_raw.clone())
}

/// GET /api/v1/assessment/tone-options
///
/// Exposes the raw tone matrix table.
pub async fn handle_get_tone_options(State(state): State<AppState>) -> Json<Value> {
    Json(state.reference.tone_raw.clone())
}

/// POST /api/v1/assessment
///
/// Full assessment pipeline: validate, score, classify, build the advisory
/// prompt, generate. Generation failures degrade to an inline error string;
/// everything else fails the request.
pub async fn handle_assess(
    State(state): State<AppState>,
    Json(submission): Json<AssessmentSubmission>,
) -> Result<Json<AssessResponse>, AppError> {
    validate_submission(&submission)?;

    let reference = &state.reference;
    let report = calculate_scores(
        &submission.answers,
        &reference.catalog,
        &reference.rules.boundaries,
    );
    info!(
        "Scored assessment: overall {:.2} ({}) across {} areas, catalyst {}",
        report.overall_score,
        report.overall_tier,
        report.category_scores.len(),
        submission.catalyst
    );

    let distribution = tier_distribution(&report);

    let recommendations = generate_advisory(
        &report,
        submission.catalyst,
        reference,
        state.selector.as_ref(),
        state.generator.as_ref(),
    )
    .await?;

    Ok(Json(build_response(report, recommendations, distribution)))
}

fn validate_submission(submission: &AssessmentSubmission) -> Result<(), AppError> {
    for answer in &submission.answers {
        if answer.score > MAX_QUESTION_SCORE {
            return Err(AppError::Validation(format!(
                "Score for question '{}' must be between 0 and {MAX_QUESTION_SCORE}",
                answer.question_id
            )));
        }
    }
    Ok(())
}

fn build_response(
    report: AssessmentReport,
    recommendations: String,
    tier_distribution: IndexMap<Tier, u32>,
) -> AssessResponse {
    let category_details = report
        .category_scores
        .iter()
        .map(|(name, category)| {
            (
                name.clone(),
                CategoryDetail {
                    score: category.normalized_score,
                    tier: category.tier,
                    questions_answered: category.questions_answered,
                    total_questions: category.total_questions,
                },
            )
        })
        .collect();

    AssessResponse {
        overall_score: report.overall_score,
        overall_tier: report.overall_tier,
        priority_categories: report.priority_categories,
        category_details,
        recommendations,
        tier_distribution,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use indexmap::IndexMap;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::advisory::tone::FirstPhraseSelector;
    use crate::llm_client::{LlmError, TextGenerator};
    use crate::models::submission::Catalyst;
    use crate::refdata::{
        CatalystDetail, Question, QuestionCatalog, ReferenceData, ScoringRules, TierTone,
        ToneMatrix,
    };
    use crate::routes::build_router;
    use crate::scoring::tiers::{Tier, TierBoundaries};
    use crate::state::AppState;

    struct StubGenerator;

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok("Stubbed advisory text.".to_string())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 503,
                message: "backend unavailable".to_string(),
            })
        }
    }

    fn reference() -> ReferenceData {
        let questions_raw = json!({
            "assessment": {
                "Financials": [
                    {"id": "fin_1", "type": "Frequency", "text": "Cash flow review?"},
                    {"id": "fin_2", "type": "Confidence", "text": "Pricing confidence?"}
                ],
                "Operations": [
                    {"id": "ops_1", "type": "Planning Status", "text": "Documented processes?"}
                ]
            }
        });
        let areas: IndexMap<String, Vec<Question>> =
            serde_json::from_value(questions_raw["assessment"].clone()).unwrap();

        let mut tiers = HashMap::new();
        for tier in Tier::ALL {
            tiers.insert(
                tier,
                TierTone {
                    general_intros: vec![format!("{tier} opener.")],
                    catalyst_intros: HashMap::new(),
                },
            );
        }

        ReferenceData {
            catalog: QuestionCatalog::new(areas).unwrap(),
            rules: ScoringRules::new(
                TierBoundaries::new(vec![
                    (Tier::Responding, 0.33),
                    (Tier::Building, 0.66),
                    (Tier::Optimizing, 1.0),
                ]),
                HashMap::new(),
            ),
            tone: ToneMatrix::new(tiers),
            catalysts: Catalyst::ALL
                .into_iter()
                .map(|c| {
                    (
                        c,
                        CatalystDetail {
                            definition: format!("{c} definition"),
                            primary_focus_areas: vec!["Cash".to_string()],
                        },
                    )
                })
                .collect(),
            recommendations: HashMap::new(),
            questions_raw,
            tone_raw: json!({"Responding": {"general_intros": ["Responding opener."]}}),
        }
    }

    fn app(generator: Arc<dyn TextGenerator>) -> axum::Router {
        let state = AppState {
            reference: Arc::new(reference()),
            generator,
            selector: Arc::new(FirstPhraseSelector),
        };
        build_router(state)
    }

    fn assess_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/assessment")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    #[tokio::test]
    async fn test_assess_scores_and_returns_recommendations() {
        let response = app(Arc::new(StubGenerator))
            .oneshot(assess_request(json!({
                "catalyst": "Crisis",
                "answers": [
                    {"question_id": "fin_1", "score": 4},
                    {"question_id": "fin_2", "score": 0}
                ]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["overall_score"], json!(0.5));
        assert_eq!(payload["overall_tier"], json!("Building"));
        assert_eq!(payload["category_details"]["Financials"]["score"], json!(0.5));
        assert_eq!(
            payload["category_details"]["Financials"]["tier"],
            json!("Building")
        );
        assert_eq!(
            payload["category_details"]["Operations"]["questions_answered"],
            json!(0)
        );
        assert_eq!(payload["recommendations"], json!("Stubbed advisory text."));
        assert_eq!(payload["tier_distribution"]["Building"], json!(1));
        assert_eq!(payload["tier_distribution"]["Responding"], json!(1));
        assert_eq!(payload["tier_distribution"]["Optimizing"], json!(0));
        assert!(payload["priority_categories"]
            .as_array()
            .unwrap()
            .contains(&json!("Financials")));
        assert!(payload["generated_at"].is_string());
    }

    #[tokio::test]
    async fn test_assess_rejects_out_of_range_score() {
        let response = app(Arc::new(StubGenerator))
            .oneshot(assess_request(json!({
                "catalyst": "Crisis",
                "answers": [{"question_id": "fin_1", "score": 7}]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["error"]["code"], json!("VALIDATION_ERROR"));
    }

    #[tokio::test]
    async fn test_assess_rejects_unknown_catalyst() {
        let response = app(Arc::new(StubGenerator))
            .oneshot(assess_request(json!({
                "catalyst": "Hypergrowth",
                "answers": []
            })))
            .await
            .unwrap();

        assert!(
            response.status().is_client_error(),
            "unknown catalyst must be rejected at the boundary"
        );
    }

    #[tokio::test]
    async fn test_generation_failure_still_returns_scores() {
        let response = app(Arc::new(FailingGenerator))
            .oneshot(assess_request(json!({
                "catalyst": "Steady Growth",
                "answers": [{"question_id": "ops_1", "score": 3}]
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["overall_tier"], json!("Optimizing"));
        assert!(payload["recommendations"]
            .as_str()
            .unwrap()
            .starts_with("Error generating recommendations:"));
    }

    #[tokio::test]
    async fn test_questions_endpoint_returns_raw_catalog() {
        let response = app(Arc::new(StubGenerator))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/assessment/questions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert!(payload["assessment"]["Financials"].is_array());
    }

    #[tokio::test]
    async fn test_tone_options_endpoint_returns_raw_matrix() {
        let response = app(Arc::new(StubGenerator))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/assessment/tone-options")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert!(payload["Responding"]["general_intros"].is_array());
    }
}
