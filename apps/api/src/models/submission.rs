//! Input types for an assessment run: the catalyst context and the answers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum score a single question can receive. Also the normalization
/// denominator per answered question.
pub const MAX_QUESTION_SCORE: u8 = 4;

/// The situational context driving tone and focus-area selection.
///
/// Serialized with the human-readable labels below; the same labels key the
/// tone, catalyst, and recommendation tables. This is the single canonical
/// naming convention; no underscore variants anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Catalyst {
    Crisis,
    #[serde(rename = "Economic Uncertainty")]
    EconomicUncertainty,
    #[serde(rename = "New Opportunity")]
    NewOpportunity,
    #[serde(rename = "Steady Growth")]
    SteadyGrowth,
    #[serde(rename = "Lifestyle Change")]
    LifestyleChange,
    #[serde(rename = "Operational Adjustments")]
    OperationalAdjustments,
}

impl Catalyst {
    pub const ALL: [Catalyst; 6] = [
        Catalyst::Crisis,
        Catalyst::EconomicUncertainty,
        Catalyst::NewOpportunity,
        Catalyst::SteadyGrowth,
        Catalyst::LifestyleChange,
        Catalyst::OperationalAdjustments,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Catalyst::Crisis => "Crisis",
            Catalyst::EconomicUncertainty => "Economic Uncertainty",
            Catalyst::NewOpportunity => "New Opportunity",
            Catalyst::SteadyGrowth => "Steady Growth",
            Catalyst::LifestyleChange => "Lifestyle Change",
            Catalyst::OperationalAdjustments => "Operational Adjustments",
        }
    }

    /// Parses a canonical label, e.g. from a reference-table key.
    pub fn from_label(label: &str) -> Option<Catalyst> {
        Catalyst::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Catalyst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's response to a single question.
///
/// The score range is enforced at the transport boundary; by the time an
/// answer reaches the scoring engine it is within [0, 4].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Request body for POST /api/v1/assessment.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentSubmission {
    pub catalyst: Catalyst,
    pub answers: Vec<Answer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalyst_serde_spaced_labels() {
        let catalyst: Catalyst = serde_json::from_str(r#""Economic Uncertainty""#).unwrap();
        assert_eq!(catalyst, Catalyst::EconomicUncertainty);
        assert_eq!(
            serde_json::to_string(&catalyst).unwrap(),
            r#""Economic Uncertainty""#
        );
    }

    #[test]
    fn test_catalyst_rejects_underscore_variant() {
        let result: Result<Catalyst, _> = serde_json::from_str(r#""Economic_Uncertainty""#);
        assert!(result.is_err(), "underscore keys are not canonical");
    }

    #[test]
    fn test_catalyst_from_label_round_trips_all() {
        for catalyst in Catalyst::ALL {
            assert_eq!(Catalyst::from_label(catalyst.as_str()), Some(catalyst));
        }
        assert_eq!(Catalyst::from_label("Hypergrowth"), None);
    }

    #[test]
    fn test_answer_notes_optional() {
        let answer: Answer =
            serde_json::from_str(r#"{"question_id": "fin_1", "score": 3}"#).unwrap();
        assert_eq!(answer.score, 3);
        assert!(answer.notes.is_none());
    }

    #[test]
    fn test_answer_rejects_negative_score() {
        let result: Result<Answer, _> =
            serde_json::from_str(r#"{"question_id": "fin_1", "score": -1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_submission_deserializes() {
        let submission: AssessmentSubmission = serde_json::from_str(
            r#"{
                "catalyst": "Crisis",
                "answers": [
                    {"question_id": "fin_1", "score": 4},
                    {"question_id": "fin_2", "score": 0, "notes": "no reserve fund"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(submission.catalyst, Catalyst::Crisis);
        assert_eq!(submission.answers.len(), 2);
        assert_eq!(submission.answers[1].notes.as_deref(), Some("no reserve fund"));
    }
}
