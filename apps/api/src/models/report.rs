//! Output types of the scoring engine.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::scoring::tiers::Tier;

/// Per-area computed score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub name: String,
    /// Sum of valid answer scores routed to this area.
    pub raw_score: u32,
    /// raw_score / (questions_answered * 4), rounded to two decimals.
    /// Always in [0, 1]; 0.0 when nothing was answered.
    pub normalized_score: f64,
    pub tier: Tier,
    pub questions_answered: u32,
    /// Questions defined for this area in the catalog, answered or not.
    pub total_questions: u32,
}

/// Full output of a scoring run. A pure function of the submission and the
/// reference tables; carries no generated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Keyed by functional area, in catalog insertion order.
    pub category_scores: IndexMap<String, CategoryScore>,
    pub overall_score: f64,
    pub overall_tier: Tier,
    /// Areas classified below the top tier, in catalog order.
    pub priority_categories: Vec<String>,
}
