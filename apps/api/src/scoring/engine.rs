//! Scoring engine: turns a submission into per-area and overall scores.
//!
//! Pure function of its inputs. Tallies are created fresh per call and
//! discarded after producing the report, so concurrent requests cannot
//! observe each other's work.

use indexmap::IndexMap;
use tracing::debug;

use crate::models::report::{AssessmentReport, CategoryScore};
use crate::models::submission::{Answer, MAX_QUESTION_SCORE};
use crate::refdata::QuestionCatalog;
use crate::scoring::tiers::{Tier, TierBoundaries};

/// Transient per-area tally.
struct AreaTally {
    total_score: u32,
    answered: u32,
    total: u32,
}

/// Rounds half away from zero to two decimal places.
///
/// The rounding mode is part of the scoring contract: classification runs on
/// the rounded value, so it decides tier membership at band edges
/// (e.g. 0.125 rounds up to 0.13, never down to 0.12).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scores a submission against the question catalog and tier boundaries.
///
/// Answers referencing unknown question ids are skipped silently; partial
/// and forward-compatible submissions are expected, not errors. Each area's
/// normalized score is raw points over the maximum achievable for the
/// questions actually answered.
pub fn calculate_scores(
    answers: &[Answer],
    catalog: &QuestionCatalog,
    boundaries: &TierBoundaries,
) -> AssessmentReport {
    // One tally per area. `total` counts questions defined in the catalog,
    // not questions answered; it is reporting context, not the normalization
    // denominator.
    let mut tallies: IndexMap<&str, AreaTally> = catalog
        .areas()
        .map(|(area, questions)| {
            (
                area,
                AreaTally {
                    total_score: 0,
                    answered: 0,
                    total: questions.len() as u32,
                },
            )
        })
        .collect();

    for answer in answers {
        match catalog.area_of(&answer.question_id) {
            Some(area) => {
                if let Some(tally) = tallies.get_mut(area) {
                    tally.total_score += u32::from(answer.score);
                    tally.answered += 1;
                }
            }
            None => debug!(
                "Ignoring answer for unknown question id '{}'",
                answer.question_id
            ),
        }
    }

    let mut category_scores = IndexMap::with_capacity(tallies.len());
    let mut priority_categories = Vec::new();
    let mut normalized_sum = 0.0;
    let mut answered_areas = 0u32;

    for (area, tally) in &tallies {
        let normalized = if tally.answered > 0 {
            round2(
                f64::from(tally.total_score)
                    / (f64::from(tally.answered) * f64::from(MAX_QUESTION_SCORE)),
            )
        } else {
            0.0
        };
        let tier = boundaries.classify(normalized);

        if tier.is_priority() {
            priority_categories.push((*area).to_string());
        }
        if tally.answered > 0 {
            normalized_sum += normalized;
            answered_areas += 1;
        }

        category_scores.insert(
            (*area).to_string(),
            CategoryScore {
                name: (*area).to_string(),
                raw_score: tally.total_score,
                normalized_score: normalized,
                tier,
                questions_answered: tally.answered,
                total_questions: tally.total,
            },
        );
    }

    // Areas nobody answered stay out of the overall mean; an untouched
    // section says nothing about the business.
    let overall_score = if answered_areas > 0 {
        round2(normalized_sum / f64::from(answered_areas))
    } else {
        0.0
    };
    let overall_tier = boundaries.classify(overall_score);

    AssessmentReport {
        category_scores,
        overall_score,
        overall_tier,
        priority_categories,
    }
}

/// Counts areas per tier. Every tier is present in the output, zero or not.
pub fn tier_distribution(report: &AssessmentReport) -> IndexMap<Tier, u32> {
    let mut distribution: IndexMap<Tier, u32> =
        Tier::ALL.iter().map(|tier| (*tier, 0)).collect();
    for category in report.category_scores.values() {
        *distribution.entry(category.tier).or_insert(0) += 1;
    }
    distribution
}
