//! Recommendation prompt assembly.
//!
//! Deterministic given a deterministic `PhraseSelector`: the same report,
//! catalyst, and reference tables always yield the same prompt. Areas are
//! addressed weakest-first so the generated text leads with the places the
//! business needs the most help, regardless of catalog or alphabetical
//! order.

use std::cmp::Ordering;

use crate::advisory::prompts::{
    ADVISOR_PERSONA, CLOSING_INSTRUCTION, FORMATTING_REQUIREMENTS, LENGTH_REQUIREMENTS,
    WRITING_GUIDELINES,
};
use crate::advisory::tone::{resolve_intro_candidates, PhraseSelector};
use crate::errors::AppError;
use crate::models::report::{AssessmentReport, CategoryScore};
use crate::models::submission::Catalyst;
use crate::refdata::{RecommendationSnippet, ReferenceData};

/// Max recommendation snippets embedded per functional area.
const MAX_SNIPPETS_PER_AREA: usize = 3;
/// Max catalyst focus areas listed in the priorities section.
const MAX_FOCUS_AREAS: usize = 5;

/// Assembles the single advisory prompt for a scored assessment.
pub fn build_prompt(
    report: &AssessmentReport,
    catalyst: Catalyst,
    reference: &ReferenceData,
    selector: &dyn PhraseSelector,
) -> Result<String, AppError> {
    let catalyst_detail = reference.catalysts.get(&catalyst).ok_or_else(|| {
        AppError::Configuration(format!("no catalyst definition for '{catalyst}'"))
    })?;
    let diagnosis = reference.rules.whole_business_summary(report.overall_tier);

    // Weakest areas first; the sort is stable, so ties keep catalog order.
    let mut ordered: Vec<&CategoryScore> = report.category_scores.values().collect();
    ordered.sort_by(|a, b| {
        a.normalized_score
            .partial_cmp(&b.normalized_score)
            .unwrap_or(Ordering::Equal)
    });

    let mut parts: Vec<String> = vec![
        ADVISOR_PERSONA.to_string(),
        String::new(),
        "## BUSINESS CONTEXT:".to_string(),
        format!("**Current Situation:** {catalyst}"),
        format!("**What This Means:** {}", catalyst_detail.definition),
        format!("**Overall Business State:** {diagnosis}"),
        String::new(),
        "## KEY PRIORITIES FOR THIS SITUATION:".to_string(),
    ];

    for (i, focus) in catalyst_detail
        .primary_focus_areas
        .iter()
        .take(MAX_FOCUS_AREAS)
        .enumerate()
    {
        parts.push(format!("{}. {focus}", i + 1));
    }

    let area_order = ordered
        .iter()
        .map(|category| category.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    parts.push(String::new());
    parts.push(WRITING_GUIDELINES.to_string());
    parts.push(String::new());
    parts.push("## FUNCTIONAL AREA RECOMMENDATIONS:".to_string());
    parts.push(format!(
        "You must provide recommendations for ALL {} functional areas in this exact order: {}",
        ordered.len(),
        area_order
    ));
    parts.push(String::new());

    for (i, category) in ordered.into_iter().enumerate() {
        let candidates = resolve_intro_candidates(&reference.tone, category.tier, catalyst)?;
        let intro = selector.pick(candidates);

        let snippets = reference
            .recommendations
            .get(&category.tier)
            .and_then(|by_catalyst| by_catalyst.get(&catalyst))
            .and_then(|by_area| by_area.get(&category.name))
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        parts.push(render_area_section(i + 1, category, intro, snippets, catalyst));
    }

    parts.push(String::new());
    parts.push(FORMATTING_REQUIREMENTS.to_string());
    parts.push(String::new());
    parts.push(LENGTH_REQUIREMENTS.to_string());
    parts.push(String::new());
    parts.push(CLOSING_INSTRUCTION.to_string());

    Ok(parts.join("\n"))
}

/// "Customers_Marketing" reads as "Customers & Marketing" inside the prompt.
fn display_area_name(area: &str) -> String {
    area.replace('_', " & ")
}

fn render_area_section(
    position: usize,
    category: &CategoryScore,
    intro: &str,
    snippets: &[RecommendationSnippet],
    catalyst: Catalyst,
) -> String {
    let rule = "\u{2500}".repeat(80);
    let heading = format!("### {position}. {}", display_area_name(&category.name));

    if snippets.is_empty() {
        // No grounding content for this combination: the generator works
        // from tier and catalyst context alone.
        return format!(
            "{heading}\n\
             \n\
             **Opening Statement (use this exactly):** {intro}\n\
             \n\
             Provide 3 practical recommendations for this area based on the {tier} tier \
             and {catalyst} context. Each recommendation should be a 2-3 sentence paragraph.\n\
             {rule}\n",
            tier = category.tier,
        );
    }

    let grounding = snippets
        .iter()
        .take(MAX_SNIPPETS_PER_AREA)
        .enumerate()
        .map(|(i, snippet)| format!("  {}. {}", i + 1, snippet.recommendation))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{heading}\n\
         \n\
         **Opening Statement (use this exactly):** {intro}\n\
         \n\
         **Base Your Advice On These Core Recommendations:**\n\
         {grounding}\n\
         \n\
         **Instructions:** Expand each recommendation above into a 2-3 sentence paragraph. \
         Each paragraph should naturally explain the specific action, its business impact, \
         and a concrete first step, without using those as headings. \
         Write in a conversational but professional tone. Keep it concise and actionable.\n\
         {rule}\n"
    )
}
