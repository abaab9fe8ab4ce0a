//! Advisory generation: prompt assembly plus the external text-generation
//! call, with the degrade-gracefully policy applied at this boundary.

use tracing::warn;

use crate::advisory::prompt_builder::build_prompt;
use crate::advisory::tone::PhraseSelector;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::report::AssessmentReport;
use crate::models::submission::Catalyst;
use crate::refdata::ReferenceData;

/// Builds the advisory prompt and asks the generator to expand it.
///
/// A generation failure does not fail the request: the scoring results are
/// useful on their own, so the failure is reported inline as the
/// recommendations payload. Prompt-assembly failures are reference-data
/// defects and do propagate.
pub async fn generate_advisory(
    report: &AssessmentReport,
    catalyst: Catalyst,
    reference: &ReferenceData,
    selector: &dyn PhraseSelector,
    generator: &dyn TextGenerator,
) -> Result<String, AppError> {
    let prompt = build_prompt(report, catalyst, reference, selector)?;

    match generator.generate(&prompt).await {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("Advisory generation failed, degrading to inline error: {e}");
            Ok(format!("Error generating recommendations: {e}"))
        }
    }
}
