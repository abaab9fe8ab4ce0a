//! Tone resolution: picks the introductory phrase for a functional area.
//!
//! Lookup chain, in order: tier + catalyst specific list, then the tier's
//! general list, then a hard error. A tier missing from the tone matrix is a
//! reference-data defect; an empty introduction would degrade the generated
//! text without anyone noticing, so it fails loudly instead.

use rand::Rng;

use crate::errors::AppError;
use crate::models::submission::Catalyst;
use crate::refdata::ToneMatrix;
use crate::scoring::tiers::Tier;

/// Chooses one phrase from a non-empty candidate list.
///
/// Production uses `RandomPhraseSelector`; callers that need reproducible
/// prompts inject a deterministic selector.
pub trait PhraseSelector: Send + Sync {
    fn pick<'a>(&self, candidates: &'a [String]) -> &'a str;
}

/// Uniform random selection.
pub struct RandomPhraseSelector;

impl PhraseSelector for RandomPhraseSelector {
    fn pick<'a>(&self, candidates: &'a [String]) -> &'a str {
        let index = rand::rng().random_range(0..candidates.len());
        &candidates[index]
    }
}

/// Always picks the first candidate. Deterministic; used in tests.
pub struct FirstPhraseSelector;

impl PhraseSelector for FirstPhraseSelector {
    fn pick<'a>(&self, candidates: &'a [String]) -> &'a str {
        &candidates[0]
    }
}

/// Resolves the intro candidate list for a tier and catalyst.
/// The returned slice is never empty.
pub fn resolve_intro_candidates<'a>(
    tone: &'a ToneMatrix,
    tier: Tier,
    catalyst: Catalyst,
) -> Result<&'a [String], AppError> {
    let tier_tone = tone.tier(tier).ok_or_else(|| {
        AppError::Configuration(format!("tone matrix has no entry for tier '{tier}'"))
    })?;

    if let Some(candidates) = tier_tone.catalyst_intros.get(&catalyst) {
        if !candidates.is_empty() {
            return Ok(candidates);
        }
    }

    if tier_tone.general_intros.is_empty() {
        return Err(AppError::Configuration(format!(
            "tone matrix tier '{tier}' has no general intros to fall back on"
        )));
    }

    Ok(&tier_tone.general_intros)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::refdata::TierTone;

    fn matrix() -> ToneMatrix {
        let mut tiers = HashMap::new();
        tiers.insert(
            Tier::Responding,
            TierTone {
                general_intros: vec!["General opener.".to_string()],
                catalyst_intros: HashMap::from([(
                    Catalyst::Crisis,
                    vec![
                        "Crisis opener one.".to_string(),
                        "Crisis opener two.".to_string(),
                    ],
                )]),
            },
        );
        ToneMatrix::new(tiers)
    }

    #[test]
    fn test_catalyst_specific_list_preferred() {
        let matrix = matrix();
        let candidates =
            resolve_intro_candidates(&matrix, Tier::Responding, Catalyst::Crisis).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].starts_with("Crisis"));
    }

    #[test]
    fn test_unlisted_catalyst_falls_back_to_general() {
        let matrix = matrix();
        let candidates =
            resolve_intro_candidates(&matrix, Tier::Responding, Catalyst::SteadyGrowth).unwrap();
        assert_eq!(candidates, ["General opener.".to_string()]);
    }

    #[test]
    fn test_missing_tier_fails_loudly() {
        let matrix = matrix();
        let err = resolve_intro_candidates(&matrix, Tier::Optimizing, Catalyst::Crisis)
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_empty_catalyst_list_falls_back_to_general() {
        let mut tiers = HashMap::new();
        tiers.insert(
            Tier::Building,
            TierTone {
                general_intros: vec!["Fallback.".to_string()],
                catalyst_intros: HashMap::from([(Catalyst::Crisis, vec![])]),
            },
        );
        let matrix = ToneMatrix::new(tiers);
        let candidates =
            resolve_intro_candidates(&matrix, Tier::Building, Catalyst::Crisis).unwrap();
        assert_eq!(candidates, ["Fallback.".to_string()]);
    }

    #[test]
    fn test_first_selector_is_deterministic() {
        let candidates = vec!["a".to_string(), "b".to_string()];
        let selector = FirstPhraseSelector;
        assert_eq!(selector.pick(&candidates), "a");
        assert_eq!(selector.pick(&candidates), "a");
    }

    #[test]
    fn test_random_selector_stays_in_bounds() {
        let candidates = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let selector = RandomPhraseSelector;
        for _ in 0..50 {
            let picked = selector.pick(&candidates);
            assert!(candidates.iter().any(|c| c == picked));
        }
    }
}
