//! Read-only reference tables backing the assessment service.
//!
//! Five JSON tables are loaded once at startup, validated, and shared
//! read-only for the life of the process. Any structural defect is a fatal
//! startup error, never a per-request error.

pub mod catalog;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

pub use self::catalog::{Question, QuestionCatalog};
use crate::models::submission::Catalyst;
use crate::scoring::tiers::{Tier, TierBoundaries};

#[derive(Debug, Error)]
pub enum RefDataError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Duplicate question id '{0}' in question catalog")]
    DuplicateQuestionId(String),

    #[error("Tier boundaries: {0}")]
    TierBoundaries(String),

    #[error("Tone matrix: {0}")]
    ToneMatrix(String),

    #[error("Catalyst table: {0}")]
    Catalysts(String),

    #[error("Detailed recommendations: {0}")]
    Recommendations(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Raw file shapes (what serde sees on disk)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct QuestionsFile {
    assessment: IndexMap<String, Vec<Question>>,
}

#[derive(Debug, Deserialize)]
struct RulesFile {
    /// Tier name -> [lower, upper] band, inclusive at the upper edge.
    tier_boundaries: IndexMap<String, [f64; 2]>,
    /// "Mostly {Tier}" -> whole-business diagnosis text.
    #[serde(default)]
    whole_business_summaries: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct CatalystEntry {
    definition: String,
    #[serde(default)]
    primary_focus_areas: Vec<String>,
}

type ToneFile = IndexMap<String, IndexMap<String, Vec<String>>>;
type RecommendationsFile = IndexMap<String, IndexMap<String, IndexMap<String, Vec<RecommendationSnippet>>>>;

/// Key inside a tier's tone row that holds the catalyst-agnostic fallback list.
const GENERAL_INTROS_KEY: &str = "general_intros";

// ────────────────────────────────────────────────────────────────────────────
// Validated in-memory tables
// ────────────────────────────────────────────────────────────────────────────

/// One tier's row of the tone matrix.
#[derive(Debug, Clone)]
pub struct TierTone {
    /// Catalyst-agnostic fallback intros; never empty after validation.
    pub general_intros: Vec<String>,
    pub catalyst_intros: HashMap<Catalyst, Vec<String>>,
}

/// Tier -> introductory phrase candidates.
#[derive(Debug, Clone)]
pub struct ToneMatrix {
    tiers: HashMap<Tier, TierTone>,
}

impl ToneMatrix {
    pub fn new(tiers: HashMap<Tier, TierTone>) -> Self {
        Self { tiers }
    }

    pub fn tier(&self, tier: Tier) -> Option<&TierTone> {
        self.tiers.get(&tier)
    }
}

/// A grounding snippet for one tier/catalyst/area combination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationSnippet {
    pub recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_focus: Option<String>,
}

/// Tier -> catalyst -> area -> snippets. Sparse by design: a missing
/// combination means the prompt builder instructs the generator to work from
/// tier and catalyst context alone.
pub type DetailedRecommendations =
    HashMap<Tier, HashMap<Catalyst, HashMap<String, Vec<RecommendationSnippet>>>>;

/// Catalyst definition and its ordered focus-area labels.
#[derive(Debug, Clone)]
pub struct CatalystDetail {
    pub definition: String,
    pub primary_focus_areas: Vec<String>,
}

/// Tier boundaries plus the whole-business summary texts.
#[derive(Debug, Clone)]
pub struct ScoringRules {
    pub boundaries: TierBoundaries,
    summaries: HashMap<String, String>,
}

impl ScoringRules {
    pub fn new(boundaries: TierBoundaries, summaries: HashMap<String, String>) -> Self {
        Self {
            boundaries,
            summaries,
        }
    }

    /// Whole-business diagnosis keyed by "Mostly {tier}", with a generic
    /// fallback when the rules table has no entry.
    pub fn whole_business_summary(&self, tier: Tier) -> &str {
        self.summaries
            .get(&format!("Mostly {tier}"))
            .map(String::as_str)
            .unwrap_or("Your business is evolving.")
    }
}

/// The full set of validated reference tables.
#[derive(Debug)]
pub struct ReferenceData {
    pub catalog: QuestionCatalog,
    pub rules: ScoringRules,
    pub tone: ToneMatrix,
    pub catalysts: HashMap<Catalyst, CatalystDetail>,
    pub recommendations: DetailedRecommendations,
    /// Raw table payloads, retained for the read-only exposure endpoints.
    pub questions_raw: Value,
    pub tone_raw: Value,
}

impl ReferenceData {
    /// Loads and validates all five tables from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RefDataError> {
        let dir = dir.as_ref();

        let questions_raw: Value = read_json(&dir.join("questions.json"))?;
        let tone_raw: Value = read_json(&dir.join("tone.json"))?;

        let questions: QuestionsFile = parse_value(&dir.join("questions.json"), &questions_raw)?;
        let tone: ToneFile = parse_value(&dir.join("tone.json"), &tone_raw)?;
        let rules: RulesFile = read_json(&dir.join("rules.json"))?;
        let catalysts: IndexMap<String, CatalystEntry> = read_json(&dir.join("catalysts.json"))?;
        let recommendations: RecommendationsFile = read_json(&dir.join("recommendations.json"))?;

        Self::from_parts(
            questions.assessment,
            rules,
            tone,
            catalysts,
            recommendations,
            questions_raw,
            tone_raw,
        )
    }

    /// Builds and validates the store from already-parsed tables. Split out
    /// so tests can construct fixtures without touching disk.
    fn from_parts(
        areas: IndexMap<String, Vec<Question>>,
        rules: RulesFile,
        tone: ToneFile,
        catalysts: IndexMap<String, CatalystEntry>,
        recommendations: RecommendationsFile,
        questions_raw: Value,
        tone_raw: Value,
    ) -> Result<Self, RefDataError> {
        let catalog = QuestionCatalog::new(areas)?;
        let boundaries = build_boundaries(&rules.tier_boundaries)?;
        let tone = build_tone_matrix(tone)?;
        let catalysts = build_catalysts(catalysts)?;
        let recommendations = build_recommendations(recommendations, &catalog)?;

        Ok(Self {
            catalog,
            rules: ScoringRules::new(boundaries, rules.whole_business_summaries),
            tone,
            catalysts,
            recommendations,
            questions_raw,
            tone_raw,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, RefDataError> {
    let contents = fs::read_to_string(path).map_err(|source| RefDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| RefDataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_value<T: DeserializeOwned>(path: &Path, value: &Value) -> Result<T, RefDataError> {
    serde_json::from_value(value.clone()).map_err(|source| RefDataError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Table validation
// ────────────────────────────────────────────────────────────────────────────

/// Reachable-gap tolerance between adjacent bands: scores are rounded to two
/// decimals, so a lower edge one hundredth above the previous upper is tight.
const BAND_STEP: f64 = 0.01 + 1e-9;

fn build_boundaries(
    raw: &IndexMap<String, [f64; 2]>,
) -> Result<TierBoundaries, RefDataError> {
    let mut bands: HashMap<Tier, [f64; 2]> = HashMap::new();
    for (name, band) in raw {
        let tier = Tier::from_name(name).ok_or_else(|| {
            RefDataError::TierBoundaries(format!("unknown tier '{name}'"))
        })?;
        if bands.insert(tier, *band).is_some() {
            return Err(RefDataError::TierBoundaries(format!(
                "tier '{name}' defined twice"
            )));
        }
    }

    let mut bounds = Vec::with_capacity(Tier::ALL.len());
    let mut previous_upper = 0.0;
    for tier in Tier::ALL {
        let [low, high] = bands.remove(&tier).ok_or_else(|| {
            RefDataError::TierBoundaries(format!("missing tier '{tier}'"))
        })?;
        if low > high {
            return Err(RefDataError::TierBoundaries(format!(
                "tier '{tier}' has lower bound {low} above upper bound {high}"
            )));
        }
        let floor = if tier == Tier::Responding { 0.0 } else { previous_upper };
        if low > floor + BAND_STEP {
            return Err(RefDataError::TierBoundaries(format!(
                "gap below tier '{tier}': band starts at {low}, previous coverage ends at {floor}"
            )));
        }
        if high <= previous_upper && tier != Tier::Responding {
            return Err(RefDataError::TierBoundaries(format!(
                "tier '{tier}' upper bound {high} does not extend past {previous_upper}"
            )));
        }
        previous_upper = high;
        bounds.push((tier, high));
    }

    if (previous_upper - 1.0).abs() > 1e-9 {
        return Err(RefDataError::TierBoundaries(format!(
            "top tier must end at 1.0, found {previous_upper}"
        )));
    }

    Ok(TierBoundaries::new(bounds))
}

fn build_tone_matrix(raw: ToneFile) -> Result<ToneMatrix, RefDataError> {
    let mut tiers = HashMap::new();
    for (tier_name, entries) in raw {
        let tier = Tier::from_name(&tier_name)
            .ok_or_else(|| RefDataError::ToneMatrix(format!("unknown tier '{tier_name}'")))?;

        let mut general_intros = Vec::new();
        let mut catalyst_intros = HashMap::new();
        for (key, phrases) in entries {
            if key == GENERAL_INTROS_KEY {
                general_intros = phrases;
            } else {
                let catalyst = Catalyst::from_label(&key).ok_or_else(|| {
                    RefDataError::ToneMatrix(format!(
                        "unknown catalyst '{key}' under tier '{tier_name}'"
                    ))
                })?;
                catalyst_intros.insert(catalyst, phrases);
            }
        }

        if general_intros.is_empty() {
            return Err(RefDataError::ToneMatrix(format!(
                "tier '{tier_name}' has no '{GENERAL_INTROS_KEY}' fallback list"
            )));
        }

        tiers.insert(
            tier,
            TierTone {
                general_intros,
                catalyst_intros,
            },
        );
    }

    for tier in Tier::ALL {
        if !tiers.contains_key(&tier) {
            return Err(RefDataError::ToneMatrix(format!("missing tier '{tier}'")));
        }
    }

    Ok(ToneMatrix::new(tiers))
}

fn build_catalysts(
    raw: IndexMap<String, CatalystEntry>,
) -> Result<HashMap<Catalyst, CatalystDetail>, RefDataError> {
    let mut catalysts = HashMap::new();
    for (label, entry) in raw {
        let catalyst = Catalyst::from_label(&label)
            .ok_or_else(|| RefDataError::Catalysts(format!("unknown catalyst '{label}'")))?;
        catalysts.insert(
            catalyst,
            CatalystDetail {
                definition: entry.definition,
                primary_focus_areas: entry.primary_focus_areas,
            },
        );
    }

    for catalyst in Catalyst::ALL {
        if !catalysts.contains_key(&catalyst) {
            return Err(RefDataError::Catalysts(format!(
                "missing catalyst '{catalyst}'"
            )));
        }
    }

    Ok(catalysts)
}

/// Tier and catalyst keys must parse; area keys are only warned about, since
/// the rule content often evolves ahead of the question catalog.
fn build_recommendations(
    raw: RecommendationsFile,
    catalog: &QuestionCatalog,
) -> Result<DetailedRecommendations, RefDataError> {
    let mut recommendations: DetailedRecommendations = HashMap::new();
    for (tier_name, by_catalyst) in raw {
        let tier = Tier::from_name(&tier_name).ok_or_else(|| {
            RefDataError::Recommendations(format!("unknown tier '{tier_name}'"))
        })?;
        let tier_entry = recommendations.entry(tier).or_default();
        for (catalyst_label, by_area) in by_catalyst {
            let catalyst = Catalyst::from_label(&catalyst_label).ok_or_else(|| {
                RefDataError::Recommendations(format!(
                    "unknown catalyst '{catalyst_label}' under tier '{tier_name}'"
                ))
            })?;
            let catalyst_entry = tier_entry.entry(catalyst).or_default();
            for (area, snippets) in by_area {
                if !catalog.has_area(&area) {
                    warn!(
                        "Recommendations reference unknown area '{area}' \
                         ({tier_name}/{catalyst_label}); keeping it"
                    );
                }
                catalyst_entry.insert(area, snippets);
            }
        }
    }
    Ok(recommendations)
}
