// Scoring engine: normalization, tier classification, distribution counts.
// Pure functions of the submission and the reference tables; no I/O.

pub mod engine;
pub mod tiers;
