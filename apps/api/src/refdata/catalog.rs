//! Question catalog: functional areas, their questions, and the reverse
//! question-id index used to route answers.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::RefDataError;

/// A single questionnaire item. `kind` carries the question "type" label the
/// frontend renders ("Frequency", "Planning Status", "Confidence").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Functional area -> ordered questions, plus the reverse id index.
///
/// Question ids are unique across the whole catalog; a duplicate makes the
/// reverse index ambiguous and is rejected at construction.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    areas: IndexMap<String, Vec<Question>>,
    area_by_question: HashMap<String, String>,
}

impl QuestionCatalog {
    pub fn new(areas: IndexMap<String, Vec<Question>>) -> Result<Self, RefDataError> {
        let mut area_by_question = HashMap::new();
        for (area, questions) in &areas {
            for question in questions {
                let previous = area_by_question.insert(question.id.clone(), area.clone());
                if previous.is_some() {
                    return Err(RefDataError::DuplicateQuestionId(question.id.clone()));
                }
            }
        }
        Ok(Self {
            areas,
            area_by_question,
        })
    }

    /// Functional areas in catalog insertion order.
    pub fn areas(&self) -> impl Iterator<Item = (&str, &[Question])> {
        self.areas
            .iter()
            .map(|(area, questions)| (area.as_str(), questions.as_slice()))
    }

    pub fn has_area(&self, name: &str) -> bool {
        self.areas.contains_key(name)
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn question_count(&self) -> usize {
        self.areas.values().map(Vec::len).sum()
    }

    /// Reverse lookup: question id to its functional area.
    pub fn area_of(&self, question_id: &str) -> Option<&str> {
        self.area_by_question.get(question_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            kind: "Frequency".to_string(),
            text: format!("Question {id}"),
        }
    }

    #[test]
    fn test_reverse_index_routes_ids_to_areas() {
        let mut areas = IndexMap::new();
        areas.insert("Financials".to_string(), vec![question("fin_1"), question("fin_2")]);
        areas.insert("Operations".to_string(), vec![question("ops_1")]);

        let catalog = QuestionCatalog::new(areas).unwrap();
        assert_eq!(catalog.area_of("fin_2"), Some("Financials"));
        assert_eq!(catalog.area_of("ops_1"), Some("Operations"));
        assert_eq!(catalog.area_of("missing"), None);
        assert_eq!(catalog.question_count(), 3);
    }

    #[test]
    fn test_duplicate_id_across_areas_rejected() {
        let mut areas = IndexMap::new();
        areas.insert("Financials".to_string(), vec![question("q_1")]);
        areas.insert("Operations".to_string(), vec![question("q_1")]);

        let err = QuestionCatalog::new(areas).unwrap_err();
        assert!(matches!(err, RefDataError::DuplicateQuestionId(id) if id == "q_1"));
    }

    #[test]
    fn test_areas_preserve_insertion_order() {
        let mut areas = IndexMap::new();
        areas.insert("Zeta".to_string(), vec![question("z_1")]);
        areas.insert("Alpha".to_string(), vec![question("a_1")]);

        let catalog = QuestionCatalog::new(areas).unwrap();
        let names: Vec<&str> = catalog.areas().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"], "catalog order, not sorted");
    }

    #[test]
    fn test_question_type_field_renamed() {
        let question: Question = serde_json::from_str(
            r#"{"id": "fin_1", "type": "Confidence", "text": "How confident are you?"}"#,
        )
        .unwrap();
        assert_eq!(question.kind, "Confidence");
    }
}
