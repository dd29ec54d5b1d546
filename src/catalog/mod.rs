//! Question catalog
//!
//! The catalog is the long-lived, read-only collection of categories a
//! game draws from. Categories are shared with the rounds that use them
//! through [`Arc`], never copied.

pub mod question;

use std::sync::Arc;

use garde::Validate;
use serde::{Deserialize, Serialize};

pub use question::{Answer, Presentation, Question};

/// A named collection of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Category {
    /// Name shown on the category selector
    #[garde(length(chars, min = 1, max = crate::constants::catalog::MAX_CATEGORY_NAME_LENGTH))]
    name: String,
    /// Questions in stored order
    #[garde(length(min = 1), dive)]
    questions: Vec<Question>,
}

impl Category {
    /// Creates a category
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }

    /// The category name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All questions of the category
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question stored at `index`
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the category holds no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Every category available to the game
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Catalog {
    #[garde(length(min = 1), dive)]
    categories: Vec<Category>,
}

impl Catalog {
    /// Builds a validated catalog
    ///
    /// # Errors
    ///
    /// Returns the validation report if a category or question is malformed.
    pub fn new(categories: Vec<Category>) -> Result<Self, garde::Report> {
        let catalog = Self { categories };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Converts the catalog into shared category handles
    pub fn into_shared(self) -> Vec<Arc<Category>> {
        self.categories.into_iter().map(Arc::new).collect()
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether the catalog holds no categories
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn create_test_question(n: usize) -> Question {
        Question::new(
            format!("Question {n}"),
            vec![
                Answer::correct(format!("Right {n}")),
                Answer::wrong(format!("Wrong {n}a")),
                Answer::wrong(format!("Wrong {n}b")),
            ],
        )
    }

    pub(crate) fn create_test_category(name: &str, question_count: usize) -> Category {
        Category::new(name, (0..question_count).map(create_test_question).collect())
    }

    pub(crate) fn create_test_catalog(names: &[&str], question_count: usize) -> Catalog {
        Catalog::new(
            names
                .iter()
                .map(|name| create_test_category(name, question_count))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_catalog_validation() {
        let catalog = create_test_catalog(&["History", "Science"], 3);
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        assert!(Catalog::new(vec![]).is_err());
    }

    #[test]
    fn test_empty_category_is_rejected() {
        assert!(Catalog::new(vec![Category::new("Empty", vec![])]).is_err());
    }

    #[test]
    fn test_invalid_question_is_rejected() {
        let broken = Question::new("?", vec![Answer::wrong("a"), Answer::wrong("b")]);
        assert!(Catalog::new(vec![Category::new("Broken", vec![broken])]).is_err());
    }

    #[test]
    fn test_into_shared_keeps_order() {
        let shared = create_test_catalog(&["History", "Science", "Art"], 1).into_shared();
        let names: Vec<_> = shared.iter().map(|c| c.name().to_owned()).collect();
        assert_eq!(names, vec!["History", "Science", "Art"]);
    }

    #[test]
    fn test_category_accessors() {
        let category = create_test_category("History", 2);
        assert_eq!(category.name(), "History");
        assert_eq!(category.len(), 2);
        assert_eq!(category.question(1).map(Question::prompt), Some("Question 1"));
        assert!(category.question(2).is_none());
    }

    #[test]
    fn test_catalog_deserialization() {
        let json = r#"{
            "categories": [{
                "name": "History",
                "questions": [{
                    "prompt": "Who?",
                    "answers": [
                        {"text": "Me", "correct": true},
                        {"text": "You", "correct": false}
                    ]
                }]
            }]
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.len(), 1);
    }
}
