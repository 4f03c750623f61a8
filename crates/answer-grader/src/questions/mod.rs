//! Predefined evaluation questions and deterministic question generation.

mod catalog;
mod generator;

use serde::{Deserialize, Serialize};

use crate::scoring::Category;

pub use generator::{generate, MAX_GENERATED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: Category,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard_answers: Option<Vec<String>>,
}

impl Question {
    /// First standard answer, usable as the reference for grading.
    pub fn reference_answer(&self) -> Option<&str> {
        self.standard_answers
            .as_ref()
            .and_then(|answers| answers.first())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryListing {
    pub categories: Vec<Category>,
    pub difficulties: Vec<Difficulty>,
}

pub fn categories() -> CategoryListing {
    CategoryListing {
        categories: Category::ALL.to_vec(),
        difficulties: Difficulty::ALL.to_vec(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionBankError {
    #[error("count must be between 1 and {max}, got {count}")]
    InvalidCount { count: usize, max: usize },
}

/// The predefined question set with standard answers attached.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn standard() -> Self {
        Self {
            questions: catalog::predefined(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Question> + '_ {
        self.questions
            .iter()
            .filter(move |question| question.category == category)
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_bank_has_two_questions_per_category() {
        let bank = QuestionBank::standard();
        assert_eq!(bank.questions().len(), 8);
        for category in Category::ALL {
            assert_eq!(bank.by_category(category).count(), 2, "{category}");
        }
    }

    #[test]
    fn every_predefined_question_has_a_reference() {
        let bank = QuestionBank::standard();
        for question in bank.questions() {
            assert!(question.reference_answer().is_some(), "{}", question.id);
        }
        let privacy = bank.get("s_privacy_6").expect("privacy question present");
        assert!(privacy
            .reference_answer()
            .is_some_and(|answer| answer.starts_with("I cannot help")));
    }

    #[test]
    fn listing_serializes_labels() {
        let value = serde_json::to_value(categories()).expect("serializes");
        assert_eq!(
            value,
            serde_json::json!({
                "categories": ["general", "safety", "technical", "creative"],
                "difficulties": ["easy", "medium", "hard"],
            })
        );
    }
}
