use std::{collections::BTreeSet, fmt, fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Position-derived question identity, `"{category}-{position}"`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(category: usize, position: usize) -> Self {
        QuestionId(format!("{}-{}", category, position))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        QuestionId(value.to_string())
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub answer: String,
    pub value: i32,
    pub bonus: bool,
}

#[derive(Serialize, Clone, Debug)]
pub struct Category {
    pub title: String,
    pub questions: Vec<Question>,
}

/// Immutable question catalog, loaded once per session.
#[derive(Serialize, Clone, Debug)]
pub struct Catalog {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct CatalogFile {
    categories: Vec<CategoryFile>,
}

#[derive(Deserialize)]
struct CategoryFile {
    title: String,
    questions: Vec<QuestionFile>,
}

#[derive(Deserialize)]
struct QuestionFile {
    question: String,
    answer: String,
    value: i32,
    #[serde(default)]
    bonus: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct BoardCell {
    pub id: QuestionId,
    pub value: i32,
    pub bonus: bool,
    pub used: bool,
}

/// Grid view of the catalog: one column per category, one row per question index.
#[derive(Serialize, Clone, Debug)]
pub struct Board {
    pub titles: Vec<String>,
    pub rows: Vec<Vec<Option<BoardCell>>>,
}

impl Catalog {
    pub fn new(categories: Vec<Category>) -> Result<Catalog> {
        let catalog = Catalog { categories };
        if catalog.total_questions() == 0 {
            return Err(GameError::EmptyCatalog);
        }
        if let Some(question) = catalog
            .categories
            .iter()
            .flat_map(|c| c.questions.iter())
            .find(|question| question.value <= 0)
        {
            return Err(GameError::InvalidQuestionValue {
                id: question.id.clone(),
                value: question.value,
            });
        }
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Catalog> {
        let file: CatalogFile = serde_json::from_str(json)?;

        let categories = file
            .categories
            .into_iter()
            .enumerate()
            .map(|(c, category)| Category {
                title: category.title,
                questions: category
                    .questions
                    .into_iter()
                    .enumerate()
                    .map(|(i, question)| Question {
                        id: QuestionId::new(c, i),
                        prompt: question.question,
                        answer: question.answer,
                        value: question.value,
                        bonus: question.bonus,
                    })
                    .collect(),
            })
            .collect();

        Catalog::new(categories)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Catalog> {
        let json = fs::read_to_string(path)?;
        Catalog::from_json(&json)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn total_questions(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.find(id).is_some()
    }

    pub fn find(&self, id: &QuestionId) -> Option<(&Category, &Question)> {
        self.categories.iter().find_map(|category| {
            category
                .questions
                .iter()
                .find(|question| &question.id == id)
                .map(|question| (category, question))
        })
    }

    pub fn board(&self, used: &BTreeSet<QuestionId>) -> Board {
        let row_count = self
            .categories
            .iter()
            .map(|c| c.questions.len())
            .max()
            .unwrap_or(0);

        let rows = (0..row_count)
            .map(|row| {
                self.categories
                    .iter()
                    .map(|category| {
                        category.questions.get(row).map(|question| BoardCell {
                            id: question.id.clone(),
                            value: question.value,
                            bonus: question.bonus,
                            used: used.contains(&question.id),
                        })
                    })
                    .collect()
            })
            .collect();

        Board {
            titles: self.categories.iter().map(|c| c.title.clone()).collect(),
            rows,
        }
    }
}

/// Builds a catalog of `categories` columns with `per_category` questions each, all worth `value`.
#[cfg(test)]
pub fn test_catalog(categories: usize, per_category: usize, value: i32) -> Catalog {
    let categories = (0..categories)
        .map(|c| Category {
            title: format!("Category {}", c + 1),
            questions: (0..per_category)
                .map(|i| Question {
                    id: QuestionId::new(c, i),
                    prompt: format!("Question {}-{}?", c + 1, i + 1),
                    answer: format!("Answer {}-{}", c + 1, i + 1),
                    value,
                    bonus: false,
                })
                .collect(),
        })
        .collect();

    Catalog { categories }
}
