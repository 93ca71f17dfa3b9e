//! In-memory drafts for admin authoring.
//!
//! A [`QuestionDraft`] holds a prompt and its options, a
//! [`RecommendationDraft`] holds a career summary and its roadmap steps.
//! Removing an entry renumbers the rest so `order` stays contiguous: options
//! count from 0, steps from 1. Validation runs before any request is sent.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::DraftError;

/// Fewest options a multiple-choice question may have.
pub const MIN_OPTIONS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDraft {
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionDraft {
    pub prompt: String,
    options: Vec<OptionDraft>,
}

impl QuestionDraft {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            options: Vec::new(),
        }
    }

    pub fn options(&self) -> &[OptionDraft] {
        &self.options
    }

    /// Append an option at the end; returns its position.
    pub fn add_option(&mut self, label: impl Into<String>, description: impl Into<String>) -> usize {
        let index = self.options.len();
        self.options.push(OptionDraft {
            label: label.into(),
            description: description.into(),
            order: index as u32,
        });
        index
    }

    pub fn edit_option(
        &mut self,
        index: usize,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), DraftError> {
        let len = self.options.len();
        let option = self
            .options
            .get_mut(index)
            .ok_or(DraftError::OutOfRange { index, len })?;
        option.label = label.into();
        option.description = description.into();
        Ok(())
    }

    /// Remove the option at `index` and renumber the rest `0..n-1`.
    pub fn remove_option(&mut self, index: usize) -> Result<OptionDraft, DraftError> {
        let len = self.options.len();
        if index >= len {
            return Err(DraftError::OutOfRange { index, len });
        }
        let removed = self.options.remove(index);
        for (position, option) in self.options.iter_mut().enumerate() {
            option.order = position as u32;
        }
        Ok(removed)
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.prompt.trim().is_empty() {
            return Err(DraftError::MissingField("prompt"));
        }
        if self.options.len() < MIN_OPTIONS {
            return Err(DraftError::TooFewOptions {
                min: MIN_OPTIONS,
                found: self.options.len(),
            });
        }
        if let Some(position) = self.options.iter().position(|o| o.label.trim().is_empty()) {
            return Err(DraftError::EmptyOptionLabel(position + 1));
        }
        Ok(())
    }

    /// Validate and build the request body for `admin/tests/{id}/questions/`.
    pub fn to_payload(&self, order: u32) -> Result<NewQuestion, DraftError> {
        self.validate()?;
        Ok(NewQuestion {
            prompt: self.prompt.trim().to_string(),
            order,
            options: self
                .options
                .iter()
                .map(|o| OptionDraft {
                    label: o.label.trim().to_string(),
                    description: o.description.trim().to_string(),
                    order: o.order,
                })
                .collect(),
        })
    }
}

/// Body for `POST admin/tests/{id}/questions/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub prompt: String,
    pub order: u32,
    pub options: Vec<OptionDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDraft {
    pub order: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationDraft {
    pub career_name: String,
    pub summary: String,
    steps: Vec<StepDraft>,
}

impl RecommendationDraft {
    pub fn new(career_name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            career_name: career_name.into(),
            summary: summary.into(),
            steps: Vec::new(),
        }
    }

    pub fn steps(&self) -> &[StepDraft] {
        &self.steps
    }

    /// Append a step at the end; returns its position.
    pub fn add_step(&mut self, title: impl Into<String>, description: impl Into<String>) -> usize {
        let index = self.steps.len();
        self.steps.push(StepDraft {
            order: index as u32 + 1,
            title: title.into(),
            description: description.into(),
        });
        index
    }

    pub fn edit_step(
        &mut self,
        index: usize,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), DraftError> {
        let len = self.steps.len();
        let step = self
            .steps
            .get_mut(index)
            .ok_or(DraftError::OutOfRange { index, len })?;
        step.title = title.into();
        step.description = description.into();
        Ok(())
    }

    /// Remove the step at `index` and renumber the rest `1..=n-1`.
    pub fn remove_step(&mut self, index: usize) -> Result<StepDraft, DraftError> {
        let len = self.steps.len();
        if index >= len {
            return Err(DraftError::OutOfRange { index, len });
        }
        let removed = self.steps.remove(index);
        for (position, step) in self.steps.iter_mut().enumerate() {
            step.order = position as u32 + 1;
        }
        Ok(removed)
    }

    pub fn validate(&self) -> Result<(), DraftError> {
        if self.career_name.trim().is_empty() {
            return Err(DraftError::MissingField("career name"));
        }
        if self.summary.trim().is_empty() {
            return Err(DraftError::MissingField("summary"));
        }
        if self.steps.is_empty() {
            return Err(DraftError::NoSteps);
        }
        if let Some(position) = self.steps.iter().position(|s| s.title.trim().is_empty()) {
            return Err(DraftError::EmptyStepTitle(position + 1));
        }
        Ok(())
    }

    /// Validate and build the body for `admin/tests/{id}/recommendation/`.
    pub fn to_payload(&self) -> Result<NewRecommendation, DraftError> {
        self.validate()?;
        Ok(NewRecommendation {
            career_name: self.career_name.trim().to_string(),
            summary: self.summary.trim().to_string(),
            steps: self
                .steps
                .iter()
                .map(|s| StepDraft {
                    order: s.order,
                    title: s.title.trim().to_string(),
                    description: s.description.trim().to_string(),
                })
                .collect(),
        })
    }
}

/// Body for `POST admin/tests/{id}/recommendation/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecommendation {
    pub career_name: String,
    pub summary: String,
    pub steps: Vec<StepDraft>,
}

// ---------------------------------------------------------------------------
// TOML draft files
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    prompt: String,
    #[serde(default)]
    options: Vec<TomlEntry>,
}

#[derive(Debug, Deserialize)]
struct TomlRecommendation {
    career_name: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    steps: Vec<TomlEntry>,
}

/// One `[[options]]` or `[[steps]]` table. Either `label` or `title` names
/// the entry; order comes from position in the file.
#[derive(Debug, Deserialize)]
struct TomlEntry {
    #[serde(default, alias = "title")]
    label: String,
    #[serde(default)]
    description: String,
}

/// Parse a question draft from TOML text.
pub fn parse_question_draft(content: &str) -> Result<QuestionDraft> {
    let file: TomlQuestion = toml::from_str(content).context("invalid question draft")?;
    let mut draft = QuestionDraft::new(file.prompt);
    for entry in file.options {
        draft.add_option(entry.label, entry.description);
    }
    Ok(draft)
}

/// Parse a recommendation draft from TOML text.
pub fn parse_recommendation_draft(content: &str) -> Result<RecommendationDraft> {
    let file: TomlRecommendation =
        toml::from_str(content).context("invalid recommendation draft")?;
    let mut draft = RecommendationDraft::new(file.career_name, file.summary);
    for entry in file.steps {
        draft.add_step(entry.label, entry.description);
    }
    Ok(draft)
}

pub fn load_question_draft(path: &Path) -> Result<QuestionDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question draft: {}", path.display()))?;
    let draft = parse_question_draft(&content).with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(path = %path.display(), options = draft.options.len(), "loaded question draft");
    Ok(draft)
}

pub fn load_recommendation_draft(path: &Path) -> Result<RecommendationDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read recommendation draft: {}", path.display()))?;
    let draft =
        parse_recommendation_draft(&content).with_context(|| format!("in {}", path.display()))?;
    tracing::debug!(path = %path.display(), steps = draft.steps.len(), "loaded recommendation draft");
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_options() -> QuestionDraft {
        let mut draft = QuestionDraft::new("Which scenario energizes you the most?");
        draft.add_option("Launching a feature", "");
        draft.add_option("Design jam with peers", "");
        draft.add_option("User interviews", "");
        draft.add_option("Strategy whiteboard", "");
        draft
    }

    #[test]
    fn remove_option_renumbers_contiguously() {
        for k in 0..4 {
            let mut draft = four_options();
            let before: Vec<String> = draft.options().iter().map(|o| o.label.clone()).collect();
            let removed = draft.remove_option(k).unwrap();
            assert_eq!(removed.label, before[k]);

            let orders: Vec<u32> = draft.options().iter().map(|o| o.order).collect();
            assert_eq!(orders, vec![0, 1, 2]);

            let mut expected = before.clone();
            expected.remove(k);
            let labels: Vec<String> = draft.options().iter().map(|o| o.label.clone()).collect();
            assert_eq!(labels, expected);
        }
    }

    #[test]
    fn remove_option_out_of_range_leaves_draft_untouched() {
        let mut draft = four_options();
        let err = draft.remove_option(4).unwrap_err();
        assert_eq!(err, DraftError::OutOfRange { index: 4, len: 4 });
        assert_eq!(draft.options().len(), 4);
    }

    #[test]
    fn empty_option_label_is_rejected() {
        let mut draft = four_options();
        draft.edit_option(2, "   ", "blank").unwrap();
        assert_eq!(draft.validate(), Err(DraftError::EmptyOptionLabel(3)));
        assert!(draft.to_payload(0).is_err());
    }

    #[test]
    fn question_needs_prompt_and_two_options() {
        let mut draft = QuestionDraft::new("  ");
        draft.add_option("a", "");
        draft.add_option("b", "");
        assert_eq!(draft.validate(), Err(DraftError::MissingField("prompt")));

        let mut draft = QuestionDraft::new("Pick one");
        draft.add_option("only", "");
        assert_eq!(
            draft.validate(),
            Err(DraftError::TooFewOptions { min: 2, found: 1 })
        );
    }

    #[test]
    fn question_payload_trims_text() {
        let mut draft = QuestionDraft::new(" Pick one ");
        draft.add_option(" A ", " first ");
        draft.add_option("B", "");
        let payload = draft.to_payload(3).unwrap();
        assert_eq!(payload.prompt, "Pick one");
        assert_eq!(payload.order, 3);
        assert_eq!(payload.options[0].label, "A");
        assert_eq!(payload.options[0].description, "first");
        assert_eq!(payload.options[1].order, 1);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["options"][1]["label"], "B");
    }

    #[test]
    fn remove_step_renumbers_from_one() {
        let mut draft = RecommendationDraft::new("UX Designer", "Design-led problem solver");
        draft.add_step("Explore UX foundations", "");
        draft.add_step("Shadow a mentor", "");
        draft.add_step("Start a design journal", "");
        draft.remove_step(0).unwrap();
        let steps: Vec<(u32, &str)> = draft
            .steps()
            .iter()
            .map(|s| (s.order, s.title.as_str()))
            .collect();
        assert_eq!(
            steps,
            vec![(1, "Shadow a mentor"), (2, "Start a design journal")]
        );
    }

    fn three_steps() -> RecommendationDraft {
        let mut draft = RecommendationDraft::new("UX Designer", "Design-led problem solver");
        draft.add_step("Explore UX foundations", "");
        draft.add_step("Shadow a mentor", "");
        draft.add_step("Start a design journal", "");
        draft
    }

    #[test]
    fn remove_step_out_of_range_leaves_draft_untouched() {
        let mut draft = three_steps();
        let before = draft.clone();
        let err = draft.remove_step(3).unwrap_err();
        assert_eq!(err, DraftError::OutOfRange { index: 3, len: 3 });
        assert_eq!(draft, before);
    }

    #[test]
    fn edit_step_keeps_order() {
        let mut draft = three_steps();
        draft
            .edit_step(1, "Shadow a senior designer", "Two afternoons a week")
            .unwrap();
        let step = &draft.steps()[1];
        assert_eq!(step.order, 2);
        assert_eq!(step.title, "Shadow a senior designer");
        assert_eq!(step.description, "Two afternoons a week");

        let before = draft.clone();
        let err = draft.edit_step(5, "x", "").unwrap_err();
        assert_eq!(err, DraftError::OutOfRange { index: 5, len: 3 });
        assert_eq!(draft, before);
    }

    #[test]
    fn recommendation_validation() {
        let draft = RecommendationDraft::new("UX Designer", "Summary");
        assert_eq!(draft.validate(), Err(DraftError::NoSteps));

        let mut draft = RecommendationDraft::new("", "Summary");
        draft.add_step("Step", "");
        assert_eq!(draft.validate(), Err(DraftError::MissingField("career name")));

        let mut draft = RecommendationDraft::new("UX Designer", "Summary");
        draft.add_step("Step", "");
        draft.add_step("", "no title");
        assert_eq!(draft.validate(), Err(DraftError::EmptyStepTitle(2)));
    }

    #[test]
    fn parse_question_file() {
        let draft = parse_question_draft(
            r#"
prompt = "Which scenario energizes you?"

[[options]]
label = "Launching a feature"
description = "Shipping to users"

[[options]]
label = "User interviews"
"#,
        )
        .unwrap();
        assert_eq!(draft.options().len(), 2);
        assert_eq!(draft.options()[1].order, 1);
        assert_eq!(draft.options()[0].description, "Shipping to users");
    }

    #[test]
    fn parse_recommendation_file_accepts_title() {
        let draft = parse_recommendation_draft(
            r#"
career_name = "Product Designer"
summary = "Blend of design and strategy."

[[steps]]
title = "Explore UX foundations"

[[steps]]
title = "Shadow a mentor"
description = "During the January sprint"
"#,
        )
        .unwrap();
        let orders: Vec<u32> = draft.steps().iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(draft.steps()[1].title, "Shadow a mentor");
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_question_draft(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read question draft"));
    }
}
