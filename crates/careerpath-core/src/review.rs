//! Admin review of a completed test's answers.

use crate::model::{AnswerOption, AnsweredQuestion};

/// An option paired with whether the student picked it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkedOption<'a> {
    pub option: &'a AnswerOption,
    pub selected: bool,
}

/// The question's options in display order, with exactly the option whose id
/// matches `selected_answer.option_id` marked. Nothing is marked when the
/// question was left unanswered.
pub fn mark_options(question: &AnsweredQuestion) -> Vec<MarkedOption<'_>> {
    let selected_id = question.selected_answer.as_ref().map(|a| a.option_id);
    let mut options: Vec<&AnswerOption> = question.options.iter().collect();
    options.sort_by_key(|o| o.order);
    options
        .into_iter()
        .map(|option| MarkedOption {
            option,
            selected: Some(option.id) == selected_id,
        })
        .collect()
}

/// Counts for the header of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSummary {
    pub questions: usize,
    pub answered: usize,
}

/// Whether the selected answer names one of the question's own options.
pub fn is_answered(question: &AnsweredQuestion) -> bool {
    question
        .selected_answer
        .as_ref()
        .is_some_and(|a| question.options.iter().any(|o| o.id == a.option_id))
}

pub fn summarize(questions: &[AnsweredQuestion]) -> ReviewSummary {
    ReviewSummary {
        questions: questions.len(),
        answered: questions.iter().filter(|q| is_answered(q)).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SelectedAnswer;

    fn question(selected: Option<u64>) -> AnsweredQuestion {
        AnsweredQuestion {
            id: 10,
            prompt: "Which scenario energizes you?".into(),
            order: 0,
            options: vec![
                AnswerOption { id: 102, label: "User interviews".into(), description: String::new(), order: 2 },
                AnswerOption { id: 100, label: "Launching a feature".into(), description: String::new(), order: 0 },
                AnswerOption { id: 101, label: "Design jam".into(), description: String::new(), order: 1 },
            ],
            selected_answer: selected.map(|option_id| SelectedAnswer {
                option_id,
                submitted_at: None,
            }),
        }
    }

    #[test]
    fn marks_exactly_the_selected_option() {
        let q = question(Some(101));
        let marked = mark_options(&q);
        let selected: Vec<u64> = marked
            .iter()
            .filter(|m| m.selected)
            .map(|m| m.option.id)
            .collect();
        assert_eq!(selected, vec![101]);
        let ids: Vec<u64> = marked.iter().map(|m| m.option.id).collect();
        assert_eq!(ids, vec![100, 101, 102]);
    }

    #[test]
    fn unanswered_marks_nothing() {
        let q = question(None);
        assert!(mark_options(&q).iter().all(|m| !m.selected));
    }

    #[test]
    fn summary_ignores_foreign_option_ids() {
        let questions = vec![question(Some(100)), question(None), question(Some(999))];
        assert_eq!(
            summarize(&questions),
            ReviewSummary { questions: 3, answered: 1 }
        );
        assert!(is_answered(&questions[0]));
        assert!(!is_answered(&questions[2]));
    }
}
