//! Core data model types for careerpath.
//!
//! These mirror the JSON shapes the backend returns. Unknown fields are
//! ignored and optional fields default, so older or newer backends decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::status::{RequestStatus, TestStatus};

/// The role a signed-in user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<u64>,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub interests: String,
}

impl User {
    /// Full name if one is set, otherwise the email.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.email.clone()
        } else {
            full.to_string()
        }
    }
}

/// A student's ask for a personalized assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRequest {
    pub id: u64,
    pub status: RequestStatus,
    /// Interests copied from the profile when the request was created.
    #[serde(default)]
    pub interests_snapshot: String,
    /// Qualification copied from the profile when the request was created.
    #[serde(default)]
    pub qualification_snapshot: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub student: Option<User>,
    #[serde(default)]
    pub personalized_test: Option<TestSummary>,
}

/// The short form of a personalized test embedded in a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    pub id: u64,
    pub status: TestStatus,
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
}

/// Body for `POST student/test-requests/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTestRequest {
    pub interests_snapshot: String,
    pub qualification_snapshot: String,
}

/// The MCQ instrument an admin builds for a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalizedTest {
    pub id: u64,
    pub status: TestStatus,
    #[serde(default)]
    pub assigned_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub request: Option<TestRequest>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl PersonalizedTest {
    /// Order value for the next appended question (0-based, like options).
    pub fn next_question_order(&self) -> u32 {
        self.questions.len() as u32
    }

    /// Questions sorted by their `order` field.
    pub fn ordered_questions(&self) -> Vec<&Question> {
        let mut questions: Vec<&Question> = self.questions.iter().collect();
        questions.sort_by_key(|q| q.order);
        questions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    pub prompt: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Options sorted by their `order` field.
    pub fn ordered_options(&self) -> Vec<&AnswerOption> {
        let mut options: Vec<&AnswerOption> = self.options.iter().collect();
        options.sort_by_key(|o| o.order);
        options
    }
}

/// One choice of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: u64,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
}

/// Body for `POST student/tests/{id}/answer/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: u64,
    pub option_id: u64,
}

/// The option a student picked, as shown in the admin review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedAnswer {
    pub option_id: u64,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// A question of a completed test together with the student's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub id: u64,
    pub prompt: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub selected_answer: Option<SelectedAnswer>,
}

/// Career guidance published after a test is reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub id: Option<u64>,
    pub career_name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub steps: Vec<RoadmapStep>,
}

impl Recommendation {
    /// Steps sorted by their `order` field.
    pub fn ordered_steps(&self) -> Vec<&RoadmapStep> {
        let mut steps: Vec<&RoadmapStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.order);
        steps
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapStep {
    #[serde(default)]
    pub id: Option<u64>,
    pub order: u32,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Aggregate view behind the student dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentDashboard {
    #[serde(default)]
    pub latest_request: Option<TestRequest>,
    #[serde(default)]
    pub active_test: Option<TestSummary>,
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
}

/// A list response, either a bare array or a paginated `{results: [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Paginated { results } => results,
            Listing::Bare(items) => items,
        }
    }
}

/// Response of `admin/tests/{id}/answers/`: a bare list of answered
/// questions or an object carrying them under `questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerSheet {
    Bare(Vec<AnsweredQuestion>),
    Wrapped { questions: Vec<AnsweredQuestion> },
}

impl AnswerSheet {
    pub fn into_vec(self) -> Vec<AnsweredQuestion> {
        match self {
            AnswerSheet::Wrapped { questions } => questions,
            AnswerSheet::Bare(items) => items,
        }
    }
}
