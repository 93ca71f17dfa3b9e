//! The backend contract: one async method per REST endpoint.
//!
//! Implemented over HTTP by `careerpath-client`, and in memory by its mock
//! backend for tests.

use async_trait::async_trait;

use crate::draft::{NewQuestion, NewRecommendation};
use crate::model::{
    Answer, AnsweredQuestion, NewTestRequest, PersonalizedTest, Question, Recommendation,
    StudentDashboard, TestRequest,
};
use crate::status::RequestStatus;

// ---------------------------------------------------------------------------
// Student endpoints
// ---------------------------------------------------------------------------

#[async_trait]
pub trait StudentApi: Send + Sync {
    /// `GET student/dashboard/`
    async fn student_dashboard(&self) -> anyhow::Result<StudentDashboard>;

    /// `GET student/test-requests/`
    async fn student_requests(&self) -> anyhow::Result<Vec<TestRequest>>;

    /// `POST student/test-requests/`
    async fn create_test_request(&self, request: &NewTestRequest) -> anyhow::Result<TestRequest>;

    /// `GET student/tests/`
    async fn student_tests(&self) -> anyhow::Result<Vec<PersonalizedTest>>;

    /// `GET student/tests/{id}/`
    async fn student_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest>;

    /// `POST student/tests/{id}/answer/`
    async fn submit_answer(&self, test_id: u64, answer: &Answer) -> anyhow::Result<()>;

    /// `POST student/tests/{id}/submit/`
    async fn submit_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest>;

    /// `GET student/recommendations/`
    async fn student_recommendations(&self) -> anyhow::Result<Vec<Recommendation>>;

    /// `GET student/recommendations/{id}/export/`, the raw PDF bytes.
    async fn export_recommendation(&self, recommendation_id: u64) -> anyhow::Result<Vec<u8>>;
}

// ---------------------------------------------------------------------------
// Admin endpoints
// ---------------------------------------------------------------------------

#[async_trait]
pub trait AdminApi: Send + Sync {
    /// `GET admin/test-requests/`, optionally filtered by status.
    async fn admin_requests(
        &self,
        status: Option<&RequestStatus>,
    ) -> anyhow::Result<Vec<TestRequest>>;

    /// `POST admin/test-requests/{id}/create-test/`
    async fn create_test(&self, request_id: u64) -> anyhow::Result<PersonalizedTest>;

    /// `GET admin/test-requests/{id}/test/`
    async fn admin_test_for_request(&self, request_id: u64) -> anyhow::Result<PersonalizedTest>;

    /// `GET admin/tests/{id}/`
    async fn admin_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest>;

    /// `POST admin/tests/{id}/questions/`
    async fn add_question(&self, test_id: u64, question: &NewQuestion)
        -> anyhow::Result<Question>;

    /// `POST admin/tests/{id}/assign/`
    async fn assign_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest>;

    /// `GET admin/tests/completed/`
    async fn completed_tests(&self) -> anyhow::Result<Vec<PersonalizedTest>>;

    /// `GET admin/tests/{id}/answers/`
    async fn test_answers(&self, test_id: u64) -> anyhow::Result<Vec<AnsweredQuestion>>;

    /// `POST admin/tests/{id}/recommendation/`
    async fn create_recommendation(
        &self,
        test_id: u64,
        recommendation: &NewRecommendation,
    ) -> anyhow::Result<Recommendation>;
}

/// Both halves of the backend contract.
pub trait CareerApi: StudentApi + AdminApi {}

impl<T: StudentApi + AdminApi> CareerApi for T {}
