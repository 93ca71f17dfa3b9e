//! In-memory backend for tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use careerpath_core::draft::{NewQuestion, NewRecommendation};
use careerpath_core::error::ApiError;
use careerpath_core::model::{
    Answer, AnswerOption, AnsweredQuestion, NewTestRequest, PersonalizedTest, Question,
    Recommendation, RoadmapStep, SelectedAnswer, StudentDashboard, TestRequest, TestSummary,
};
use careerpath_core::status::{RequestStatus, TestStatus};
use careerpath_core::traits::{AdminApi, StudentApi};

/// A mock careerpath backend that keeps requests, tests, answers and
/// recommendations in memory and applies the lifecycle rules the real
/// backend enforces.
pub struct MockApi {
    state: Mutex<State>,
    /// Number of calls made.
    call_count: AtomicU32,
}

#[derive(Default)]
struct State {
    next_id: u64,
    requests: BTreeMap<u64, TestRequest>,
    tests: BTreeMap<u64, PersonalizedTest>,
    /// test id -> question id -> option id
    answers: BTreeMap<u64, BTreeMap<u64, u64>>,
    /// test id -> recommendation
    recommendations: BTreeMap<u64, Recommendation>,
}

impl State {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn test_mut(&mut self, test_id: u64) -> Result<&mut PersonalizedTest, ApiError> {
        self.tests.get_mut(&test_id).ok_or_else(|| not_found("Test"))
    }

    fn set_request_status(&mut self, test_id: u64, status: RequestStatus) {
        let request_id = self
            .tests
            .get(&test_id)
            .and_then(|t| t.request.as_ref())
            .map(|r| r.id);
        if let Some(request) = request_id.and_then(|id| self.requests.get_mut(&id)) {
            request.status = status;
            request.updated_at = Some(Utc::now());
        }
    }

    fn summary(&self, test_id: u64) -> Option<TestSummary> {
        self.tests.get(&test_id).map(|t| TestSummary {
            id: t.id,
            status: t.status.clone(),
            assigned_at: t.assigned_at,
        })
    }

    /// A request with its linked test summary filled in.
    fn request_view(&self, request: &TestRequest) -> TestRequest {
        let mut view = request.clone();
        view.personalized_test = self
            .tests
            .values()
            .find(|t| t.request.as_ref().map(|r| r.id) == Some(request.id))
            .and_then(|t| self.summary(t.id));
        view
    }

    /// A test with its owning request refreshed.
    fn test_view(&self, test: &PersonalizedTest) -> PersonalizedTest {
        let mut view = test.clone();
        if let Some(request) = test
            .request
            .as_ref()
            .and_then(|r| self.requests.get(&r.id))
        {
            let mut request = request.clone();
            request.personalized_test = None;
            view.request = Some(request);
        }
        view
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Http {
        status: 404,
        message: format!("{what} not found."),
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Http {
        status: 400,
        message: message.to_string(),
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Get the number of calls made to this backend.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    fn record_call(&self) -> std::sync::MutexGuard<'_, State> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.state.lock().unwrap()
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StudentApi for MockApi {
    async fn student_dashboard(&self) -> anyhow::Result<StudentDashboard> {
        let state = self.record_call();
        let latest_request = state
            .requests
            .values()
            .max_by_key(|r| (r.created_at, r.id))
            .map(|r| state.request_view(r));
        let active_test = state
            .tests
            .values()
            .filter(|t| t.status == TestStatus::Assigned)
            .max_by_key(|t| t.id)
            .and_then(|t| state.summary(t.id));
        let recommendation = state.recommendations.values().last().cloned();
        Ok(StudentDashboard {
            latest_request,
            active_test,
            recommendation,
        })
    }

    async fn student_requests(&self) -> anyhow::Result<Vec<TestRequest>> {
        let state = self.record_call();
        Ok(state
            .requests
            .values()
            .rev()
            .map(|r| state.request_view(r))
            .collect())
    }

    async fn create_test_request(&self, request: &NewTestRequest) -> anyhow::Result<TestRequest> {
        let mut state = self.record_call();
        let id = state.allocate_id();
        let created = TestRequest {
            id,
            status: RequestStatus::Pending,
            interests_snapshot: request.interests_snapshot.clone(),
            qualification_snapshot: request.qualification_snapshot.clone(),
            created_at: Utc::now(),
            updated_at: None,
            student: None,
            personalized_test: None,
        };
        state.requests.insert(id, created.clone());
        Ok(created)
    }

    async fn student_tests(&self) -> anyhow::Result<Vec<PersonalizedTest>> {
        let state = self.record_call();
        Ok(state
            .tests
            .values()
            .filter(|t| t.status != TestStatus::Draft)
            .map(|t| state.test_view(t))
            .collect())
    }

    async fn student_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest> {
        let state = self.record_call();
        match state.tests.get(&test_id) {
            Some(test) if test.status != TestStatus::Draft => Ok(state.test_view(test)),
            _ => Err(not_found("Test").into()),
        }
    }

    async fn submit_answer(&self, test_id: u64, answer: &Answer) -> anyhow::Result<()> {
        let mut state = self.record_call();
        let test = state.test_mut(test_id)?;
        if !test.status.accepts_answers() {
            return Err(rejected("This test is not accepting answers.").into());
        }
        let question = test
            .questions
            .iter()
            .find(|q| q.id == answer.question_id)
            .ok_or_else(|| not_found("Question"))?;
        if !question.options.iter().any(|o| o.id == answer.option_id) {
            return Err(rejected("Option does not belong to question").into());
        }
        state
            .answers
            .entry(test_id)
            .or_default()
            .insert(answer.question_id, answer.option_id);
        Ok(())
    }

    async fn submit_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest> {
        let mut state = self.record_call();
        let test = state.test_mut(test_id)?;
        if !test.status.can_advance_to(&TestStatus::Completed) || !test.status.accepts_answers() {
            return Err(rejected("Only assigned tests can be submitted.").into());
        }
        test.status = TestStatus::Completed;
        test.completed_at = Some(Utc::now());
        state.set_request_status(test_id, RequestStatus::Completed);
        let test = &state.tests[&test_id];
        Ok(state.test_view(test))
    }

    async fn student_recommendations(&self) -> anyhow::Result<Vec<Recommendation>> {
        let state = self.record_call();
        Ok(state.recommendations.values().cloned().collect())
    }

    async fn export_recommendation(&self, recommendation_id: u64) -> anyhow::Result<Vec<u8>> {
        let state = self.record_call();
        let recommendation = state
            .recommendations
            .values()
            .find(|r| r.id == Some(recommendation_id))
            .ok_or_else(|| not_found("Recommendation"))?;
        Ok(format!("%PDF-1.4\n% {}\n%%EOF\n", recommendation.career_name).into_bytes())
    }
}

#[async_trait]
impl AdminApi for MockApi {
    async fn admin_requests(
        &self,
        status: Option<&RequestStatus>,
    ) -> anyhow::Result<Vec<TestRequest>> {
        let state = self.record_call();
        Ok(state
            .requests
            .values()
            .filter(|r| status.map_or(true, |s| &r.status == s))
            .map(|r| state.request_view(r))
            .collect())
    }

    async fn create_test(&self, request_id: u64) -> anyhow::Result<PersonalizedTest> {
        let mut state = self.record_call();
        let request = state
            .requests
            .get(&request_id)
            .cloned()
            .ok_or_else(|| not_found("Request"))?;
        if request.status != RequestStatus::Pending {
            return Err(rejected("A test already exists for this request.").into());
        }
        let id = state.allocate_id();
        let test = PersonalizedTest {
            id,
            status: TestStatus::Draft,
            assigned_at: None,
            completed_at: None,
            request: Some(request),
            questions: Vec::new(),
        };
        state.tests.insert(id, test);
        if let Some(request) = state.requests.get_mut(&request_id) {
            request.status = RequestStatus::InProgress;
        }
        let test = &state.tests[&id];
        Ok(state.test_view(test))
    }

    async fn admin_test_for_request(&self, request_id: u64) -> anyhow::Result<PersonalizedTest> {
        let state = self.record_call();
        let test = state
            .tests
            .values()
            .find(|t| t.request.as_ref().map(|r| r.id) == Some(request_id))
            .ok_or_else(|| not_found("Test"))?;
        Ok(state.test_view(test))
    }

    async fn admin_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest> {
        let state = self.record_call();
        let test = state.tests.get(&test_id).ok_or_else(|| not_found("Test"))?;
        Ok(state.test_view(test))
    }

    async fn add_question(
        &self,
        test_id: u64,
        question: &NewQuestion,
    ) -> anyhow::Result<Question> {
        let mut state = self.record_call();
        if !state.test_mut(test_id)?.status.is_editable() {
            return Err(rejected("Questions cannot be changed after the test is assigned.").into());
        }
        let question_id = state.allocate_id();
        let mut options = Vec::with_capacity(question.options.len());
        for option in &question.options {
            options.push(AnswerOption {
                id: state.allocate_id(),
                label: option.label.clone(),
                description: option.description.clone(),
                order: option.order,
            });
        }
        let created = Question {
            id: question_id,
            prompt: question.prompt.clone(),
            order: question.order,
            options,
        };
        state.test_mut(test_id)?.questions.push(created.clone());
        Ok(created)
    }

    async fn assign_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest> {
        let mut state = self.record_call();
        let test = state.test_mut(test_id)?;
        if !test.status.can_advance_to(&TestStatus::Assigned) {
            return Err(rejected("This test has already been assigned.").into());
        }
        if test.questions.is_empty() {
            return Err(rejected("Add at least one question before assigning.").into());
        }
        test.status = TestStatus::Assigned;
        test.assigned_at = Some(Utc::now());
        state.set_request_status(test_id, RequestStatus::Assigned);
        let test = &state.tests[&test_id];
        Ok(state.test_view(test))
    }

    async fn completed_tests(&self) -> anyhow::Result<Vec<PersonalizedTest>> {
        let state = self.record_call();
        Ok(state
            .tests
            .values()
            .filter(|t| t.status == TestStatus::Completed)
            .map(|t| state.test_view(t))
            .collect())
    }

    async fn test_answers(&self, test_id: u64) -> anyhow::Result<Vec<AnsweredQuestion>> {
        let state = self.record_call();
        let test = state.tests.get(&test_id).ok_or_else(|| not_found("Test"))?;
        let answers = state.answers.get(&test_id);
        Ok(test
            .questions
            .iter()
            .map(|q| AnsweredQuestion {
                id: q.id,
                prompt: q.prompt.clone(),
                order: q.order,
                options: q.options.clone(),
                selected_answer: answers
                    .and_then(|a| a.get(&q.id))
                    .map(|&option_id| SelectedAnswer {
                        option_id,
                        submitted_at: None,
                    }),
            })
            .collect())
    }

    async fn create_recommendation(
        &self,
        test_id: u64,
        recommendation: &NewRecommendation,
    ) -> anyhow::Result<Recommendation> {
        let mut state = self.record_call();
        if state.test_mut(test_id)?.status != TestStatus::Completed {
            return Err(rejected("Recommendations require a completed test.").into());
        }
        if state.recommendations.contains_key(&test_id) {
            return Err(rejected("This test already has a recommendation.").into());
        }
        let id = state.allocate_id();
        let mut steps = Vec::with_capacity(recommendation.steps.len());
        for step in &recommendation.steps {
            steps.push(RoadmapStep {
                id: Some(state.allocate_id()),
                order: step.order,
                title: step.title.clone(),
                description: step.description.clone(),
            });
        }
        let created = Recommendation {
            id: Some(id),
            career_name: recommendation.career_name.clone(),
            summary: recommendation.summary.clone(),
            created_at: Some(Utc::now()),
            steps,
        };
        state.recommendations.insert(test_id, created.clone());
        Ok(created)
    }
}
