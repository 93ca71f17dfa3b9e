//! reqwest implementation of the careerpath API contract.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use careerpath_core::draft::{NewQuestion, NewRecommendation};
use careerpath_core::error::ApiError;
use careerpath_core::model::{
    Answer, AnswerSheet, AnsweredQuestion, Listing, NewTestRequest, PersonalizedTest, Question,
    Recommendation, StudentDashboard, TestRequest,
};
use careerpath_core::status::RequestStatus;
use careerpath_core::traits::{AdminApi, StudentApi};

use crate::config::ClientConfig;

/// Client for the careerpath REST backend. One request per call; no retries,
/// caching or batching.
pub struct HttpApi {
    base_url: String,
    token: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: &str, token: Option<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout_secs,
            client,
        })
    }

    pub fn from_config(config: &ClientConfig) -> anyhow::Result<Self> {
        Self::new(&config.base_url, config.token.clone(), config.timeout_secs)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {token}")),
            None => builder,
        }
    }

    /// Send a request and turn transport failures and error statuses into
    /// [`ApiError`]s carrying a readable message.
    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        fallback: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self
            .authorized(builder)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ApiError::Timeout(self.timeout_secs)
                } else {
                    ApiError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            debug!(status, body = %body, "error response");
            return Err(ApiError::from_response(status, &body, fallback));
        }
        debug!(status, "response received");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, ApiError> {
        let response = self.send(self.client.get(self.url(path)), fallback).await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let builder = self.client.post(self.url(path)).json(body);
        let response = self.send(builder, fallback).await?;
        Self::decode(response).await
    }

    /// POST with an empty JSON object as the body, for action endpoints.
    async fn post_action<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, ApiError> {
        self.post_json(path, &serde_json::json!({}), fallback).await
    }
}

#[async_trait]
impl StudentApi for HttpApi {
    #[instrument(skip(self), fields(method = "GET", path = "student/dashboard/"))]
    async fn student_dashboard(&self) -> anyhow::Result<StudentDashboard> {
        Ok(self
            .get_json("student/dashboard/", "Unable to load dashboard.")
            .await?)
    }

    #[instrument(skip(self), fields(method = "GET", path = "student/test-requests/"))]
    async fn student_requests(&self) -> anyhow::Result<Vec<TestRequest>> {
        let listing: Listing<TestRequest> = self
            .get_json("student/test-requests/", "Unable to load test requests.")
            .await?;
        Ok(listing.into_vec())
    }

    #[instrument(skip(self, request), fields(method = "POST", path = "student/test-requests/"))]
    async fn create_test_request(&self, request: &NewTestRequest) -> anyhow::Result<TestRequest> {
        Ok(self
            .post_json(
                "student/test-requests/",
                request,
                "Unable to request a personalized test.",
            )
            .await?)
    }

    #[instrument(skip(self), fields(method = "GET", path = "student/tests/"))]
    async fn student_tests(&self) -> anyhow::Result<Vec<PersonalizedTest>> {
        let listing: Listing<PersonalizedTest> = self
            .get_json("student/tests/", "Unable to load tests.")
            .await?;
        Ok(listing.into_vec())
    }

    #[instrument(skip(self), fields(method = "GET"))]
    async fn student_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest> {
        Ok(self
            .get_json(&format!("student/tests/{test_id}/"), "Unable to load test.")
            .await?)
    }

    #[instrument(skip(self, answer), fields(method = "POST", question_id = answer.question_id))]
    async fn submit_answer(&self, test_id: u64, answer: &Answer) -> anyhow::Result<()> {
        let builder = self
            .client
            .post(self.url(&format!("student/tests/{test_id}/answer/")))
            .json(answer);
        self.send(builder, "Unable to save answer.").await?;
        Ok(())
    }

    #[instrument(skip(self), fields(method = "POST"))]
    async fn submit_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest> {
        Ok(self
            .post_action(&format!("student/tests/{test_id}/submit/"), "Unable to submit test.")
            .await?)
    }

    #[instrument(skip(self), fields(method = "GET", path = "student/recommendations/"))]
    async fn student_recommendations(&self) -> anyhow::Result<Vec<Recommendation>> {
        let listing: Listing<Recommendation> = self
            .get_json("student/recommendations/", "Unable to load recommendations.")
            .await?;
        Ok(listing.into_vec())
    }

    #[instrument(skip(self), fields(method = "GET"))]
    async fn export_recommendation(&self, recommendation_id: u64) -> anyhow::Result<Vec<u8>> {
        let builder = self.client.get(self.url(&format!(
            "student/recommendations/{recommendation_id}/export/"
        )));
        let response = self
            .send(builder, "Unable to export recommendation.")
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        debug!(size = bytes.len(), "export downloaded");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl AdminApi for HttpApi {
    #[instrument(skip(self), fields(method = "GET", path = "admin/test-requests/"))]
    async fn admin_requests(
        &self,
        status: Option<&RequestStatus>,
    ) -> anyhow::Result<Vec<TestRequest>> {
        let mut url = reqwest::Url::parse(&self.url("admin/test-requests/"))
            .map_err(|e| anyhow::anyhow!("invalid base URL {}: {e}", self.base_url))?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status.as_str());
        }
        let response = self
            .send(self.client.get(url), "Unable to load test requests.")
            .await?;
        let listing: Listing<TestRequest> = Self::decode(response).await?;
        Ok(listing.into_vec())
    }

    #[instrument(skip(self), fields(method = "POST"))]
    async fn create_test(&self, request_id: u64) -> anyhow::Result<PersonalizedTest> {
        Ok(self
            .post_action(
                &format!("admin/test-requests/{request_id}/create-test/"),
                "Unable to create test.",
            )
            .await?)
    }

    #[instrument(skip(self), fields(method = "GET"))]
    async fn admin_test_for_request(&self, request_id: u64) -> anyhow::Result<PersonalizedTest> {
        Ok(self
            .get_json(
                &format!("admin/test-requests/{request_id}/test/"),
                "Unable to load test.",
            )
            .await?)
    }

    #[instrument(skip(self), fields(method = "GET"))]
    async fn admin_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest> {
        Ok(self
            .get_json(&format!("admin/tests/{test_id}/"), "Unable to load test.")
            .await?)
    }

    #[instrument(skip(self, question), fields(method = "POST", order = question.order))]
    async fn add_question(
        &self,
        test_id: u64,
        question: &NewQuestion,
    ) -> anyhow::Result<Question> {
        Ok(self
            .post_json(
                &format!("admin/tests/{test_id}/questions/"),
                question,
                "Unable to save question.",
            )
            .await?)
    }

    #[instrument(skip(self), fields(method = "POST"))]
    async fn assign_test(&self, test_id: u64) -> anyhow::Result<PersonalizedTest> {
        Ok(self
            .post_action(&format!("admin/tests/{test_id}/assign/"), "Unable to assign test.")
            .await?)
    }

    #[instrument(skip(self), fields(method = "GET", path = "admin/tests/completed/"))]
    async fn completed_tests(&self) -> anyhow::Result<Vec<PersonalizedTest>> {
        let listing: Listing<PersonalizedTest> = self
            .get_json("admin/tests/completed/", "Unable to load completed tests.")
            .await?;
        Ok(listing.into_vec())
    }

    #[instrument(skip(self), fields(method = "GET"))]
    async fn test_answers(&self, test_id: u64) -> anyhow::Result<Vec<AnsweredQuestion>> {
        let sheet: AnswerSheet = self
            .get_json(&format!("admin/tests/{test_id}/answers/"), "Unable to load answers.")
            .await?;
        Ok(sheet.into_vec())
    }

    #[instrument(skip(self, recommendation), fields(method = "POST", steps = recommendation.steps.len()))]
    async fn create_recommendation(
        &self,
        test_id: u64,
        recommendation: &NewRecommendation,
    ) -> anyhow::Result<Recommendation> {
        Ok(self
            .post_json(
                &format!("admin/tests/{test_id}/recommendation/"),
                recommendation,
                "Unable to publish recommendation.",
            )
            .await?)
    }
}
