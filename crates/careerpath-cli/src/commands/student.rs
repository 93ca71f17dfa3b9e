//! The `careerpath student` commands.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::future::try_join;

use careerpath_core::model::{Answer, NewTestRequest, User};
use careerpath_core::traits::StudentApi;
use careerpath_report::html::write_html_report;
use careerpath_report::views;

use crate::StudentCommand;

pub async fn execute(
    api: &dyn StudentApi,
    command: StudentCommand,
    user: &User,
    export_dir: &Path,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        StudentCommand::Overview => overview(api, user, out).await,
        StudentCommand::Requests => requests(api, out).await,
        StudentCommand::Request {
            interests,
            qualification,
        } => request_test(api, interests, qualification, out).await,
        StudentCommand::Tests => {
            let tests = api.student_tests().await?;
            write!(out, "{}", views::render_test_list(&tests))?;
            Ok(())
        }
        StudentCommand::Test { id } => {
            let test = api.student_test(id).await?;
            write!(out, "{}", views::render_test(&test))?;
            Ok(())
        }
        StudentCommand::Answer {
            test,
            question,
            option,
        } => {
            let answer = Answer {
                question_id: question,
                option_id: option,
            };
            api.submit_answer(test, &answer).await?;
            writeln!(out, "Saved answer for question #{question}.")?;
            Ok(())
        }
        StudentCommand::Submit { test } => {
            let submitted = api.submit_test(test).await?;
            writeln!(out, "Test #{} submitted ({}).", submitted.id, submitted.status)?;
            writeln!(out, "Mentors will review your answers and publish a recommendation.")?;
            Ok(())
        }
        StudentCommand::Recommendations => {
            let recommendations = api.student_recommendations().await?;
            write!(out, "{}", views::render_recommendations(&recommendations))?;
            Ok(())
        }
        StudentCommand::Export { id, output } => {
            let path = output.unwrap_or_else(|| export_path(export_dir, id));
            export(api, id, &path, out).await
        }
        StudentCommand::Roadmap { id, output } => roadmap(api, id, user, &output, out).await,
    }
}

/// Dashboard and request list are fetched together.
async fn overview(api: &dyn StudentApi, user: &User, out: &mut impl Write) -> Result<()> {
    let (dashboard, requests) = try_join(api.student_dashboard(), api.student_requests()).await?;
    write!(out, "{}", views::render_dashboard(Some(user), &dashboard, &requests))?;
    Ok(())
}

async fn requests(api: &dyn StudentApi, out: &mut impl Write) -> Result<()> {
    let requests = api.student_requests().await?;
    write!(out, "{}", views::render_student_requests(&requests))?;
    Ok(())
}

async fn request_test(
    api: &dyn StudentApi,
    interests: String,
    qualification: String,
    out: &mut impl Write,
) -> Result<()> {
    let created = api
        .create_test_request(&NewTestRequest {
            interests_snapshot: interests.trim().to_string(),
            qualification_snapshot: qualification.trim().to_string(),
        })
        .await?;
    writeln!(
        out,
        "Requested test #{} {}",
        created.id,
        views::badge(&created.status)
    )?;
    writeln!(out)?;
    requests(api, out).await
}

fn export_path(export_dir: &Path, id: u64) -> PathBuf {
    export_dir.join(format!("recommendation-{id}.pdf"))
}

async fn export(api: &dyn StudentApi, id: u64, path: &Path, out: &mut impl Write) -> Result<()> {
    let bytes = api.export_recommendation(id).await?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(size = bytes.len(), path = %path.display(), "recommendation exported");
    writeln!(out, "Saved {}", path.display())?;
    Ok(())
}

async fn roadmap(
    api: &dyn StudentApi,
    id: u64,
    user: &User,
    path: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let recommendations = api.student_recommendations().await?;
    let recommendation = recommendations
        .iter()
        .find(|r| r.id == Some(id))
        .with_context(|| format!("recommendation #{id} not found"))?;
    write_html_report(recommendation, Some(user), path)?;
    writeln!(out, "Roadmap written to {}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerpath_client::MockApi;
    use careerpath_core::model::Role;
    use careerpath_core::session::Session;
    use careerpath_core::traits::AdminApi;

    fn student() -> User {
        Session::signed_in("riya@example.com", Role::Student)
            .user
            .unwrap()
    }

    async fn run(api: &MockApi, command: StudentCommand) -> Result<String> {
        let mut out = Vec::new();
        execute(api, command, &student(), Path::new("."), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn request_then_list() {
        let api = MockApi::new();
        let text = run(
            &api,
            StudentCommand::Request {
                interests: "AI + Psychology".into(),
                qualification: "B.Tech Year 3".into(),
            },
        )
        .await
        .unwrap();
        assert!(text.contains("Requested test #1 [Awaiting MCQs]"));
        assert!(text.contains("AI + Psychology"));
        // create + re-fetch
        assert_eq!(api.call_count(), 2);
    }

    #[tokio::test]
    async fn overview_fetches_dashboard_and_requests() {
        let api = MockApi::new();
        api.create_test_request(&NewTestRequest::default())
            .await
            .unwrap();
        let text = run(&api, StudentCommand::Overview).await.unwrap();
        assert!(text.contains("Logged in as riya@example.com"));
        assert!(text.contains("Test request timeline (1 request)"));
        assert_eq!(api.call_count(), 3);
    }

    #[tokio::test]
    async fn export_writes_pdf_bytes() {
        let api = MockApi::new();
        let request = api
            .create_test_request(&NewTestRequest::default())
            .await
            .unwrap();
        let test = api.create_test(request.id).await.unwrap();
        let mut draft = careerpath_core::draft::QuestionDraft::new("Pick one");
        draft.add_option("A", "");
        draft.add_option("B", "");
        api.add_question(test.id, &draft.to_payload(0).unwrap())
            .await
            .unwrap();
        api.assign_test(test.id).await.unwrap();
        api.submit_test(test.id).await.unwrap();
        let mut rec = careerpath_core::draft::RecommendationDraft::new("UX Designer", "Design-led");
        rec.add_step("Explore UX foundations", "");
        let published = api
            .create_recommendation(test.id, &rec.to_payload().unwrap())
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let id = published.id.unwrap();
        let mut out = Vec::new();
        execute(
            &api,
            StudentCommand::Export { id, output: None },
            &student(),
            dir.path(),
            &mut out,
        )
        .await
        .unwrap();
        let bytes = std::fs::read(dir.path().join(format!("recommendation-{id}.pdf"))).unwrap();
        assert!(bytes.starts_with(b"%PDF"));

        let html_path = dir.path().join("roadmap.html");
        let text = run(&api, StudentCommand::Roadmap { id, output: html_path.clone() })
            .await
            .unwrap();
        assert!(text.contains("Roadmap written"));
        assert!(std::fs::read_to_string(html_path).unwrap().contains("UX Designer"));
    }

    #[tokio::test]
    async fn missing_test_surfaces_backend_message() {
        let api = MockApi::new();
        let err = run(&api, StudentCommand::Test { id: 42 }).await.unwrap_err();
        assert_eq!(err.to_string(), "Test not found.");
    }
}
