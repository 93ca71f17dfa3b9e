//! The `careerpath admin` commands.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use careerpath_core::draft::{load_question_draft, load_recommendation_draft};
use careerpath_core::status::RequestStatus;
use careerpath_core::traits::AdminApi;
use careerpath_report::views;

use crate::AdminCommand;

pub async fn execute(api: &dyn AdminApi, command: AdminCommand, out: &mut impl Write) -> Result<()> {
    match command {
        AdminCommand::Requests { status } => requests(api, status.as_deref(), out).await,
        AdminCommand::CreateTest { request } => {
            let test = api.create_test(request).await?;
            writeln!(out, "Created test #{} for request #{request}.", test.id)?;
            writeln!(out)?;
            let test = api.admin_test(test.id).await?;
            write!(out, "{}", views::render_test(&test))?;
            Ok(())
        }
        AdminCommand::Test { id, request } => {
            let test = match (id, request) {
                (Some(id), _) => api.admin_test(id).await?,
                (None, Some(request)) => api.admin_test_for_request(request).await?,
                (None, None) => anyhow::bail!("pass --id or --request"),
            };
            write!(out, "{}", views::render_test(&test))?;
            Ok(())
        }
        AdminCommand::AddQuestion { test, file } => add_question(api, test, &file, out).await,
        AdminCommand::Assign { test } => {
            let assigned = api.assign_test(test).await?;
            writeln!(
                out,
                "Test #{} assigned with {} question(s).",
                assigned.id,
                assigned.questions.len()
            )?;
            Ok(())
        }
        AdminCommand::Completed => {
            let tests = api.completed_tests().await?;
            write!(out, "{}", views::render_test_list(&tests))?;
            Ok(())
        }
        AdminCommand::Answers { test } => {
            let answers = api.test_answers(test).await?;
            writeln!(out, "Answers for test #{test}")?;
            write!(out, "{}", views::render_answer_review(&answers))?;
            Ok(())
        }
        AdminCommand::Recommend { test, file } => recommend(api, test, &file, out).await,
    }
}

async fn requests(api: &dyn AdminApi, status: Option<&str>, out: &mut impl Write) -> Result<()> {
    let filter = status
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RequestStatus::parse);
    let requests = api.admin_requests(filter.as_ref()).await?;
    write!(out, "{}", views::render_admin_requests(&requests))?;

    let hints: Vec<String> = requests
        .iter()
        .flat_map(|request| {
            request
                .status
                .admin_actions()
                .iter()
                .map(move |&action| views::action_hint(request, action))
        })
        .collect();
    if !hints.is_empty() {
        writeln!(out, "\nNext steps:")?;
        for hint in hints {
            writeln!(out, "  {hint}")?;
        }
    }
    Ok(())
}

/// The draft is checked before the backend is contacted.
async fn add_question(api: &dyn AdminApi, test_id: u64, file: &Path, out: &mut impl Write) -> Result<()> {
    let draft = load_question_draft(file)?;
    draft
        .validate()
        .with_context(|| format!("question draft {} is incomplete", file.display()))?;

    let test = api.admin_test(test_id).await?;
    if !test.status.is_editable() {
        anyhow::bail!("test #{test_id} is {} and its questions are locked", test.status);
    }

    let payload = draft.to_payload(test.next_question_order())?;
    let question = api.add_question(test_id, &payload).await?;
    tracing::info!(test = test_id, question = question.id, "question added");
    writeln!(out, "Added question #{} to test #{test_id}.", question.id)?;
    writeln!(out)?;

    let test = api.admin_test(test_id).await?;
    write!(out, "{}", views::render_test(&test))?;
    Ok(())
}

async fn recommend(api: &dyn AdminApi, test_id: u64, file: &Path, out: &mut impl Write) -> Result<()> {
    let draft = load_recommendation_draft(file)?;
    let payload = draft
        .to_payload()
        .with_context(|| format!("recommendation draft {} is incomplete", file.display()))?;

    let published = api.create_recommendation(test_id, &payload).await?;
    tracing::info!(test = test_id, career = %published.career_name, "recommendation published");
    writeln!(out, "Published recommendation for test #{test_id}.")?;
    writeln!(out)?;
    write!(out, "{}", views::render_roadmap(&published))?;
    Ok(())
}
