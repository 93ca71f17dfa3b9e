//! Plain-text views for the terminal.
//!
//! Each function renders one screen of the careerpath client from backend
//! data. They hold no state and never call the backend.

use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};

use careerpath_core::model::{
    AnsweredQuestion, PersonalizedTest, Recommendation, StudentDashboard, TestRequest, User,
};
use careerpath_core::review::{is_answered, mark_options, summarize};
use careerpath_core::status::{AdminAction, RequestStatus};

const NOT_SPECIFIED: &str = "Not specified";

/// `Nov 15, 2025`
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Two-digit, zero-padded roadmap position: `01`, `02`, ...
pub fn step_number(position: usize) -> String {
    format!("{position:02}")
}

fn or_not_specified(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_SPECIFIED
    } else {
        value.trim()
    }
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Status badge as `[Label]`.
pub fn badge(status: &RequestStatus) -> String {
    format!("[{}]", status.label())
}

/// Roadmap entries in step order, one `(number, title, description)` per step.
pub fn roadmap_entries(recommendation: &Recommendation) -> Vec<(String, &str, &str)> {
    recommendation
        .ordered_steps()
        .into_iter()
        .enumerate()
        .map(|(i, step)| (step_number(i + 1), step.title.as_str(), step.description.as_str()))
        .collect()
}

pub fn render_roadmap(recommendation: &Recommendation) -> String {
    let mut out = String::new();
    out.push_str(&format!("Career: {}\n", recommendation.career_name));
    if !recommendation.summary.trim().is_empty() {
        out.push_str(&format!("{}\n", recommendation.summary.trim()));
    }
    out.push_str("\nRoadmap\n");
    for (number, title, description) in roadmap_entries(recommendation) {
        out.push_str(&format!("  {number}  {title}\n"));
        if !description.trim().is_empty() {
            out.push_str(&format!("      {}\n", description.trim()));
        }
    }
    out
}

fn render_request_entry(out: &mut String, request: &TestRequest) {
    out.push_str(&format!(
        "{}  Requested {}\n",
        badge(&request.status),
        format_date(&request.created_at)
    ));
    out.push_str(&format!(
        "  Qualification: {}\n",
        or_not_specified(&request.qualification_snapshot)
    ));
    out.push_str(&format!(
        "  Interests:     {}\n",
        or_not_specified(&request.interests_snapshot)
    ));
    if let Some(test) = &request.personalized_test {
        let assigned = test
            .assigned_at
            .as_ref()
            .map(|d| format!(" · Assigned {}", format_date(d)))
            .unwrap_or_default();
        out.push_str(&format!("  Test #{}: {}{}\n", test.id, test.status, assigned));
    }
}

/// The student's request history.
pub fn render_student_requests(requests: &[TestRequest]) -> String {
    let mut out = format!(
        "Your test requests ({} total)\n\n",
        plural(requests.len(), "request")
    );

    if requests.is_empty() {
        out.push_str("No requests yet. Start your journey:\n");
        out.push_str("  careerpath student request --interests \"...\" --qualification \"...\"\n");
        return out;
    }

    for request in requests {
        render_request_entry(&mut out, request);
        out.push('\n');
    }
    out
}

/// The student overview: latest status, active test, recommendation and the
/// request timeline.
pub fn render_dashboard(
    user: Option<&User>,
    dashboard: &StudentDashboard,
    requests: &[TestRequest],
) -> String {
    let mut out = String::new();
    if let Some(user) = user {
        out.push_str(&format!("Logged in as {}\n\n", user.email));
    }

    out.push_str("Latest status\n");
    match &dashboard.latest_request {
        Some(request) => render_request_entry(&mut out, request),
        None => out.push_str("  No requests yet. Request a personalized test to get started.\n"),
    }
    out.push('\n');

    if let Some(test) = &dashboard.active_test {
        out.push_str("Active test\n");
        out.push_str(&format!("  Test #{} is {}\n", test.id, test.status));
        out.push_str(&format!("  careerpath student test --id {}\n\n", test.id));
    }

    out.push_str(&format!(
        "Test request timeline ({})\n",
        plural(requests.len(), "request")
    ));
    for request in requests {
        out.push_str(&format!(
            "  {}  {}  {}\n",
            format_date(&request.created_at),
            badge(&request.status),
            or_not_specified(&request.interests_snapshot)
        ));
    }
    out.push('\n');

    match &dashboard.recommendation {
        Some(recommendation) => out.push_str(&render_roadmap(recommendation)),
        None => out.push_str(
            "Recommendation: once mentors finish decoding your latest test, your roadmap will appear here.\n",
        ),
    }
    out
}

/// Labels of the actions offered for a request, comma separated.
pub fn action_labels(status: &RequestStatus) -> String {
    status
        .admin_actions()
        .iter()
        .map(|a| a.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The admin triage table.
pub fn render_admin_requests(requests: &[TestRequest]) -> String {
    if requests.is_empty() {
        return "No test requests match.\n".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Student", "Submitted", "Focus", "Status", "Actions"]);
    for request in requests {
        let student = request
            .student
            .as_ref()
            .map(User::display_name)
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(request.id),
            Cell::new(student),
            Cell::new(format_date(&request.created_at)),
            Cell::new(or_not_specified(&request.interests_snapshot)),
            Cell::new(request.status.label()),
            Cell::new(action_labels(&request.status)),
        ]);
    }
    format!("{table}\n")
}

/// Next-step hint printed under the triage table for a single request.
pub fn action_hint(request: &TestRequest, action: AdminAction) -> String {
    match action {
        AdminAction::CreateTest => {
            format!("careerpath admin create-test --request {}", request.id)
        }
        AdminAction::BuildMcqs => format!("careerpath admin test --request {}", request.id),
        AdminAction::ReviewAnswers => {
            let test = request
                .personalized_test
                .as_ref()
                .map(|t| t.id.to_string())
                .unwrap_or_else(|| "<test-id>".to_string());
            format!("careerpath admin answers --test {test}")
        }
    }
}

/// A test with its questions; used by both the builder and the student.
pub fn render_test(test: &PersonalizedTest) -> String {
    let mut out = format!("Test #{} ({})\n", test.id, test.status);
    if let Some(request) = &test.request {
        out.push_str(&format!(
            "For request #{}: {}\n",
            request.id,
            or_not_specified(&request.interests_snapshot)
        ));
    }
    if let Some(assigned) = &test.assigned_at {
        out.push_str(&format!("Assigned {}\n", format_date(assigned)));
    }
    out.push('\n');

    let questions = test.ordered_questions();
    if questions.is_empty() {
        out.push_str("No questions yet.\n");
        return out;
    }
    for (i, question) in questions.iter().enumerate() {
        out.push_str(&format!("Q{} (#{}) {}\n", i + 1, question.id, question.prompt));
        for option in question.ordered_options() {
            out.push_str(&format!("    ({}) {}\n", option.id, option.label));
            if !option.description.trim().is_empty() {
                out.push_str(&format!("        {}\n", option.description.trim()));
            }
        }
    }
    if !test.status.is_editable() {
        out.push_str("\nQuestions are locked.\n");
    }
    out
}

/// A table of tests with question counts.
pub fn render_test_list(tests: &[PersonalizedTest]) -> String {
    if tests.is_empty() {
        return "No tests.\n".to_string();
    }

    let mut table = Table::new();
    table.set_header(vec!["Test", "Request", "Student", "Status", "Questions", "Completed"]);
    for test in tests {
        let request = test.request.as_ref();
        table.add_row(vec![
            Cell::new(test.id),
            Cell::new(request.map(|r| r.id.to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(
                request
                    .and_then(|r| r.student.as_ref())
                    .map(User::display_name)
                    .unwrap_or_else(|| "-".into()),
            ),
            Cell::new(test.status.to_string()),
            Cell::new(test.questions.len()),
            Cell::new(
                test.completed_at
                    .as_ref()
                    .map(format_date)
                    .unwrap_or_else(|| "-".into()),
            ),
        ]);
    }
    format!("{table}\n")
}

/// A completed test's answers with the chosen option marked `[x]`. A question
/// is shown as unanswered when its selection names none of its options.
pub fn render_answer_review(questions: &[AnsweredQuestion]) -> String {
    let summary = summarize(questions);
    let mut out = format!(
        "{} of {} answered\n\n",
        summary.answered,
        plural(summary.questions, "question")
    );

    let mut ordered: Vec<&AnsweredQuestion> = questions.iter().collect();
    ordered.sort_by_key(|q| q.order);
    for (i, question) in ordered.into_iter().enumerate() {
        out.push_str(&format!("Q{} {}\n", i + 1, question.prompt));
        for marked in mark_options(question) {
            let mark = if marked.selected { "[x]" } else { "[ ]" };
            out.push_str(&format!("    {mark} {}\n", marked.option.label));
        }
        if !is_answered(question) {
            out.push_str("    (no answer)\n");
        }
    }
    out
}

/// The student's recommendations with their roadmaps.
pub fn render_recommendations(recommendations: &[Recommendation]) -> String {
    if recommendations.is_empty() {
        return "No recommendations yet.\n".to_string();
    }
    let mut out = String::new();
    for recommendation in recommendations {
        if let Some(id) = recommendation.id {
            out.push_str(&format!("#{id} "));
        }
        match &recommendation.created_at {
            Some(created) => out.push_str(&format!("published {}\n", format_date(created))),
            None => out.push('\n'),
        }
        out.push_str(&render_roadmap(recommendation));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use careerpath_core::model::{AnswerOption, RoadmapStep, SelectedAnswer};

    fn request(id: u64, status: &str) -> TestRequest {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "status": status,
            "interests_snapshot": "",
            "qualification_snapshot": "B.Tech Year 3",
            "created_at": "2025-11-05T10:45:00Z"
        }))
        .unwrap()
    }

    fn recommendation() -> Recommendation {
        Recommendation {
            id: Some(1),
            career_name: "UX Designer".into(),
            summary: "Design-led problem solver.".into(),
            created_at: None,
            steps: vec![
                RoadmapStep { id: None, order: 2, title: "Shadow a mentor".into(), description: String::new() },
                RoadmapStep { id: None, order: 1, title: "Explore UX foundations".into(), description: "Curated playlists".into() },
                RoadmapStep { id: None, order: 3, title: "Start a design journal".into(), description: String::new() },
            ],
        }
    }

    #[test]
    fn date_format() {
        let date: DateTime<Utc> = "2025-11-05T10:45:00Z".parse().unwrap();
        assert_eq!(format_date(&date), "Nov 5, 2025");
    }

    #[test]
    fn roadmap_has_three_padded_entries_in_order() {
        let rec = recommendation();
        let entries = roadmap_entries(&rec);
        let numbers: Vec<&str> = entries.iter().map(|e| e.0.as_str()).collect();
        assert_eq!(numbers, vec!["01", "02", "03"]);
        let titles: Vec<&str> = entries.iter().map(|e| e.1).collect();
        assert_eq!(
            titles,
            vec!["Explore UX foundations", "Shadow a mentor", "Start a design journal"]
        );

        let text = render_roadmap(&rec);
        let first = text.find("01  Explore").unwrap();
        let second = text.find("02  Shadow").unwrap();
        let third = text.find("03  Start").unwrap();
        assert!(first < second && second < third);
        assert!(!text.contains("04"));
    }

    #[test]
    fn completed_request_with_recommendation() {
        let dashboard = StudentDashboard {
            latest_request: Some(request(1, "completed")),
            active_test: None,
            recommendation: Some(recommendation()),
        };
        let text = render_dashboard(None, &dashboard, &[request(1, "completed")]);
        assert!(text.contains("[Completed]"));
        assert_eq!(text.matches("  01  ").count(), 1);
        assert!(text.contains("  03  Start a design journal"));
    }

    #[test]
    fn admin_rows_offer_actions_by_status() {
        let pending = render_admin_requests(&[request(1, "pending")]);
        assert!(pending.contains("Create test"));
        assert!(!pending.contains("Build MCQs"));

        let in_progress = render_admin_requests(&[request(2, "in_progress")]);
        assert!(in_progress.contains("Build MCQs"));
        assert!(!in_progress.contains("Create test"));
    }

    #[test]
    fn student_requests_empty_and_specified() {
        assert!(render_student_requests(&[]).contains("No requests yet"));

        let text = render_student_requests(&[request(1, "pending")]);
        assert!(text.contains("1 request total"));
        assert!(text.contains("[Awaiting MCQs]"));
        assert!(text.contains("Interests:     Not specified"));
        assert!(text.contains("B.Tech Year 3"));
    }

    #[test]
    fn review_marks_one_option() {
        let question = AnsweredQuestion {
            id: 1,
            prompt: "Pick one".into(),
            order: 0,
            options: vec![
                AnswerOption { id: 10, label: "A".into(), description: String::new(), order: 0 },
                AnswerOption { id: 11, label: "B".into(), description: String::new(), order: 1 },
            ],
            selected_answer: Some(SelectedAnswer { option_id: 11, submitted_at: None }),
        };
        let text = render_answer_review(&[question]);
        assert_eq!(text.matches("[x]").count(), 1);
        assert!(text.contains("[x] B"));
        assert!(text.contains("[ ] A"));
        assert!(text.contains("1 of 1 question answered"));
        assert!(!text.contains("(no answer)"));
    }

    #[test]
    fn review_treats_foreign_selection_as_unanswered() {
        let question = AnsweredQuestion {
            id: 1,
            prompt: "Pick one".into(),
            order: 0,
            options: vec![
                AnswerOption { id: 10, label: "A".into(), description: String::new(), order: 0 },
                AnswerOption { id: 11, label: "B".into(), description: String::new(), order: 1 },
            ],
            selected_answer: Some(SelectedAnswer { option_id: 99, submitted_at: None }),
        };
        let text = render_answer_review(&[question]);
        assert!(!text.contains("[x]"));
        assert!(text.contains("(no answer)"));
        assert!(text.contains("0 of 1 question answered"));
    }

    #[test]
    fn review_hint_uses_linked_test() {
        let mut req = request(3, "completed");
        req.personalized_test = serde_json::from_value(serde_json::json!({"id": 8, "status": "completed"})).unwrap();
        assert_eq!(
            action_hint(&req, AdminAction::ReviewAnswers),
            "careerpath admin answers --test 8"
        );
    }
}
