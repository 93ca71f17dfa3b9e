//! Request and test status values and the display tables built on them.
//!
//! Transitions happen on the backend. The client only maps whatever status
//! it receives to a label, a style class and the admin actions it may offer.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Lifecycle status of a [`TestRequest`](crate::model::TestRequest).
///
/// Unrecognized strings are kept verbatim in [`RequestStatus::Other`] so a
/// newer backend never breaks decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    Pending,
    InProgress,
    Assigned,
    Completed,
    Other(String),
}

impl RequestStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => RequestStatus::Pending,
            "in_progress" => RequestStatus::InProgress,
            "assigned" => RequestStatus::Assigned,
            "completed" => RequestStatus::Completed,
            other => RequestStatus::Other(other.to_string()),
        }
    }

    /// The wire value.
    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::InProgress => "in_progress",
            RequestStatus::Assigned => "assigned",
            RequestStatus::Completed => "completed",
            RequestStatus::Other(raw) => raw,
        }
    }

    /// Display label and style class for this status.
    pub fn badge(&self) -> StatusBadge<'_> {
        let (label, class) = match self {
            RequestStatus::Pending => ("Awaiting MCQs", "bg-yellow-100 text-yellow-800"),
            RequestStatus::InProgress => ("MCQs in progress", "bg-blue-100 text-blue-800"),
            RequestStatus::Assigned => ("Test ready", "bg-green-100 text-green-800"),
            RequestStatus::Completed => ("Completed", "bg-purple-100 text-purple-800"),
            RequestStatus::Other(raw) => (raw.as_str(), "bg-gray-100 text-gray-800"),
        };
        StatusBadge { label, class }
    }

    pub fn label(&self) -> &str {
        self.badge().label
    }

    /// Actions the admin triage view offers for a request in this status.
    pub fn admin_actions(&self) -> &'static [AdminAction] {
        match self {
            RequestStatus::Pending => &[AdminAction::CreateTest],
            RequestStatus::InProgress => &[AdminAction::BuildMcqs],
            RequestStatus::Completed => &[AdminAction::ReviewAnswers],
            RequestStatus::Assigned | RequestStatus::Other(_) => &[],
        }
    }

    pub fn offers(&self, action: AdminAction) -> bool {
        self.admin_actions().contains(&action)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RequestStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RequestStatus::parse(&raw))
    }
}

/// A status label paired with the style class the web views used for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusBadge<'a> {
    pub label: &'a str,
    pub class: &'a str,
}

/// An action the admin request view can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminAction {
    CreateTest,
    BuildMcqs,
    ReviewAnswers,
}

impl AdminAction {
    pub fn label(self) -> &'static str {
        match self {
            AdminAction::CreateTest => "Create test",
            AdminAction::BuildMcqs => "Build MCQs",
            AdminAction::ReviewAnswers => "Review answers",
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status of a [`PersonalizedTest`](crate::model::PersonalizedTest).
///
/// Advances monotonically `Draft -> Assigned -> Completed`. The backend
/// reports a test under construction as `draft`; `in_progress` is accepted
/// as the same state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TestStatus {
    Draft,
    Assigned,
    Completed,
    Other(String),
}

impl TestStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "draft" | "in_progress" => TestStatus::Draft,
            "assigned" => TestStatus::Assigned,
            "completed" => TestStatus::Completed,
            other => TestStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TestStatus::Draft => "draft",
            TestStatus::Assigned => "assigned",
            TestStatus::Completed => "completed",
            TestStatus::Other(raw) => raw,
        }
    }

    /// Position in the lifecycle; `None` for unknown statuses.
    pub fn rank(&self) -> Option<u8> {
        match self {
            TestStatus::Draft => Some(0),
            TestStatus::Assigned => Some(1),
            TestStatus::Completed => Some(2),
            TestStatus::Other(_) => None,
        }
    }

    /// Whether moving to `next` goes strictly forward in the lifecycle.
    pub fn can_advance_to(&self, next: &TestStatus) -> bool {
        match (self.rank(), next.rank()) {
            (Some(from), Some(to)) => to > from,
            _ => false,
        }
    }

    /// Questions can only be added while the test is a draft.
    pub fn is_editable(&self) -> bool {
        matches!(self, TestStatus::Draft)
    }

    /// Answers are accepted only once the test has been assigned.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, TestStatus::Assigned)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TestStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TestStatus::parse(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_table() {
        assert_eq!(RequestStatus::Pending.label(), "Awaiting MCQs");
        assert_eq!(RequestStatus::InProgress.label(), "MCQs in progress");
        assert_eq!(RequestStatus::Assigned.label(), "Test ready");
        assert_eq!(RequestStatus::Completed.label(), "Completed");
        assert_eq!(
            RequestStatus::Pending.badge().class,
            "bg-yellow-100 text-yellow-800"
        );
    }

    #[test]
    fn unknown_status_falls_back_to_raw() {
        let status = RequestStatus::parse("on_hold");
        let badge = status.badge();
        assert_eq!(badge.label, "on_hold");
        assert_eq!(badge.class, "bg-gray-100 text-gray-800");
        assert_eq!(status.to_string(), "on_hold");
    }

    #[test]
    fn pending_offers_create_test_only() {
        let status = RequestStatus::Pending;
        assert!(status.offers(AdminAction::CreateTest));
        assert!(!status.offers(AdminAction::BuildMcqs));
    }

    #[test]
    fn in_progress_offers_build_mcqs_only() {
        let status = RequestStatus::InProgress;
        assert!(status.offers(AdminAction::BuildMcqs));
        assert!(!status.offers(AdminAction::CreateTest));
    }

    #[test]
    fn assigned_and_unknown_offer_nothing() {
        assert!(RequestStatus::Assigned.admin_actions().is_empty());
        assert!(RequestStatus::parse("archived").admin_actions().is_empty());
    }

    #[test]
    fn status_serde_keeps_wire_value() {
        let status: RequestStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status, RequestStatus::InProgress);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"in_progress\"");

        let other: RequestStatus = serde_json::from_str("\"escalated\"").unwrap();
        assert_eq!(serde_json::to_string(&other).unwrap(), "\"escalated\"");
    }

    #[test]
    fn test_status_is_monotonic() {
        assert!(TestStatus::Draft.can_advance_to(&TestStatus::Assigned));
        assert!(TestStatus::Assigned.can_advance_to(&TestStatus::Completed));
        assert!(TestStatus::Draft.can_advance_to(&TestStatus::Completed));
        assert!(!TestStatus::Completed.can_advance_to(&TestStatus::Assigned));
        assert!(!TestStatus::Assigned.can_advance_to(&TestStatus::Assigned));
        assert!(!TestStatus::Draft.can_advance_to(&TestStatus::parse("weird")));
    }

    #[test]
    fn in_progress_is_a_draft() {
        assert_eq!(TestStatus::parse("in_progress"), TestStatus::Draft);
        assert!(TestStatus::Draft.is_editable());
        assert!(!TestStatus::Assigned.is_editable());
        assert!(TestStatus::Assigned.accepts_answers());
        assert!(!TestStatus::Completed.accepts_answers());
    }
}
