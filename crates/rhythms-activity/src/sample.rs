//! Deterministic sample payloads for `rhythms standup --sample` and tests.
//! Shaped like one day of real activity from both sources.

use chrono::{Duration, Utc};

use crate::{CodeHostEntry, CodeHostKind, TrackerIssue};

pub fn sample_code_host() -> Vec<CodeHostEntry> {
    let now = Utc::now();
    vec![
        CodeHostEntry {
            repo: "test-repo".to_string(),
            kind: CodeHostKind::Commit,
            number: None,
            title: "Add new feature XYZ".to_string(),
            state: None,
            url: "https://github.com/acme/test-repo/commit/1234567890abcdef".to_string(),
            occurred_at: Some(now - Duration::hours(2)),
        },
        CodeHostEntry {
            repo: "another-repo".to_string(),
            kind: CodeHostKind::Commit,
            number: None,
            title: "Fix bug in module ABC".to_string(),
            state: None,
            url: "https://github.com/acme/another-repo/commit/abcdef1234567890".to_string(),
            occurred_at: Some(now - Duration::hours(5)),
        },
        CodeHostEntry {
            repo: "test-repo".to_string(),
            kind: CodeHostKind::PullRequest,
            number: Some(42),
            title: "Feature: Add XYZ functionality".to_string(),
            state: Some("open".to_string()),
            url: "https://github.com/acme/test-repo/pull/42".to_string(),
            occurred_at: Some(now - Duration::days(1)),
        },
        CodeHostEntry {
            repo: "test-repo".to_string(),
            kind: CodeHostKind::PullRequest,
            number: Some(41),
            title: "Bugfix: Handle edge case".to_string(),
            state: Some("closed".to_string()),
            url: "https://github.com/acme/test-repo/pull/41".to_string(),
            occurred_at: Some(now - Duration::days(2)),
        },
        CodeHostEntry {
            repo: "another-repo".to_string(),
            kind: CodeHostKind::Review,
            number: Some(123),
            title: "Reviewed: streaming backpressure fix".to_string(),
            state: Some("APPROVED".to_string()),
            url: "https://github.com/acme/another-repo/pull/123".to_string(),
            occurred_at: Some(now - Duration::hours(3)),
        },
        CodeHostEntry {
            repo: "test-repo".to_string(),
            kind: CodeHostKind::Issue,
            number: Some(99),
            title: "Performance degradation in production".to_string(),
            state: Some("open".to_string()),
            url: "https://github.com/acme/test-repo/issues/99".to_string(),
            occurred_at: Some(now - Duration::hours(12)),
        },
    ]
}

pub fn sample_tracker() -> Vec<TrackerIssue> {
    let now = Utc::now();
    vec![
        TrackerIssue {
            identifier: "ENG-142".to_string(),
            title: "Implement OAuth token refresh".to_string(),
            state: Some("Done".to_string()),
            completed_at: Some(now - Duration::hours(4)),
            updated_at: Some(now - Duration::hours(4)),
            url: "https://linear.app/issue/ENG-142".to_string(),
        },
        TrackerIssue {
            identifier: "ENG-150".to_string(),
            title: "Migrate billing webhooks".to_string(),
            state: Some("In Progress".to_string()),
            completed_at: None,
            updated_at: Some(now - Duration::hours(1)),
            url: "https://linear.app/issue/ENG-150".to_string(),
        },
        TrackerIssue {
            identifier: "ENG-151".to_string(),
            title: "Waiting on vendor API quota increase".to_string(),
            state: Some("Blocked".to_string()),
            completed_at: None,
            updated_at: Some(now - Duration::hours(20)),
            url: "https://linear.app/issue/ENG-151".to_string(),
        },
    ]
}
