use chrono::{DateTime, Utc};

use super::session_store::SessionStore;
use crate::models::exam::Grade;

/// Session value key holding the attempt's start timestamp (RFC 3339).
pub fn timer_key(grade: Grade, exam_id: &str) -> String {
    format!("exam_start_{}_{}", grade, exam_id)
}

/// Outcome of entering the exam page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// A fresh timer was started: first visit, explicit reset, or a repaired
    /// anomaly (missing/malformed timestamp, clock moved backward, stale
    /// timer past twice the limit).
    Started { remaining_seconds: u64 },
    /// An existing timer is still running; the start timestamp is untouched.
    Resumed { remaining_seconds: u64 },
    /// The timer ran out. It has been cleared and the attempt is void.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    Running { remaining_seconds: u64 },
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitCheck {
    Accepted { elapsed_seconds: i64 },
    Rejected(SubmitRejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejection {
    /// No timer for this (student, exam): never entered, or already cleared.
    MissingTimer,
    /// The stored timestamp cannot be trusted.
    Malformed,
    /// The limit has passed. The timer is cleared; no partial credit.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryDecision {
    StartNew,
    Resume { remaining_seconds: u64 },
    Expire,
}

fn parse_start(stored: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(stored)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Decide what entering the exam page does to the timer.
///
/// The timer lives in revocable client-associated session state, so the
/// stored timestamp is never trusted: every read re-validates elapsed time
/// against the limit and repairs missing keys, malformed values, negative
/// elapsed time and timers more than twice past the limit by restarting.
/// A stale timer restarts silently rather than expiring so that a student
/// who abandoned a tab long ago is not punished on their next visit.
fn evaluate_entry(
    stored: Option<&str>,
    now: DateTime<Utc>,
    limit_minutes: u32,
    reset: bool,
) -> EntryDecision {
    let limit_seconds = i64::from(limit_minutes) * 60;

    if reset {
        return EntryDecision::StartNew;
    }

    let Some(stored) = stored else {
        return EntryDecision::StartNew;
    };

    let Some(start) = parse_start(stored) else {
        tracing::warn!("Malformed exam timer value {:?}, restarting", stored);
        return EntryDecision::StartNew;
    };

    let elapsed = (now - start).num_seconds();
    if elapsed < 0 {
        tracing::warn!("Exam timer started in the future, restarting");
        return EntryDecision::StartNew;
    }
    if elapsed > limit_seconds * 2 {
        tracing::warn!("Exam timer {}s past a {}s limit, treating as stale", elapsed, limit_seconds);
        return EntryDecision::StartNew;
    }

    let remaining = limit_seconds - elapsed;
    if remaining <= 0 {
        return EntryDecision::Expire;
    }

    // Never hand the caller a zero or an over-limit countdown.
    EntryDecision::Resume {
        remaining_seconds: remaining.clamp(1, limit_seconds) as u64,
    }
}

/// Decide what a time-check poll reports. Polling never restarts a timer:
/// a missing or untrustworthy timestamp reads as expired and the client is
/// expected to send the student back through the entry route.
fn evaluate_poll(stored: Option<&str>, now: DateTime<Utc>, limit_minutes: u32) -> PollOutcome {
    let limit_seconds = i64::from(limit_minutes) * 60;

    let Some(start) = stored.and_then(parse_start) else {
        return PollOutcome::Expired;
    };

    let elapsed = (now - start).num_seconds();
    if elapsed < 0 {
        return PollOutcome::Expired;
    }

    let remaining = limit_seconds - elapsed;
    if remaining <= 0 {
        PollOutcome::Expired
    } else {
        PollOutcome::Running {
            remaining_seconds: remaining as u64,
        }
    }
}

/// Decide whether a submission arrived in time. Strict boundary: a
/// submission at exactly the limit is already void.
fn evaluate_submission(stored: Option<&str>, now: DateTime<Utc>, limit_minutes: u32) -> SubmitCheck {
    let limit_seconds = i64::from(limit_minutes) * 60;

    let Some(stored) = stored else {
        return SubmitCheck::Rejected(SubmitRejection::MissingTimer);
    };
    let Some(start) = parse_start(stored) else {
        return SubmitCheck::Rejected(SubmitRejection::Malformed);
    };

    let elapsed = (now - start).num_seconds();
    if elapsed < 0 {
        return SubmitCheck::Rejected(SubmitRejection::Malformed);
    }
    if elapsed >= limit_seconds {
        return SubmitCheck::Rejected(SubmitRejection::Expired);
    }

    SubmitCheck::Accepted {
        elapsed_seconds: elapsed,
    }
}

/// Per-(student, exam) timer lifecycle over the session store. Exactly one
/// timer per key: starting a new one overwrites the prior start timestamp.
pub struct ExamSessionTracker<'a> {
    sessions: &'a SessionStore,
}

impl<'a> ExamSessionTracker<'a> {
    pub fn new(sessions: &'a SessionStore) -> Self {
        Self { sessions }
    }

    pub async fn enter(
        &self,
        session_id: &str,
        grade: Grade,
        exam_id: &str,
        limit_minutes: u32,
        reset: bool,
    ) -> EntryOutcome {
        let key = timer_key(grade, exam_id);
        let stored = self.sessions.get_value(session_id, &key).await;
        let now = Utc::now();

        match evaluate_entry(stored.as_deref(), now, limit_minutes, reset) {
            EntryDecision::StartNew => {
                self.sessions
                    .set_value(session_id, &key, now.to_rfc3339())
                    .await;
                tracing::info!(
                    "Started exam timer for {} grade {} ({} min)",
                    exam_id,
                    grade,
                    limit_minutes
                );
                EntryOutcome::Started {
                    remaining_seconds: u64::from(limit_minutes) * 60,
                }
            }
            EntryDecision::Resume { remaining_seconds } => {
                tracing::debug!("Exam {}: {}s remaining", exam_id, remaining_seconds);
                EntryOutcome::Resumed { remaining_seconds }
            }
            EntryDecision::Expire => {
                self.sessions.remove_value(session_id, &key).await;
                tracing::info!("Exam timer for {} expired on view, cleared", exam_id);
                EntryOutcome::Expired
            }
        }
    }

    pub async fn check(
        &self,
        session_id: &str,
        grade: Grade,
        exam_id: &str,
        limit_minutes: u32,
    ) -> PollOutcome {
        let key = timer_key(grade, exam_id);
        let stored = self.sessions.get_value(session_id, &key).await;
        let outcome = evaluate_poll(stored.as_deref(), Utc::now(), limit_minutes);

        if outcome == PollOutcome::Expired && stored.is_some() {
            self.sessions.remove_value(session_id, &key).await;
        }
        outcome
    }

    pub async fn validate_submission(
        &self,
        session_id: &str,
        grade: Grade,
        exam_id: &str,
        limit_minutes: u32,
    ) -> SubmitCheck {
        let key = timer_key(grade, exam_id);
        let stored = self.sessions.get_value(session_id, &key).await;
        let check = evaluate_submission(stored.as_deref(), Utc::now(), limit_minutes);

        if let SubmitCheck::Rejected(SubmitRejection::Expired) = check {
            self.sessions.remove_value(session_id, &key).await;
        }
        check
    }

    /// Clears the timer: after a graded submission, or on an explicit reset.
    pub async fn clear(&self, session_id: &str, grade: Grade, exam_id: &str) {
        let key = timer_key(grade, exam_id);
        self.sessions.remove_value(session_id, &key).await;
    }
}
