//! Student progress aggregation.
//!
//! Raw quiz attempts are grouped into sessions per (user, book): attempts
//! whose timestamps sit within the gap threshold of the previous attempt
//! belong to the same session. The gap is measured from the session's last
//! activity, so a long streak of closely spaced attempts stays one session.

use std::collections::HashMap;

use chrono::TimeDelta;

use crate::models::{
    BookProgress, BookSessions, ProgressOverview, QuizAttemptRecord, QuizSession,
};

pub const DEFAULT_SESSION_GAP_SECONDS: i64 = 120;

pub fn default_session_gap() -> TimeDelta {
    TimeDelta::seconds(DEFAULT_SESSION_GAP_SECONDS)
}

/// Groups attempts into sessions. Output holds one ascending run per
/// (user, book) pair, pairs in the order they were first seen.
pub fn group_sessions<'a, I>(attempts: I, gap: TimeDelta) -> Vec<QuizSession>
where
    I: IntoIterator<Item = &'a QuizAttemptRecord>,
{
    let mut order: Vec<(i64, i64)> = Vec::new();
    let mut partitions: HashMap<(i64, i64), Vec<&QuizAttemptRecord>> = HashMap::new();

    for attempt in attempts {
        let key = (attempt.user_id, attempt.book_id);
        partitions
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(attempt);
    }

    let mut sessions = Vec::new();
    for key in order {
        let Some(mut records) = partitions.remove(&key) else {
            continue;
        };
        sort_by_occurrence(&mut records);
        sessions.extend(group_partition(&records, gap));
    }
    sessions
}

/// Oldest first; undated records count as the epoch. Stable, so equal
/// timestamps keep input order.
fn sort_by_occurrence(records: &mut [&QuizAttemptRecord]) {
    records.sort_by_key(|record| record.occurred_at_millis());
}

fn group_partition(records: &[&QuizAttemptRecord], gap: TimeDelta) -> Vec<QuizSession> {
    let mut sessions: Vec<QuizSession> = Vec::new();

    for record in records {
        match sessions.last_mut() {
            Some(current) if record.occurred_at() - current.end_at <= gap => {
                current.absorb(record);
            }
            _ => {
                let mut session = QuizSession::open(record);
                session.absorb(record);
                sessions.push(session);
            }
        }
    }

    sessions
}

pub fn sessions_for_book(
    attempts: &[QuizAttemptRecord],
    user_id: i64,
    book_id: i64,
    gap: TimeDelta,
) -> Vec<QuizSession> {
    group_sessions(
        attempts
            .iter()
            .filter(|attempt| attempt.user_id == user_id && attempt.book_id == book_id),
        gap,
    )
}

pub fn latest_session_for_book(
    attempts: &[QuizAttemptRecord],
    user_id: i64,
    book_id: i64,
    gap: TimeDelta,
) -> Option<QuizSession> {
    sessions_for_book(attempts, user_id, book_id, gap).pop()
}

/// Mean session percentage, or `None` when there is nothing to average.
pub fn average_across_all_sessions(sessions: &[QuizSession]) -> Option<i64> {
    if sessions.is_empty() {
        return None;
    }
    let sum: i64 = sessions.iter().map(|session| session.percentage).sum();
    Some((sum as f64 / sessions.len() as f64).round() as i64)
}

pub fn book_sessions(
    attempts: &[QuizAttemptRecord],
    user_id: i64,
    book_id: i64,
    gap: TimeDelta,
) -> BookSessions {
    let sessions = sessions_for_book(attempts, user_id, book_id, gap);
    BookSessions {
        user_id,
        book_id,
        latest: sessions.last().cloned(),
        average_percentage: average_across_all_sessions(&sessions),
        sessions,
    }
}

/// Progress view for one student: a row per book, most recently active
/// book first, plus the average over every session of every book.
pub fn build_overview(
    attempts: &[QuizAttemptRecord],
    user_id: i64,
    gap: TimeDelta,
) -> ProgressOverview {
    let own: Vec<&QuizAttemptRecord> = attempts
        .iter()
        .filter(|attempt| attempt.user_id == user_id)
        .collect();
    let sessions = group_sessions(own.iter().copied(), gap);

    let mut books: Vec<BookProgress> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    for session in &sessions {
        let slot = *index.entry(session.book_id).or_insert_with(|| {
            books.push(empty_book_progress(session.book_id));
            books.len() - 1
        });
        let row = &mut books[slot];
        row.session_count += 1;
        row.attempt_count += session.attempt_count;
        row.latest_session = Some(session.clone());
    }

    for row in &mut books {
        let book_sessions: Vec<QuizSession> = sessions
            .iter()
            .filter(|session| session.book_id == row.book_id)
            .cloned()
            .collect();
        row.average_percentage = average_across_all_sessions(&book_sessions);
        row.latest_attempt = own
            .iter()
            .filter(|attempt| attempt.book_id == row.book_id)
            .max_by_key(|attempt| attempt.occurred_at_millis())
            .map(|attempt| (*attempt).clone().with_effective_percentage());
    }

    books.sort_by(|a, b| {
        let a_end = a.latest_session.as_ref().map(|s| s.end_at);
        let b_end = b.latest_session.as_ref().map(|s| s.end_at);
        b_end.cmp(&a_end).then(a.book_id.cmp(&b.book_id))
    });

    ProgressOverview {
        user_id,
        overall_average: average_across_all_sessions(&sessions),
        total_sessions: sessions.len(),
        books,
    }
}

fn empty_book_progress(book_id: i64) -> BookProgress {
    BookProgress {
        book_id,
        session_count: 0,
        attempt_count: 0,
        average_percentage: None,
        latest_session: None,
        latest_attempt: None,
    }
}
