use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    Database,
};

use super::{LearningStore, StoreError};
use crate::{
    metrics::track_store_operation,
    models::{Book, EarnedBadge, QuizAttemptRecord, QuizMode},
    utils::time::{bson_to_chrono, chrono_to_bson, parse_timestamp},
};

const ATTEMPTS: &str = "quiz_attempts";
const BADGES: &str = "earned_badges";
const BOOKS: &str = "books";

pub struct MongoLearningStore {
    mongo: Database,
}

impl MongoLearningStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    async fn find_all(
        &self,
        collection: &'static str,
        filter: Document,
    ) -> Result<Vec<Document>, StoreError> {
        track_store_operation("find", collection, async {
            let cursor = self
                .mongo
                .collection::<Document>(collection)
                .find(filter)
                .await?;
            let docs: Vec<Document> = cursor.try_collect().await?;
            Ok::<_, StoreError>(docs)
        })
        .await
    }
}

#[async_trait]
impl LearningStore for MongoLearningStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.mongo.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn attempts_for_user(&self, user_id: i64) -> Result<Vec<QuizAttemptRecord>, StoreError> {
        // rows written before the schema settled use camelCase keys
        let filter = doc! {
            "$or": [ { "user_id": user_id }, { "userId": user_id } ]
        };
        let docs = self.find_all(ATTEMPTS, filter).await?;
        Ok(docs.iter().map(attempt_from_document).collect())
    }

    async fn record_attempt(
        &self,
        mut attempt: QuizAttemptRecord,
    ) -> Result<QuizAttemptRecord, StoreError> {
        let document = doc! {
            "user_id": attempt.user_id,
            "book_id": attempt.book_id,
            "page_id": attempt.page_id,
            "score_correct": attempt.score_correct,
            "score_total": attempt.score_total,
            "percentage": attempt.percentage,
            "mode": attempt.mode.as_str(),
            "attempt_number": attempt.attempt_number,
            "duration_sec": attempt.duration_sec,
            "created_at": attempt.created_at.map(chrono_to_bson),
        };

        let result = track_store_operation("insert", ATTEMPTS, async {
            let inserted = self
                .mongo
                .collection::<Document>(ATTEMPTS)
                .insert_one(document)
                .await?;
            Ok::<_, StoreError>(inserted)
        })
        .await?;

        attempt.id = match result.inserted_id {
            Bson::ObjectId(oid) => Some(oid.to_hex()),
            Bson::String(value) => Some(value),
            _ => None,
        };

        Ok(attempt)
    }

    async fn badges_for_user(&self, user_id: i64) -> Result<Vec<EarnedBadge>, StoreError> {
        let filter = doc! {
            "$or": [ { "user_id": user_id }, { "userId": user_id } ]
        };
        let docs = self.find_all(BADGES, filter).await?;
        Ok(docs.iter().map(badge_from_document).collect())
    }

    async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let docs = self.find_all(BOOKS, doc! {}).await?;
        Ok(docs
            .iter()
            .filter_map(|document| {
                let book = book_from_document(document);
                if book.is_none() {
                    tracing::warn!("Skipping book document without a numeric id: {:?}", document.get("_id"));
                }
                book
            })
            .collect())
    }
}

fn doc_number(document: &Document, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match document.get(*key) {
        Some(Bson::Int32(value)) => Some(f64::from(*value)),
        Some(Bson::Int64(value)) => Some(*value as f64),
        Some(Bson::Double(value)) if value.is_finite() => Some(*value),
        Some(Bson::String(value)) => value.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

fn doc_i64(document: &Document, keys: &[&str]) -> Option<i64> {
    doc_number(document, keys).map(|value| value.round() as i64)
}

fn doc_string(document: &Document, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| document.get_str(*key).ok())
        .map(|value| value.to_string())
}

fn doc_timestamp(document: &Document, key: &str) -> Option<DateTime<Utc>> {
    match document.get(key) {
        Some(Bson::DateTime(value)) => bson_to_chrono(*value),
        Some(Bson::String(value)) => parse_timestamp(value),
        Some(Bson::Int64(value)) => DateTime::from_timestamp_millis(*value),
        _ => None,
    }
}

fn attempt_from_document(document: &Document) -> QuizAttemptRecord {
    let id = match document.get("_id") {
        Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
        Some(Bson::String(value)) => Some(value.clone()),
        _ => None,
    };

    QuizAttemptRecord {
        id,
        user_id: doc_i64(document, &["user_id", "userId"]).unwrap_or(0),
        book_id: doc_i64(document, &["book_id", "bookId"]).unwrap_or(0),
        page_id: doc_i64(document, &["page_id", "pageId"]),
        score_correct: doc_i64(document, &["score_correct", "scoreCorrect"]).unwrap_or(0),
        score_total: doc_i64(document, &["score_total", "scoreTotal"]).unwrap_or(0),
        percentage: doc_number(document, &["percentage"]),
        mode: doc_string(document, &["mode"])
            .map(|mode| QuizMode::parse_lenient(&mode))
            .unwrap_or_default(),
        attempt_number: doc_i64(document, &["attempt_number", "attemptNumber"]),
        duration_sec: doc_i64(document, &["duration_sec", "durationSec"]),
        created_at: doc_timestamp(document, "created_at")
            .or_else(|| doc_timestamp(document, "createdAt")),
    }
}

fn badge_from_document(document: &Document) -> EarnedBadge {
    EarnedBadge {
        badge_id: doc_i64(document, &["badge_id", "badgeId"]),
        name: doc_string(document, &["name"]).unwrap_or_default(),
        description: doc_string(document, &["description"]),
        icon: doc_string(document, &["icon", "icon_url", "iconUrl"]),
        awarded_at: doc_timestamp(document, "awardedAt"),
        awarded_at_snake: doc_timestamp(document, "awarded_at"),
        created_at: doc_timestamp(document, "createdAt"),
        created_at_snake: doc_timestamp(document, "created_at"),
    }
}

fn book_from_document(document: &Document) -> Option<Book> {
    Some(Book {
        id: doc_i64(document, &["book_id", "bookId", "_id"])?,
        title: doc_string(document, &["title"]).unwrap_or_default(),
        author: doc_string(document, &["author"]),
        grade: doc_string(document, &["grade", "grade_level", "gradeLevel"]),
        subject: doc_string(document, &["subject"]),
        cover_url: doc_string(document, &["cover_url", "coverUrl"]),
        page_count: doc_i64(document, &["page_count", "pageCount"]).unwrap_or(0),
    })
}
