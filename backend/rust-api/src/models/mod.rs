pub mod attempt;
pub mod badge;
pub mod book;
pub mod progress;
pub mod session;

pub use attempt::{NewQuizAttempt, QuizAttemptRecord, QuizMode};
pub use badge::{BadgeView, EarnedBadge};
pub use book::{Book, BookFilterQuery};
pub use progress::{BookProgress, BookSessions, ProgressOverview};
pub use session::QuizSession;
