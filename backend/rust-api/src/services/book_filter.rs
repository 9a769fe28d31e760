//! Teacher library filtering.
//!
//! Grades and subjects on books are free text ("Grade 3", "3rd", "Maths"),
//! while filter values may come in canonical or free form. Both sides are
//! normalized before comparison.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{Book, BookFilterQuery};

lazy_static! {
    static ref GRADE_NUMBER: Regex = Regex::new(
        r"^(?:grade|gr|g|year|yr|class|level)?[\s.\-_]*(\d{1,2})(?:st|nd|rd|th)?(?:[\s\-_]*grade)?$"
    )
    .unwrap();
    static ref GRADE_WORD: Regex = Regex::new(
        r"^(?:grade[\s\-_]*)?([a-z]+)(?:[\s\-_]*grade)?$"
    )
    .unwrap();
    static ref SEPARATORS: Regex = Regex::new(r"[\s\-_]+").unwrap();
}

const GRADE_WORDS: [(&str, &str, u8); 12] = [
    ("one", "first", 1),
    ("two", "second", 2),
    ("three", "third", 3),
    ("four", "fourth", 4),
    ("five", "fifth", 5),
    ("six", "sixth", 6),
    ("seven", "seventh", 7),
    ("eight", "eighth", 8),
    ("nine", "ninth", 9),
    ("ten", "tenth", 10),
    ("eleven", "eleventh", 11),
    ("twelve", "twelfth", 12),
];

const KINDERGARTEN: [&str; 6] = ["k", "kg", "kinder", "kindergarten", "grade k", "grade-k"];

const SUBJECT_SYNONYMS: [(&str, &str); 14] = [
    ("math", "math"),
    ("maths", "math"),
    ("mathematics", "math"),
    ("english", "english"),
    ("ela", "english"),
    ("language arts", "english"),
    ("reading", "english"),
    ("science", "science"),
    ("sci", "science"),
    ("social studies", "social_studies"),
    ("sst", "social_studies"),
    ("araling panlipunan", "social_studies"),
    ("ap", "social_studies"),
    ("filipino", "filipino"),
];

fn collapse(raw: &str) -> String {
    SEPARATORS
        .replace_all(raw.trim(), " ")
        .to_lowercase()
}

/// Canonical grade: `K`, `1`..`12`, or the lowercased text when it does not
/// look like a grade. `None` for blank input.
pub fn normalize_grade(raw: &str) -> Option<String> {
    let text = collapse(raw);
    if text.is_empty() {
        return None;
    }

    if KINDERGARTEN.contains(&text.as_str()) {
        return Some("K".to_string());
    }

    if let Some(number) = GRADE_NUMBER
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .filter(|n| (1..=12).contains(n))
    {
        return Some(number.to_string());
    }

    if let Some(number) = GRADE_WORD
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| {
            GRADE_WORDS
                .iter()
                .find(|(cardinal, ordinal, _)| m.as_str() == *cardinal || m.as_str() == *ordinal)
        })
        .map(|(_, _, n)| *n)
    {
        return Some(number.to_string());
    }

    Some(text)
}

/// Canonical subject slug, e.g. `Maths` -> `math`, `Social-Studies` -> `social_studies`.
pub fn normalize_subject(raw: &str) -> Option<String> {
    let text = collapse(raw);
    if text.is_empty() {
        return None;
    }

    let canonical = SUBJECT_SYNONYMS
        .iter()
        .find(|(alias, _)| *alias == text)
        .map(|(_, slug)| slug.to_string())
        .unwrap_or_else(|| text.replace(' ', "_"));
    Some(canonical)
}

/// Blank and `all` mean "no filter".
fn active_filter(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

pub fn filter_books(books: Vec<Book>, query: &BookFilterQuery) -> Vec<Book> {
    let grade = active_filter(query.grade.as_deref()).and_then(normalize_grade);
    let subject = active_filter(query.subject.as_deref()).and_then(normalize_subject);
    let needle = active_filter(query.q.as_deref()).map(str::to_lowercase);

    let mut matched: Vec<Book> = books
        .into_iter()
        .filter(|book| match &grade {
            Some(wanted) => book.grade.as_deref().and_then(normalize_grade).as_ref() == Some(wanted),
            None => true,
        })
        .filter(|book| match &subject {
            Some(wanted) => {
                book.subject.as_deref().and_then(normalize_subject).as_ref() == Some(wanted)
            }
            None => true,
        })
        .filter(|book| match &needle {
            Some(needle) => {
                book.title.to_lowercase().contains(needle.as_str())
                    || book
                        .author
                        .as_deref()
                        .map(|author| author.to_lowercase().contains(needle.as_str()))
                        .unwrap_or(false)
            }
            None => true,
        })
        .collect();

    matched.sort_by_key(|book| book.title.to_lowercase());
    matched
}
