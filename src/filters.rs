use uuid::Uuid;

use crate::models::{TopicStatus, UserRole, UserStatus, VocabStatus};

/// Search-criterion normalization: trim and lower-case, and treat a blank
/// result as an absent criterion. Applied uniformly before any filter is
/// composed, so `""` and `"   "` never reach a query as match-all wildcards.
pub fn normalize_search(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim().to_lowercase();
        if trimmed.is_empty() { None } else { Some(trimmed) }
    })
}

/// Emails are always compared and stored lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Term normalization for uniqueness and search: trim + lower-case, blank is
/// absent.
pub fn normalize_term(term: &str) -> Option<String> {
    let trimmed = term.trim().to_lowercase();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Language codes share the term normalization rule.
pub fn normalize_language(language: &str) -> Option<String> {
    normalize_term(language)
}

// --- Per-entity filter records ---
//
// Each field is either absent or an already-normalized value. The repository
// layer combines every present field with AND into a single predicate;
// absent fields are skipped structurally, never turned into wildcards.
// String fields match by case-insensitive substring; ids and enums match
// exactly.

#[derive(Debug, Clone, Default)]
pub struct UserSearchFilter {
    pub email: Option<String>,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
}

impl UserSearchFilter {
    pub fn normalized(self) -> Self {
        Self {
            email: normalize_search(self.email),
            username: normalize_search(self.username),
            display_name: normalize_search(self.display_name),
            role: self.role,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TopicSearchFilter {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub status: Option<TopicStatus>,
}

impl TopicSearchFilter {
    pub fn normalized(self) -> Self {
        Self {
            name: normalize_search(self.name),
            slug: normalize_search(self.slug),
            status: self.status,
        }
    }
}

/// Vocabulary search criteria. When `topic_id` is present the search is
/// scoped to that topic's membership in the same composed query.
#[derive(Debug, Clone, Default)]
pub struct VocabSearchFilter {
    pub query: Option<String>,
    pub topic_id: Option<Uuid>,
    pub language: Option<String>,
    pub status: Option<VocabStatus>,
}

impl VocabSearchFilter {
    pub fn normalized(self) -> Self {
        Self {
            query: normalize_search(self.query),
            topic_id: self.topic_id,
            language: normalize_search(self.language),
            status: self.status,
        }
    }
}
