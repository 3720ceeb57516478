//! Forbidden-word content filter.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::DomainError;
use crate::ports::ForbiddenWordRepository;

use super::similarity;

/// Minimum similarity for a token to count as a forbidden word.
pub const SIMILARITY_CUTOFF: f64 = 0.6;

/// Rejects text containing words close to an entry of the blocklist.
///
/// The blocklist is read from the repository on every call so that
/// administrator edits apply immediately.
#[derive(Clone)]
pub struct ContentFilter {
    words: Arc<dyn ForbiddenWordRepository>,
}

impl ContentFilter {
    pub fn new(words: Arc<dyn ForbiddenWordRepository>) -> Self {
        Self { words }
    }

    /// Validate `text`, failing with every matched blocklist word.
    pub async fn validate(&self, text: &str) -> Result<(), DomainError> {
        let blocklist = self.words.list_all().await?;
        let matched = find_forbidden(text, blocklist.iter().map(|w| w.word.as_str()));

        if matched.is_empty() {
            return Ok(());
        }

        tracing::info!(matched = ?matched, "Text rejected by content filter");
        Err(DomainError::ForbiddenWords(matched))
    }
}

/// Blocklist words that have a close match among the tokens of `text`.
///
/// Tokens are the whitespace-separated words of `text`, lowercased and
/// deduplicated. Each blocklist word is compared against its single best
/// token. The result is sorted and holds blocklist words, not user tokens.
pub fn find_forbidden<'a, I>(text: &str, blocklist: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let tokens: BTreeSet<String> = text.split_whitespace().map(str::to_lowercase).collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let forbidden: BTreeSet<String> = blocklist
        .into_iter()
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect();

    forbidden
        .into_iter()
        .filter(|word| {
            similarity::best_match(word, tokens.iter().map(String::as_str), SIMILARITY_CUTOFF)
                .is_some()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ForbiddenWord;
    use crate::error::RepoError;
    use crate::ports::BaseRepository;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[test]
    fn test_near_match_is_rejected() {
        assert_eq!(find_forbidden("spamx", ["spam"]), vec!["spam".to_string()]);
    }

    #[test]
    fn test_clean_text_is_accepted() {
        assert!(find_forbidden("hello world", ["spam"]).is_empty());
    }

    #[test]
    fn test_reports_blocklist_word_not_user_token() {
        assert_eq!(
            find_forbidden("I bane this", ["ban"]),
            vec!["ban".to_string()]
        );
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(
            find_forbidden("Buy SPAM now", ["Spam"]),
            vec!["spam".to_string()]
        );
    }

    #[test]
    fn test_reports_every_matched_word_once() {
        let matched = find_forbidden("spam spam and more bane", ["ban", "spam", "eggs", "SPAM"]);
        assert_eq!(matched, vec!["ban".to_string(), "spam".to_string()]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_forbidden("", ["spam"]).is_empty());
        assert!(find_forbidden("   ", ["spam"]).is_empty());
        assert!(find_forbidden("spam", ["", "  "]).is_empty());
    }

    #[test]
    fn test_cutoff_boundary() {
        // "scam" vs "spam": 3 of 4 characters shared -> 0.75, rejected.
        assert_eq!(find_forbidden("scam", ["spam"]), vec!["spam".to_string()]);
        // "sample" vs "spam": blocks "s" and "am" -> 0.6, rejected at the cutoff.
        assert_eq!(find_forbidden("sample", ["spam"]), vec!["spam".to_string()]);
        // "map" vs "spam": only "m" lines up -> 2/7, accepted.
        assert!(find_forbidden("map", ["spam"]).is_empty());
    }

    #[test]
    fn test_outcome_is_deterministic() {
        let text = "ban bane spa spam";
        let blocklist = ["spam", "ban", "bane"];
        let first = find_forbidden(text, blocklist);
        for _ in 0..10 {
            assert_eq!(find_forbidden(text, blocklist), first);
        }
    }

    /// Blocklist whose contents can change between calls.
    #[derive(Default)]
    struct MutableBlocklist {
        words: Mutex<Vec<ForbiddenWord>>,
    }

    #[async_trait]
    impl BaseRepository<ForbiddenWord, Uuid> for MutableBlocklist {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<ForbiddenWord>, RepoError> {
            Ok(self.words.lock().unwrap().iter().find(|w| w.id == id).cloned())
        }

        async fn insert(&self, word: ForbiddenWord) -> Result<ForbiddenWord, RepoError> {
            self.words.lock().unwrap().push(word.clone());
            Ok(word)
        }

        async fn update(&self, word: ForbiddenWord) -> Result<ForbiddenWord, RepoError> {
            Ok(word)
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
            self.words.lock().unwrap().retain(|w| w.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl ForbiddenWordRepository for MutableBlocklist {
        async fn list_all(&self) -> Result<Vec<ForbiddenWord>, RepoError> {
            Ok(self.words.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn test_validate_reads_blocklist_on_every_call() {
        let repo = Arc::new(MutableBlocklist::default());
        let filter = ContentFilter::new(repo.clone());

        assert!(filter.validate("buy cheap spam").await.is_ok());

        let word = repo.insert(ForbiddenWord::new("spam".into())).await.unwrap();
        match filter.validate("buy cheap spam").await {
            Err(DomainError::ForbiddenWords(words)) => assert_eq!(words, vec!["spam"]),
            other => panic!("expected rejection, got {other:?}"),
        }

        repo.delete(word.id).await.unwrap();
        assert!(filter.validate("buy cheap spam").await.is_ok());
    }
}
