// ============================================================
// Layer 3 — Vocabulary
// ============================================================
// Bidirectional token <-> id mapping.
//
// The first five ids are always reserved for the special
// tokens, in this order:
//
//   0  [PAD]   — padding after the final [SEP]
//   1  [UNK]   — anything not in the vocabulary
//   2  [CLS]   — sequence start
//   3  [SEP]   — separator after question and after context
//   4  [MASK]  — masked-LM token, never produced by the encoder
//
// A Vocabulary is immutable once built. It is constructed
// explicitly at startup and shared behind an Arc, so tests can
// hand the tokenizer a tiny custom vocabulary.

use std::collections::HashMap;

pub const PAD_TOKEN:  &str = "[PAD]";
pub const UNK_TOKEN:  &str = "[UNK]";
pub const CLS_TOKEN:  &str = "[CLS]";
pub const SEP_TOKEN:  &str = "[SEP]";
pub const MASK_TOKEN: &str = "[MASK]";

pub const PAD_ID:  u32 = 0;
pub const UNK_ID:  u32 = 1;
pub const CLS_ID:  u32 = 2;
pub const SEP_ID:  u32 = 3;
pub const MASK_ID: u32 = 4;

/// Special tokens in reserved-id order.
pub const SPECIAL_TOKENS: [&str; 5] = [PAD_TOKEN, UNK_TOKEN, CLS_TOKEN, SEP_TOKEN, MASK_TOKEN];

#[derive(Debug, Clone)]
pub struct Vocabulary {
    token_to_id: HashMap<String, u32>,
    id_to_token: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary where list position is the id.
    ///
    /// The special tokens always occupy ids 0..=4; if the list
    /// repeats them (a BERT-style vocab.txt does) the repeat is
    /// skipped. Later duplicates of any token are skipped too,
    /// so every id maps to exactly one token and vice versa.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocab = Self {
            token_to_id: HashMap::new(),
            id_to_token: Vec::new(),
        };
        for special in SPECIAL_TOKENS {
            vocab.push(special.to_string());
        }
        for token in tokens {
            vocab.push(token.into());
        }
        debug_assert_eq!(
            vocab.tokens_to_ids(&SPECIAL_TOKENS),
            [PAD_ID, UNK_ID, CLS_ID, SEP_ID, MASK_ID]
        );
        vocab
    }

    fn push(&mut self, token: String) {
        if self.token_to_id.contains_key(&token) {
            return;
        }
        let id = self.id_to_token.len() as u32;
        self.token_to_id.insert(token.clone(), id);
        self.id_to_token.push(token);
    }

    /// The small built-in vocabulary used when no vocab.txt is
    /// configured: common English words, punctuation, and the
    /// numbers 0 to 100.
    pub fn demo() -> Self {
        const COMMON_WORDS: &[&str] = &[
            "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for",
            "of", "with", "by", "from", "as", "is", "was", "are", "were", "be",
            "been", "being", "have", "has", "had", "do", "does", "did", "will",
            "would", "should", "could", "may", "might", "can", "what", "when",
            "where", "who", "which", "how", "why", "this", "that", "these", "those",
            "i", "you", "he", "she", "it", "we", "they", "them", "their", "his",
            "her", "its", "our", "your", "my", "me", "him", "us", "not", "no",
            "yes", "all", "some", "any", "many", "much", "more", "most", "few",
            "little", "one", "two", "first", "last", "only", "other", "same",
            "new", "old", "good", "bad", "great", "small", "large", "long", "short",
        ];
        const PUNCTUATION: &[&str] = &[".", ",", "?", "!", ";", ":", "'", "\"", "(", ")", "-", "/"];

        let numbers = (0..=100).map(|n: u32| n.to_string());
        let words = COMMON_WORDS
            .iter()
            .chain(PUNCTUATION)
            .map(|s| s.to_string())
            .chain(numbers);
        Self::from_tokens(words)
    }

    /// Number of distinct tokens (ids are `0..len()`).
    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.token_to_id.get(token).copied()
    }

    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.id_to_token.get(id as usize).map(String::as_str)
    }

    /// Look up every token; unknown tokens become `UNK_ID`.
    pub fn tokens_to_ids<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens
            .iter()
            .map(|t| self.token_to_id(t.as_ref()).unwrap_or(UNK_ID))
            .collect()
    }

    /// Look up every id; unknown ids become `[UNK]`.
    pub fn ids_to_tokens(&self, ids: &[u32]) -> Vec<String> {
        ids.iter()
            .map(|&id| self.id_to_token(id).unwrap_or(UNK_TOKEN).to_string())
            .collect()
    }

    /// Tokens in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.id_to_token
            .iter()
            .enumerate()
            .map(|(id, token)| (id as u32, token.as_str()))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_tokens_have_reserved_ids() {
        let v = Vocabulary::demo();
        assert_eq!(v.token_to_id(PAD_TOKEN), Some(PAD_ID));
        assert_eq!(v.token_to_id(UNK_TOKEN), Some(UNK_ID));
        assert_eq!(v.token_to_id(CLS_TOKEN), Some(CLS_ID));
        assert_eq!(v.token_to_id(SEP_TOKEN), Some(SEP_ID));
        assert_eq!(v.token_to_id(MASK_TOKEN), Some(MASK_ID));
    }

    #[test]
    fn test_demo_vocabulary_contents() {
        let v = Vocabulary::demo();
        assert!(v.token_to_id("the").is_some());
        assert!(v.token_to_id("?").is_some());
        assert!(v.token_to_id("100").is_some());
        assert!(v.token_to_id("cupertino").is_none());
        // 5 specials + 93 words + 12 punctuation + 101 numbers
        assert_eq!(v.len(), 5 + 93 + 12 + 101);
    }

    #[test]
    fn test_unknown_token_maps_to_unk_id() {
        let v = Vocabulary::demo();
        assert_eq!(v.tokens_to_ids(&["the", "zyzzyva"]), vec![v.token_to_id("the").unwrap(), UNK_ID]);
    }

    #[test]
    fn test_unknown_id_maps_to_unk_token() {
        let v = Vocabulary::demo();
        assert_eq!(v.ids_to_tokens(&[CLS_ID, 999_999]), vec![CLS_TOKEN.to_string(), UNK_TOKEN.to_string()]);
    }

    #[test]
    fn test_round_trip_for_every_token() {
        let v = Vocabulary::demo();
        for (_, token) in v.iter() {
            let ids = v.tokens_to_ids(&[token]);
            assert_eq!(v.ids_to_tokens(&ids), vec![token.to_string()]);
        }
    }

    #[test]
    fn test_ids_are_dense_and_unique() {
        let v = Vocabulary::from_tokens(["alpha", "beta", "alpha", "[SEP]", "gamma"]);
        // duplicates and repeated specials are skipped
        assert_eq!(v.len(), 8);
        for (id, token) in v.iter() {
            assert_eq!(v.token_to_id(token), Some(id));
        }
        assert_eq!(v.token_to_id("gamma"), Some(7));
    }
}
