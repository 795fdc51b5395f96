//! Cache key generation for screening results

use sha2::{Digest, Sha256};

use crate::model::Paper;
use crate::service::extraction::prompts::{build_screening_prompt, SCREENING_SYSTEM_PROMPT};

/// Generate the cache key hash for a screening result
///
/// The key is based on:
/// - the paper content fingerprint (title, abstract, year)
/// - prompt version (hash of prompt content)
/// - model_id
///
/// so edits to the paper record, prompt text, or engine all invalidate the
/// cached result.
pub fn generate_screening_cache_key(paper: &Paper, model_id: &str) -> String {
    let user_prompt = build_screening_prompt(paper);
    let prompt_content = format!("{}\n{}", SCREENING_SYSTEM_PROMPT, user_prompt);
    let prompt_version = hash_string(&prompt_content);

    let key_components = format!("{}|{}|{}", paper.fingerprint(), prompt_version, model_id);

    hash_string(&key_components)
}

/// Hash a string to a hex string using SHA256
fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str) -> Paper {
        Paper {
            paper_id: "p1".to_string(),
            title: title.to_string(),
            authors: vec![],
            journal: None,
            year: Some(2019),
            abstract_text: Some("Abstract text.".to_string()),
            doi: None,
            keywords: vec![],
            publication_type: None,
            source_file: None,
        }
    }

    #[test]
    fn key_is_stable_for_same_inputs() {
        let a = generate_screening_cache_key(&paper("Title"), "gpt-4o-mini");
        let b = generate_screening_cache_key(&paper("Title"), "gpt-4o-mini");
        assert_eq!(a, b);
    }

    #[test]
    fn key_varies_with_content_and_model() {
        let base = generate_screening_cache_key(&paper("Title"), "gpt-4o-mini");
        assert_ne!(
            base,
            generate_screening_cache_key(&paper("Other title"), "gpt-4o-mini")
        );
        assert_ne!(base, generate_screening_cache_key(&paper("Title"), "gpt-4o"));
    }
}
