//! Paper record submitted for screening

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use utoipa::ToSchema;

/// A single paper (title/abstract record) to screen.
///
/// Produced by external file readers (RIS, spreadsheet exports); this service
/// only consumes the already-parsed record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Paper {
    /// Stable identifier; generated from year and title hash when absent
    #[serde(default)]
    pub paper_id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub publication_type: Option<String>,
    /// File the record came from, for audit trails
    #[serde(default)]
    pub source_file: Option<String>,
}

impl Paper {
    /// Fill in a missing `paper_id` from the year and a short title hash
    pub fn ensure_id(&mut self) {
        if self.paper_id.is_empty() {
            let digest = Sha256::digest(self.title.as_bytes());
            let short = digest
                .iter()
                .take(4)
                .map(|b| format!("{:02x}", b))
                .collect::<String>();
            let year = self
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "noyear".to_string());
            self.paper_id = format!("{}_{}", year, short);
        }
    }

    /// Content fingerprint over the fields the extractor actually sees.
    ///
    /// Used in cache keys so edits to title or abstract invalidate cached
    /// screening results.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.title.as_bytes());
        hasher.update(b"\x1f");
        if let Some(ref abstract_text) = self.abstract_text {
            hasher.update(abstract_text.as_bytes());
        }
        hasher.update(b"\x1f");
        if let Some(year) = self.year {
            hasher.update(year.to_le_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(title: &str) -> Paper {
        Paper {
            paper_id: String::new(),
            title: title.to_string(),
            authors: vec![],
            journal: None,
            year: Some(2020),
            abstract_text: Some("An abstract.".to_string()),
            doi: None,
            keywords: vec![],
            publication_type: None,
            source_file: None,
        }
    }

    #[test]
    fn ensure_id_is_deterministic_and_keeps_existing() {
        let mut a = paper("Graduation programs in Bangladesh");
        let mut b = paper("Graduation programs in Bangladesh");
        a.ensure_id();
        b.ensure_id();
        assert_eq!(a.paper_id, b.paper_id);
        assert!(a.paper_id.starts_with("2020_"));

        let mut c = paper("Something else");
        c.paper_id = "custom_01".to_string();
        c.ensure_id();
        assert_eq!(c.paper_id, "custom_01");
    }

    #[test]
    fn fingerprint_changes_with_abstract() {
        let a = paper("Same title");
        let mut b = paper("Same title");
        b.abstract_text = Some("A different abstract.".to_string());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
