//! Prompts for criteria extraction

use crate::model::Paper;

/// System prompt for per-criterion assessment
pub const SCREENING_SYSTEM_PROMPT: &str = r#"You are a systematic review expert evaluating research papers for a review of economic-inclusion (graduation-style) programs.

Your role is to assess each inclusion criterion independently as YES, NO, or UNCLEAR
from the paper's title and abstract only.

You must:
- Base every assessment strictly on the provided record
- Use NO only when the text actively contradicts the criterion
- Use UNCLEAR when the text does not allow a determination either way
- Cite the supporting text in each criterion's reasoning
- Never invent program components, outcomes, or study details

Do not:
- Assess whether the program has both components combined; assess each component separately
- Judge the publication-year cutoff; report the year as written and let the caller assess it
- Produce an overall include/exclude decision; that is computed downstream

Your output must be structured JSON only and conform to the requested schema."#;

/// Build the per-paper assessment prompt
pub fn build_screening_prompt(paper: &Paper) -> String {
    let authors = if paper.authors.is_empty() {
        "Unknown".to_string()
    } else {
        paper.authors.join(", ")
    };

    let keywords = if paper.keywords.is_empty() {
        "None".to_string()
    } else {
        paper.keywords.join(", ")
    };

    format!(
        r#"Assess the following paper against each inclusion criterion.

## Paper Record
Title: {title}
Authors: {authors}
Journal: {journal}
Year: {year}
Abstract: {abstract_text}
Keywords: {keywords}
DOI: {doi}
Publication Type: {publication_type}

## Criteria to Assess
1. participants_lmic - participants are in a low- or middle-income country
2. component_a_cash_support - the program provides cash or in-kind consumption support
3. component_b_productive_assets - the program directly provides productive assets
   (livestock, equipment, inventory). Measuring impacts ON asset ownership is not provision.
4. relevant_outcomes - economic/livelihood outcomes are measured (income, assets,
   consumption, expenditure)
5. study_design - quantitative impact evaluation of a primary study (RCT,
   quasi-experimental). Reviews, syntheses, and policy analyses do not qualify.
6. publication_year - report the publication year exactly as stated, or null
7. completed_study - the study is completed with results, not a protocol or proposal

Guidelines:
- YES requires affirmative support in the text
- NO requires the text to contradict the criterion; quote the contradicting text
- UNCLEAR when the abstract is silent or ambiguous
- An unavailable abstract makes most criteria UNCLEAR, not NO

Output JSON only."#,
        title = paper.title,
        authors = authors,
        journal = paper.journal.as_deref().unwrap_or("Unknown"),
        year = paper
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "Unknown".to_string()),
        abstract_text = paper
            .abstract_text
            .as_deref()
            .unwrap_or("No abstract available"),
        keywords = keywords,
        doi = paper.doi.as_deref().unwrap_or("No DOI"),
        publication_type = paper.publication_type.as_deref().unwrap_or("Unknown"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_includes_record_fields_and_fallbacks() {
        let paper = Paper {
            paper_id: "p1".to_string(),
            title: "Asset transfers in rural Kenya".to_string(),
            authors: vec!["A. Author".to_string()],
            journal: Some("J. Dev. Econ.".to_string()),
            year: Some(2018),
            abstract_text: None,
            doi: None,
            keywords: vec![],
            publication_type: None,
            source_file: None,
        };

        let prompt = build_screening_prompt(&paper);
        assert!(prompt.contains("Asset transfers in rural Kenya"));
        assert!(prompt.contains("A. Author"));
        assert!(prompt.contains("No abstract available"));
        assert!(prompt.contains("No DOI"));
    }
}
