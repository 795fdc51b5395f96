//! Three-valued screening criteria and the assessment map fed to the decision reducer

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name under which the derived dual-component flag is reported downstream.
///
/// It is computed from the two component criteria and must never arrive
/// from the extractor as an independently assessed criterion.
pub const DUAL_COMPONENT: &str = "dual_component";

/// Three-valued assessment of a single criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Assessment {
    Yes,
    No,
    Unclear,
}

impl Assessment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Assessment::Yes => "YES",
            Assessment::No => "NO",
            Assessment::Unclear => "UNCLEAR",
        }
    }

    /// Parse a raw assessment value, rejecting anything outside the
    /// three-value domain
    pub fn parse(criterion: &str, value: &str) -> Result<Self, MalformedInputError> {
        match value.trim().to_uppercase().as_str() {
            "YES" => Ok(Assessment::Yes),
            "NO" => Ok(Assessment::No),
            "UNCLEAR" => Ok(Assessment::Unclear),
            _ => Err(MalformedInputError::InvalidAssessment {
                criterion: criterion.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for Assessment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recognized screening criteria, in canonical reporting order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Criterion {
    #[serde(rename = "participants_lmic")]
    ParticipantsLmic,
    #[serde(rename = "component_a_cash_support")]
    ComponentACashSupport,
    #[serde(rename = "component_b_productive_assets")]
    ComponentBProductiveAssets,
    #[serde(rename = "relevant_outcomes")]
    RelevantOutcomes,
    #[serde(rename = "study_design")]
    StudyDesign,
    #[serde(rename = "publication_year_2004_plus")]
    PublicationYear2004Plus,
    #[serde(rename = "completed_study")]
    CompletedStudy,
}

impl Criterion {
    /// All recognized criteria in canonical order
    pub const ALL: [Criterion; 7] = [
        Criterion::ParticipantsLmic,
        Criterion::ComponentACashSupport,
        Criterion::ComponentBProductiveAssets,
        Criterion::RelevantOutcomes,
        Criterion::StudyDesign,
        Criterion::PublicationYear2004Plus,
        Criterion::CompletedStudy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::ParticipantsLmic => "participants_lmic",
            Criterion::ComponentACashSupport => "component_a_cash_support",
            Criterion::ComponentBProductiveAssets => "component_b_productive_assets",
            Criterion::RelevantOutcomes => "relevant_outcomes",
            Criterion::StudyDesign => "study_design",
            Criterion::PublicationYear2004Plus => "publication_year_2004_plus",
            Criterion::CompletedStudy => "completed_study",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Criterion::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Input that violates the assessment-map contract.
///
/// Always propagated to the caller; never repaired into UNCLEAR.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedInputError {
    #[error("assessment '{value}' for criterion '{criterion}' is outside YES/NO/UNCLEAR")]
    InvalidAssessment { criterion: String, value: String },

    #[error("unrecognized criterion key: {0}")]
    UnrecognizedCriterion(String),

    #[error("duplicate criterion key: {0}")]
    DuplicateCriterion(&'static str),

    #[error("recognized criterion '{0}' is missing from the assessment map")]
    MissingCriterion(&'static str),

    #[error("'dual_component' is derived and must not be supplied as an assessed criterion")]
    DerivedCriterionSupplied,
}

/// How to treat a recognized criterion that is absent from the input map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingCriterionPolicy {
    /// Reject the map, surfacing upstream format breakage immediately
    #[default]
    Strict,
    /// Default the gap to UNCLEAR with an explanatory note
    Unclear,
}

/// One criterion's assessment together with the extractor's stated reasoning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CriterionAssessment {
    pub assessment: Assessment,
    pub reasoning: String,
}

/// A single entry of the ordered criteria map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CriteriaEntry {
    pub criterion: Criterion,
    pub assessment: Assessment,
    pub reasoning: String,
}

/// Ordered, complete mapping of criterion to assessment.
///
/// Construction enforces the input contract: only recognized keys, values in
/// the three-value domain, no duplicates, no supplied `dual_component`, and
/// completeness per [`MissingCriterionPolicy`]. A well-formed map always
/// holds all seven criteria in canonical order, which is what makes the
/// decision reduction total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CriteriaMap {
    entries: Vec<CriteriaEntry>,
}

impl CriteriaMap {
    /// Build a map from raw string keys and values, as they arrive from an
    /// external boundary (API payloads, re-processed exports)
    pub fn from_raw_entries<'a, I>(
        raw: I,
        policy: MissingCriterionPolicy,
    ) -> Result<Self, MalformedInputError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let mut parsed: Vec<(Criterion, CriterionAssessment)> = Vec::new();

        for (key, value, reasoning) in raw {
            if key == DUAL_COMPONENT {
                return Err(MalformedInputError::DerivedCriterionSupplied);
            }
            let criterion = Criterion::from_name(key)
                .ok_or_else(|| MalformedInputError::UnrecognizedCriterion(key.to_string()))?;
            if parsed.iter().any(|(c, _)| *c == criterion) {
                return Err(MalformedInputError::DuplicateCriterion(criterion.name()));
            }
            let assessment = Assessment::parse(key, value)?;
            parsed.push((
                criterion,
                CriterionAssessment {
                    assessment,
                    reasoning: reasoning.to_string(),
                },
            ));
        }

        Self::from_assessments(parsed, policy)
    }

    /// Build a map from already-typed assessments, normalizing to canonical
    /// order and applying the missing-criterion policy
    pub fn from_assessments(
        assessments: Vec<(Criterion, CriterionAssessment)>,
        policy: MissingCriterionPolicy,
    ) -> Result<Self, MalformedInputError> {
        let mut entries = Vec::with_capacity(Criterion::ALL.len());

        for criterion in Criterion::ALL {
            let found = assessments.iter().find(|(c, _)| *c == criterion);
            match found {
                Some((_, ca)) => entries.push(CriteriaEntry {
                    criterion,
                    assessment: ca.assessment,
                    reasoning: ca.reasoning.clone(),
                }),
                None => match policy {
                    MissingCriterionPolicy::Strict => {
                        return Err(MalformedInputError::MissingCriterion(criterion.name()));
                    }
                    MissingCriterionPolicy::Unclear => entries.push(CriteriaEntry {
                        criterion,
                        assessment: Assessment::Unclear,
                        reasoning: "Criterion not assessed by extractor".to_string(),
                    }),
                },
            }
        }

        Ok(Self { entries })
    }

    pub fn get(&self, criterion: Criterion) -> Assessment {
        // Complete by construction
        self.entries
            .iter()
            .find(|e| e.criterion == criterion)
            .map(|e| e.assessment)
            .unwrap_or(Assessment::Unclear)
    }

    pub fn reasoning(&self, criterion: Criterion) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.criterion == criterion)
            .map(|e| e.reasoning.as_str())
    }

    /// Replace one criterion's assessment and reasoning (used by the
    /// extraction-side correction pass, before the result becomes immutable)
    pub fn set(&mut self, criterion: Criterion, assessment: Assessment, reasoning: String) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.criterion == criterion) {
            entry.assessment = assessment;
            entry.reasoning = reasoning;
        }
    }

    pub fn entries(&self) -> &[CriteriaEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, Assessment)> + '_ {
        self.entries.iter().map(|e| (e.criterion, e.assessment))
    }
}
