//! Deterministic criteria-to-decision reduction
//!
//! The single source of truth for turning per-criterion YES/NO/UNCLEAR
//! assessments into a final screening decision. Every consumer (the screening
//! pipeline, the reduce-only API endpoint, exports) goes through [`reduce`];
//! the rule table is never re-implemented inline anywhere else.
//!
//! The reduction is a pure function over a well-formed [`CriteriaMap`]: no
//! state, no ordering dependence between papers, safe to call concurrently.
//! Malformed input is rejected at map construction, so `reduce` itself is
//! total over its input type.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::criteria::{Assessment, CriteriaMap, Criterion, DUAL_COMPONENT};
use crate::model::screening::{AssessmentCounts, Decision};

/// Which rule of the ordered table produced the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AppliedRule {
    /// Any NO among the base criteria or the derived flag excludes the paper
    AnyNo,
    /// Every criterion, including the derived flag, assessed YES
    AllYes,
    /// No NO present, at least one UNCLEAR
    SomeUnclear,
}

/// Outcome of reducing one criteria map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reduction {
    pub decision: Decision,
    /// Derived from the two component criteria, reported for auditing
    pub dual_component: Assessment,
    /// Names the rule that fired and every criterion that triggered it
    pub reasoning: String,
    pub rule: AppliedRule,
    pub counts: AssessmentCounts,
}

/// Derive the dual-component flag from the two component criteria.
///
/// YES iff both components are YES; NO iff either is NO; UNCLEAR otherwise.
/// This flag is never asked of the extractor: assessing it independently was
/// measured to inflate UNCLEAR rates sharply while deriving it disagrees
/// with nothing.
pub fn derive_dual_component(component_a: Assessment, component_b: Assessment) -> Assessment {
    match (component_a, component_b) {
        (Assessment::Yes, Assessment::Yes) => Assessment::Yes,
        (Assessment::No, _) | (_, Assessment::No) => Assessment::No,
        _ => Assessment::Unclear,
    }
}

/// Reduce a complete criteria map to a final decision.
///
/// Ordered rules, first match wins:
/// 1. any criterion (or the derived dual-component flag) is NO -> EXCLUDE,
///    naming every NO; nothing overrides this;
/// 2. all criteria (including the derived flag) are YES -> INCLUDE;
/// 3. otherwise -> MAYBE, naming every UNCLEAR.
///
/// UNCERTAIN is never returned here: it is the caller's marker for "the
/// extractor produced no usable map at all" and must not be conflated with
/// the assessed-but-ambiguous MAYBE.
pub fn reduce(criteria: &CriteriaMap) -> Reduction {
    let dual_component = derive_dual_component(
        criteria.get(Criterion::ComponentACashSupport),
        criteria.get(Criterion::ComponentBProductiveAssets),
    );

    let mut counts = AssessmentCounts::default();
    let mut no_criteria: Vec<&str> = Vec::new();
    let mut unclear_criteria: Vec<&str> = Vec::new();

    for (criterion, assessment) in criteria.iter() {
        match assessment {
            Assessment::Yes => counts.yes += 1,
            Assessment::No => {
                counts.no += 1;
                no_criteria.push(criterion.name());
            }
            Assessment::Unclear => {
                counts.unclear += 1;
                unclear_criteria.push(criterion.name());
            }
        }
    }

    match dual_component {
        Assessment::No => no_criteria.push(DUAL_COMPONENT),
        Assessment::Unclear => unclear_criteria.push(DUAL_COMPONENT),
        Assessment::Yes => {}
    }

    if !no_criteria.is_empty() {
        let reasoning = format!(
            "EXCLUDE: {} criteria assessed NO ({})",
            no_criteria.len(),
            no_criteria.join(", ")
        );
        return Reduction {
            decision: Decision::Exclude,
            dual_component,
            reasoning,
            rule: AppliedRule::AnyNo,
            counts,
        };
    }

    if unclear_criteria.is_empty() {
        let reasoning = format!(
            "INCLUDE: all {} criteria and derived {} assessed YES",
            counts.yes, DUAL_COMPONENT
        );
        return Reduction {
            decision: Decision::Include,
            dual_component,
            reasoning,
            rule: AppliedRule::AllYes,
            counts,
        };
    }

    let reasoning = format!(
        "MAYBE: no NO assessments, {} unclear ({})",
        unclear_criteria.len(),
        unclear_criteria.join(", ")
    );
    Reduction {
        decision: Decision::Maybe,
        dual_component,
        reasoning,
        rule: AppliedRule::SomeUnclear,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::criteria::{CriterionAssessment, MissingCriterionPolicy};

    const VALUES: [Assessment; 3] = [Assessment::Yes, Assessment::No, Assessment::Unclear];

    fn map_of(assessments: [(Criterion, Assessment); 7]) -> CriteriaMap {
        let entries = assessments
            .into_iter()
            .map(|(c, a)| {
                (
                    c,
                    CriterionAssessment {
                        assessment: a,
                        reasoning: format!("{} assessed {}", c.name(), a),
                    },
                )
            })
            .collect();
        CriteriaMap::from_assessments(entries, MissingCriterionPolicy::Strict).unwrap()
    }

    fn uniform(value: Assessment) -> [(Criterion, Assessment); 7] {
        let mut out = [(Criterion::ParticipantsLmic, value); 7];
        for (slot, criterion) in out.iter_mut().zip(Criterion::ALL) {
            slot.0 = criterion;
        }
        out
    }

    fn with(overrides: &[(Criterion, Assessment)]) -> CriteriaMap {
        let mut base = uniform(Assessment::Yes);
        for slot in base.iter_mut() {
            if let Some((_, v)) = overrides.iter().find(|(c, _)| *c == slot.0) {
                slot.1 = *v;
            }
        }
        map_of(base)
    }

    #[test]
    fn dual_component_table_all_nine_combinations() {
        for a in VALUES {
            for b in VALUES {
                let expected = if a == Assessment::Yes && b == Assessment::Yes {
                    Assessment::Yes
                } else if a == Assessment::No || b == Assessment::No {
                    Assessment::No
                } else {
                    Assessment::Unclear
                };
                assert_eq!(derive_dual_component(a, b), expected, "({a}, {b})");
            }
        }
    }

    // Every one of the 3^7 well-formed maps reduces to exactly one of
    // INCLUDE/EXCLUDE/MAYBE, never UNCERTAIN, and the rule table is
    // consistent with the raw assessments.
    #[test]
    fn totality_over_all_well_formed_maps() {
        let mut seen = [0usize; 3];

        for index in 0..3usize.pow(7) {
            let mut remaining = index;
            let mut assignment = uniform(Assessment::Yes);
            for slot in assignment.iter_mut() {
                slot.1 = VALUES[remaining % 3];
                remaining /= 3;
            }
            let map = map_of(assignment);
            let reduction = reduce(&map);

            let any_no = assignment.iter().any(|(_, a)| *a == Assessment::No);
            let all_yes = assignment.iter().all(|(_, a)| *a == Assessment::Yes);

            match reduction.decision {
                Decision::Exclude => {
                    assert!(any_no, "EXCLUDE without any NO at index {index}");
                    seen[0] += 1;
                }
                Decision::Include => {
                    assert!(all_yes, "INCLUDE without all YES at index {index}");
                    seen[1] += 1;
                }
                Decision::Maybe => {
                    assert!(!any_no && !all_yes, "MAYBE misfired at index {index}");
                    seen[2] += 1;
                }
                Decision::Uncertain => panic!("reducer returned UNCERTAIN at index {index}"),
            }
        }

        // 2 of 3 values per criterion avoid NO; of those, one combination is all-YES
        assert_eq!(seen[1], 1);
        assert_eq!(seen[2], 2usize.pow(7) - 1);
        assert_eq!(seen[0], 3usize.pow(7) - 2usize.pow(7));
    }

    #[test]
    fn no_dominance_cannot_be_overridden() {
        // A single NO among six YES still excludes
        let map = with(&[(Criterion::StudyDesign, Assessment::No)]);
        let reduction = reduce(&map);
        assert_eq!(reduction.decision, Decision::Exclude);
        assert_eq!(reduction.rule, AppliedRule::AnyNo);
        assert!(reduction.reasoning.contains("study_design"));
    }

    #[test]
    fn all_yes_includes_and_forces_dual_yes() {
        let reduction = reduce(&with(&[]));
        assert_eq!(reduction.decision, Decision::Include);
        assert_eq!(reduction.dual_component, Assessment::Yes);
        assert_eq!(reduction.rule, AppliedRule::AllYes);
        assert_eq!(reduction.counts.yes, 7);
    }

    #[test]
    fn component_no_propagates_through_dual_component() {
        let map = with(&[(Criterion::ComponentACashSupport, Assessment::No)]);
        let reduction = reduce(&map);
        assert_eq!(reduction.decision, Decision::Exclude);
        assert_eq!(reduction.dual_component, Assessment::No);
        assert!(reduction.reasoning.contains("component_a_cash_support"));
        assert!(reduction.reasoning.contains(DUAL_COMPONENT));
    }

    #[test]
    fn unclear_component_yields_maybe_via_dual_component() {
        let map = with(&[(Criterion::ComponentBProductiveAssets, Assessment::Unclear)]);
        let reduction = reduce(&map);
        assert_eq!(reduction.dual_component, Assessment::Unclear);
        assert_eq!(reduction.decision, Decision::Maybe);
        assert!(reduction.reasoning.contains(DUAL_COMPONENT));
    }

    #[test]
    fn single_unclear_base_criterion_yields_maybe() {
        let map = with(&[(Criterion::ParticipantsLmic, Assessment::Unclear)]);
        let reduction = reduce(&map);
        assert_eq!(reduction.decision, Decision::Maybe);
        assert_eq!(reduction.dual_component, Assessment::Yes);
        assert!(reduction.reasoning.contains("participants_lmic"));
        assert!(!reduction.reasoning.contains(DUAL_COMPONENT));
    }

    #[test]
    fn reduction_is_idempotent() {
        let map = with(&[
            (Criterion::RelevantOutcomes, Assessment::Unclear),
            (Criterion::CompletedStudy, Assessment::Unclear),
        ]);
        let first = reduce(&map);
        let second = reduce(&map);
        assert_eq!(first, second);
    }

    #[test]
    fn exclude_reasoning_names_every_no() {
        let map = with(&[
            (Criterion::StudyDesign, Assessment::No),
            (Criterion::RelevantOutcomes, Assessment::No),
            (Criterion::ParticipantsLmic, Assessment::Unclear),
        ]);
        let reduction = reduce(&map);
        assert_eq!(reduction.decision, Decision::Exclude);
        assert!(reduction.reasoning.contains("study_design"));
        assert!(reduction.reasoning.contains("relevant_outcomes"));
        // UNCLEAR criteria are not named in an EXCLUDE reasoning
        assert!(!reduction.reasoning.contains("participants_lmic"));
    }
}
