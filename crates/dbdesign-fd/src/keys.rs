use std::collections::BTreeSet;

use serde::Serialize;

use crate::closure::closure;
use crate::combinations::combinations;
use crate::model::{FunctionalDependency, unique_values};

/// Largest number of derivable attributes the key search will enumerate.
///
/// The search is exponential in this count; above it the search is skipped.
pub const MAX_OPTIONAL_ATTRIBUTES: usize = 12;

/// Outcome of a candidate-key search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandidateKeySearch {
    /// Minimal keys of the smallest size that yielded any key.
    Found { keys: Vec<Vec<String>> },
    /// The search ran and no attribute set covers the universe.
    NoneExist,
    /// Too many optional attributes; nothing was enumerated.
    Skipped { optional: usize },
}

impl CandidateKeySearch {
    /// Keys found, empty for both `NoneExist` and `Skipped`.
    pub fn into_keys(self) -> Vec<Vec<String>> {
        match self {
            CandidateKeySearch::Found { keys } => keys,
            CandidateKeySearch::NoneExist | CandidateKeySearch::Skipped { .. } => Vec::new(),
        }
    }
}

/// Suggested primary attributes plus the candidate keys they were derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryAttributeSuggestion {
    pub primary_attributes: Vec<String>,
    pub candidate_keys: Vec<Vec<String>>,
}

/// Enumerate minimal candidate keys of `attributes` under `dependencies`.
///
/// An empty result is ambiguous: use [`search_candidate_keys`] to tell a
/// skipped search apart from one that found nothing.
pub fn find_candidate_keys(
    attributes: &[String],
    dependencies: &[FunctionalDependency],
) -> Vec<Vec<String>> {
    search_candidate_keys(attributes, dependencies).into_keys()
}

/// Candidate-key search reporting why it returned no keys.
///
/// Attributes that never appear on a right-hand side are part of every key.
/// The remaining ones are tried in combinations of growing size; the search
/// stops after the first size that produced a key.
pub fn search_candidate_keys(
    attributes: &[String],
    dependencies: &[FunctionalDependency],
) -> CandidateKeySearch {
    let universe = unique_values(attributes.iter().map(String::as_str));
    if universe.is_empty() {
        return CandidateKeySearch::NoneExist;
    }

    let members: BTreeSet<&str> = universe.iter().map(String::as_str).collect();
    let restricted = restrict_dependencies(dependencies, &members);

    let derivable: BTreeSet<&str> = restricted
        .iter()
        .flat_map(|dependency| dependency.right.iter().map(String::as_str))
        .collect();
    let (optional, mandatory): (Vec<&String>, Vec<&String>) = universe
        .iter()
        .partition(|attribute| derivable.contains(attribute.as_str()));

    if optional.len() > MAX_OPTIONAL_ATTRIBUTES {
        tracing::debug!(
            event = "candidate_key_search_skipped",
            optional = optional.len(),
            limit = MAX_OPTIONAL_ATTRIBUTES
        );
        return CandidateKeySearch::Skipped {
            optional: optional.len(),
        };
    }

    let mut keys: Vec<BTreeSet<String>> = Vec::new();
    let mut ordered: Vec<Vec<String>> = Vec::new();

    for pick in 0..=optional.len() {
        for combination in combinations(&optional, pick) {
            let candidate: Vec<String> = mandatory
                .iter()
                .copied()
                .chain(combination.into_iter().copied())
                .cloned()
                .collect();
            let candidate_set: BTreeSet<String> = candidate.iter().cloned().collect();

            let covered = closure(&candidate_set, &restricted);
            if !universe.iter().all(|attribute| covered.contains(attribute)) {
                continue;
            }

            if keys.iter().any(|key| key.is_subset(&candidate_set)) {
                continue;
            }

            keys.push(candidate_set);
            ordered.push(candidate);
        }

        if !ordered.is_empty() {
            tracing::trace!(
                event = "candidate_keys_found",
                size = mandatory.len() + pick,
                count = ordered.len()
            );
            return CandidateKeySearch::Found { keys: ordered };
        }
    }

    CandidateKeySearch::NoneExist
}

/// Union of the smallest candidate keys, in first-seen order.
pub fn infer_primary_attributes(
    attributes: &[String],
    dependencies: &[FunctionalDependency],
) -> PrimaryAttributeSuggestion {
    PrimaryAttributeSuggestion::from_keys(find_candidate_keys(attributes, dependencies))
}

impl PrimaryAttributeSuggestion {
    /// Build the suggestion from keys an earlier search already produced.
    pub fn from_keys(candidate_keys: Vec<Vec<String>>) -> Self {
        let Some(smallest) = candidate_keys.iter().map(Vec::len).min() else {
            return Self::default();
        };

        let mut primary_attributes: Vec<String> = Vec::new();
        for key in candidate_keys.iter().filter(|key| key.len() == smallest) {
            for attribute in key {
                if !primary_attributes.contains(attribute) {
                    primary_attributes.push(attribute.clone());
                }
            }
        }

        Self {
            primary_attributes,
            candidate_keys,
        }
    }
}

fn restrict_dependencies(
    dependencies: &[FunctionalDependency],
    members: &BTreeSet<&str>,
) -> Vec<FunctionalDependency> {
    dependencies
        .iter()
        .filter_map(|dependency| {
            let keep = |side: &[String]| {
                unique_values(side.iter().map(String::as_str))
                    .into_iter()
                    .filter(|attribute| members.contains(attribute.as_str()))
                    .collect::<Vec<_>>()
            };
            let left = keep(dependency.left.as_slice());
            let right = keep(dependency.right.as_slice());

            if left.is_empty() || right.is_empty() {
                None
            } else {
                Some(FunctionalDependency { left, right })
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn mandatory_attributes_alone_can_form_the_key() {
        let deps = vec![
            FunctionalDependency::new(["A"], ["B"]),
            FunctionalDependency::new(["B"], ["C"]),
        ];
        assert_eq!(find_candidate_keys(&attrs(&["A", "B", "C"]), &deps), vec![attrs(&["A"])]);
    }

    #[test]
    fn finds_alternative_keys_of_equal_size() {
        // A <-> B, both determine C; D is mandatory.
        let deps = vec![
            FunctionalDependency::new(["A"], ["B", "C"]),
            FunctionalDependency::new(["B"], ["A"]),
        ];
        assert_eq!(
            find_candidate_keys(&attrs(&["A", "B", "C", "D"]), &deps),
            vec![attrs(&["D", "A"]), attrs(&["D", "B"])]
        );
    }

    #[test]
    fn without_dependencies_every_attribute_is_key() {
        assert_eq!(
            find_candidate_keys(&attrs(&["x", "y"]), &[]),
            vec![attrs(&["x", "y"])]
        );
    }

    #[test]
    fn ignores_attributes_outside_universe() {
        let deps = vec![
            FunctionalDependency::new(["Z"], ["A"]),
            FunctionalDependency::new(["B", "Z"], ["A"]),
            FunctionalDependency::new(["A"], ["B", "Q"]),
        ];
        // Z -> A is dropped entirely; B,Z -> A shrinks to B -> A.
        assert_eq!(
            find_candidate_keys(&attrs(&["A", "B"]), &deps),
            vec![attrs(&["A"]), attrs(&["B"])]
        );
    }

    #[test]
    fn deduplicates_and_trims_attributes() {
        let keys = find_candidate_keys(&attrs(&[" A", "A", "", "B "]), &[]);
        assert_eq!(keys, vec![attrs(&["A", "B"])]);
    }

    #[test]
    fn empty_universe_has_no_keys() {
        assert_eq!(search_candidate_keys(&[], &[]), CandidateKeySearch::NoneExist);
    }

    #[test]
    fn skips_search_above_ceiling() {
        let universe: Vec<String> = (0..14).map(|i| format!("a{i}")).collect();
        // a0 determines all others, so 13 attributes are optional.
        let deps = vec![FunctionalDependency {
            left: vec!["a0".to_string()],
            right: universe[1..].to_vec(),
        }];
        assert_eq!(
            search_candidate_keys(&universe, &deps),
            CandidateKeySearch::Skipped { optional: 13 }
        );
        assert!(find_candidate_keys(&universe, &deps).is_empty());
    }

    #[test]
    fn attributes_never_derived_form_one_key_regardless_of_count() {
        let universe: Vec<String> = (0..13).map(|i| format!("a{i}")).collect();
        assert_eq!(
            search_candidate_keys(&universe, &[]),
            CandidateKeySearch::Found {
                keys: vec![universe.clone()]
            }
        );
    }

    #[test]
    fn suggestion_from_keys_keeps_only_smallest() {
        let suggestion = PrimaryAttributeSuggestion::from_keys(vec![
            attrs(&["A"]),
            attrs(&["B", "C"]),
            attrs(&["D"]),
        ]);
        assert_eq!(suggestion.primary_attributes, attrs(&["A", "D"]));
        assert_eq!(suggestion.candidate_keys.len(), 3);
        assert_eq!(
            PrimaryAttributeSuggestion::from_keys(Vec::new()),
            PrimaryAttributeSuggestion::default()
        );
    }

    #[test]
    fn searches_at_ceiling() {
        let universe: Vec<String> = (0..13).map(|i| format!("a{i}")).collect();
        let deps = vec![FunctionalDependency {
            left: vec!["a0".to_string()],
            right: universe[1..].to_vec(),
        }];
        assert_eq!(find_candidate_keys(&universe, &deps), vec![attrs(&["a0"])]);
    }

    #[test]
    fn cyclic_dependencies_yield_single_attribute_keys() {
        let deps = vec![
            FunctionalDependency::new(["A"], ["B"]),
            FunctionalDependency::new(["B"], ["C"]),
            FunctionalDependency::new(["C"], ["A"]),
        ];
        assert_eq!(
            find_candidate_keys(&attrs(&["A", "B", "C"]), &deps),
            vec![attrs(&["A"]), attrs(&["B"]), attrs(&["C"])]
        );
    }

    #[test]
    fn infers_union_of_smallest_keys() {
        let deps = vec![
            FunctionalDependency::new(["A"], ["B", "C"]),
            FunctionalDependency::new(["B"], ["A"]),
        ];
        let suggestion = infer_primary_attributes(&attrs(&["A", "B", "C", "D"]), &deps);
        assert_eq!(suggestion.primary_attributes, attrs(&["D", "A", "B"]));
        assert_eq!(suggestion.candidate_keys.len(), 2);
    }

    #[test]
    fn inference_is_empty_without_keys() {
        let universe: Vec<String> = (0..14).map(|i| format!("a{i}")).collect();
        let deps = vec![FunctionalDependency {
            left: vec!["a0".to_string()],
            right: universe[1..].to_vec(),
        }];
        assert_eq!(
            infer_primary_attributes(&universe, &deps),
            PrimaryAttributeSuggestion::default()
        );
    }
}
