use std::collections::BTreeSet;

use crate::model::FunctionalDependency;

/// Attribute closure of `attributes` under `dependencies`.
///
/// Repeats full passes over the dependencies until a pass adds nothing. The
/// set only grows and the attribute universe is finite, so this terminates.
pub fn closure(
    attributes: &BTreeSet<String>,
    dependencies: &[FunctionalDependency],
) -> BTreeSet<String> {
    let mut result = attributes.clone();
    let mut changed = true;

    while changed {
        changed = false;

        for dependency in dependencies {
            if !dependency.left.iter().all(|attribute| result.contains(attribute)) {
                continue;
            }

            for attribute in &dependency.right {
                if result.insert(attribute.clone()) {
                    changed = true;
                }
            }
        }
    }

    result
}
