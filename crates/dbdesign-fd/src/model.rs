use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::DependencyParseError;

/// `left` determines `right`. Both sides are deduplicated and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FunctionalDependency {
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl FunctionalDependency {
    pub fn new<L, R>(left: L, right: R) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            left: left.into_iter().map(Into::into).collect(),
            right: right.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parser output: every dependency that parsed plus one error per rejected line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDependencySet {
    pub dependencies: Vec<FunctionalDependency>,
    pub errors: Vec<DependencyParseError>,
}

impl ParsedDependencySet {
    /// Rendered error messages in line order.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Trim, drop empty entries and deduplicate while keeping first occurrences.
pub(crate) fn unique_values<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut unique: Vec<String> = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() || unique.iter().any(|seen| seen == value) {
            continue;
        }
        unique.push(value.to_string());
    }
    unique
}
