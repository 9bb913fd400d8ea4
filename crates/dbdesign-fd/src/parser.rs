use crate::errors::DependencyParseError;
use crate::model::{FunctionalDependency, ParsedDependencySet, unique_values};

const ARROW: &str = "->";

/// Parse the line-oriented notation `A,B -> C,D`.
///
/// Blank lines and lines starting with `#` are skipped before numbering, so
/// error line numbers refer to the remaining lines. A malformed line is
/// recorded and parsing continues with the next one.
pub fn parse_functional_dependencies(text: &str) -> ParsedDependencySet {
    let mut parsed = ParsedDependencySet::default();

    let lines = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    for (index, line) in lines.enumerate() {
        let number = index + 1;

        let arrow = match line.find(ARROW) {
            Some(position) if position > 0 => position,
            _ => {
                parsed
                    .errors
                    .push(DependencyParseError::MissingArrow { line: number });
                continue;
            }
        };

        let left = unique_values(line[..arrow].split(','));
        let right = unique_values(line[arrow + ARROW.len()..].split(','));

        if left.is_empty() || right.is_empty() {
            parsed
                .errors
                .push(DependencyParseError::EmptySide { line: number });
            continue;
        }

        parsed
            .dependencies
            .push(FunctionalDependency { left, right });
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_errors_over_filtered_lines() {
        let parsed = parse_functional_dependencies("A,B -> C\n# comment\nD -> \n");

        assert_eq!(
            parsed.dependencies,
            vec![FunctionalDependency::new(["A", "B"], ["C"])]
        );
        assert_eq!(parsed.errors, vec![DependencyParseError::EmptySide { line: 2 }]);
        assert_eq!(
            parsed.error_messages(),
            vec!["Zeile 2: Linke und rechte Seite duerfen nicht leer sein.".to_string()]
        );
    }

    #[test]
    fn rejects_missing_or_leading_arrow() {
        let parsed = parse_functional_dependencies("\n  A B C\n\n-> C\nA -> B\n");

        assert_eq!(
            parsed.errors,
            vec![
                DependencyParseError::MissingArrow { line: 1 },
                DependencyParseError::MissingArrow { line: 2 },
            ]
        );
        assert_eq!(parsed.errors[0].to_string(), "Zeile 1: Erwartet Format A,B -> C,D");
        assert_eq!(parsed.errors[1].line(), 2);
        assert_eq!(parsed.dependencies.len(), 1);
    }

    #[test]
    fn trims_and_deduplicates_sides() {
        let parsed = parse_functional_dependencies("  B , A,B,, -> C ,c, C\r\n");

        assert!(parsed.is_clean());
        assert_eq!(
            parsed.dependencies,
            vec![FunctionalDependency::new(["B", "A"], ["C", "c"])]
        );
    }

    #[test]
    fn splits_on_first_arrow_only() {
        let parsed = parse_functional_dependencies("A -> B -> C");

        assert!(parsed.is_clean());
        assert_eq!(parsed.dependencies[0].left, vec!["A"]);
        assert_eq!(parsed.dependencies[0].right, vec!["B -> C"]);
    }

    #[test]
    fn comma_only_side_is_empty() {
        let parsed = parse_functional_dependencies(" , -> A");
        assert_eq!(parsed.errors, vec![DependencyParseError::EmptySide { line: 1 }]);
    }
}
