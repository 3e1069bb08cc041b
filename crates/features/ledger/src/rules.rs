//! Rule matching for bank-transaction categorization.

use crate::models::CategoryRule;

/// Picks the winning rule for a bank description: case-insensitive substring
/// match, lowest priority number first. `rules` must already be sorted by
/// priority, which is how the service fetches them.
#[must_use]
pub fn match_rule<'a>(description: &str, rules: &'a [CategoryRule]) -> Option<&'a CategoryRule> {
    let haystack = description.to_lowercase();
    rules.iter().find(|rule| {
        !rule.pattern.is_empty() && haystack.contains(&rule.pattern.to_lowercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, account_code: &str, priority: i64) -> CategoryRule {
        CategoryRule {
            id: format!("rule-{priority}"),
            restaurant: "r1".to_owned(),
            pattern: pattern.to_owned(),
            account_code: account_code.to_owned(),
            priority,
        }
    }

    #[test]
    fn lowest_priority_wins() {
        let rules =
            vec![rule("sysco", "5000", 1), rule("sys", "5900", 2), rule("depot", "5100", 3)];
        let hit = match_rule("SYSCO FOOD SVC 0423", &rules).expect("match");
        assert_eq!(hit.account_code, "5000");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let rules = vec![rule("Restaurant Depot", "5100", 1)];
        assert!(match_rule("RESTAURANT DEPOT #81", &rules).is_some());
    }

    #[test]
    fn no_match_returns_none() {
        let rules = vec![rule("sysco", "5000", 1)];
        assert!(match_rule("SQUARE INC DES:CCD", &rules).is_none());
    }

    #[test]
    fn empty_pattern_never_matches() {
        let rules = vec![rule("", "5000", 1), rule("square", "4000", 2)];
        let hit = match_rule("SQUARE INC", &rules).expect("match");
        assert_eq!(hit.account_code, "4000");
    }
}
