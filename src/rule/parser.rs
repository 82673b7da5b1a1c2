use super::error::RuleParseError;
use super::{Join, Rule, RuleKind};
use std::str::FromStr;

impl FromStr for RuleKind {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "include" | "inc" | "i" => Ok(RuleKind::Include),
            "exclude" | "exc" | "x" => Ok(RuleKind::Exclude),
            "starts_with" | "starts" | "s" => Ok(RuleKind::StartsWith),
            "ends_with" | "ends" | "e" => Ok(RuleKind::EndsWith),
            "regex" | "re" | "r" => Ok(RuleKind::Regex),
            _ => Err(RuleParseError::UnknownKind(s.to_string())),
        }
    }
}

fn parse_join(s: &str) -> Option<Join> {
    match s.to_lowercase().as_str() {
        "and" => Some(Join::And),
        "or" => Some(Join::Or),
        _ => None,
    }
}

/// Parse a single rule term such as `or:regex/c:^ERR`
pub fn parse_rule_term(s: &str) -> Result<Rule, RuleParseError> {
    let (head, rest) = s.split_once(':').ok_or_else(|| {
        RuleParseError::InvalidTerm(format!("Expected 'kind:pattern' format, got: {}", s))
    })?;

    let (join, kind_token, pattern) = match parse_join(head.trim()) {
        Some(join) => {
            let (kind_token, pattern) = rest.split_once(':').ok_or_else(|| {
                RuleParseError::InvalidTerm(format!(
                    "Expected '{}:kind:pattern' format, got: {}",
                    head, s
                ))
            })?;
            (Some(join), kind_token, pattern)
        }
        None => (None, head, rest),
    };

    let (kind_name, modifier) = match kind_token.split_once('/') {
        Some((name, modifier)) => (name.trim(), Some(modifier.trim())),
        None => (kind_token.trim(), None),
    };
    let kind: RuleKind = kind_name.parse()?;

    let case_sensitive = match modifier {
        None => false,
        Some(m) if m.eq_ignore_ascii_case("c") || m.eq_ignore_ascii_case("cs") => true,
        Some(m) => return Err(RuleParseError::UnknownModifier(m.to_string())),
    };

    if pattern.trim().is_empty() {
        return Err(RuleParseError::EmptyPattern(
            kind.canonical_name().to_string(),
        ));
    }

    Ok(Rule {
        join,
        kind,
        pattern: pattern.to_string(),
        case_sensitive,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_term() {
        let rule = parse_rule_term("include:timeout").unwrap();
        assert_eq!(rule.kind, RuleKind::Include);
        assert_eq!(rule.pattern, "timeout");
        assert_eq!(rule.join, None);
        assert!(!rule.case_sensitive);
    }

    #[test]
    fn test_parse_join_prefix() {
        let rule = parse_rule_term("or:s:2024-").unwrap();
        assert_eq!(rule.join, Some(Join::Or));
        assert_eq!(rule.kind, RuleKind::StartsWith);
        assert_eq!(rule.pattern, "2024-");
    }

    #[test]
    fn test_parse_short_aliases() {
        assert_eq!(parse_rule_term("i:a").unwrap().kind, RuleKind::Include);
        assert_eq!(parse_rule_term("x:a").unwrap().kind, RuleKind::Exclude);
        assert_eq!(parse_rule_term("s:a").unwrap().kind, RuleKind::StartsWith);
        assert_eq!(parse_rule_term("e:a").unwrap().kind, RuleKind::EndsWith);
        assert_eq!(parse_rule_term("r:a").unwrap().kind, RuleKind::Regex);
    }

    #[test]
    fn test_parse_case_modifier() {
        let rule = parse_rule_term("and:exclude/c:Debug").unwrap();
        assert!(rule.case_sensitive);
        assert_eq!(rule.join, Some(Join::And));
        assert_eq!(rule.kind, RuleKind::Exclude);
    }

    #[test]
    fn test_pattern_keeps_colons() {
        let rule = parse_rule_term("regex:\\d{2}:\\d{2}").unwrap();
        assert_eq!(rule.pattern, "\\d{2}:\\d{2}");
    }

    #[test]
    fn test_kind_named_like_join_is_rejected() {
        let result = parse_rule_term("or:timeout");
        assert!(matches!(result, Err(RuleParseError::InvalidTerm(_))));
    }

    #[test]
    fn test_unknown_kind() {
        let result = parse_rule_term("contains:x");
        assert!(matches!(result, Err(RuleParseError::UnknownKind(_))));
    }

    #[test]
    fn test_unknown_modifier() {
        let result = parse_rule_term("include/z:x");
        assert!(matches!(result, Err(RuleParseError::UnknownModifier(_))));
    }

    #[test]
    fn test_empty_pattern() {
        let result = parse_rule_term("exclude:   ");
        assert_eq!(
            result,
            Err(RuleParseError::EmptyPattern("exclude".to_string()))
        );
    }

    #[test]
    fn test_missing_separator() {
        assert!(parse_rule_term("timeout").is_err());
    }
}
