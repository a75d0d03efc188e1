//! Token rules given on the command line as `NAME=PATTERN`.
use lazy_static::lazy_static;
use regex::Regex;

/// Rules used when none are given. Together they match any input, so the
/// default lexer never stops on unmatched input.
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("newline", r"^(?:\r\n|[\n\r\u{2028}\u{2029}])"),
    ("space", r"^[^\S\r\n\u{2028}\u{2029}]+"),
    ("number", r"^\d+(?:\.\d+)?"),
    ("text", r"^\w+"),
    ("punct", r"^[^\w\s]"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub pattern: String,
}

impl Rule {
    pub fn as_pair(&self) -> (&str, &str) {
        (&self.name, &self.pattern)
    }
}

/// Parses `NAME=PATTERN`. The name must look like an identifier (dashes
/// allowed); the pattern is everything after the first `=` and is compiled
/// later by the lexer.
pub fn parse_rule(arg: &str) -> Result<Rule, String> {
    lazy_static! {
        static ref RULE_RE: Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_-]*)=(.+)$").unwrap();
    }

    let captures = RULE_RE
        .captures(arg)
        .ok_or_else(|| format!("expected NAME=PATTERN, got '{}'", arg))?;

    Ok(Rule {
        name: captures[1].to_string(),
        pattern: captures[2].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::Result;
    use lexloc::{Lex, Lexer};

    #[test]
    fn test_parse_rule() {
        assert_eq!(
            parse_rule(r"text=^\w+"),
            Ok(Rule {
                name: "text".into(),
                pattern: r"^\w+".into(),
            })
        );
    }

    #[test]
    fn test_pattern_may_contain_equals() {
        let rule = parse_rule("assign=^==?").unwrap();
        assert_eq!(rule.as_pair(), ("assign", "^==?"));
    }

    #[test]
    fn test_rejects_malformed_rules() {
        assert!(parse_rule("text").is_err());
        assert!(parse_rule("=^x").is_err());
        assert!(parse_rule("1abc=^x").is_err());
        assert!(parse_rule("text=").is_err());
    }

    #[test]
    fn test_default_rules_cover_any_input() -> Result<()> {
        let mut lexer = Lexer::new("let x = 1.5;\r\n  \"ü\" // done\u{2028}");
        lexer.capture_all(DEFAULT_RULES.iter().copied())?;

        let tokens = lexer.tokenize()?;
        let kinds: Vec<&str> = tokens.iter().map(|token| token.kind.as_str()).collect();

        assert!(lexer.is_eos());
        assert_eq!(kinds.iter().filter(|kind| **kind == "newline").count(), 2);
        assert!(tokens.iter().any(|token| token.kind == "number" && token.value == "1.5"));

        Ok(())
    }
}
