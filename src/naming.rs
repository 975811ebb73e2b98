//! Lexical rules for application, service and method names.
//!
//! Application names become directory and protobuf package names, so they are
//! restricted to lowercase identifiers. Service and method names become
//! protobuf identifiers and must be upper camel case.

use crate::error::{Error, NameKind, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static APPLICATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z][0-9a-z_]*$").expect("application name regex should be valid")
});

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][0-9a-zA-Z]*$").expect("identifier regex should be valid")
});

const APPLICATION_RULE: &str =
    "must start with a lowercase letter and only contain the characters a-z, 0-9, or _";

const IDENTIFIER_RULE: &str =
    "must start with an uppercase letter and only contain the characters a-z, A-Z, 0-9";

/// Checks an application name against `^[a-z][0-9a-z_]*$`.
pub fn validate_application(name: &str) -> Result<()> {
    check(&APPLICATION_RE, NameKind::Application, APPLICATION_RULE, name)
}

/// Checks a service name against `^[A-Z][0-9a-zA-Z]*$`.
pub fn validate_service(name: &str) -> Result<()> {
    check(&IDENTIFIER_RE, NameKind::Service, IDENTIFIER_RULE, name)
}

/// Checks a method name against `^[A-Z][0-9a-zA-Z]*$`.
pub fn validate_method(name: &str) -> Result<()> {
    check(&IDENTIFIER_RE, NameKind::Method, IDENTIFIER_RULE, name)
}

/// Validates all three names of a stub request, reporting the first failure.
pub fn validate_stub_names(application: &str, service: &str, method: &str) -> Result<()> {
    validate_application(application)?;
    validate_service(service)?;
    validate_method(method)
}

fn check(re: &Regex, kind: NameKind, rule: &'static str, name: &str) -> Result<()> {
    if re.is_match(name) {
        return Ok(());
    }

    Err(Error::InvalidName {
        kind,
        name: name.to_string(),
        rule,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_kind(result: Result<()>) -> NameKind {
        match result {
            Err(Error::InvalidName { kind, .. }) => kind,
            other => panic!("expected InvalidName, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_application_names() {
        for name in ["news", "a", "news_reader", "repo2", "x_1_y"] {
            assert!(validate_application(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_application_names() {
        for name in ["", "News", "1news", "_news", "news-reader", "news.reader", "nyhetér"] {
            let err = validate_application(name).unwrap_err();
            assert!(err.to_string().contains("a-z, 0-9, or _"), "{}", err);
            assert_eq!(rejected_kind(validate_application(name)), NameKind::Application);
        }
    }

    #[test]
    fn test_valid_identifiers() {
        for name in ["Reader", "R", "Fetch2", "GetDocumentV2", "ABC"] {
            assert!(validate_service(name).is_ok(), "{} should be valid", name);
            assert!(validate_method(name).is_ok(), "{} should be valid", name);
        }
    }

    #[test]
    fn test_invalid_identifiers() {
        for name in ["", "reader", "2Reader", "Read_er", "Read-er", "Read er"] {
            assert_eq!(rejected_kind(validate_service(name)), NameKind::Service);
            assert_eq!(rejected_kind(validate_method(name)), NameKind::Method);
        }
    }

    #[test]
    fn test_error_names_the_failing_field() {
        let err = validate_stub_names("news", "Reader", "fetch").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("method "), "{}", message);
        assert!(message.contains("uppercase"));

        let err = validate_stub_names("news", "reader", "fetch").unwrap_err();
        assert!(err.to_string().starts_with("service "));
    }

    #[test]
    fn test_application_checked_first() {
        let err = validate_stub_names("News", "reader", "fetch").unwrap_err();
        assert!(err.to_string().starts_with("application "));
    }

    #[test]
    fn test_valid_stub_names() {
        assert!(validate_stub_names("news", "Reader", "Fetch").is_ok());
    }
}
