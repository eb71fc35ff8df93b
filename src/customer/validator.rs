//! # Request Validation
//!
//! Customer requests are checked against a fixed, ordered rule table before
//! they reach the service. Each rule names one field, one predicate and one
//! message. All failing rules are reported, not only the first.
//!
//! A request that passes becomes a [`ValidatedRequest`], the only input the
//! service and mapper accept.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use super::request::{CustomerRequest, ProfilePicRequest};

/// One failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every failed rule for one request, in rule order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub violations: Vec<Violation>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.violations.iter().map(|v| v.message).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Field-level rule
pub struct Rule {
    pub field: &'static str,
    pub message: &'static str,
    check: fn(&CustomerRequest) -> bool,
}

impl Rule {
    pub fn passes(&self, request: &CustomerRequest) -> bool {
        (self.check)(request)
    }
}

fn not_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
        )
        .expect("email pattern compiles")
    })
}

/// Blank emails are reported by the non-blank rule only
fn well_formed_email(value: &Option<String>) -> bool {
    match value.as_deref() {
        Some(email) if !email.trim().is_empty() => email_pattern().is_match(email),
        _ => true,
    }
}

fn picture(request: &CustomerRequest) -> Option<&ProfilePicRequest> {
    request.profile_pic.as_ref()
}

/// Rules in evaluation order
pub static RULES: &[Rule] = &[
    Rule {
        field: "firstName",
        message: "firstName must not be blank",
        check: |r| not_blank(&r.first_name),
    },
    Rule {
        field: "lastName",
        message: "lastName must not be blank",
        check: |r| not_blank(&r.last_name),
    },
    Rule {
        field: "email",
        message: "email must not be blank",
        check: |r| not_blank(&r.email),
    },
    Rule {
        field: "email",
        message: "email must be a well-formed email address",
        check: |r| well_formed_email(&r.email),
    },
    Rule {
        field: "age",
        message: "age must be between 0 and 150",
        check: |r| r.age.map_or(true, |age| (0..=150).contains(&age)),
    },
    Rule {
        field: "isActive",
        message: "isActive must not be null",
        check: |r| r.is_active.is_some(),
    },
    Rule {
        field: "balance",
        message: "balance must not be null",
        check: |r| r.balance.is_some(),
    },
    Rule {
        field: "countryCode",
        message: "countryCode must not be blank",
        check: |r| not_blank(&r.country_code),
    },
    Rule {
        field: "profilePic.url",
        message: "url is required when profilePic is provided",
        check: |r| picture(r).map_or(true, |p| not_blank(&p.url)),
    },
    Rule {
        field: "profilePic.sizeBytes",
        message: "sizeBytes must be zero or positive",
        check: |r| {
            picture(r)
                .and_then(|p| p.size_bytes)
                .map_or(true, |size| size >= 0)
        },
    },
];

/// Validated profile picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPicture {
    pub url: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
}

/// A customer request that passed every rule
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: Option<i32>,
    pub is_active: bool,
    pub balance: Decimal,
    pub profile_pic: Option<ValidatedPicture>,
    pub country_code: String,
}

/// Run every rule and convert on success
pub fn validate(request: CustomerRequest) -> Result<ValidatedRequest, ValidationErrors> {
    let violations: Vec<Violation> = RULES
        .iter()
        .filter(|rule| !rule.passes(&request))
        .map(|rule| Violation {
            field: rule.field,
            message: rule.message,
        })
        .collect();

    if !violations.is_empty() {
        return Err(ValidationErrors { violations });
    }

    // Presence of every required field is guaranteed by the rules above.
    Ok(ValidatedRequest {
        first_name: request.first_name.unwrap_or_default(),
        last_name: request.last_name.unwrap_or_default(),
        email: request.email.unwrap_or_default(),
        age: request.age,
        is_active: request.is_active.unwrap_or_default(),
        balance: request.balance.unwrap_or_default(),
        profile_pic: request.profile_pic.map(|p| ValidatedPicture {
            url: p.url.unwrap_or_default(),
            content_type: p.content_type,
            size_bytes: p.size_bytes,
        }),
        country_code: request.country_code.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CustomerRequest {
        CustomerRequest {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            age: Some(36),
            is_active: Some(true),
            balance: Some(Decimal::new(1000, 2)),
            profile_pic: None,
            country_code: Some("GB".to_string()),
        }
    }

    fn fields(result: Result<ValidatedRequest, ValidationErrors>) -> Vec<&'static str> {
        result
            .unwrap_err()
            .violations
            .into_iter()
            .map(|v| v.field)
            .collect()
    }

    #[test]
    fn test_valid_request_converts() {
        let validated = validate(valid()).unwrap();
        assert_eq!(validated.first_name, "Ada");
        assert_eq!(validated.balance, Decimal::new(1000, 2));
        assert!(validated.profile_pic.is_none());
    }

    #[test]
    fn test_empty_request_reports_every_required_field() {
        let got = fields(validate(CustomerRequest::default()));
        assert_eq!(
            got,
            vec!["firstName", "lastName", "email", "isActive", "balance", "countryCode"]
        );
    }

    #[test]
    fn test_blank_strings_rejected() {
        let mut request = valid();
        request.first_name = Some("   ".to_string());
        request.country_code = Some(String::new());
        assert_eq!(fields(validate(request)), vec!["firstName", "countryCode"]);
    }

    #[test]
    fn test_email_format() {
        for bad in [
            "not-an-email",
            "a@",
            "@example.com",
            "a b@example.com",
            " a@b.c",
            "  ada@example.com ",
        ] {
            let mut request = valid();
            request.email = Some(bad.to_string());
            let err = validate(request).unwrap_err();
            assert_eq!(
                err.violations,
                vec![Violation {
                    field: "email",
                    message: "email must be a well-formed email address",
                }],
                "{} should be rejected",
                bad
            );
        }

        for good in ["a@b", "first.last+tag@sub.example.co.uk"] {
            let mut request = valid();
            request.email = Some(good.to_string());
            assert!(validate(request).is_ok(), "{} should pass", good);
        }
    }

    #[test]
    fn test_age_bounds() {
        for (age, ok) in [(Some(0), true), (Some(150), true), (None, true), (Some(-1), false), (Some(151), false)] {
            let mut request = valid();
            request.age = age;
            assert_eq!(validate(request).is_ok(), ok, "age {:?}", age);
        }
    }

    #[test]
    fn test_profile_pic_rules() {
        let mut request = valid();
        request.profile_pic = Some(ProfilePicRequest {
            url: None,
            content_type: None,
            size_bytes: Some(-5),
        });
        assert_eq!(
            fields(validate(request)),
            vec!["profilePic.url", "profilePic.sizeBytes"]
        );

        let mut request = valid();
        request.profile_pic = Some(ProfilePicRequest {
            url: Some("https://img.example/a.png".to_string()),
            content_type: Some("image/png".to_string()),
            size_bytes: Some(0),
        });
        let validated = validate(request).unwrap();
        assert_eq!(validated.profile_pic.unwrap().size_bytes, Some(0));
    }

    #[test]
    fn test_display_joins_messages() {
        let mut request = valid();
        request.is_active = None;
        request.balance = None;
        let err = validate(request).unwrap_err();
        assert_eq!(
            err.to_string(),
            "isActive must not be null; balance must not be null"
        );
    }
}
