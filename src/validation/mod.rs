//! Product candidate validation and scoring
//!
//! `validate` is a pure function of its input:
//! 1. no candidate: a single "no schema data found" error, score 0
//! 2. structural check against `product_schema`, one error per violation
//! 3. required field tally (errors) and recommended field tally (warnings)
//! 4. offer sub-field check, reported even when step 2 already flagged it
//! 5. score normalized to `[0, 100]`

pub mod help;
pub mod scoring;
pub mod structural;
pub mod verdict;

use serde_json::Value;

use crate::markup::ProductCandidate;
use crate::product_schema::{
    REQUIRED_FIELDS, RECOMMENDED_FIELDS, REQUIRED_OFFER_FIELDS, product_schema,
};

pub use help::{HelpEntry, HelpTopic};
pub use structural::{Violation, ViolationKind};
pub use verdict::{Issue, ValidationVerdict};

pub const NO_SCHEMA_MESSAGE: &str = "no schema data found";
pub const OFFERS_NOT_OBJECT_MESSAGE: &str = "offers must be an object";

/// Validate an extracted candidate; `None` means the page had no product
#[must_use]
pub fn validate(candidate: Option<&ProductCandidate>) -> ValidationVerdict {
    match candidate {
        Some(candidate) => validate_candidate(candidate),
        None => ValidationVerdict::new(
            vec![Issue::new(NO_SCHEMA_MESSAGE).with_topic(HelpTopic::NoSchemaData)],
            Vec::new(),
            0.0,
        ),
    }
}

/// Validate a present candidate, including an empty one
#[must_use]
pub fn validate_candidate(candidate: &ProductCandidate) -> ValidationVerdict {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut raw = 0.0;

    let value = Value::Object(candidate.fields().clone());
    for violation in structural::check(&value, product_schema()) {
        if reported_by_tally(&violation) {
            continue;
        }
        errors.push(structural_issue(violation));
    }

    for field in REQUIRED_FIELDS {
        if candidate.has(field) {
            raw += scoring::required_weight();
        } else {
            let mut issue = Issue::new(format!("missing required field: {field}")).with_field(*field);
            if let Some(topic) = HelpTopic::missing_required(field) {
                issue = issue.with_topic(topic);
            }
            errors.push(issue);
        }
    }

    for field in RECOMMENDED_FIELDS {
        if candidate.has(field) {
            raw += scoring::recommended_weight();
        } else {
            let mut issue =
                Issue::new(format!("missing recommended field: {field}")).with_field(*field);
            if let Some(topic) = HelpTopic::missing_recommended(field) {
                issue = issue.with_topic(topic);
            }
            warnings.push(issue);
        }
    }

    if let Some(offers) = candidate.get("offers").filter(|v| !v.is_null()) {
        match offers.as_object() {
            Some(offer) => {
                for field in REQUIRED_OFFER_FIELDS {
                    if offer.get(*field).is_none_or(Value::is_null) {
                        let mut issue =
                            Issue::new(format!("missing required offer field: {field}"))
                                .with_field(format!("offers.{field}"));
                        if let Some(topic) = HelpTopic::missing_offer_field(field) {
                            issue = issue.with_topic(topic);
                        }
                        errors.push(issue);
                    }
                }
            }
            None => errors.push(
                Issue::new(OFFERS_NOT_OBJECT_MESSAGE)
                    .with_field("offers")
                    .with_topic(HelpTopic::OffersNotObject),
            ),
        }
    }

    ValidationVerdict::new(errors, warnings, scoring::normalize(raw))
}

/// Violations the field tallies report under their own canonical message
fn reported_by_tally(violation: &Violation) -> bool {
    let top_level_required = violation.kind == ViolationKind::Missing
        && REQUIRED_FIELDS.contains(&violation.path.as_str());
    let offers_shape = violation.kind == ViolationKind::Invalid && violation.path == "offers";
    top_level_required || offers_shape
}

fn structural_issue(violation: Violation) -> Issue {
    let topic = match violation.kind {
        ViolationKind::Missing => HelpTopic::missing_offer_field(violation.field_name())
            .unwrap_or(HelpTopic::SchemaValidation),
        ViolationKind::Invalid => HelpTopic::invalid_value(violation.field_name()),
    };
    Issue::new(violation.message)
        .with_field(violation.path)
        .with_topic(topic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(value: Value) -> ProductCandidate {
        ProductCandidate::from_value(value).unwrap()
    }

    #[test]
    fn absent_candidate_yields_single_error() {
        let verdict = validate(None);
        assert_eq!(verdict.error_messages(), vec![NO_SCHEMA_MESSAGE]);
        assert!(verdict.warnings.is_empty());
        assert_eq!(verdict.score, 0.0);
        assert!(!verdict.valid);
        assert_eq!(verdict.errors[0].topic, Some(HelpTopic::NoSchemaData));
    }

    #[test]
    fn offers_of_wrong_shape_reported_once() {
        let verdict = validate_candidate(&candidate(json!({
            "@type": "Product",
            "name": "A",
            "image": "https://x/a.jpg",
            "offers": [{"price": "1.00"}]
        })));
        assert_eq!(verdict.error_messages(), vec![OFFERS_NOT_OBJECT_MESSAGE]);
        // offers is present, so it still counts toward the score
        assert_eq!(verdict.score, 60.0);
    }

    #[test]
    fn missing_offer_fields_are_reported_by_both_passes() {
        let verdict = validate_candidate(&candidate(json!({
            "@type": "Product",
            "name": "A",
            "image": "https://x/a.jpg",
            "offers": {"price": "1.00", "priceCurrency": "USD"}
        })));
        assert!(verdict.has_error("offers.availability: required property is missing"));
        assert!(verdict.has_error("missing required offer field: availability"));
        assert_eq!(verdict.errors.len(), 2);
    }

    #[test]
    fn null_counts_as_absent() {
        let verdict = validate_candidate(&candidate(json!({
            "@type": "Product",
            "name": null,
            "image": "https://x/a.jpg",
            "offers": {"price": "1.00", "priceCurrency": "USD", "availability": "InStock"}
        })));
        assert_eq!(verdict.error_messages(), vec!["missing required field: name"]);
        assert_eq!(verdict.score, 40.0);
    }

    #[test]
    fn structural_issues_carry_field_and_explanation() {
        let verdict = validate_candidate(&candidate(json!({
            "@type": "Product",
            "name": "A",
            "image": "https://x/a.jpg",
            "offers": {"price": "$5", "priceCurrency": "USD", "availability": "InStock"}
        })));
        assert_eq!(verdict.errors.len(), 1);
        let issue = &verdict.errors[0];
        assert_eq!(issue.field.as_deref(), Some("offers.price"));
        assert_eq!(issue.topic, Some(HelpTopic::InvalidPrice));
        assert!(issue.explanation.is_some());
    }

    #[test]
    fn wrong_type_discriminator_is_an_error() {
        let verdict = validate_candidate(&candidate(json!({
            "@type": "Offer",
            "name": "A",
            "image": "https://x/a.jpg",
            "offers": {"price": "1.00", "priceCurrency": "USD", "availability": "InStock"}
        })));
        assert_eq!(
            verdict.error_messages(),
            vec!["@type: expected \"Product\", got \"Offer\""]
        );
    }
}
