//! Tests for TextPattern and OwnerId

use super::*;

#[test]
fn test_owner_id_valid() {
    assert!(OwnerId::new("Jdbf4BiTWlY").is_ok());
    assert!(OwnerId::new("attr-1_a.b").is_ok());
}

#[test]
fn test_owner_id_invalid() {
    assert!(OwnerId::new("").is_err());
    assert!(OwnerId::new("a".repeat(65)).is_err());
    assert!(OwnerId::new("has space").is_err());
    assert!(OwnerId::new("slash/owner").is_err());
}

#[test]
fn test_owner_id_deserialization_validates() {
    let ok: Result<OwnerId, _> = serde_json::from_str("\"owner1\"");
    assert_eq!(ok.unwrap().as_str(), "owner1");

    let bad: Result<OwnerId, _> = serde_json::from_str("\"\"");
    assert!(bad.is_err());
}

#[test]
fn test_with_owner_does_not_change_segments() {
    let pattern: TextPattern = "CODE-SEQUENTIAL(###)".parse().unwrap();
    let bound = pattern.clone().with_owner(OwnerId::new("owner1").unwrap());

    assert_eq!(pattern.owner(), None);
    assert_eq!(bound.owner().map(OwnerId::as_str), Some("owner1"));
    assert_eq!(bound.segments(), pattern.segments());
}

#[test]
fn test_raw_reassembles_template() {
    let template = r#"ORG_UNIT_CODE(...)-TEXT(\d\d)/CURRENT_DATE(yyyy)-RANDOM(X#)"#;
    let pattern: TextPattern = template.parse().unwrap();
    assert_eq!(pattern.raw(), template);
    assert_eq!(pattern.to_string(), template);
}

#[test]
fn test_required_values_lists_segments_in_template_order() {
    let pattern: TextPattern = "TEXT(\\d)-RANDOM(##)-ORG_UNIT_CODE(..)-SEQUENTIAL(#)"
        .parse()
        .unwrap();

    let summary = pattern.required_values();

    assert_eq!(summary.required, vec!["TEXT(\\d)", "ORG_UNIT_CODE(..)"]);
    assert_eq!(summary.optional, vec!["RANDOM(##)", "SEQUENTIAL(#)"]);
}

#[test]
fn test_required_values_serialises_with_classification_keys() {
    let pattern: TextPattern = "TEXT(AB)-SEQUENTIAL(##)".parse().unwrap();
    let json = serde_json::to_value(pattern.required_values()).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "REQUIRED": ["TEXT(AB)"],
            "OPTIONAL": ["SEQUENTIAL(##)"],
        })
    );
}

#[test]
fn test_has_generated_segments() {
    let fixed: TextPattern = "CURRENT_DATE(yyyy)-TEXT(\\d)".parse().unwrap();
    let generated: TextPattern = "A-RANDOM(X)".parse().unwrap();

    assert!(!fixed.has_generated_segments());
    assert!(generated.has_generated_segments());
}
