use crate::error::ProfileError;
use crate::profile::{FieldProfile, FieldProfiles};
use crate::sort::{compare_conditions, sort_conditions};
use crate::types::{Condition, ConditionType, Level, Operator, Threshold};
use std::cmp::Ordering;

fn single(field: &str, value: Option<f64>, level: Level) -> Condition {
    Condition {
        id: None,
        profile_type: "sensor".into(),
        field_key: field.into(),
        level,
        threshold: Threshold::Single {
            operator: Operator::Ge,
            threshold_value: value,
        },
        activate: true,
        notification_enabled: false,
    }
}

fn range(field: &str, left: Option<f64>, right: Option<f64>, level: Level) -> Condition {
    Condition {
        threshold: Threshold::Range {
            left_value: left,
            right_value: right,
        },
        ..single(field, None, level)
    }
}

#[test]
fn sort_orders_by_field_then_value_then_level() {
    let mut rows = vec![
        single("temperature", Some(30.0), Level::Danger),
        single("humidity", Some(80.0), Level::Warning),
        range("temperature", Some(10.0), Some(20.0), Level::Caution),
        single("temperature", Some(30.0), Level::Caution),
        single("humidity", None, Level::Normal),
    ];
    sort_conditions(&mut rows);

    let keys: Vec<(&str, Option<f64>, Level)> = rows
        .iter()
        .map(|c| (c.field_key.as_str(), c.threshold.effective_value(), c.level))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("humidity", Some(80.0), Level::Warning),
            ("humidity", None, Level::Normal),
            ("temperature", Some(10.0), Level::Caution),
            ("temperature", Some(30.0), Level::Caution),
            ("temperature", Some(30.0), Level::Danger),
        ]
    );
}

#[test]
fn sort_is_idempotent() {
    let mut rows = vec![
        single("co2", Some(1000.0), Level::Warning),
        range("battery", None, Some(10.0), Level::Danger),
        single("Battery", Some(5.0), Level::Unknown),
        single("battery", Some(5.0), Level::Normal),
    ];
    sort_conditions(&mut rows);
    let once = rows.clone();
    sort_conditions(&mut rows);
    assert_eq!(rows, once);
}

#[test]
fn sort_is_stable_for_equal_keys() {
    let mut a = single("temperature", Some(25.0), Level::Warning);
    a.notification_enabled = true;
    let mut b = single("temperature", Some(25.0), Level::Warning);
    b.activate = false;
    let c = single("humidity", Some(1.0), Level::Normal);

    let mut rows = vec![a.clone(), c.clone(), b.clone()];
    sort_conditions(&mut rows);
    assert_eq!(rows, vec![c, a, b]);
}

#[test]
fn missing_value_sorts_after_any_number() {
    let with_value = single("temperature", Some(f64::MAX), Level::Normal);
    let without = single("temperature", None, Level::Normal);
    assert_eq!(compare_conditions(&with_value, &without), Ordering::Less);
}

#[test]
fn unknown_level_sorts_last() {
    let known = single("temperature", Some(1.0), Level::Disconnected);
    let unknown = single("temperature", Some(1.0), Level::Unknown);
    assert_eq!(compare_conditions(&known, &unknown), Ordering::Less);
    assert_eq!(Level::Unknown.rank(), 999);
}

#[test]
fn field_keys_compare_case_insensitively() {
    let upper = single("Humidity", Some(1.0), Level::Normal);
    let lower = single("humidity", Some(2.0), Level::Normal);
    let other = single("co2", Some(0.0), Level::Normal);
    let mut rows = vec![lower.clone(), other.clone(), upper.clone()];
    sort_conditions(&mut rows);
    assert_eq!(rows, vec![other, upper, lower]);
}

#[test]
fn range_condition_wire_format() {
    let mut c = range("temperature", Some(10.0), Some(30.0), Level::Danger);
    c.id = Some(7);
    let json = serde_json::to_value(&c).unwrap();
    assert_eq!(json["id"], 7);
    assert_eq!(json["deviceProfileType"], "sensor");
    assert_eq!(json["fieldKey"], "temperature");
    assert_eq!(json["level"], "DANGER");
    assert_eq!(json["conditionType"], "RANGE");
    assert_eq!(json["leftValue"], 10.0);
    assert_eq!(json["rightValue"], 30.0);
    assert!(json.get("thresholdValue").is_none());
    assert_eq!(json["notificationEnabled"], false);
}

#[test]
fn single_condition_decodes_from_wire() {
    let json = serde_json::json!({
        "id": 3,
        "deviceProfileType": "freezer",
        "fieldKey": "temperature",
        "level": "CAUTION",
        "conditionType": "SINGLE",
        "operator": "LT",
        "thresholdValue": -18,
        "activate": true,
        "notificationEnabled": true
    });
    let c: Condition = serde_json::from_value(json).unwrap();
    assert_eq!(c.id, Some(3));
    assert_eq!(c.condition_type(), ConditionType::Single);
    assert_eq!(c.operator(), Operator::Lt);
    assert_eq!(c.threshold_value(), Some(-18.0));
    assert_eq!(c.left_value(), None);
    assert!(c.notification_enabled);
}

#[test]
fn range_ignores_operator_on_the_wire() {
    let json = serde_json::json!({
        "fieldKey": "humidity",
        "level": "PANIC",
        "conditionType": "RANGE",
        "operator": "BETWEEN",
        "leftValue": 40,
        "rightValue": 60
    });
    let c: Condition = serde_json::from_value(json).unwrap();
    assert_eq!(c.operator(), Operator::Between);
    assert_eq!(c.level, Level::Unknown);
    assert_eq!(c.id, None);
    assert_eq!(c.right_value(), Some(60.0));
}

#[test]
fn new_draft_is_a_blank_placeholder() {
    let c = Condition::new_draft("dev-1");
    assert!(c.is_blank_placeholder());
    assert!(!c.is_persisted());
    assert_eq!(c.profile_type, "dev-1");
    assert_eq!(c.operator(), Operator::Ge);

    let mut touched = c.clone();
    touched.field_key = "co2".into();
    assert!(!touched.is_blank_placeholder());

    let mut louder = c.clone();
    louder.level = Level::Danger;
    assert!(!louder.is_blank_placeholder());

    let mut notifying = c.clone();
    notifying.notification_enabled = true;
    assert!(!notifying.is_blank_placeholder());

    let mut saved = c;
    saved.id = Some(3);
    assert!(!saved.is_blank_placeholder());
}

#[test]
fn operator_parses_aliases() {
    assert_eq!("gte".parse::<Operator>().unwrap(), Operator::Ge);
    assert_eq!("BETWEEN".parse::<Operator>().unwrap(), Operator::Between);
    assert!("approx".parse::<Operator>().is_err());
    assert_eq!(Operator::Ne.to_string(), "NE");
}

#[test]
fn profiles_from_toml() {
    let profiles = FieldProfiles::from_toml_str(
        r#"
        [[fields]]
        key = "temperature"
        unit = "°C"
        operators = ["GT", "LT", "BETWEEN"]
        default_operator = "GT"

        [[fields]]
        key = "door_open"
        value_kind = "boolean"
        "#,
    )
    .unwrap();

    assert_eq!(profiles.len(), 2);
    let temp = profiles.get("temperature").unwrap();
    assert!(!temp.is_boolean());
    assert!(temp.allows(Operator::Lt));
    assert!(!temp.allows(Operator::Ge));
    assert_eq!(temp.default_single_operator(), Operator::Gt);

    let door = profiles.get("door_open").unwrap();
    assert!(door.is_boolean());
    assert!(door.allows(Operator::Eq));
    assert!(!door.allows(Operator::Gt));
    assert_eq!(door.default_single_operator(), Operator::Eq);
    assert!(!profiles.is_boolean("unknown_field"));
}

#[test]
fn profiles_reject_duplicates() {
    let err = FieldProfiles::new(vec![
        FieldProfile::numeric("co2"),
        FieldProfile::numeric("co2"),
    ])
    .unwrap_err();
    assert!(matches!(err, ProfileError::DuplicateField(key) if key == "co2"));

    let err = FieldProfiles::new(vec![FieldProfile::numeric(" ")]).unwrap_err();
    assert!(matches!(err, ProfileError::EmptyKey));
}

#[test]
fn default_operator_skips_between() {
    let mut p = FieldProfile::numeric("humidity");
    p.operators = vec![Operator::Between, Operator::Lt];
    p.default_operator = Some(Operator::Between);
    assert_eq!(p.default_single_operator(), Operator::Lt);
}

#[test]
fn builtin_catalog_has_boolean_fields() {
    let profiles = FieldProfiles::builtin();
    assert!(profiles.is_boolean("door_open"));
    assert!(profiles.is_boolean("water_leak"));
    assert!(!profiles.is_boolean("temperature"));
    let keys: Vec<String> = profiles.to_vec().into_iter().map(|p| p.key).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}
