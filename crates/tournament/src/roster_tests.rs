use super::*;

const METADATA: &str = r#"
submission_301:
  :submitters:
  - :name: Ada Lovelace
  - :name: Alan Turing
  :results:
    leaderboard:
    - name: Winning Rate vs. baselineTeam
      value: 0.75
    - name: Rank
      value: "n/a"
submission_117:
  :submitters:
  - :name: Grace Hopper
  :results:
    leaderboard:
    - name: Winning Rate vs. baselineTeam
      value: 0.5
"#;

#[test]
fn test_roster_preserves_file_order() {
    let roster = Roster::from_yaml_str(METADATA).unwrap();
    let keys: Vec<_> = roster.submissions().iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["submission_301", "submission_117"]);
}

#[test]
fn test_identity_joins_submitters_in_order() {
    let roster = Roster::from_yaml_str(METADATA).unwrap();
    let first = &roster.submissions()[0];
    assert_eq!(first.identity(), "Ada Lovelace,Alan Turing");
    assert_eq!(first.primary_submitter(), "Ada Lovelace");
    assert_eq!(
        first.competitor(),
        Competitor::new("submission_301", "Ada Lovelace,Alan Turing")
    );
}

#[test]
fn test_metric_lookup() {
    let roster = Roster::from_yaml_str(METADATA).unwrap();
    let first = &roster.submissions()[0];
    assert_eq!(first.metric("Winning Rate vs. baselineTeam").unwrap(), 0.75);
    assert!(matches!(
        first.metric("Rank"),
        Err(ConfigError::NonNumericMetric { .. })
    ));
    assert!(matches!(
        first.metric("Accuracy"),
        Err(ConfigError::MissingMetric { .. })
    ));
}

#[test]
fn test_entry_without_submitters_is_malformed() {
    let err = Roster::from_yaml_str(
        r#"
lonely:
  :submitters: []
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MalformedEntry { key, .. } if key == "lonely"));
}

#[test]
fn test_entry_with_wrong_shape_is_malformed() {
    let err = Roster::from_yaml_str("broken: 42\n").unwrap_err();
    assert!(matches!(err, ConfigError::MalformedEntry { .. }));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Roster::load(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_load_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(METADATA_FILE), METADATA).unwrap();
    let roster = Roster::load(dir.path()).unwrap();
    assert_eq!(roster.len(), 2);
}

#[test]
fn test_allow_list_trims_and_skips_blank_lines() {
    let allow = AllowList::from_text("Ada Lovelace,Alan Turing\n\n  Grace Hopper  \n");
    assert_eq!(allow.len(), 2);
    assert!(allow.contains("Grace Hopper"));
    assert!(allow.contains("Ada Lovelace,Alan Turing"));
    assert!(!allow.contains("Ada Lovelace"));
}

#[test]
fn test_empty_inputs() {
    let roster = Roster::from_yaml_str("{}").unwrap();
    assert!(roster.is_empty());
    assert!(!Roster::from_yaml_str(METADATA).unwrap().is_empty());

    assert!(AllowList::from_text("\n   \n").is_empty());
    assert!(!AllowList::from_text("Grace Hopper").is_empty());
}
