#![allow(missing_docs)]

use insta::assert_snapshot;
use portal_cli::render::{columns_table, issues_table};
use portal_cli::settings::PortalConfig;
use portal_roster::{Roster, check_rows, import_csv};

#[test]
fn test_default_config_file_layout() {
    let text = toml::to_string_pretty(&PortalConfig::default()).unwrap();
    assert_snapshot!(text.trim_end(), @r#"
    [http]
    base_url = "http://127.0.0.1:8000"
    timeout_ms = 15000
    auth_scheme = "Token"
    unauthorized = "warn"

    [session]
    remember = false
    "#);
}

#[test]
fn test_config_round_trips_through_toml() {
    let mut config = PortalConfig::default();
    config.http.base_url = "https://entry.example.edu".to_string();
    config.session.remember = true;
    let parsed: PortalConfig = toml::from_str(&toml::to_string_pretty(&config).unwrap()).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_roster_columns_render_every_key() {
    let columns = Roster::VocalMembers.columns();
    let rendered = columns_table(&columns).to_string();
    for column in &columns {
        assert!(rendered.contains(&column.key), "missing {}", column.key);
    }
}

#[test]
fn test_issue_table_uses_column_labels() {
    let columns = Roster::VocalTeachers.columns();
    let rows = import_csv("name,age\n王老师,200\n".as_bytes(), &columns).unwrap();
    let issues = check_rows(&rows, &columns);
    let mut table = issues_table(&columns, &issues);
    table.force_no_tty();
    assert!(table.to_string().contains("年龄不能大于120"));
}
