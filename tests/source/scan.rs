//! Integration tests for source directory scanning

use std::fs;

use declapi_foundation::ErrorKind;
use declapi_source::{collect_source_files, read_units};

#[test]
fn missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_units(&dir.path().join("data/api"), &["ts"]).unwrap_err();

    assert!(matches!(err.kind, ErrorKind::SourceNotFound(_)));
    assert_eq!(
        err.to_string(),
        "Add the data access layer to your project root folder before compiling."
    );
}

#[test]
fn extensions_are_configurable() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.ts"), "").unwrap();
    fs::write(dir.path().join("b.d.ts"), "").unwrap();
    fs::write(dir.path().join("c.tsx"), "").unwrap();

    let ts = collect_source_files(dir.path(), &["ts"]).unwrap();
    assert_eq!(ts, vec![dir.path().join("a.ts"), dir.path().join("b.d.ts")]);

    let tsx = collect_source_files(dir.path(), &["tsx".to_string()]).unwrap();
    assert_eq!(tsx, vec![dir.path().join("c.tsx")]);
}

#[test]
fn units_follow_path_order() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("users");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        nested.join("profile.ts"),
        r#""(Local/get-in user-profile)": { req: {}, res: {} }"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("roles.ts"),
        r#""(Rest/get /system/roles {})": { req: { filters: string }, res: {} }"#,
    )
    .unwrap();

    let units = read_units(dir.path(), &["ts"]).unwrap();
    let declarations: Vec<&str> = units
        .iter()
        .flat_map(|u| u.declarations.iter().map(|d| d.declaration.as_str()))
        .collect();

    assert_eq!(
        declarations,
        vec!["(Rest/get /system/roles {})", "(Local/get-in user-profile)"]
    );
}
