//! CLI integration tests for idl-schema binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("idl-schema"))
}

// Helper to create a temp schema file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const ACCESS_SCHEMA: &str = r#"{
    "type": "object",
    "x-dependencies": [
        "IF isTemporary==true THEN expirationDate;",
        "OnlyOne(email, phone);",
        "IF isTemporary THEN revokedAt;"
    ],
    "x-property-groups": { "Contact": "Group(email, phone);" },
    "properties": {
        "isTemporary": { "type": "boolean", "title": "Temporary" },
        "expirationDate": { "type": "string", "format": "date" },
        "email": { "type": "string" },
        "phone": { "type": "string" },
        "seats": { "type": "integer" }
    }
}"#;

mod inspect_command {
    use super::*;

    #[test]
    fn basic_inspect() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ACCESS_SCHEMA);

        cmd()
            .args(["inspect", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#""requires":[{"prerequisite_key":"isTemporary","prerequisite_value":true,"dependant_key":"expirationDate"}]"#,
            ))
            .stdout(predicate::str::contains(
                r#""only_one":[{"property_keys":["email","phone"]}]"#,
            ))
            .stdout(predicate::str::contains(
                r#""groups":[{"name":"Contact","property_keys":["email","phone"]}]"#,
            ))
            .stdout(predicate::str::contains("revokedAt").not());
    }

    #[test]
    fn inspect_with_singletons() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ACCESS_SCHEMA);

        cmd()
            .args(["inspect", schema.to_str().unwrap(), "--singletons"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#"{"name":"Temporary","property_keys":["isTemporary"]}"#,
            ))
            .stdout(predicate::str::contains(
                r#"{"name":"seats","property_keys":["seats"]}"#,
            ));
    }

    #[test]
    fn inspect_with_type_filter() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ACCESS_SCHEMA);

        cmd()
            .args([
                "inspect",
                schema.to_str().unwrap(),
                "--singletons",
                "--type",
                "integer",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""only_one":[]"#))
            .stdout(predicate::str::contains(
                r#""groups":[{"name":"seats","property_keys":["seats"]}]"#,
            ));
    }

    #[test]
    fn inspect_with_pretty() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ACCESS_SCHEMA);

        cmd()
            .args(["inspect", schema.to_str().unwrap(), "--pretty"])
            .assert()
            .success()
            // Pretty output has newlines and indentation
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn inspect_with_output_file() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ACCESS_SCHEMA);
        let output = dir.path().join("output.json");

        cmd()
            .args([
                "inspect",
                schema.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        assert!(content.contains(r#""name":"Contact""#));
    }

    #[test]
    fn dropped_expressions_are_logged_when_enabled() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ACCESS_SCHEMA);

        cmd()
            .env("RUST_LOG", "idl_schema=debug")
            .args(["inspect", schema.to_str().unwrap()])
            .assert()
            .success()
            .stderr(predicate::str::contains("dropped dependency"))
            .stderr(predicate::str::contains("revokedAt"));
    }
}

mod compose_command {
    use super::*;

    #[test]
    fn compose_requires_without_values() {
        cmd()
            .args(["compose", "requires", "isTemporary", "expirationDate"])
            .assert()
            .success()
            .stdout("IF isTemporary THEN expirationDate;\n");
    }

    #[test]
    fn compose_requires_infers_value_types() {
        cmd()
            .args([
                "compose",
                "requires",
                "isTemporary",
                "expirationDate",
                "--prerequisite-value",
                "true",
                "--dependant-value",
                "2025-01-01",
            ])
            .assert()
            .success()
            .stdout("IF isTemporary==true THEN expirationDate=='2025-01-01';\n");
    }

    #[test]
    fn compose_requires_numbers() {
        cmd()
            .args([
                "compose",
                "requires",
                "seats",
                "price",
                "--prerequisite-value",
                "3",
                "--dependant-value",
                "9.5",
            ])
            .assert()
            .success()
            .stdout("IF seats==3 THEN price==9.5;\n");
    }

    #[test]
    fn compose_only_one() {
        cmd()
            .args(["compose", "only-one", "state", "zip", "province"])
            .assert()
            .success()
            .stdout("OnlyOne(state, zip, province);\n");
    }

    #[test]
    fn compose_only_one_needs_two_keys() {
        cmd()
            .args(["compose", "only-one", "state"])
            .assert()
            .failure();
    }

    #[test]
    fn compose_requires_quotes_apostrophes() {
        cmd()
            .args([
                "compose",
                "requires",
                "name",
                "greeting",
                "--prerequisite-value",
                "it's me",
            ])
            .assert()
            .success()
            .stdout("IF name==\"it's me\" THEN greeting;\n");
    }

    #[test]
    fn compose_refuses_unreadable_key() {
        cmd()
            .args(["compose", "requires", "a==b", "c"])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("cannot contain property key"));

        cmd()
            .args(["compose", "group", "a, b"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Group expression"));
    }

    #[test]
    fn compose_group() {
        cmd()
            .args(["compose", "group", "option1"])
            .assert()
            .success()
            .stdout("Group(option1);\n");
    }
}

mod lint_command {
    use super::*;

    #[test]
    fn lint_clean_file() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "clean.json",
            r#"{
                "x-dependencies": ["OnlyOne(a, b);"],
                "properties": { "a": { "type": "boolean" }, "b": { "type": "boolean" } }
            }"#,
        );

        cmd()
            .args(["lint", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("clean.json: ok"))
            .stdout(predicate::str::contains(
                "1 files checked: 1 passed, 0 failed (0 errors, 0 warnings)",
            ));
    }

    #[test]
    fn lint_reports_dropped_expressions() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ACCESS_SCHEMA);

        cmd()
            .args(["lint", schema.to_str().unwrap()])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("#/x-dependencies/2: error[E004]"))
            .stdout(predicate::str::contains("\"revokedAt\""));
    }

    #[test]
    fn lint_json_format() {
        let dir = TempDir::new().unwrap();
        write_temp_file(
            &dir,
            "groups.json",
            r#"{
                "x-property-groups": { "A": "Group(x, y);", "B": "Group(x, z);" },
                "properties": { "x": {}, "y": {}, "z": {} }
            }"#,
        );

        cmd()
            .args(["lint", dir.path().to_str().unwrap(), "--format", "json"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""code": "E006""#))
            .stdout(predicate::str::contains(r#""path": "/x-property-groups/B""#));
    }

    #[test]
    fn lint_strict_fails_on_warnings() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(
            &dir,
            "warn.json",
            r#"{ "x-dependencies": "OnlyOne(a, b);", "properties": {} }"#,
        );

        cmd()
            .args(["lint", schema.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("warning[W001]"));

        cmd()
            .args(["lint", schema.to_str().unwrap(), "--strict"])
            .assert()
            .code(1);
    }

    #[test]
    fn lint_quiet_hides_passing_files() {
        let dir = TempDir::new().unwrap();
        write_temp_file(&dir, "ok.json", r#"{ "properties": {} }"#);

        cmd()
            .args(["lint", dir.path().to_str().unwrap(), "--quiet"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ok.json").not());
    }

    #[test]
    fn lint_missing_path() {
        cmd()
            .args(["lint", "/nonexistent/schemas"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("path not found"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn file_not_found() {
        cmd()
            .args(["inspect", "/nonexistent/schema.json"])
            .assert()
            .code(3)
            .stderr(
                predicate::str::contains("not found").or(predicate::str::contains("No such file")),
            );
    }

    #[test]
    fn invalid_json_schema() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "bad.json", r#"{ not valid json"#);

        cmd()
            .args(["inspect", schema.to_str().unwrap()])
            .assert()
            .code(2);
    }

    #[test]
    fn non_object_schema() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "array.json", r#"["IF a THEN b;"]"#);

        cmd()
            .args(["inspect", schema.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("must be a JSON object"));
    }

    #[test]
    fn unknown_type_filter() {
        let dir = TempDir::new().unwrap();
        let schema = write_temp_file(&dir, "schema.json", ACCESS_SCHEMA);

        cmd()
            .args(["inspect", schema.to_str().unwrap(), "--type", "date"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown type 'date'"));
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Inspect, compose and lint inter-parameter dependency metadata",
            ));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("idl-schema"));
    }

    #[test]
    fn inspect_help() {
        cmd()
            .args(["inspect", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--singletons"))
            .stdout(predicate::str::contains("--type"));
    }
}
