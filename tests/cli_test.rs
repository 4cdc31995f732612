//! CLI integration tests for the epcis-document binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("epcis-document"))
}

fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const VALID_DOCUMENT: &str = r#"{
    "@context": [
        "https://ref.gs1.org/standards/epcis/2.0.0/epcis-context.jsonld",
        { "example": "https://ns.example.com/epcis/" }
    ],
    "type": "EPCISDocument",
    "schemaVersion": "2.0",
    "creationDate": "2005-07-11T11:30:47.0Z",
    "epcisBody": {
        "event": {
            "type": "ObjectEvent",
            "eventTime": "2005-04-03T20:33:31.116000-06:00",
            "eventTimeZoneOffset": "-06:00",
            "action": "OBSERVE",
            "epcList": ["urn:epc:id:sgtin:0614141.107346.2017"],
            "example:myField": "extension"
        }
    }
}"#;

const INVALID_DOCUMENT: &str = r#"{
    "@context": "https://ref.gs1.org/standards/epcis/2.0.0/epcis-context.jsonld",
    "type": "EPCISDocument",
    "schemaVersion": "2.0",
    "creationDate": "2005-07-11T11:30:47.0Z",
    "epcisBody": {
        "event": {
            "type": "ObjectEvent",
            "eventTime": "2005-04-03T20:33:31.116000-06:00",
            "eventTimeZoneOffset": "-06:00",
            "action": "LOOKED_AT",
            "factoryId": "factory-7"
        }
    }
}"#;

mod validate_command {
    use super::*;

    #[test]
    fn valid_document_passes() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "doc.json", VALID_DOCUMENT);

        cmd()
            .args(["validate", doc.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("is valid"));
    }

    #[test]
    fn invalid_document_exits_one_and_lists_violations() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "doc.json", INVALID_DOCUMENT);

        cmd()
            .args(["validate", doc.to_str().unwrap()])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("/epcisBody/event/action"))
            .stderr(predicate::str::contains("factoryId"));
    }

    #[test]
    fn quiet_suppresses_violation_listing() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "doc.json", INVALID_DOCUMENT);

        cmd()
            .args(["validate", doc.to_str().unwrap(), "--quiet"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("violation(s)"))
            .stderr(predicate::str::contains("/epcisBody/event/action").not());
    }

    #[test]
    fn json_output_valid() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "doc.json", VALID_DOCUMENT);

        cmd()
            .args(["validate", doc.to_str().unwrap(), "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""valid":true"#));
    }

    #[test]
    fn json_output_invalid_includes_violations() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "doc.json", INVALID_DOCUMENT);

        cmd()
            .args(["validate", doc.to_str().unwrap(), "--json"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains("violations"));
    }

    #[test]
    fn unrecognized_document_type_exits_two() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "doc.json", r#"{ "foo": "bar" }"#);

        cmd()
            .args(["validate", doc.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("unrecognized document type"));
    }

    #[test]
    fn missing_file_exits_three() {
        cmd()
            .args(["validate", "/nonexistent/doc.json"])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn malformed_json_exits_two() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "doc.json", "{ not json }");

        cmd()
            .args(["validate", doc.to_str().unwrap()])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }
}

mod inspect_command {
    use super::*;

    #[test]
    fn summarizes_type_and_events() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "doc.json", VALID_DOCUMENT);

        cmd()
            .args(["inspect", doc.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("EPCISDocument"))
            .stdout(predicate::str::contains("events:        1"))
            .stdout(predicate::str::contains("ObjectEvent (1 extension field(s))"));
    }

    #[test]
    fn unrecognized_type_exits_two() {
        let dir = TempDir::new().unwrap();
        let doc = write_temp_file(&dir, "doc.json", r#"{ "foo": "bar" }"#);

        cmd()
            .args(["inspect", doc.to_str().unwrap()])
            .assert()
            .code(2);
    }
}
