use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("upipay"));
    cmd.arg("tests/fixtures/requests.jsonl");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""service":"upi-service""#))
        .stdout(predicate::str::contains(
            r#""address":"john.doe@digitalbank""#,
        ))
        .stdout(predicate::str::contains(r#""code":"already_exists""#))
        .stdout(predicate::str::contains(r#""valid":true"#))
        .stdout(predicate::str::contains(r#""from_vpa":"john.doe@digitalbank""#))
        .stdout(predicate::str::contains(r#""txn_id":"UPI"#))
        .stdout(predicate::str::contains(r#""code":"invalid_amount""#))
        .stdout(predicate::str::contains(r#""code":"no_vpa""#))
        .stdout(predicate::str::contains(r#""code":"unauthorized""#));

    Ok(())
}

#[test]
fn test_cli_one_response_per_request() -> Result<(), Box<dyn std::error::Error>> {
    let output = Command::new(cargo_bin!("upipay"))
        .arg("tests/fixtures/requests.jsonl")
        .output()?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    let responses: Vec<serde_json::Value> = stdout
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;
    assert_eq!(responses.len(), 9);
    let successes: Vec<bool> = responses
        .iter()
        .map(|r| r["success"].as_bool().unwrap())
        .collect();
    assert_eq!(
        successes,
        [true, true, false, true, true, false, false, true, false]
    );

    let history = &responses[7]["data"];
    assert_eq!(history["total"], 1);
    assert_eq!(history["page"], 1);
    assert_eq!(history["limit"], 20);
    assert_eq!(history["transactions"][0]["amount"], 100.0);
    Ok(())
}

#[test]
fn test_cli_custom_bank_suffix() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        r#"{"op":"create_vpa","user_id":"65a1b2c3d4e5f60718293a4b","prefix":"Ravi","account_id":"ACC1"}"#,
    )
    .unwrap();

    Command::new(cargo_bin!("upipay"))
        .arg(file.path())
        .arg("--bank-suffix")
        .arg("okbank")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""address":"ravi@okbank""#));
}
