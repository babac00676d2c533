//! Binary-level tests driven by snapshot fixtures.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn kubectl_pvc() -> Command {
    let mut cmd = Command::cargo_bin("kubectl-pvc").expect("binary should build");
    cmd.env_remove("KUBECTL_PVC_NAMESPACE")
        .env_remove("RUST_LOG")
        .arg("--snapshot")
        .arg(fixture("cluster.json"))
        .arg("--config")
        .arg("/dev/null");
    cmd
}

#[test]
fn inspect_degraded_claim() {
    kubectl_pvc()
        .args(["-n", "shop", "--attach-match", "exact", "inspect", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Claim:  shop/data"))
        .stdout(predicate::str::contains("<unscheduled>"))
        .stdout(predicate::str::contains(
            "nodes: [node-b] are still not attached as desired",
        ))
        .stdout(predicate::str::contains(
            "pods: [web-1,web-2] are still not mounted as desired",
        ));
}

#[test]
fn inspect_json_output() {
    let output = kubectl_pvc()
        .args(["-n", "shop", "-o", "json", "--attach-match", "exact", "inspect", "data"])
        .output()
        .expect("should run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["phases"]["Provision"]["status"], "success");
    assert_eq!(value["phases"]["Attach"]["status"], "partly_fail");
    assert_eq!(value["phases"]["Attach"]["outstanding"][0], "node-b");
    assert_eq!(value["phases"]["Mount"]["status"], "partly_fail");
    assert_eq!(value["attached_nodes"][0], "node-a");
    assert_eq!(value["pods"].as_array().map(Vec::len), Some(4));
}

#[test]
fn inspect_substring_match_counts_similar_handles() {
    let output = kubectl_pvc()
        .args(["-n", "shop", "-o", "json", "--attach-match", "substring", "inspect", "data"])
        .output()
        .expect("should run");
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["phases"]["Attach"]["status"], "success");
}

#[test]
fn config_file_sets_namespace_and_policy() {
    let output = Command::cargo_bin("kubectl-pvc")
        .expect("binary should build")
        .env_remove("KUBECTL_PVC_NAMESPACE")
        .arg("--snapshot")
        .arg(fixture("cluster.json"))
        .arg("--config")
        .arg(fixture("config.toml"))
        .args(["-o", "json", "inspect", "data"])
        .output()
        .expect("should run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["namespace"], "shop");
    assert_eq!(value["phases"]["Attach"]["status"], "partly_fail");
}

#[test]
fn namespace_from_environment() {
    kubectl_pvc()
        .env("KUBECTL_PVC_NAMESPACE", "shop")
        .args(["inspect", "data"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shop/data"));
}

#[test]
fn inspect_unbound_claim_is_ongoing() {
    kubectl_pvc()
        .args(["-n", "shop", "inspect", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pods reference this claim"))
        .stdout(predicate::str::contains("ongoing"))
        .stdout(predicate::str::contains("success").not());
}

#[test]
fn inspect_unsupported_volume_prints_partial_report() {
    kubectl_pvc()
        .args(["-n", "shop", "inspect", "legacy"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Bind"))
        .stdout(predicate::str::contains("success"))
        .stderr(predicate::str::contains("pv-hostpath"))
        .stderr(predicate::str::contains("CSI"));
}

#[test]
fn inspect_missing_volume_fails() {
    kubectl_pvc()
        .args(["-n", "shop", "inspect", "orphan"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("volume not found: pv-gone"));
}

#[test]
fn inspect_missing_claim_fails() {
    kubectl_pvc()
        .args(["-n", "shop", "inspect", "nope"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("volume claim not found: shop/nope"));
}

#[test]
fn inspect_requires_claim_argument() {
    kubectl_pvc().arg("inspect").assert().failure().code(2);
}

#[test]
fn ls_default_namespace() {
    kubectl_pvc()
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("cache"))
        .stdout(predicate::str::contains("data").not());
}

#[test]
fn ls_namespace_table() {
    kubectl_pvc()
        .args(["-n", "shop", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("NAME"))
        .stdout(predicate::str::contains("STORAGECLASS"))
        .stdout(predicate::str::contains("orphan"));
}

#[test]
fn ls_claims_of_pod() {
    let output = kubectl_pvc()
        .args(["-n", "shop", "-o", "json", "ls", "--pod", "batch-0"])
        .output()
        .expect("should run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["pod"], "batch-0");
    assert_eq!(value["claims"][0]["name"], "legacy");
    assert_eq!(value["claims"][1]["name"], "data");
}

#[test]
fn invalid_snapshot_fails() {
    Command::cargo_bin("kubectl-pvc")
        .expect("binary should build")
        .arg("--snapshot")
        .arg(fixture("config.toml"))
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid cluster snapshot"));
}
