use assert_cmd::Command;
use predicates::prelude::*;

const REQUIRED: [&str; 3] = ["PRIVATE_KEY", "ZERO_EX_API_KEY", "ALCHEMY_HTTP_TRANSPORT_URL"];

fn swap_without(missing: &str) -> assert_cmd::assert::Assert {
    // an empty working dir keeps any developer .env out of the run
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("swap").unwrap();
    cmd.current_dir(dir.path()).env("RUST_LOG", "info");
    for key in REQUIRED {
        cmd.env_remove(key);
    }
    for key in REQUIRED.iter().filter(|k| **k != missing) {
        cmd.env(key, "0000000000000000000000000000000000000000000000000000000000000001");
    }
    // unroutable on purpose: reaching the network would hang or fail differently
    cmd.env("ZERO_EX_API_URL", "http://127.0.0.1:9");
    cmd.timeout(std::time::Duration::from_secs(30)).assert()
}

#[test]
fn missing_rpc_url_aborts_before_network() {
    swap_without("ALCHEMY_HTTP_TRANSPORT_URL")
        .failure()
        .stderr(predicate::str::contains("ALCHEMY_HTTP_TRANSPORT_URL is missing"))
        .stdout(predicate::str::contains("aggregator call").not());
}

#[test]
fn missing_private_key_aborts() {
    swap_without("PRIVATE_KEY")
        .failure()
        .stderr(predicate::str::contains("PRIVATE_KEY is missing"));
}

#[test]
fn missing_api_key_aborts() {
    swap_without("ZERO_EX_API_KEY")
        .failure()
        .stderr(predicate::str::contains("ZERO_EX_API_KEY is missing"));
}
