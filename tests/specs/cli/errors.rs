//! CLI error specs
//!
//! Verify usage errors and unusable environments are reported on stderr.

use crate::prelude::*;

#[test]
fn no_subcommand_is_usage_error() {
    let host = Host::empty();

    host.pk().fails().stderr_has("Usage:");
}

#[test]
fn interface_requires_a_name() {
    let host = Host::empty();

    host.pk()
        .args(&["interface"])
        .fails()
        .stderr_has("<NAME>");
}

#[test]
fn non_numeric_threshold_is_rejected() {
    let host = Host::empty();

    host.pk()
        .args(&["load", "--warning", "high"])
        .fails()
        .stderr_has("--warning");
}

#[test]
fn unusable_store_dir_is_fatal() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);
    let blocker = host.store_dir().join("file");
    std::fs::write(&blocker, "").unwrap();

    host.check_interface("eth0")
        .env("PK_STORE_DIR", &blocker)
        .exits(3)
        .stdout_empty()
        .stderr_has("store error");
}

#[test]
fn quiet_by_default() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);

    host.check_interface("eth0").passes().stderr_lacks("DEBUG");
}

#[test]
fn verbose_logs_to_stderr() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);

    host.check_interface("eth0")
        .args(&["--verbose"])
        .passes()
        .stderr_has("DEBUG");
}
