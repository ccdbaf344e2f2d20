//! Interface check state specs
//!
//! Verify counters carry over between invocations through the store.

use crate::prelude::*;

#[test]
fn first_run_reports_zero_growth() {
    let host = Host::empty();
    host.interface("eth0", "up", 100, 0);

    host.check_interface("eth0").passes().stdout_eq(
        "INTERFACE OK - state=UP speed=1000M duplex=FULL errors_tx=0c errors_rx=0c \
         | speed=1000M;; errors_tx=0c;0; errors_rx=0c;0;\n",
    );
}

#[test]
fn second_run_reports_growth_since_first() {
    let host = Host::empty();
    host.interface("eth0", "up", 100, 0);
    host.check_interface("eth0").passes();

    host.interface("eth0", "up", 140, 0);
    host.check_interface("eth0")
        .exits(1)
        .stdout_has("INTERFACE WARNING - errors_tx is 40 (outside 0:0)")
        .stdout_has("errors_tx=40c;0;");

    assert!(host
        .read_state("pk.interface-eth0")
        .contains("\"previous_tx_errors\": 140"));
}

#[test]
fn thresholds_come_from_arguments() {
    let host = Host::empty();
    host.interface("eth0", "up", 100, 0);
    host.check_interface("eth0").passes();

    host.interface("eth0", "up", 140, 0);
    host.check_interface("eth0")
        .args(&["--warning", "50", "--critical", "100"])
        .passes()
        .stdout_has("errors_tx=40c;50;100");
}

#[test]
fn counter_reset_is_zero_growth_with_warning() {
    let host = Host::empty();
    host.interface("eth0", "up", 100, 0);
    host.check_interface("eth0").passes();

    host.interface("eth0", "up", 3, 0);
    host.check_interface("eth0")
        .passes()
        .stdout_has("[warning: transmit error counter reset (100 -> 3)]");
}

#[test]
fn down_link_is_critical() {
    let host = Host::empty();
    host.interface("eth0", "down", 0, 0);

    host.check_interface("eth0")
        .exits(2)
        .stdout_has("INTERFACE CRITICAL - state is DOWN (expected UP)");
}

#[test]
fn missing_device_is_unknown() {
    let host = Host::empty();

    host.check_interface("eth9")
        .exits(3)
        .stdout_has("INTERFACE UNKNOWN - could not determine link state");
}

#[test]
fn devices_keep_separate_state() {
    let host = Host::empty();
    host.interface("eth0", "up", 100, 0);
    host.interface("eth1", "up", 500, 0);
    host.check_interface("eth0").passes();
    host.check_interface("eth1").passes();

    host.interface("eth0", "up", 101, 0);
    host.check_interface("eth0")
        .exits(1)
        .stdout_has("errors_tx is 1 (outside 0:0)");
    host.check_interface("eth1").passes();
}

#[test]
fn namespace_prefixes_the_region() {
    let host = Host::empty();
    host.interface("eth0", "up", 7, 0);

    host.check_interface("eth0")
        .env("PK_NAMESPACE", "Site")
        .passes();

    assert!(host
        .read_state("site.interface-eth0")
        .contains("\"previous_tx_errors\": 7"));
}

#[test]
fn corrupt_state_is_fatal_and_left_alone() {
    let host = Host::empty();
    host.interface("eth0", "up", 100, 0);
    host.state("pk.interface-eth0", "{not json");

    host.check_interface("eth0")
        .exits(3)
        .stdout_empty()
        .stderr_has("corrupt state");

    assert_eq!(host.read_state("pk.interface-eth0"), "{not json");
}

#[test]
fn empty_state_counts_as_first_run() {
    let host = Host::empty();
    host.interface("eth0", "up", 100, 0);
    host.state("pk.interface-eth0", "");

    host.check_interface("eth0")
        .passes()
        .stdout_has("errors_tx=0c");
}

#[test]
fn duplex_mismatch_warns() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);

    host.check_interface("eth0")
        .args(&["--duplex", "half"])
        .exits(1)
        .stdout_has("INTERFACE WARNING - duplex is FULL (expected half)");
}

#[test]
fn any_listed_duplex_is_accepted() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);

    host.check_interface("eth0")
        .args(&["-d", "half", "-d", "full"])
        .passes()
        .stdout_has("INTERFACE OK");
}

#[test]
fn speed_below_range_warns() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);

    host.check_interface("eth0")
        .args(&["--speed", "10000:"])
        .exits(1)
        .stdout_has("INTERFACE WARNING - speed is 1000 (outside 10000:)")
        .stdout_has("speed=1000M;10000:;");
}

#[test]
fn speed_within_range_passes() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);

    host.check_interface("eth0")
        .args(&["-s", "100:", "--duplex", "full"])
        .passes()
        .stdout_has("speed=1000M;100:;");
}

#[test]
fn malformed_speed_range_is_rejected() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);

    host.check_interface("eth0")
        .args(&["--speed", "20:10"])
        .fails()
        .stdout_empty()
        .stderr_has("invalid threshold range [20:10]");

    assert!(!host.store_dir().join("pk.interface-eth0").exists());
}
