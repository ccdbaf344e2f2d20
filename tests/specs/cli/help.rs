//! CLI help specs

use crate::prelude::*;

#[test]
fn help_lists_checks() {
    let host = Host::empty();

    host.pk()
        .args(&["--help"])
        .passes()
        .stdout_has("interface")
        .stdout_has("load");
}

#[test]
fn interface_help_lists_options() {
    let host = Host::empty();

    host.pk()
        .args(&["interface", "--help"])
        .passes()
        .stdout_has("--warning")
        .stdout_has("--critical")
        .stdout_has("--speed")
        .stdout_has("--duplex")
        .stdout_has("--sysfs");
}
