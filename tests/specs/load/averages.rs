//! Load check specs
//!
//! Verify load averages are reported and never persisted.

use std::fs;

use crate::prelude::*;

fn check_load(host: &Host) -> CliBuilder {
    let procfs = host.procfs();
    host.pk().args(&["load", "--proc", procfs.to_str().unwrap()])
}

#[test]
fn reports_all_windows() {
    let host = Host::empty();
    host.loadavg("0.50 1.25 2.00 1/100 42\n");

    check_load(&host).passes().stdout_eq(
        "LOAD OK - load1=0.5 load5=1.25 load15=2 | load1=0.5;; load5=1.25;; load15=2;;\n",
    );
}

#[test]
fn worst_window_leads_the_summary() {
    let host = Host::empty();
    host.loadavg("0.50 1.25 2.00 1/100 42\n");

    check_load(&host)
        .args(&["--warning", "1", "--critical", "1.5"])
        .exits(2)
        .stdout_has("LOAD CRITICAL - load15 is 2 (outside 0:1.5), load5 is 1.25 (outside 0:1)");
}

#[test]
fn keeps_no_state() {
    let host = Host::empty();
    host.loadavg("0.10 0.10 0.10 1/100 42\n");

    check_load(&host).passes();

    assert_eq!(fs::read_dir(host.store_dir()).unwrap().count(), 0);
    assert_eq!(fs::read_dir(host.lock_dir()).unwrap().count(), 0);
}

#[test]
fn missing_loadavg_is_unknown() {
    let host = Host::empty();

    check_load(&host)
        .exits(3)
        .stdout_has("LOAD UNKNOWN - could not read");
}
