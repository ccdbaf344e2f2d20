//! Interface check locking specs
//!
//! Verify the per-key lock file is cleaned up and serializes runs on one key.

use std::fs::{self, OpenOptions};
use std::thread;

use fs2::FileExt;

use crate::prelude::*;

#[test]
fn lock_file_is_removed_after_run() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);

    host.check_interface("eth0").passes();

    assert!(!host.lock_dir().join(".pk.interface-eth0.lock").exists());
}

#[test]
fn held_lock_times_out_without_verdict() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);
    let path = host.lock_dir().join(".pk.interface-eth0.lock");
    let holder = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .unwrap();
    holder.try_lock_exclusive().unwrap();

    host.check_interface("eth0")
        .env("PK_LOCK_TIMEOUT", "200ms")
        .env("PK_LOCK_RETRY", "20ms")
        .exits(3)
        .stdout_empty()
        .stderr_has("could not obtain lock");

    // The waiting run never touched the store
    assert!(!host.store_dir().join("pk.interface-eth0").exists());

    fs::remove_file(&path).unwrap();
    FileExt::unlock(&holder).unwrap();
    host.check_interface("eth0").passes();
}

#[test]
fn other_keys_are_not_blocked() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);
    host.interface("eth1", "up", 0, 0);
    let holder = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(host.lock_dir().join(".pk.interface-eth0.lock"))
        .unwrap();
    holder.try_lock_exclusive().unwrap();

    host.check_interface("eth1")
        .env("PK_LOCK_TIMEOUT", "200ms")
        .passes();
}

#[test]
fn malformed_timeout_is_fatal() {
    let host = Host::empty();
    host.interface("eth0", "up", 0, 0);

    host.check_interface("eth0")
        .env("PK_LOCK_TIMEOUT", "soon")
        .exits(3)
        .stdout_empty()
        .stderr_has("invalid duration for PK_LOCK_TIMEOUT");
}

#[test]
fn concurrent_runs_serialize_on_the_same_key() {
    let host = Host::empty();
    host.interface("eth0", "up", 5, 9);

    let runs: Vec<_> = thread::scope(|s| {
        let children: Vec<_> = (0..8)
            .map(|_| s.spawn(|| host.check_interface("eth0").passes()))
            .collect();
        children.into_iter().map(|c| c.join().unwrap()).collect()
    });

    for run in runs {
        run.stdout_has("errors_tx=0c").stderr_lacks("corrupt state");
    }
    let state: serde_json::Value =
        serde_json::from_str(&host.read_state("pk.interface-eth0")).unwrap();
    assert_eq!(state["previous_tx_errors"], 5);
    assert_eq!(state["previous_rx_errors"], 9);
    assert!(!host.lock_dir().join(".pk.interface-eth0.lock").exists());
    let leftovers: Vec<_> = fs::read_dir(host.store_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(leftovers, ["pk.interface-eth0"]);
}
