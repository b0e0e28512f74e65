//! Contract Test: End to End with a State File
//!
//! Constraints verified:
//! - First run writes the fetched IP to the state file without any DNS call
//! - A repeated IP leaves the file and DNS alone
//! - A new IP reaches DNS and the notifier before the file is rewritten
//! - The file holds exactly the IP text after each save

mod common;

use cnsddns_core::state::FileStateStore;
use cnsddns_core::{EngineConfig, Poller, TickOutcome};
use common::*;
use tempfile::tempdir;

#[tokio::test]
async fn file_backed_poller_reconciles_changes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".current-ip");

    let log = CallLog::new();
    let ip_source = ScriptedIpSource::new(&["9.9.9.9", "9.9.9.9", "10.10.10.10"]);
    let store = FileStateStore::new(&path).await.unwrap();

    let poller = Poller::new(
        Box::new(ip_source),
        Box::new(RecordingProvider::new(&log)),
        Box::new(RecordingNotifier::new(&log)),
        Box::new(store),
        &EngineConfig::default(),
    )
    .unwrap();

    // First run: baseline
    assert_eq!(
        poller.tick().await.unwrap(),
        TickOutcome::Baseline {
            ip: "9.9.9.9".to_string()
        }
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "9.9.9.9");
    assert!(log.calls().is_empty());

    // Same IP: nothing happens
    assert_eq!(
        poller.tick().await.unwrap(),
        TickOutcome::Unchanged {
            ip: "9.9.9.9".to_string()
        }
    );
    assert!(log.calls().is_empty());

    // New IP: DNS, notify, then the file
    assert_eq!(
        poller.tick().await.unwrap(),
        TickOutcome::Reconciled {
            previous: "9.9.9.9".to_string(),
            current: "10.10.10.10".to_string(),
        }
    );
    assert_eq!(log.calls(), vec!["dns:10.10.10.10", "notify:10.10.10.10"]);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "10.10.10.10");
}

#[tokio::test]
async fn restart_resumes_from_state_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".current-ip");
    std::fs::write(&path, "1.2.3.4").unwrap();

    let log = CallLog::new();
    let poller = Poller::new(
        Box::new(ScriptedIpSource::new(&["5.6.7.8"])),
        Box::new(RecordingProvider::new(&log)),
        Box::new(RecordingNotifier::new(&log)),
        Box::new(FileStateStore::new(&path).await.unwrap()),
        &EngineConfig::default(),
    )
    .unwrap();

    poller.tick().await.unwrap();

    assert_eq!(log.calls(), vec!["dns:5.6.7.8", "notify:5.6.7.8"]);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "5.6.7.8");
}
