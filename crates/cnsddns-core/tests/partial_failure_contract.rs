//! Contract Test: Partial Failure
//!
//! Constraints verified:
//! - A failed IP fetch touches nothing
//! - A failed DNS update skips the notification and keeps the old IP stored
//! - A failed notification keeps the old IP stored even though DNS changed
//! - The next tick retries the whole reconciliation
//!
//! If this test fails, someone has:
//! - Moved the state save before a remote effect
//! - Swallowed a step failure inside a tick

mod common;

use cnsddns_core::{EngineConfig, Error, TickOutcome};
use common::*;

#[tokio::test]
async fn ip_fetch_failure_touches_nothing() {
    let harness = Harness::with_stored(&[], "1.2.3.4");
    harness.ip_source.push_failure();
    let poller = harness.poller(&EngineConfig::default());

    let result = poller.tick().await;

    assert!(matches!(result, Err(Error::IpFetch(_))));
    assert!(harness.log.calls().is_empty());
    assert_eq!(harness.state_store.stored().await.as_deref(), Some("1.2.3.4"));
}

#[tokio::test]
async fn dns_failure_skips_notification_and_keeps_state() {
    let harness = Harness::with_stored(&["5.6.7.8"], "1.2.3.4");
    harness.provider.set_failing(true);
    let poller = harness.poller(&EngineConfig::default());

    let result = poller.tick().await;

    assert!(matches!(result, Err(Error::Provider { .. })));
    assert_eq!(harness.log.calls(), vec!["dns:5.6.7.8"]);
    assert_eq!(harness.state_store.stored().await.as_deref(), Some("1.2.3.4"));
}

#[tokio::test]
async fn notification_failure_keeps_state() {
    let harness = Harness::with_stored(&["5.6.7.8"], "1.2.3.4");
    harness.notifier.set_failing(true);
    let poller = harness.poller(&EngineConfig::default());

    let result = poller.tick().await;

    assert!(matches!(result, Err(Error::Notification(_))));
    assert_eq!(harness.log.calls(), vec!["dns:5.6.7.8", "notify:5.6.7.8"]);
    assert_eq!(harness.state_store.stored().await.as_deref(), Some("1.2.3.4"));
}

#[tokio::test]
async fn next_tick_retries_after_failure() {
    let harness = Harness::with_stored(&["5.6.7.8"], "1.2.3.4");
    harness.provider.set_failing(true);
    let poller = harness.poller(&EngineConfig::default());

    assert!(poller.tick().await.is_err());

    harness.provider.set_failing(false);
    harness.log.clear();

    let outcome = poller.tick().await.unwrap();

    assert_eq!(
        outcome,
        TickOutcome::Reconciled {
            previous: "1.2.3.4".to_string(),
            current: "5.6.7.8".to_string(),
        }
    );
    assert_eq!(
        harness.log.calls(),
        vec!["dns:5.6.7.8", "notify:5.6.7.8", "save:5.6.7.8"]
    );
}
