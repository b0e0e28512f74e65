//! Test doubles and common utilities for poller contract tests
//!
//! Every recording double appends to a shared [`CallLog`], so a test can
//! assert on the relative order of DNS updates, notifications and saves
//! across components. Clones of a double share its log and failure switch.

#![allow(dead_code)]

use cnsddns_core::error::{Error, Result};
use cnsddns_core::state::MemoryStateStore;
use cnsddns_core::traits::{DnsProvider, DnsUpdate, IpSource, Notifier, StateStore};
use cnsddns_core::{EngineConfig, Poller};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Ordered record of calls made by the recording doubles
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// Snapshot of every call so far
    pub fn calls(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    /// Calls whose label starts with `prefix`
    pub fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// An IpSource that replays a script of answers
///
/// `Some(ip)` is returned as the current IP, `None` fails the fetch. The last
/// entry repeats once the script runs out.
#[derive(Clone)]
pub struct ScriptedIpSource {
    script: Arc<Mutex<VecDeque<Option<String>>>>,
    last: Arc<Mutex<Option<String>>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    pub fn new(ips: &[&str]) -> Self {
        let source = Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            last: Arc::new(Mutex::new(None)),
            call_count: Arc::new(AtomicUsize::new(0)),
        };
        for ip in ips {
            source.push(ip);
        }
        source
    }

    /// Append a successful answer
    pub fn push(&self, ip: &str) {
        self.script.lock().unwrap().push_back(Some(ip.to_string()));
    }

    /// Append a failed fetch
    pub fn push_failure(&self) {
        self.script.lock().unwrap().push_back(None);
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        let answer = match next {
            Some(answer) => {
                *self.last.lock().unwrap() = answer.clone();
                answer
            }
            None => self.last.lock().unwrap().clone(),
        };

        answer.ok_or_else(|| Error::ip_fetch("scripted failure"))
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A DnsProvider that records `dns:<ip>` and can be switched to fail or to
/// dry-run
#[derive(Clone)]
pub struct RecordingProvider {
    log: CallLog,
    failing: Arc<AtomicBool>,
    dry_run: Arc<AtomicBool>,
}

impl RecordingProvider {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            failing: Arc::new(AtomicBool::new(false)),
            dry_run: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_dry_run(&self, dry_run: bool) {
        self.dry_run.store(dry_run, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn update_dns(&self, ip: &str) -> Result<DnsUpdate> {
        self.log.push(format!("dns:{ip}"));
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::provider("RecordModify", 4000, "scripted failure"));
        }
        if self.dry_run.load(Ordering::SeqCst) {
            return Ok(DnsUpdate::DryRun);
        }
        Ok(DnsUpdate::Applied)
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// A Notifier that records `notify:<ip>` and can be switched to fail
#[derive(Clone)]
pub struct RecordingNotifier {
    log: CallLog,
    failing: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, ip: &str) -> Result<()> {
        self.log.push(format!("notify:{ip}"));
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::notification("scripted failure"));
        }
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// A StateStore over [`MemoryStateStore`] that records `save:<ip>`
#[derive(Clone)]
pub struct RecordingStateStore {
    inner: MemoryStateStore,
    log: CallLog,
}

impl RecordingStateStore {
    pub fn new(log: &CallLog) -> Self {
        Self {
            inner: MemoryStateStore::new(),
            log: log.clone(),
        }
    }

    pub fn with_ip(log: &CallLog, ip: &str) -> Self {
        Self {
            inner: MemoryStateStore::with_ip(ip),
            log: log.clone(),
        }
    }

    /// What the poller would read on its next tick
    pub async fn stored(&self) -> Option<String> {
        self.inner.load().await.unwrap()
    }
}

#[async_trait::async_trait]
impl StateStore for RecordingStateStore {
    async fn load(&self) -> Result<Option<String>> {
        self.inner.load().await
    }

    async fn save(&self, ip: &str) -> Result<()> {
        self.log.push(format!("save:{ip}"));
        self.inner.save(ip).await
    }
}

/// Handles a test keeps after the doubles are boxed into a poller
pub struct Harness {
    pub log: CallLog,
    pub ip_source: ScriptedIpSource,
    pub provider: RecordingProvider,
    pub notifier: RecordingNotifier,
    pub state_store: RecordingStateStore,
}

impl Harness {
    /// Doubles with an empty state store
    pub fn new(ips: &[&str]) -> Self {
        let log = CallLog::new();
        Self {
            ip_source: ScriptedIpSource::new(ips),
            provider: RecordingProvider::new(&log),
            notifier: RecordingNotifier::new(&log),
            state_store: RecordingStateStore::new(&log),
            log,
        }
    }

    /// Doubles whose state store already holds `stored`
    pub fn with_stored(ips: &[&str], stored: &str) -> Self {
        let mut harness = Self::new(ips);
        harness.state_store = RecordingStateStore::with_ip(&harness.log, stored);
        harness
    }

    /// Build a poller wired to clones of the doubles
    pub fn poller(&self, config: &EngineConfig) -> Poller {
        Poller::new(
            Box::new(self.ip_source.clone()),
            Box::new(self.provider.clone()),
            Box::new(self.notifier.clone()),
            Box::new(self.state_store.clone()),
            config,
        )
        .expect("poller construction succeeds")
    }
}
