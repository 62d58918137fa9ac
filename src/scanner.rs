//! QR scanner lifecycle.
//!
//! The camera decoder runs in the browser; this module owns the claim on it.
//! Each owner (a logged-in employee) holds at most one active scan. An
//! [`ActiveScan`] guard releases the claim when it finishes, when it is closed
//! and when it is dropped, unless it is explicitly [suspended](ActiveScan::suspend)
//! to wait for the next decoder event.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// DOM element the decoder widget binds to.
pub const SCANNER_ANCHOR: &str = "qr-reader";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeEvent {
    Decoded(String),
    /// No code in frame, unreadable frame, camera hiccup.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanProgress {
    Scanning,
    Finished,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("a scanner is already open")]
    AlreadyActive,

    #[error("no such scanner")]
    NotFound,
}

#[derive(Debug)]
struct Slot {
    id: Uuid,
    anchor: String,
    touched: Instant,
}

type Slots = Arc<Mutex<HashMap<String, Slot>>>;

#[derive(Clone)]
pub struct Scanner {
    slots: Slots,
    idle: Duration,
}

fn lock(slots: &Slots) -> MutexGuard<'_, HashMap<String, Slot>> {
    // a poisoned map still holds consistent slots; keep serving
    slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Scanner {
    pub fn new(idle: Duration) -> Self {
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            idle,
        }
    }

    /// Claim the decoder for `owner`. Refused while that owner already has a
    /// live scan; a scan idle for longer than the configured limit is
    /// reaped first.
    pub fn mount(&self, owner: &str, anchor: &str) -> Result<ActiveScan, ScanError> {
        let mut slots = lock(&self.slots);

        if let Some(slot) = slots.get(owner) {
            if slot.touched.elapsed() < self.idle {
                return Err(ScanError::AlreadyActive);
            }
            log::info!("reaping abandoned scanner {} of {}", slot.id, owner);
            slots.remove(owner);
        }

        let id = Uuid::new_v4();
        slots.insert(
            owner.to_string(),
            Slot {
                id,
                anchor: anchor.to_string(),
                touched: Instant::now(),
            },
        );
        log::debug!("scanner {} mounted on #{} for {}", id, anchor, owner);

        Ok(ActiveScan {
            id,
            owner: owner.to_string(),
            anchor: anchor.to_string(),
            slots: Arc::clone(&self.slots),
            released: false,
        })
    }

    /// Re-attach to a suspended scan to deliver the next event.
    pub fn resume(&self, owner: &str, id: Uuid) -> Result<ActiveScan, ScanError> {
        let mut slots = lock(&self.slots);
        let slot = slots
            .get_mut(owner)
            .filter(|slot| slot.id == id)
            .ok_or(ScanError::NotFound)?;
        slot.touched = Instant::now();

        Ok(ActiveScan {
            id,
            owner: owner.to_string(),
            anchor: slot.anchor.clone(),
            slots: Arc::clone(&self.slots),
            released: false,
        })
    }

    pub fn is_active(&self, owner: &str) -> bool {
        lock(&self.slots).contains_key(owner)
    }
}

/// Exclusive handle on an owner's scanner.
#[derive(Debug)]
pub struct ActiveScan {
    id: Uuid,
    owner: String,
    anchor: String,
    slots: Slots,
    released: bool,
}

impl ActiveScan {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    /// Feed one decoder event. A decoded code goes to `on_success` and tears
    /// the scanner down; failures are expected while nothing is in frame and
    /// leave it running.
    pub fn handle(self, event: DecodeEvent, on_success: impl FnOnce(String)) -> ScanProgress {
        match event {
            DecodeEvent::Decoded(text) => {
                self.close();
                on_success(text);
                ScanProgress::Finished
            }
            DecodeEvent::Failed(reason) => {
                log::trace!("scanner {}: {}", self.id, reason);
                self.suspend();
                ScanProgress::Scanning
            }
        }
    }

    /// Keep the claim alive for a later [`Scanner::resume`].
    pub fn suspend(mut self) {
        self.released = true;
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let mut slots = lock(&self.slots);
        if slots.get(&self.owner).is_some_and(|slot| slot.id == self.id) {
            slots.remove(&self.owner);
            log::debug!("scanner {} released", self.id);
        }
    }
}

impl Drop for ActiveScan {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> Scanner {
        Scanner::new(Duration::from_secs(60))
    }

    #[test]
    fn second_mount_is_refused_while_active() {
        let scanner = scanner();
        let first = scanner.mount("e1", SCANNER_ANCHOR).unwrap();
        assert_eq!(scanner.mount("e1", SCANNER_ANCHOR).unwrap_err(), ScanError::AlreadyActive);

        // other owners are independent
        let other = scanner.mount("e2", SCANNER_ANCHOR).unwrap();
        other.close();

        first.close();
        assert!(scanner.mount("e1", SCANNER_ANCHOR).is_ok());
    }

    #[test]
    fn decode_invokes_callback_and_tears_down() {
        let scanner = scanner();
        let scan = scanner.mount("e1", SCANNER_ANCHOR).unwrap();
        let id = scan.id();
        scan.suspend();

        let scan = scanner.resume("e1", id).unwrap();
        let progress = scan.handle(DecodeEvent::Failed("NotFoundException".to_string()), |_| {
            panic!("failure must not report a result")
        });
        assert_eq!(progress, ScanProgress::Scanning);
        assert!(scanner.is_active("e1"));

        let mut reported = None;
        let scan = scanner.resume("e1", id).unwrap();
        let progress = scan.handle(DecodeEvent::Decoded("BOX-0042".to_string()), |text| reported = Some(text));
        assert_eq!(progress, ScanProgress::Finished);
        assert_eq!(reported.as_deref(), Some("BOX-0042"));
        assert!(!scanner.is_active("e1"));
        assert_eq!(scanner.resume("e1", id).unwrap_err(), ScanError::NotFound);
    }

    #[test]
    fn dropping_the_guard_releases_the_claim() {
        let scanner = scanner();
        {
            let _scan = scanner.mount("e1", SCANNER_ANCHOR).unwrap();
            assert!(scanner.is_active("e1"));
        }
        assert!(!scanner.is_active("e1"));
    }

    #[test]
    fn idle_scans_are_reaped_on_next_mount() {
        let scanner = Scanner::new(Duration::ZERO);
        scanner.mount("e1", SCANNER_ANCHOR).unwrap().suspend();
        assert!(scanner.is_active("e1"));
        assert!(scanner.mount("e1", SCANNER_ANCHOR).is_ok());
    }

    #[test]
    fn stale_guard_does_not_release_a_newer_scan() {
        let scanner = Scanner::new(Duration::ZERO);
        let stale = scanner.mount("e1", SCANNER_ANCHOR).unwrap();
        let fresh = scanner.mount("e1", SCANNER_ANCHOR).unwrap();
        let fresh_id = fresh.id();
        fresh.suspend();

        drop(stale);
        assert!(scanner.resume("e1", fresh_id).is_ok());
    }

    #[test]
    fn events_decode_from_widget_json() {
        let event: DecodeEvent = serde_json::from_str(r#"{"decoded":"BOX-1"}"#).unwrap();
        assert_eq!(event, DecodeEvent::Decoded("BOX-1".to_string()));
        let event: DecodeEvent = serde_json::from_str(r#"{"failed":"camera busy"}"#).unwrap();
        assert_eq!(event, DecodeEvent::Failed("camera busy".to_string()));
    }
}
