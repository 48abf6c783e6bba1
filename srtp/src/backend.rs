//! Process-wide crypto backend state.
//!
//! The backend is initialised once per process and keeps a registry of live
//! sessions so that events raised outside a session call can be routed back
//! to the session that owns the SSRC.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Once, Weak};

use portable_atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::key_derivation::*;

/// Diagnostic events a session may raise.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum SrtpEventKind {
    SsrcCollision,
    KeySoftLimit,
    KeyHardLimit,
    PacketIndexLimit,
}

impl fmt::Display for SrtpEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            SrtpEventKind::SsrcCollision => "ssrc collision",
            SrtpEventKind::KeySoftLimit => "key soft limit",
            SrtpEventKind::KeyHardLimit => "key hard limit",
            SrtpEventKind::PacketIndexLimit => "packet index limit",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SrtpEvent {
    pub kind: SrtpEventKind,
    pub ssrc: u32,
}

pub type EventHandler = Box<dyn FnMut(&SrtpEvent) + Send + 'static>;

/// Where a session's events end up: always the log, plus an optional
/// handler installed by the owner.
#[derive(Default)]
pub(crate) struct EventSink {
    handler: Mutex<Option<EventHandler>>,
}

impl EventSink {
    pub(crate) fn set_handler(&self, handler: Option<EventHandler>) {
        *lock(&self.handler) = handler;
    }

    pub(crate) fn emit(&self, event: SrtpEvent) {
        log::warn!("srtp: {} event, ssrc: {}", event.kind, event.ssrc);
        if let Some(handler) = lock(&self.handler).as_mut() {
            handler(&event);
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

static INIT: Once = Once::new();
static INIT_OK: AtomicBool = AtomicBool::new(false);
static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

lazy_static! {
    static ref SESSIONS: Mutex<HashMap<u64, Weak<EventSink>>> = Mutex::new(HashMap::new());
}

/// Initializes the backend. Only the first call does any work; every call
/// reports whether that initialization succeeded.
pub fn init_once() -> Result<()> {
    INIT.call_once(|| {
        let ok = self_test();
        if ok {
            log::debug!("srtp: crypto backend initialized");
        } else {
            log::error!("srtp: crypto backend self test failed");
        }
        INIT_OK.store(ok, Ordering::SeqCst);
    });

    if INIT_OK.load(Ordering::SeqCst) {
        Ok(())
    } else {
        Err(Error::ErrBackendInitFailed)
    }
}

// RFC 3711 appendix B.3 session key derivation.
fn self_test() -> bool {
    const MASTER_KEY: [u8; 16] = [
        0xE1, 0xF9, 0x7A, 0x0D, 0x3E, 0x01, 0x8B, 0xE0, 0xD6, 0x4F, 0xA3, 0x2C, 0x06, 0xDE, 0x41,
        0x39,
    ];
    const MASTER_SALT: [u8; 14] = [
        0x0E, 0xC6, 0x75, 0xAD, 0x49, 0x8A, 0xFE, 0xEB, 0xB6, 0x96, 0x0B, 0x3A, 0xAB, 0xE6,
    ];
    const SESSION_KEY: [u8; 16] = [
        0xC6, 0x1E, 0x7A, 0x93, 0x74, 0x4F, 0x39, 0xEE, 0x10, 0x73, 0x4A, 0xFE, 0x3F, 0xF7, 0xA0,
        0x87,
    ];

    matches!(
        aes_cm_key_derivation(LABEL_SRTP_ENCRYPTION, &MASTER_KEY, &MASTER_SALT, 0, 16),
        Ok(key) if key == SESSION_KEY
    )
}

/// Keeps a session in the registry. Dropping it unregisters the session.
#[derive(Debug)]
pub struct RegistrationGuard {
    handle: u64,
}

impl RegistrationGuard {
    pub fn handle(&self) -> u64 {
        self.handle
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        lock(&SESSIONS).remove(&self.handle);
    }
}

pub(crate) fn register(sink: &Arc<EventSink>) -> Result<RegistrationGuard> {
    init_once()?;

    let handle = NEXT_HANDLE.fetch_add(1, Ordering::SeqCst);
    lock(&SESSIONS).insert(handle, Arc::downgrade(sink));

    Ok(RegistrationGuard { handle })
}

/// Routes an event to the session registered under `handle`. Returns false
/// when no such session is alive.
pub fn dispatch(handle: u64, event: SrtpEvent) -> bool {
    let sink = lock(&SESSIONS).get(&handle).and_then(Weak::upgrade);
    match sink {
        Some(sink) => {
            sink.emit(event);
            true
        }
        None => {
            log::debug!("srtp: dropping {} event for unknown session {handle}", event.kind);
            false
        }
    }
}

/// Number of sessions currently registered.
pub fn registered_sessions() -> usize {
    lock(&SESSIONS).len()
}
