use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use crate::entry::SignalEntry;
use crate::error::SignalError;
use crate::policy::ErrorPolicy;
use crate::receiver::{IntoReceiver, ReceiverIdentity, ReceiverRef};

/// A priority-ordered broadcast of `&A` to every connected receiver.
///
/// `Signal` is a cheap handle; clones share the same receivers. Receivers run inline on the
/// emitting thread in descending priority order, with ties broken by connection order.
pub struct Signal<A>(Arc<Inner<A>>);

struct Inner<A> {
    entries: RwLock<Vec<Arc<SignalEntry<A>>>>,
    next_seq: AtomicU64,
    policy: ErrorPolicy,
}

/// A non-owning handle to a [`Signal`], for receivers which need to reach back into the
/// signal that notifies them without keeping it alive.
pub struct WeakSignal<A>(Weak<Inner<A>>);

impl<A> Clone for Signal<A> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<A> Clone for WeakSignal<A> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<A> WeakSignal<A> {
    pub fn upgrade(&self) -> Option<Signal<A>> { self.0.upgrade().map(Signal) }
}

impl<A> Default for Signal<A> {
    fn default() -> Self { Self::new() }
}

impl<A> std::fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("entries", &self.len()).field("policy", &self.0.policy).finish()
    }
}

impl<A> Signal<A> {
    /// An empty signal which propagates receiver errors
    pub fn new() -> Self { Self::with_policy(ErrorPolicy::default()) }

    pub fn with_policy(policy: ErrorPolicy) -> Self {
        Self(Arc::new(Inner { entries: RwLock::new(Vec::new()), next_seq: AtomicU64::new(0), policy }))
    }

    /// A signal pre-seeded with `receivers`, each connected at priority 0
    pub fn with_receivers<I, R>(receivers: I, policy: ErrorPolicy) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoReceiver<A>,
    {
        let signal = Self::with_policy(policy);
        for receiver in receivers {
            signal.connect(receiver, 0, false);
        }
        signal
    }

    pub fn policy(&self) -> ErrorPolicy { self.0.policy }

    pub fn downgrade(&self) -> WeakSignal<A> { WeakSignal(Arc::downgrade(&self.0)) }

    /// Connect a receiver.
    ///
    /// Returns `false` without side effects if an equal receiver is already connected, or if the
    /// receiver's target was dropped before it could be connected.
    pub fn connect<R: IntoReceiver<A>>(&self, receiver: R, priority: i32, auto_disconnect: bool) -> bool {
        let receiver = receiver.into_receiver();
        if !receiver.is_alive() {
            tracing::debug!("Rejecting {:?}: target already dropped", receiver);
            return false;
        }

        let mut entries = self.0.entries.write().expect("entries lock is poisoned");
        let key = receiver.key();
        if entries.iter().any(|entry| entry.key() == key) {
            tracing::debug!("Rejecting {:?}: already connected", receiver);
            return false;
        }

        let seq = self.0.next_seq.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Connecting {:?} at priority {} (auto_disconnect: {})", receiver, priority, auto_disconnect);
        entries.push(Arc::new(SignalEntry::new(receiver, priority, auto_disconnect, seq)));
        entries.sort_by_key(|entry| entry.order());
        true
    }

    /// Disconnect the entry whose receiver compares equal to `receiver`.
    /// Returns whether anything was removed.
    pub fn disconnect<R: ReceiverIdentity<A>>(&self, receiver: R) -> bool {
        let key = receiver.receiver_key();
        let removed = {
            let mut entries = self.0.entries.write().expect("entries lock is poisoned");
            match entries.iter().position(|entry| entry.key() == key) {
                Some(index) => entries.remove(index),
                None => return false,
            }
        };
        tracing::debug!("Disconnected {:?}", removed.receiver());
        // `removed` drops here, after the lock is released, in case the receiver's drop reaches back in
        true
    }

    /// Disconnect every receiver. Returns `false` if there were none.
    pub fn disconnect_all(&self) -> bool {
        let removed = std::mem::take(&mut *self.0.entries.write().expect("entries lock is poisoned"));
        if removed.is_empty() {
            return false;
        }
        tracing::debug!("Disconnected all {} receivers", removed.len());
        true
    }

    /// Whether any receiver is connected, including dead ones not yet pruned
    pub fn connected(&self) -> bool { !self.is_empty() }

    pub fn has_receiver<R: ReceiverIdentity<A>>(&self, receiver: R) -> bool {
        let key = receiver.receiver_key();
        self.0.entries.read().expect("entries lock is poisoned").iter().any(|entry| entry.key() == key)
    }

    /// Number of entries, including dead ones not yet pruned
    pub fn len(&self) -> usize { self.0.entries.read().expect("entries lock is poisoned").len() }

    pub fn is_empty(&self) -> bool { self.0.entries.read().expect("entries lock is poisoned").is_empty() }

    /// Snapshot of the connected receivers in emission order
    pub fn receivers(&self) -> Vec<ReceiverRef<A>> {
        self.0.entries.read().expect("entries lock is poisoned").iter().map(|entry| entry.receiver().clone()).collect()
    }

    /// Notify every live receiver with `values`, in priority order.
    ///
    /// Iterates a snapshot taken on entry: receivers connected during the pass are not invoked
    /// until the next emit, and receivers disconnected during the pass are still invoked if
    /// reached. Dead receivers and fired auto-disconnect receivers are pruned once the pass
    /// completes.
    ///
    /// Under [`ErrorPolicy::Propagate`] the first receiver failure is returned immediately;
    /// the remaining receivers are skipped and nothing is pruned for this call.
    pub fn emit(&self, values: &A) -> Result<(), SignalError> {
        // Clone the entries to avoid holding the lock while receivers run
        let snapshot = {
            let entries = self.0.entries.read().expect("entries lock is poisoned");
            if entries.is_empty() {
                return Ok(());
            }
            entries.clone()
        };

        let mut spent = Vec::new();
        for entry in &snapshot {
            let Some(live) = entry.resolve() else {
                tracing::trace!("Receiver {:?} is dead, marking for removal", entry.receiver());
                spent.push(entry.seq());
                continue;
            };

            if let Err(source) = live.call(values) {
                match self.0.policy {
                    ErrorPolicy::Propagate => return Err(SignalError::Receiver { priority: entry.priority(), source }),
                    ErrorPolicy::Swallow => {
                        tracing::warn!("Receiver {:?} at priority {} failed: {}", entry.receiver(), entry.priority(), source)
                    }
                }
            }

            if entry.auto_disconnect() {
                spent.push(entry.seq());
            }
        }

        if !spent.is_empty() {
            self.prune(&spent);
        }
        Ok(())
    }

    /// Remove the entries with the given sequence numbers in one pass
    fn prune(&self, spent: &[u64]) {
        let removed: Vec<_> = {
            let mut entries = self.0.entries.write().expect("entries lock is poisoned");
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut *entries).into_iter().partition(|entry| spent.contains(&entry.seq()));
            *entries = kept;
            removed
        };
        if !removed.is_empty() {
            tracing::debug!("Pruned {} receivers", removed.len());
        }
    }
}
