use std::cmp::Reverse;

use crate::receiver::{Live, ReceiverKey, ReceiverRef};

/// One connection held by a signal: the receiver plus the metadata it is ordered and pruned by.
/// Never mutated once constructed.
pub(crate) struct SignalEntry<A> {
    receiver: ReceiverRef<A>,
    priority: i32,
    auto_disconnect: bool,
    // connection sequence within the owning signal, unique per entry
    seq: u64,
}

impl<A> SignalEntry<A> {
    pub fn new(receiver: ReceiverRef<A>, priority: i32, auto_disconnect: bool, seq: u64) -> Self {
        Self { receiver, priority, auto_disconnect, seq }
    }

    /// The live invocable for this entry, or `None` if its target is gone.
    /// Liveness can change between connect and emit, so this is resolved on every call.
    pub fn resolve(&self) -> Option<Live<'_, A>> { self.receiver.resolve() }

    pub fn key(&self) -> ReceiverKey<'_> { self.receiver.key() }

    pub fn receiver(&self) -> &ReceiverRef<A> { &self.receiver }

    pub fn priority(&self) -> i32 { self.priority }

    pub fn auto_disconnect(&self) -> bool { self.auto_disconnect }

    pub fn seq(&self) -> u64 { self.seq }

    /// Highest priority first, then connection order
    pub fn order(&self) -> (Reverse<i32>, u64) { (Reverse(self.priority), self.seq) }
}
