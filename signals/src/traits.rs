use crate::{ReceiverRef, Signal, SignalError};

/// The dispatch contract other components depend on, rather than on [`Signal`] itself.
///
/// Object safe, so it can be held as `Arc<dyn Signaler<A>>`.
pub trait Signaler<A> {
    fn connect(&self, receiver: ReceiverRef<A>, priority: i32, auto_disconnect: bool) -> bool;

    /// Disconnect `receiver`, or every receiver when `None`
    fn disconnect(&self, receiver: Option<&ReceiverRef<A>>) -> bool;

    fn emit(&self, values: &A) -> Result<(), SignalError>;

    fn connected(&self) -> bool;

    fn has_receiver(&self, receiver: &ReceiverRef<A>) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }
}

impl<A> Signaler<A> for Signal<A> {
    fn connect(&self, receiver: ReceiverRef<A>, priority: i32, auto_disconnect: bool) -> bool {
        Signal::connect(self, receiver, priority, auto_disconnect)
    }

    fn disconnect(&self, receiver: Option<&ReceiverRef<A>>) -> bool {
        match receiver {
            Some(receiver) => Signal::disconnect(self, receiver),
            None => self.disconnect_all(),
        }
    }

    fn emit(&self, values: &A) -> Result<(), SignalError> { Signal::emit(self, values) }

    fn connected(&self) -> bool { Signal::connected(self) }

    fn has_receiver(&self, receiver: &ReceiverRef<A>) -> bool { Signal::has_receiver(self, receiver) }

    fn len(&self) -> usize { Signal::len(self) }

    fn is_empty(&self) -> bool { Signal::is_empty(self) }
}
