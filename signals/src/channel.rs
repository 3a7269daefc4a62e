//! Channel senders as receivers: each emission forwards a clone of the payload.
//! Send failures are ignored, a closed channel just stops receiving.

use crate::receiver::{Callback, IntoReceiver, ReceiverRef};

impl<A> IntoReceiver<A> for std::sync::mpsc::Sender<A>
where A: Clone + Send + 'static
{
    fn into_receiver(self) -> ReceiverRef<A> {
        ReceiverRef::Callback(Callback::new(move |values: &A| {
            let _ = self.send(values.clone());
            Ok(())
        }))
    }
}

#[cfg(feature = "tokio")]
impl<A> IntoReceiver<A> for tokio::sync::mpsc::UnboundedSender<A>
where A: Clone + Send + 'static
{
    fn into_receiver(self) -> ReceiverRef<A> {
        ReceiverRef::Callback(Callback::new(move |values: &A| {
            let _ = self.send(values.clone());
            Ok(())
        }))
    }
}
