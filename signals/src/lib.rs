/*!
An in-process, synchronous, single-topic signal: components connect receivers to a [`Signal`]
and an event source emits values to all of them, without either side knowing the other's types.

# Guarantees
- Receivers run in descending priority order. Equal priorities run in connection order.
- Connecting the same receiver twice is refused, so nothing is notified twice per emission.
- Objects are held weakly. A receiver whose object was dropped is skipped and pruned on the next emit.
- Auto-disconnect receivers fire once and are then removed.
- Receivers may connect and disconnect on the signal that is currently notifying them.

# Receivers
- [`Callback`]: an owned closure. Clones share identity, so a clone can later be used to disconnect it.
  Closures are always wrapped, since a bare closure has no identity to disconnect by.
- [`WeakCallback`]: a callback held weakly, via [`Callback::downgrade`].
- [`BoundMethod`]: an object plus a method name, from a [`Receiver`] or a [`Methods`] implementation.
- [`ReceiverFn`]: a plain function. The same function is only ever connected once.
- Channel senders (`std::sync::mpsc::Sender`, and `tokio::sync::mpsc::UnboundedSender` with the
  `tokio` feature) which forward a clone of each payload.

# Basic usage

```rust
use signal_dispatch::*;
use std::sync::{Arc, Mutex};

let seen = Arc::new(Mutex::new(Vec::new()));
let signal: Signal<(String, u32)> = Signal::new();

let audit = {
    let seen = seen.clone();
    Callback::new(move |(name, qty): &(String, u32)| {
        seen.lock().unwrap().push(format!("audit {name} x{qty}"));
        Ok(())
    })
};
let greeter = {
    let seen = seen.clone();
    Callback::new(move |(name, _): &(String, u32)| {
        seen.lock().unwrap().push(format!("hello {name}"));
        Ok(())
    })
};

assert!(signal.connect(&greeter, 0, true));
assert!(signal.connect(&audit, 10, false));
assert!(!signal.connect(&audit, 10, false)); // already connected

signal.emit(&("Buffy".to_string(), 2)).unwrap();
signal.emit(&("Willow".to_string(), 1)).unwrap();

// audit runs first; greeter was a one-shot
assert_eq!(*seen.lock().unwrap(), ["audit Buffy x2", "hello Buffy", "audit Willow x1"]);
assert_eq!(signal.len(), 1);
```

# Object receivers

```rust
use signal_dispatch::*;
use std::sync::{Arc, Mutex};

struct Counter(Mutex<u32>);

impl Receiver<u32> for Counter {
    fn receive(&self, values: &u32) -> ReceiveResult {
        *self.0.lock().unwrap() += values;
        Ok(())
    }
}

let signal: Signal<u32> = Signal::new();
let counter = Arc::new(Counter(Mutex::new(0)));
signal.connect(BoundMethod::receiver(&counter), 0, false);

signal.emit(&5).unwrap();
assert_eq!(*counter.0.lock().unwrap(), 5);

// the signal does not keep the counter alive
drop(counter);
assert_eq!(signal.len(), 1);
signal.emit(&5).unwrap();
assert_eq!(signal.len(), 0);
```
*/

mod channel;
mod entry;
mod error;
mod policy;
mod receiver;
mod signal;
mod traits;

pub use error::*;
pub use policy::*;
pub use receiver::*;
pub use signal::*;
pub use traits::*;
