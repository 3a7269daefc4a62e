mod common;
use common::Watcher;
use signal_dispatch::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

struct Counter {
    name: &'static str,
    watcher: Watcher,
}

impl Receiver<()> for Counter {
    fn receive(&self, _: &()) -> ReceiveResult {
        self.watcher.push(self.name);
        Ok(())
    }
}

/// An object with two independently bindable methods
struct Door {
    events: Mutex<Vec<String>>,
}

impl Methods<&'static str> for Door {
    fn responds_to(&self, method: &str) -> bool { matches!(method, "open" | "close") }

    fn invoke(&self, method: &str, who: &&'static str) -> ReceiveResult {
        self.events.lock().unwrap().push(format!("{who} {method}"));
        Ok(())
    }
}

#[test]
fn test_empty_signal_is_noop() {
    let signal = Signal::<u8>::new();
    assert!(!signal.connected());
    assert!(signal.emit(&1).is_ok());
    assert_eq!(signal.len(), 0);
}

#[test]
fn test_duplicate_callback_rejected() {
    let watcher = Watcher::new();
    let signal = Signal::<()>::new();
    let callback = watcher.recorder("once");

    assert!(signal.connect(&callback, 0, false));
    assert!(!signal.connect(callback.clone(), 0, false));
    // a weak handle to the same invocable is the same receiver
    assert!(!signal.connect(callback.downgrade(), 3, false));
    assert_eq!(signal.len(), 1);

    signal.emit(&()).unwrap();
    assert_eq!(watcher.check(), ["once"]);
}

#[test]
fn test_identical_closures_are_distinct() {
    let watcher = Watcher::new();
    let signal = Signal::<()>::new();

    assert!(signal.connect(watcher.recorder("same"), 0, false));
    assert!(signal.connect(watcher.recorder("same"), 0, false));
    assert_eq!(signal.len(), 2);

    signal.emit(&()).unwrap();
    assert_eq!(watcher.check(), ["same", "same"]);
}

#[test]
fn test_bound_methods_compare_structurally() {
    let signal = Signal::new();
    let door = Arc::new(Door { events: Mutex::new(Vec::new()) });

    assert!(signal.connect(BoundMethod::new(&door, "open").unwrap(), 0, false));
    assert!(!signal.connect(BoundMethod::new(&door, "open").unwrap(), 0, false));
    assert!(signal.connect(BoundMethod::new(&door, "close").unwrap(), -1, false));
    assert_eq!(signal.len(), 2);

    assert!(signal.has_receiver(BoundMethod::new(&door, "open").unwrap()));
    signal.emit(&"alice").unwrap();
    assert_eq!(*door.events.lock().unwrap(), ["alice open", "alice close"]);

    assert!(signal.disconnect(BoundMethod::new(&door, "open").unwrap()));
    assert!(!signal.has_receiver(BoundMethod::new(&door, "open").unwrap()));
    assert!(signal.has_receiver(BoundMethod::new(&door, "close").unwrap()));
}

#[test]
fn test_unknown_method_rejected_at_construction() {
    let door = Arc::new(Door { events: Mutex::new(Vec::new()) });
    let err = BoundMethod::<&'static str>::new(&door, "slam").err().expect("slam is not a method");
    assert!(matches!(&err, SignalError::UnknownMethod { method, .. } if method == "slam"));
    assert!(err.to_string().contains("slam"));
}

#[test]
fn test_auto_disconnect_fires_once() {
    let watcher = Watcher::new();
    let signal = Signal::<()>::new();
    signal.connect(watcher.recorder("one-shot"), 0, true);
    signal.connect(watcher.recorder("steady"), 0, false);
    assert_eq!(signal.len(), 2);

    signal.emit(&()).unwrap();
    assert_eq!(signal.len(), 1);
    signal.emit(&()).unwrap();

    assert_eq!(watcher.check(), ["one-shot", "steady", "steady"]);
}

#[test]
fn test_dead_object_pruned_on_emit() {
    common::init_tracing();
    let watcher = Watcher::new();
    let signal = Signal::new();
    let counter = Arc::new(Counter { name: "counter", watcher: watcher.clone() });

    assert!(signal.connect(BoundMethod::receiver(&counter), 0, false));
    assert!(signal.has_receiver(BoundMethod::receiver(&counter)));
    signal.emit(&()).unwrap();
    assert_eq!(watcher.check(), ["counter"]);

    drop(counter);
    // pruning is lazy
    assert!(signal.connected());
    assert_eq!(signal.len(), 1);

    signal.emit(&()).unwrap();
    assert!(watcher.check().is_empty());
    assert_eq!(signal.len(), 0);
}

#[test]
fn test_dead_method_object_pruned_on_emit() {
    let signal = Signal::<&'static str>::new();
    let door = Arc::new(Door { events: Mutex::new(Vec::new()) });
    let weak = Arc::downgrade(&door);

    assert!(signal.connect(BoundMethod::new(&door, "close").unwrap(), 0, false));
    signal.emit(&"bob").unwrap();
    assert_eq!(*door.events.lock().unwrap(), ["bob close"]);

    drop(door);
    assert!(weak.upgrade().is_none());
    assert_eq!(signal.len(), 1);

    signal.emit(&"bob").unwrap();
    assert_eq!(signal.len(), 0);
}

static TALLY: AtomicUsize = AtomicUsize::new(0);

fn tally(_: &()) -> ReceiveResult {
    TALLY.fetch_add(1, Ordering::SeqCst);
    Ok(())
}

#[test]
fn test_same_function_connects_once() {
    let signal = Signal::<()>::new();
    let handler: ReceiverFn<()> = tally;

    assert!(signal.connect(handler, 0, false));
    assert!(!signal.connect(handler, 5, true));
    assert!(!signal.connect(ReceiverRef::<()>::Function(tally), 0, false));
    assert_eq!(signal.len(), 1);
    assert!(signal.has_receiver(handler));

    signal.emit(&()).unwrap();
    assert_eq!(TALLY.load(Ordering::SeqCst), 1);

    assert!(signal.disconnect(handler));
    assert!(!signal.has_receiver(handler));
    assert!(!signal.disconnect(handler));
}

#[test]
fn test_dyn_object_receiver() {
    let watcher = Watcher::new();
    let signal = Signal::<()>::new();
    let counter: Arc<dyn Receiver<()>> = Arc::new(Counter { name: "erased", watcher: watcher.clone() });

    assert!(signal.connect(BoundMethod::dyn_receiver(&counter), 0, false));
    assert!(!signal.connect(BoundMethod::dyn_receiver(&counter), 0, false));
    signal.emit(&()).unwrap();
    assert_eq!(watcher.check(), ["erased"]);

    drop(counter);
    signal.emit(&()).unwrap();
    assert!(!signal.connected());
}

#[test]
fn test_weak_callback_pruned_after_last_handle() {
    let watcher = Watcher::new();
    let signal = Signal::<()>::new();
    let callback = watcher.recorder("weak");

    assert!(signal.connect(callback.downgrade(), 0, false));
    signal.emit(&()).unwrap();
    assert_eq!(watcher.check(), ["weak"]);

    drop(callback);
    assert_eq!(signal.len(), 1);
    signal.emit(&()).unwrap();
    assert!(watcher.check().is_empty());
    assert!(!signal.connected());
}

#[test]
fn test_dead_receiver_not_connected() {
    let watcher = Watcher::new();
    let signal = Signal::<()>::new();
    let counter = Arc::new(Counter { name: "gone", watcher });
    let bound = BoundMethod::receiver(&counter);
    drop(counter);

    assert!(!signal.connect(&bound, 0, false));
    assert!(!signal.connected());
}

#[test]
fn test_disconnect_all() {
    let watcher = Watcher::new();
    let signal = Signal::<()>::new();
    assert!(!signal.disconnect_all());

    signal.connect(watcher.recorder("a"), 0, false);
    signal.connect(watcher.recorder("b"), 1, true);
    assert!(signal.disconnect_all());
    assert!(!signal.connected());

    signal.emit(&()).unwrap();
    assert!(watcher.check().is_empty());
}

#[test]
fn test_signal_does_not_keep_objects_alive() {
    let watcher = Watcher::new();
    let signal = Signal::<()>::new();
    let counter = Arc::new(Counter { name: "counter", watcher });
    let weak = Arc::downgrade(&counter);

    signal.connect(BoundMethod::receiver(&counter), 0, false);
    drop(counter);
    assert!(weak.upgrade().is_none());
}
