use signal_dispatch::Callback;
use std::sync::{Arc, Mutex};

#[allow(unused)]
pub fn init_tracing() { let _ = tracing_subscriber::fmt().with_test_writer().try_init(); }

/// Records which receivers fired, in order
#[derive(Clone, Default)]
pub struct Watcher(Arc<Mutex<Vec<String>>>);

#[allow(unused)]
impl Watcher {
    pub fn new() -> Self { Self::default() }

    pub fn push(&self, name: impl Into<String>) { self.0.lock().unwrap().push(name.into()); }

    /// A callback which records `name` each time it fires
    pub fn recorder<A: 'static>(&self, name: &'static str) -> Callback<A> {
        let watcher = self.clone();
        Callback::new(move |_| {
            watcher.push(name);
            Ok(())
        })
    }

    /// A callback which records `name` and then fails
    pub fn failing<A: 'static>(&self, name: &'static str) -> Callback<A> {
        let watcher = self.clone();
        Callback::new(move |_| {
            watcher.push(name);
            Err(format!("{name} failed").into())
        })
    }

    /// Drain everything recorded so far
    pub fn check(&self) -> Vec<String> { self.0.lock().unwrap().drain(..).collect() }
}
