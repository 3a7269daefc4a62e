use std::borrow::Cow;
use std::sync::{Arc, Weak};

use crate::error::{ReceiveResult, SignalError};

/// The method name objects connected through [`Receiver`] are bound under.
pub const RECEIVE: &str = "receive";

/// Anything that can be notified with the values a signal emits.
///
/// Objects implementing this are connected with [`BoundMethod::receiver`], which holds them
/// weakly: connecting never keeps an otherwise unreachable object alive.
pub trait Receiver<A>: Send + Sync {
    fn receive(&self, values: &A) -> ReceiveResult;
}

/// An object exposing several named methods, any of which can be bound on its own
/// with [`BoundMethod::new`].
pub trait Methods<A>: Send + Sync {
    /// Whether `invoke` can dispatch to `method`
    fn responds_to(&self, method: &str) -> bool;
    fn invoke(&self, method: &str, values: &A) -> ReceiveResult;
}

type Invocable<A> = dyn Fn(&A) -> ReceiveResult + Send + Sync + 'static;

/// A plain function receiver. Unlike a [`Callback`], its identity is the function itself,
/// so connecting the same function twice is refused.
pub type ReceiverFn<A> = fn(&A) -> ReceiveResult;

fn thin_addr<T: ?Sized>(ptr: *const T) -> usize { ptr as *const () as usize }

/// An owned invocable receiver.
///
/// Identity follows the allocation: clones of one `Callback` are the same receiver,
/// while two callbacks built from identical closures are not.
pub struct Callback<A>(Arc<Invocable<A>>);

impl<A> Clone for Callback<A> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<A> Callback<A> {
    pub fn new<F>(f: F) -> Self
    where F: Fn(&A) -> ReceiveResult + Send + Sync + 'static {
        Self(Arc::new(f))
    }

    /// Invoke the callback directly, outside of any signal
    pub fn call(&self, values: &A) -> ReceiveResult { (self.0)(values) }

    /// A non-owning handle to this callback. Connecting it lets the signal drop the
    /// subscription once every strong `Callback` handle is gone.
    pub fn downgrade(&self) -> WeakCallback<A> { WeakCallback { inner: Arc::downgrade(&self.0), addr: self.addr() } }

    pub fn ptr_eq(&self, other: &Self) -> bool { self.addr() == other.addr() }

    fn addr(&self) -> usize { thin_addr(Arc::as_ptr(&self.0)) }
}

/// A [`Callback`] held non-owningly
pub struct WeakCallback<A> {
    inner: Weak<Invocable<A>>,
    // the allocation stays reserved while this Weak exists, so the address can't be reused
    addr: usize,
}

impl<A> Clone for WeakCallback<A> {
    fn clone(&self) -> Self { Self { inner: self.inner.clone(), addr: self.addr } }
}

impl<A> WeakCallback<A> {
    pub fn upgrade(&self) -> Option<Callback<A>> { self.inner.upgrade().map(Callback) }

    pub fn is_alive(&self) -> bool { self.inner.strong_count() > 0 }
}

enum Target<A> {
    Receiver(Weak<dyn Receiver<A>>),
    Methods(Weak<dyn Methods<A>>),
}

impl<A> Clone for Target<A> {
    fn clone(&self) -> Self {
        match self {
            Target::Receiver(weak) => Target::Receiver(weak.clone()),
            Target::Methods(weak) => Target::Methods(weak.clone()),
        }
    }
}

/// An (object, method name) pair. The object is held weakly.
///
/// Two bound methods are the same receiver when they name the same method on the same
/// object, no matter how many times the pair was constructed.
pub struct BoundMethod<A> {
    target: Target<A>,
    method: Cow<'static, str>,
    addr: usize,
}

impl<A> Clone for BoundMethod<A> {
    fn clone(&self) -> Self { Self { target: self.target.clone(), method: self.method.clone(), addr: self.addr } }
}

impl<A> BoundMethod<A> {
    /// Bind the [`Receiver::receive`] method of `object`
    pub fn receiver<R>(object: &Arc<R>) -> Self
    where R: Receiver<A> + 'static {
        let weak = Arc::downgrade(object);
        Self::bind_receiver(weak, thin_addr(Arc::as_ptr(object)))
    }

    /// Like [`BoundMethod::receiver`], for an object only known as `dyn Receiver`.
    /// Binding the same object through either constructor gives the same receiver.
    pub fn dyn_receiver(object: &Arc<dyn Receiver<A>>) -> Self { Self::bind_receiver(Arc::downgrade(object), thin_addr(Arc::as_ptr(object))) }

    /// Bind a named method of `object`.
    ///
    /// Fails immediately with [`SignalError::UnknownMethod`] if the object does not respond
    /// to `method`, rather than deferring the failure to some later emission.
    pub fn new<O>(object: &Arc<O>, method: impl Into<Cow<'static, str>>) -> Result<Self, SignalError>
    where O: Methods<A> + 'static {
        let weak = Arc::downgrade(object);
        Self::bind_method(&**object, std::any::type_name::<O>(), weak, thin_addr(Arc::as_ptr(object)), method.into())
    }

    /// Like [`BoundMethod::new`], for an object only known as `dyn Methods`
    pub fn dyn_method(object: &Arc<dyn Methods<A>>, method: impl Into<Cow<'static, str>>) -> Result<Self, SignalError> {
        let type_name = std::any::type_name::<dyn Methods<A>>();
        Self::bind_method(&**object, type_name, Arc::downgrade(object), thin_addr(Arc::as_ptr(object)), method.into())
    }

    fn bind_receiver(weak: Weak<dyn Receiver<A>>, addr: usize) -> Self {
        Self { target: Target::Receiver(weak), method: Cow::Borrowed(RECEIVE), addr }
    }

    fn bind_method(
        object: &dyn Methods<A>,
        type_name: &'static str,
        weak: Weak<dyn Methods<A>>,
        addr: usize,
        method: Cow<'static, str>,
    ) -> Result<Self, SignalError> {
        if !object.responds_to(&method) {
            return Err(SignalError::UnknownMethod { type_name, method: method.into_owned() });
        }
        Ok(Self { target: Target::Methods(weak), method, addr })
    }

    pub fn method(&self) -> &str { &self.method }

    /// Whether the bound object still exists
    pub fn is_alive(&self) -> bool {
        match &self.target {
            Target::Receiver(weak) => weak.strong_count() > 0,
            Target::Methods(weak) => weak.strong_count() > 0,
        }
    }
}

/// The comparison key used to find duplicate and target receivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiverKey<'a> {
    /// Identity of an invocable, shared by a [`Callback`] and its [`WeakCallback`]s
    Invocable(usize),
    /// Object address plus method name
    Bound { object: usize, method: &'a str },
    /// Address of a plain function
    Function(usize),
}

/// Any receiver a signal can hold
pub enum ReceiverRef<A> {
    Callback(Callback<A>),
    WeakCallback(WeakCallback<A>),
    Bound(BoundMethod<A>),
    Function(ReceiverFn<A>),
}

impl<A> Clone for ReceiverRef<A> {
    fn clone(&self) -> Self {
        match self {
            ReceiverRef::Callback(callback) => ReceiverRef::Callback(callback.clone()),
            ReceiverRef::WeakCallback(weak) => ReceiverRef::WeakCallback(weak.clone()),
            ReceiverRef::Bound(bound) => ReceiverRef::Bound(bound.clone()),
            ReceiverRef::Function(f) => ReceiverRef::Function(*f),
        }
    }
}

impl<A> std::fmt::Debug for ReceiverRef<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiverRef::Callback(callback) => write!(f, "Callback({:#x})", callback.addr()),
            ReceiverRef::WeakCallback(weak) => write!(f, "WeakCallback({:#x}, alive: {})", weak.addr, weak.is_alive()),
            ReceiverRef::Bound(bound) => write!(f, "Bound({:#x}::{}, alive: {})", bound.addr, bound.method, bound.is_alive()),
            ReceiverRef::Function(function) => write!(f, "Function({:#x})", *function as usize),
        }
    }
}

impl<A> ReceiverRef<A> {
    pub fn key(&self) -> ReceiverKey<'_> {
        match self {
            ReceiverRef::Callback(callback) => ReceiverKey::Invocable(callback.addr()),
            ReceiverRef::WeakCallback(weak) => ReceiverKey::Invocable(weak.addr),
            ReceiverRef::Bound(bound) => ReceiverKey::Bound { object: bound.addr, method: &bound.method },
            ReceiverRef::Function(f) => ReceiverKey::Function(*f as usize),
        }
    }

    /// Plain callbacks and functions are always alive; weak references are alive while their target is
    pub fn is_alive(&self) -> bool {
        match self {
            ReceiverRef::Callback(_) | ReceiverRef::Function(_) => true,
            ReceiverRef::WeakCallback(weak) => weak.is_alive(),
            ReceiverRef::Bound(bound) => bound.is_alive(),
        }
    }

    /// Upgrade to something invocable, or `None` if the target has been dropped.
    /// The strong reference lives only as long as the returned value.
    pub(crate) fn resolve(&self) -> Option<Live<'_, A>> {
        match self {
            ReceiverRef::Callback(callback) => Some(Live::Invocable(callback.0.clone())),
            ReceiverRef::WeakCallback(weak) => weak.inner.upgrade().map(Live::Invocable),
            ReceiverRef::Bound(bound) => match &bound.target {
                Target::Receiver(weak) => weak.upgrade().map(Live::Receiver),
                Target::Methods(weak) => weak.upgrade().map(|object| Live::Method(object, &bound.method)),
            },
            ReceiverRef::Function(f) => Some(Live::Function(*f)),
        }
    }
}

/// A resolved receiver, ready to call
pub(crate) enum Live<'a, A> {
    Invocable(Arc<Invocable<A>>),
    Receiver(Arc<dyn Receiver<A>>),
    Method(Arc<dyn Methods<A>>, &'a str),
    Function(ReceiverFn<A>),
}

impl<A> Live<'_, A> {
    pub(crate) fn call(&self, values: &A) -> ReceiveResult {
        match self {
            Live::Invocable(f) => f(values),
            Live::Receiver(receiver) => receiver.receive(values),
            Live::Method(object, method) => object.invoke(method, values),
            Live::Function(f) => f(values),
        }
    }
}

/// Trait for types that can be converted into a [`ReceiverRef`]
pub trait IntoReceiver<A> {
    fn into_receiver(self) -> ReceiverRef<A>;
}

// Closures are not accepted bare: each conversion would mint a new identity, so they go
// through `Callback::new` and the handle is kept for disconnecting
impl<A> IntoReceiver<A> for ReceiverFn<A> {
    fn into_receiver(self) -> ReceiverRef<A> { ReceiverRef::Function(self) }
}

impl<A> IntoReceiver<A> for Callback<A> {
    fn into_receiver(self) -> ReceiverRef<A> { ReceiverRef::Callback(self) }
}

impl<A> IntoReceiver<A> for &Callback<A> {
    fn into_receiver(self) -> ReceiverRef<A> { ReceiverRef::Callback(self.clone()) }
}

impl<A> IntoReceiver<A> for WeakCallback<A> {
    fn into_receiver(self) -> ReceiverRef<A> { ReceiverRef::WeakCallback(self) }
}

impl<A> IntoReceiver<A> for &WeakCallback<A> {
    fn into_receiver(self) -> ReceiverRef<A> { ReceiverRef::WeakCallback(self.clone()) }
}

impl<A> IntoReceiver<A> for BoundMethod<A> {
    fn into_receiver(self) -> ReceiverRef<A> { ReceiverRef::Bound(self) }
}

impl<A> IntoReceiver<A> for &BoundMethod<A> {
    fn into_receiver(self) -> ReceiverRef<A> { ReceiverRef::Bound(self.clone()) }
}

impl<A> IntoReceiver<A> for ReceiverRef<A> {
    fn into_receiver(self) -> ReceiverRef<A> { self }
}

impl<A> IntoReceiver<A> for &ReceiverRef<A> {
    fn into_receiver(self) -> ReceiverRef<A> { self.clone() }
}

/// Inputs with a stable identity, which can find a receiver that is already connected.
///
/// Only handles that compare equal across calls implement this, so lookups never build
/// a receiver that could not possibly match.
pub trait ReceiverIdentity<A> {
    fn receiver_key(&self) -> ReceiverKey<'_>;
}

impl<A, T: ReceiverIdentity<A> + ?Sized> ReceiverIdentity<A> for &T {
    fn receiver_key(&self) -> ReceiverKey<'_> { (**self).receiver_key() }
}

impl<A> ReceiverIdentity<A> for Callback<A> {
    fn receiver_key(&self) -> ReceiverKey<'_> { ReceiverKey::Invocable(self.addr()) }
}

impl<A> ReceiverIdentity<A> for WeakCallback<A> {
    fn receiver_key(&self) -> ReceiverKey<'_> { ReceiverKey::Invocable(self.addr) }
}

impl<A> ReceiverIdentity<A> for BoundMethod<A> {
    fn receiver_key(&self) -> ReceiverKey<'_> { ReceiverKey::Bound { object: self.addr, method: &self.method } }
}

impl<A> ReceiverIdentity<A> for ReceiverFn<A> {
    fn receiver_key(&self) -> ReceiverKey<'_> { ReceiverKey::Function(*self as usize) }
}

impl<A> ReceiverIdentity<A> for ReceiverRef<A> {
    fn receiver_key(&self) -> ReceiverKey<'_> { self.key() }
}
