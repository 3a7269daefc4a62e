/// What a [`Signal`](crate::Signal) does when a receiver fails during `emit`.
///
/// This is fixed when the signal is constructed; it cannot be chosen per emission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorPolicy {
    /// Return the first failure from `emit` immediately. Receivers after it are not
    /// invoked, and nothing is pruned for that emission.
    #[default]
    Propagate,
    /// Log the failure and keep going with the next receiver.
    Swallow,
}

impl ErrorPolicy {
    pub fn propagates(&self) -> bool { matches!(self, ErrorPolicy::Propagate) }
}

impl From<bool> for ErrorPolicy {
    /// `true` propagates, `false` swallows
    fn from(propagate: bool) -> Self { if propagate { ErrorPolicy::Propagate } else { ErrorPolicy::Swallow } }
}
