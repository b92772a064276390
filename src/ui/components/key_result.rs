/// Result of offering a key event to a component.
///
/// Components consume a key, turn it into an event for the parent, or pass
/// it on so the card's own bindings can see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, nothing for the parent to do
  Handled,
  /// Key was consumed and produced an event
  Event(T),
  /// Key was not consumed
  NotHandled,
}
