//! Transient transforms applied to one pending stat change.
//!
//! A [`Modifier`] lives only as long as the change it was attached to:
//! interceptors create them inside the will-change callback, the stack
//! resolves them, and they are dropped with the pending change. Nothing here
//! persists on the store.

/// A prioritized transform over a proposed stat value.
///
/// The transform receives `(original, running)` where `original` is the value
/// before the change was proposed and `running` is the output of the previous
/// modifier (or the proposed value for the first). It returns the next
/// running value and must be pure.
pub struct Modifier {
    priority: i32,
    apply: Box<dyn Fn(i32, i32) -> i32 + Send>,
}

impl Modifier {
    /// A modifier with a custom transform.
    pub fn new(priority: i32, apply: impl Fn(i32, i32) -> i32 + Send + 'static) -> Self {
        Self {
            priority,
            apply: Box::new(apply),
        }
    }

    /// Caps the running value at `max`.
    pub fn max(priority: i32, max: i32) -> Self {
        Self::new(priority, move |_, running| running.min(max))
    }

    /// Raises the running value to at least `min`.
    pub fn min(priority: i32, min: i32) -> Self {
        Self::new(priority, move |_, running| running.max(min))
    }

    /// Clamps the running value into `min..=max`.
    pub fn clamp(priority: i32, min: i32, max: i32) -> Self {
        Self::new(priority, move |_, running| running.clamp(min, max))
    }

    /// Adds a flat amount to the running value.
    pub fn add(priority: i32, amount: i32) -> Self {
        Self::new(priority, move |_, running| running + amount)
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub(crate) fn apply(&self, original: i32, running: i32) -> i32 {
        (self.apply)(original, running)
    }
}

impl std::fmt::Debug for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modifier")
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// The ordered set of modifiers attached to one pending change.
///
/// Resolution sorts by ascending priority; equal priorities keep insertion
/// order. Two clamps at different priorities can yield different results
/// depending on order, so the ordering contract is load-bearing.
#[derive(Debug, Default)]
pub struct ModifierStack {
    modifiers: Vec<Modifier>,
}

impl ModifierStack {
    pub fn push(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Folds the stack over the proposed value in priority order.
    pub fn resolve(&mut self, original: i32, proposed: i32) -> i32 {
        // Stable sort keeps insertion order for equal priorities.
        self.modifiers.sort_by_key(Modifier::priority);
        self.modifiers
            .iter()
            .fold(proposed, |running, m| m.apply(original, running))
    }
}
