//! Per-entity stats with a veto and transform pipeline around every write.
//!
//! A [`StatStore`] holds one integer per [`StatKind`]. Writes go through
//! [`StatStore::set_value`]: when the caller allows vetoes, registered
//! will-change interceptors see the [`PendingChange`] first and may attach
//! [`Modifier`]s or veto the write outright. Only a committed change reaches
//! the did-change observers. Corrective writes (turn costs, status
//! bookkeeping) pass `allow_veto = false` and bypass the pipeline entirely.

mod modifiers;

pub use modifiers::{Modifier, ModifierStack};

use strum::{Display, EnumCount, EnumIter};

// =============================================================================
// Stat kinds
// =============================================================================

/// Every stat an entity carries. Indexes into the store's value table.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    /// Level.
    Lvl,
    /// Accumulated experience.
    Exp,
    /// Current hit points.
    Hp,
    /// Maximum hit points.
    MaxHp,
    /// Current mana.
    Mp,
    /// Maximum mana.
    MaxMp,
    /// Physical attack.
    Atk,
    /// Physical defense.
    Def,
    /// Magical attack.
    Mat,
    /// Magical defense.
    Mdf,
    /// Evasion, checked by physical hit rolls.
    Evd,
    /// Resistance, checked by magical hit rolls.
    Res,
    /// Speed, added to the turn counter every round.
    Spd,
    /// Movement range in tiles.
    Mov,
    /// Turn counter. Reaching the activation threshold grants a turn.
    Ctr,
}

/// Base stat line shared by unit blueprints and growth tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseStats {
    pub max_hp: i32,
    pub max_mp: i32,
    pub atk: i32,
    pub def: i32,
    pub mat: i32,
    pub mdf: i32,
    pub evd: i32,
    pub res: i32,
    pub spd: i32,
    pub mov: i32,
}

// =============================================================================
// Change pipeline
// =============================================================================

/// A committed stat change, reported to did-change observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatChange {
    pub kind: StatKind,
    pub old: i32,
    pub new: i32,
}

impl StatChange {
    pub fn delta(&self) -> i32 {
        self.new - self.old
    }
}

/// A proposed stat change, offered to will-change interceptors before commit.
#[derive(Debug)]
pub struct PendingChange {
    kind: StatKind,
    from: i32,
    proposed: i32,
    allowed: bool,
    stack: ModifierStack,
}

impl PendingChange {
    fn new(kind: StatKind, from: i32, proposed: i32) -> Self {
        Self {
            kind,
            from,
            proposed,
            allowed: true,
            stack: ModifierStack::default(),
        }
    }

    pub fn kind(&self) -> StatKind {
        self.kind
    }

    /// Value before the change was proposed.
    pub fn from(&self) -> i32 {
        self.from
    }

    /// Value the caller asked for, before any modifier runs.
    pub fn proposed(&self) -> i32 {
        self.proposed
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Attaches a transform to this change.
    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.stack.push(modifier);
    }

    /// Rejects the change outright. The write becomes a no-op.
    pub fn veto(&mut self) {
        self.allowed = false;
    }

    /// Runs the stack; `None` when vetoed or the result equals the old value.
    fn resolve(mut self) -> Option<i32> {
        if !self.allowed {
            return None;
        }
        let value = self.stack.resolve(self.from, self.proposed);
        (value != self.from).then_some(value)
    }
}

/// Handle for removing a registered interceptor or observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookId(u32);

type InterceptorFn = Box<dyn FnMut(&StatValues, &mut PendingChange) + Send>;
type ObserverFn = Box<dyn FnMut(&StatChange) + Send>;

/// Read-only view of the value table, handed to interceptors so their
/// modifiers can reference sibling stats (a hit point clamp reads the
/// current maximum, for example).
#[derive(Debug, Clone, Copy, Default)]
pub struct StatValues([i32; StatKind::COUNT]);

impl StatValues {
    pub fn get(&self, kind: StatKind) -> i32 {
        self.0[kind as usize]
    }

    fn set(&mut self, kind: StatKind, value: i32) {
        self.0[kind as usize] = value;
    }
}

// =============================================================================
// Store
// =============================================================================

/// Stat table plus the hooks subscribed to it.
///
/// Hook lifetimes are explicit: registration returns a [`HookId`] and the
/// owner must remove the hook when whatever attached it goes away.
#[derive(Default)]
pub struct StatStore {
    values: StatValues,
    interceptors: Vec<(StatKind, HookId, InterceptorFn)>,
    observers: Vec<(StatKind, HookId, ObserverFn)>,
    next_hook: u32,
}

impl StatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store seeded from a base line at a given level. Current pools start
    /// full and the turn counter starts at zero.
    pub fn from_base(base: &BaseStats, level: i32) -> Self {
        let mut store = Self::new();
        store.values.set(StatKind::Lvl, level);
        store.values.set(StatKind::Exp, 0);
        store.values.set(StatKind::Hp, base.max_hp);
        store.values.set(StatKind::MaxHp, base.max_hp);
        store.values.set(StatKind::Mp, base.max_mp);
        store.values.set(StatKind::MaxMp, base.max_mp);
        store.values.set(StatKind::Atk, base.atk);
        store.values.set(StatKind::Def, base.def);
        store.values.set(StatKind::Mat, base.mat);
        store.values.set(StatKind::Mdf, base.mdf);
        store.values.set(StatKind::Evd, base.evd);
        store.values.set(StatKind::Res, base.res);
        store.values.set(StatKind::Spd, base.spd);
        store.values.set(StatKind::Mov, base.mov);
        store.values.set(StatKind::Ctr, 0);
        store
    }

    pub fn value(&self, kind: StatKind) -> i32 {
        self.values.get(kind)
    }

    pub fn values(&self) -> &StatValues {
        &self.values
    }

    /// Writes a stat.
    ///
    /// With `allow_veto` set, will-change interceptors for `kind` run first
    /// and may transform or reject the value; a rejected or unchanged write
    /// commits nothing. Without it the pipeline is bypassed and the raw value
    /// lands directly. Returns the committed change, if any. Did-change
    /// observers fire only on commit.
    pub fn set_value(&mut self, kind: StatKind, value: i32, allow_veto: bool) -> Option<StatChange> {
        let old = self.values.get(kind);
        if old == value {
            return None;
        }

        let new = if allow_veto {
            let mut pending = PendingChange::new(kind, old, value);
            let values = &self.values;
            for (hook_kind, _, interceptor) in &mut self.interceptors {
                if *hook_kind == kind {
                    interceptor(values, &mut pending);
                }
            }
            pending.resolve()?
        } else {
            value
        };

        self.values.set(kind, new);
        let change = StatChange { kind, old, new };
        for (hook_kind, _, observer) in &mut self.observers {
            if *hook_kind == kind {
                observer(&change);
            }
        }
        Some(change)
    }

    /// Subscribes a will-change interceptor for one stat.
    pub fn intercept(
        &mut self,
        kind: StatKind,
        hook: impl FnMut(&StatValues, &mut PendingChange) + Send + 'static,
    ) -> HookId {
        let id = self.allocate_hook();
        self.interceptors.push((kind, id, Box::new(hook)));
        id
    }

    /// Subscribes a did-change observer for one stat.
    pub fn observe(
        &mut self,
        kind: StatKind,
        hook: impl FnMut(&StatChange) + Send + 'static,
    ) -> HookId {
        let id = self.allocate_hook();
        self.observers.push((kind, id, Box::new(hook)));
        id
    }

    pub fn remove_interceptor(&mut self, id: HookId) {
        self.interceptors.retain(|(_, hook, _)| *hook != id);
    }

    pub fn remove_observer(&mut self, id: HookId) {
        self.observers.retain(|(_, hook, _)| *hook != id);
    }

    fn allocate_hook(&mut self) -> HookId {
        let id = HookId(self.next_hook);
        self.next_hook += 1;
        id
    }
}

impl std::fmt::Debug for StatStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatStore")
            .field("values", &self.values)
            .field("interceptors", &self.interceptors.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn plain_write_commits_and_notifies() {
        let mut store = StatStore::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let spy = Arc::clone(&seen);
        store.observe(StatKind::Hp, move |change| {
            assert_eq!(change.old, 0);
            assert_eq!(change.new, 25);
            spy.fetch_add(1, Ordering::SeqCst);
        });

        let change = store.set_value(StatKind::Hp, 25, true);
        assert_eq!(
            change,
            Some(StatChange {
                kind: StatKind::Hp,
                old: 0,
                new: 25
            })
        );
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn equal_value_write_is_a_no_op() {
        let mut store = StatStore::new();
        let seen = Arc::new(AtomicUsize::new(0));
        let spy = Arc::clone(&seen);
        store.observe(StatKind::Mov, move |_| {
            spy.fetch_add(1, Ordering::SeqCst);
        });

        assert!(store.set_value(StatKind::Mov, 0, true).is_none());
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn interceptor_caps_the_committed_value() {
        let mut store = StatStore::new();
        store.intercept(StatKind::Mov, |_, change| {
            change.add_modifier(Modifier::max(1, 1));
        });

        let change = store.set_value(StatKind::Mov, 5, true);
        assert_eq!(change.map(|c| c.new), Some(1));
        assert_eq!(store.value(StatKind::Mov), 1);
    }

    #[test]
    fn observers_never_see_the_unmodified_proposal() {
        let mut store = StatStore::new();
        store.intercept(StatKind::Mov, |_, change| {
            change.add_modifier(Modifier::max(1, 1));
        });
        let seen = Arc::new(AtomicUsize::new(0));
        let spy = Arc::clone(&seen);
        store.observe(StatKind::Mov, move |change| {
            assert_ne!(change.new, 5);
            spy.fetch_add(1, Ordering::SeqCst);
        });

        store.set_value(StatKind::Mov, 5, true);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn veto_free_write_bypasses_interceptors() {
        let mut store = StatStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let spy = Arc::clone(&calls);
        store.intercept(StatKind::Ctr, move |_, change| {
            spy.fetch_add(1, Ordering::SeqCst);
            change.add_modifier(Modifier::max(0, 0));
        });

        let change = store.set_value(StatKind::Ctr, -300, false);
        assert_eq!(change.map(|c| c.new), Some(-300));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn vetoed_change_commits_nothing() {
        let mut store = StatStore::new();
        store.set_value(StatKind::Ctr, 400, false);
        store.intercept(StatKind::Ctr, |_, change| change.veto());

        assert!(store.set_value(StatKind::Ctr, 900, true).is_none());
        assert_eq!(store.value(StatKind::Ctr), 400);
    }

    #[test]
    fn modified_back_to_old_value_aborts_the_commit() {
        let mut store = StatStore::new();
        store.set_value(StatKind::Mov, 1, false);
        store.intercept(StatKind::Mov, |_, change| {
            change.add_modifier(Modifier::max(1, 1));
        });
        let seen = Arc::new(AtomicUsize::new(0));
        let spy = Arc::clone(&seen);
        store.observe(StatKind::Mov, move |_| {
            spy.fetch_add(1, Ordering::SeqCst);
        });

        // 5 caps to 1, which is already the stored value.
        assert!(store.set_value(StatKind::Mov, 5, true).is_none());
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn removed_interceptor_no_longer_runs() {
        let mut store = StatStore::new();
        let hook = store.intercept(StatKind::Mov, |_, change| {
            change.add_modifier(Modifier::max(1, 1));
        });
        store.remove_interceptor(hook);

        let change = store.set_value(StatKind::Mov, 5, true);
        assert_eq!(change.map(|c| c.new), Some(5));
    }

    #[test]
    fn interceptors_read_sibling_stats() {
        let mut store = StatStore::new();
        store.set_value(StatKind::MaxHp, 30, false);
        store.intercept(StatKind::Hp, |values, change| {
            change.add_modifier(Modifier::clamp(i32::MAX, 0, values.get(StatKind::MaxHp)));
        });

        let change = store.set_value(StatKind::Hp, 99, true);
        assert_eq!(change.map(|c| c.new), Some(30));
    }
}
