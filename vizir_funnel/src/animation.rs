// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value tweens for reveal/hide animations.
//!
//! The engine does not own a clock. An external ticker (frame loop, timer) calls
//! [`Timeline::advance`] with the current time in milliseconds; the timeline interpolates
//! working values and reports animation groups that finished.
//!
//! A group collects the tweens started by one `show`/`hide` call and is identified by an
//! [`AnimationHandle`]. Starting a tween for an item replaces the tween already running for it.
//! A group completes when its last tween reaches its target; a group whose last tween was
//! cancelled or replaced is reported as cancelled instead.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;
use crate::item::{DataItem, ItemKey};

/// Easing function signature: maps `t` in `[0, 1]` to output in `[0, 1]`.
pub type EasingFn = fn(f64) -> f64;

/// Identity easing (constant velocity).
pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-out (slow end).
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Identifier of an animation group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(pub u64);

/// Handle returned by `show`/`hide`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationHandle {
    /// Group id.
    pub id: AnimationId,
    /// Time the group was started, in milliseconds.
    pub start: f64,
    /// Total duration including the largest delay, in milliseconds.
    pub duration: f64,
}

impl AnimationHandle {
    /// Time at which the group is expected to end.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// What happens to an item when its tween reaches the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TweenEnd {
    /// The item stays visible.
    Shown,
    /// The item becomes invisible and stops hiding.
    Hidden,
}

#[derive(Clone, Copy, Debug)]
struct Tween {
    key: ItemKey,
    group: AnimationId,
    from: f64,
    to: f64,
    start: f64,
    duration: f64,
    easing: EasingFn,
    end: TweenEnd,
}

impl Tween {
    fn value_at(&self, now: f64) -> (f64, bool) {
        if now < self.start {
            return (self.from, false);
        }
        if self.duration <= 0.0 {
            return (self.to, true);
        }
        let t = (now - self.start) / self.duration;
        if t >= 1.0 {
            return (self.to, true);
        }
        (self.from + (self.to - self.from) * (self.easing)(t), false)
    }
}

/// Applies the final state of a tween to `item`.
pub(crate) fn finish_item(item: &mut DataItem, to: f64, end: TweenEnd) {
    item.working_value = to;
    match end {
        TweenEnd::Shown => {
            item.visible = true;
            item.is_hiding = false;
        }
        TweenEnd::Hidden => {
            item.visible = false;
            item.is_hiding = false;
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Group {
    pending: usize,
    cancelled: bool,
    handle: AnimationHandle,
}

impl Group {
    /// Drops one pending tween that will not reach its target.
    fn stop_one(&mut self) {
        self.pending = self.pending.saturating_sub(1);
        if self.pending == 0 {
            self.cancelled = true;
        }
    }
}

/// Result of [`Timeline::advance`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Advance {
    /// Whether any working value or visibility changed.
    pub changed: bool,
    /// Groups that completed during this step, in id order.
    pub completed: Vec<AnimationHandle>,
    /// Groups whose remaining tweens were all cancelled, in id order.
    pub cancelled: Vec<AnimationHandle>,
}

/// Scheduled tweens and their groups.
#[derive(Clone, Debug, Default)]
pub struct Timeline {
    now: f64,
    next_id: u64,
    tweens: Vec<Tween>,
    groups: HashMap<AnimationId, Group>,
}

impl Timeline {
    /// Creates an empty timeline at time `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in milliseconds (the last time passed to [`Timeline::advance`]).
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Opens a new group starting at the current time.
    pub fn begin_group(&mut self) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        self.groups.insert(
            id,
            Group {
                pending: 0,
                cancelled: false,
                handle: AnimationHandle {
                    id,
                    start: self.now,
                    duration: 0.0,
                },
            },
        );
        id
    }

    /// Schedules `item`'s working value to move to `to`.
    ///
    /// Any tween already scheduled for the item is cancelled. A tween with no delay and no
    /// duration, or for a group that is not open, is applied immediately and is not stored.
    pub fn tween(
        &mut self,
        group: AnimationId,
        item: &mut DataItem,
        to: f64,
        delay: f64,
        duration: f64,
        easing: EasingFn,
        end: TweenEnd,
    ) {
        self.cancel(item.key);
        let group_open = self.groups.get(&group).is_some_and(|g| !g.cancelled);
        if !group_open || (delay <= 0.0 && duration <= 0.0) {
            finish_item(item, to, end);
            return;
        }
        if let Some(g) = self.groups.get_mut(&group) {
            g.pending += 1;
            g.handle.duration = g.handle.duration.max(delay.max(0.0) + duration.max(0.0));
        }
        match end {
            TweenEnd::Shown => {
                item.visible = true;
                item.is_hiding = false;
            }
            TweenEnd::Hidden => item.is_hiding = true,
        }
        self.tweens.push(Tween {
            key: item.key,
            group,
            from: item.working_value,
            to,
            start: self.now + delay.max(0.0),
            duration,
            easing,
            end,
        });
    }

    /// Closes a group and returns its handle.
    ///
    /// A group that received no stored tweens is complete at once and stops running.
    pub fn finish_group(&mut self, group: AnimationId) -> Option<AnimationHandle> {
        let g = *self.groups.get(&group)?;
        if g.pending == 0 && !g.cancelled {
            self.groups.remove(&group);
        }
        Some(g.handle)
    }

    /// Returns `true` if the group still has tweens in flight.
    pub fn is_running(&self, id: AnimationId) -> bool {
        self.groups
            .get(&id)
            .is_some_and(|g| g.pending > 0 && !g.cancelled)
    }

    /// Cancels the tween scheduled for `key`, leaving its working value where it is.
    pub fn cancel(&mut self, key: ItemKey) {
        let groups = &mut self.groups;
        self.tweens.retain(|t| {
            if t.key != key {
                return true;
            }
            if let Some(g) = groups.get_mut(&t.group) {
                g.stop_one();
            }
            false
        });
    }

    /// Returns `true` if a tween is scheduled for `key`.
    pub fn is_animating(&self, key: ItemKey) -> bool {
        self.tweens.iter().any(|t| t.key == key)
    }

    /// Returns `true` if nothing is scheduled.
    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty() && self.groups.is_empty()
    }

    /// Moves the clock to `now` and updates the working values of `items`.
    pub fn advance(&mut self, now: f64, items: &mut [DataItem]) -> Advance {
        self.now = self.now.max(now);
        let now = self.now;
        let mut changed = false;

        let groups = &mut self.groups;
        self.tweens.retain(|tween| {
            let (value, done) = tween.value_at(now);
            let Some(item) = items.iter_mut().find(|item| item.key == tween.key) else {
                if let Some(g) = groups.get_mut(&tween.group) {
                    g.stop_one();
                }
                return false;
            };
            if done {
                finish_item(item, value, tween.end);
                if let Some(g) = groups.get_mut(&tween.group) {
                    g.pending = g.pending.saturating_sub(1);
                }
                changed = true;
                return false;
            }
            if item.working_value != value {
                item.working_value = value;
                changed = true;
            }
            true
        });

        let mut completed = Vec::new();
        let mut cancelled = Vec::new();
        for g in self.groups.values().filter(|g| g.pending == 0) {
            if g.cancelled {
                cancelled.push(g.handle);
            } else {
                completed.push(g.handle);
            }
        }
        completed.sort_by_key(|h| h.id);
        cancelled.sort_by_key(|h| h.id);
        for handle in completed.iter().chain(&cancelled) {
            self.groups.remove(&handle.id);
        }

        Advance {
            changed,
            completed,
            cancelled,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn easing_functions_hit_endpoints() {
        for f in [linear as EasingFn, ease_out_cubic] {
            assert_eq!(f(0.0), 0.0);
            assert_eq!(f(1.0), 1.0);
            assert_eq!(f(2.0), 1.0, "clamped");
        }
        assert!(ease_out_cubic(0.5) > 0.5, "ease-out runs ahead of linear");
    }

    #[test]
    fn tween_interpolates_after_delay() {
        let mut items = vec![DataItem::new(ItemKey(1), "a", 100.0)];
        items[0].working_value = 0.0;
        let mut timeline = Timeline::new();
        let g = timeline.begin_group();
        timeline.tween(g, &mut items[0], 100.0, 50.0, 100.0, linear, TweenEnd::Shown);
        let handle = timeline.finish_group(g).unwrap();
        assert_eq!(handle.duration, 150.0);

        let step = timeline.advance(25.0, &mut items);
        assert!(!step.changed, "still inside the delay");
        assert_eq!(items[0].working_value, 0.0);

        timeline.advance(100.0, &mut items);
        assert!((items[0].working_value - 50.0).abs() < 1e-9, "halfway");
        assert!(timeline.is_running(g));

        let step = timeline.advance(150.0, &mut items);
        assert_eq!(items[0].working_value, 100.0);
        assert_eq!(step.completed, vec![handle]);
        assert!(timeline.is_idle());
    }

    #[test]
    fn hide_tween_marks_item_until_done() {
        let mut items = vec![DataItem::new(ItemKey(1), "a", 10.0)];
        let mut timeline = Timeline::new();
        let g = timeline.begin_group();
        timeline.tween(g, &mut items[0], 0.0, 0.0, 10.0, linear, TweenEnd::Hidden);
        assert!(items[0].is_hiding);
        assert!(items[0].visible);
        timeline.advance(10.0, &mut items);
        assert!(!items[0].is_hiding);
        assert!(!items[0].visible);
        assert_eq!(items[0].working_value, 0.0);
    }

    #[test]
    fn instant_tweens_apply_immediately() {
        let mut items = vec![DataItem::new(ItemKey(1), "a", 10.0)];
        let mut timeline = Timeline::new();
        let g = timeline.begin_group();
        timeline.tween(g, &mut items[0], 0.0, 0.0, 0.0, linear, TweenEnd::Hidden);
        assert!(!items[0].visible);
        assert_eq!(timeline.finish_group(g).unwrap().duration, 0.0);
        assert!(!timeline.is_running(g), "empty group completes when closed");
        assert!(timeline.is_idle());
        let step = timeline.advance(0.0, &mut items);
        assert!(step.completed.is_empty());
    }

    #[test]
    fn tween_for_unknown_group_applies_immediately() {
        let mut items = vec![DataItem::new(ItemKey(1), "a", 10.0)];
        let mut timeline = Timeline::new();
        timeline.tween(
            AnimationId(42),
            &mut items[0],
            0.0,
            0.0,
            100.0,
            linear,
            TweenEnd::Hidden,
        );
        assert!(!items[0].is_hiding, "no tween left to clear the flag");
        assert!(!items[0].visible);
        assert_eq!(items[0].working_value, 0.0);
        assert!(timeline.is_idle());
    }

    #[test]
    fn new_tween_replaces_running_one() {
        let mut items = vec![DataItem::new(ItemKey(1), "a", 10.0)];
        let mut timeline = Timeline::new();
        let g1 = timeline.begin_group();
        timeline.tween(g1, &mut items[0], 0.0, 0.0, 100.0, linear, TweenEnd::Hidden);
        timeline.advance(50.0, &mut items);
        assert!((items[0].working_value - 5.0).abs() < 1e-9, "halfway down");

        let g2 = timeline.begin_group();
        timeline.tween(g2, &mut items[0], 10.0, 0.0, 100.0, linear, TweenEnd::Shown);
        assert!(!timeline.is_running(g1), "replaced group stops");
        let step = timeline.advance(100.0, &mut items);
        assert!(step.completed.is_empty(), "replaced group does not complete");
        assert_eq!(step.cancelled.first().map(|h| h.id), Some(g1));
        assert!((items[0].working_value - 7.5).abs() < 1e-9, "retargeted from 5");
        timeline.advance(150.0, &mut items);
        assert_eq!(items[0].working_value, 10.0);
        assert!(items[0].visible);
    }

    #[test]
    fn cancel_keeps_current_value() {
        let mut items = vec![DataItem::new(ItemKey(1), "a", 10.0)];
        let mut timeline = Timeline::new();
        let g = timeline.begin_group();
        timeline.tween(g, &mut items[0], 0.0, 0.0, 100.0, linear, TweenEnd::Hidden);
        timeline.advance(50.0, &mut items);
        timeline.cancel(ItemKey(1));
        assert!(!timeline.is_animating(ItemKey(1)));
        let step = timeline.advance(100.0, &mut items);
        assert_eq!(step.cancelled.len(), 1);
        assert!(step.completed.is_empty());
        assert!((items[0].working_value - 5.0).abs() < 1e-9, "frozen at cancel time");
    }
}
