use std::collections::BTreeMap;

use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{Duration, Instant};

use crate::domain::daemon::worker::routine::Event;
use crate::domain::daemon::worker::timer::{self, TimerGuard};
use crate::domain::entity::{AppSettings, ReminderInterval, ReminderKind, TimerStatus};

/// Extra delay added to the first fire of each further timer started by the
/// same configuration.
pub const STAGGER_STEP: Duration = Duration::from_secs(90);

/// Stand-in deadline for a wake-up that cannot be represented.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[enum_dispatch::enum_dispatch]
pub trait TimerPhase {
    fn status(&self) -> TimerStatus;

    /// Interval governing the timer, `None` when stopped.
    fn interval(&self) -> Option<ReminderInterval>;

    /// Time left before the next fire, as seen at `now`.
    fn remaining(&self, now: Instant) -> Option<Duration>;
}

/// Timer of one reminder kind. Being an enum, a timer can never be running
/// and paused at the same time.
#[derive(Debug)]
#[enum_dispatch::enum_dispatch(TimerPhase)]
pub enum TimerState {
    Stopped(StoppedTimer),
    Active(ActiveTimer),
    Paused(PausedTimer),
}

/// No countdown, nothing pending.
#[derive(Debug)]
pub struct StoppedTimer;

impl TimerPhase for StoppedTimer {
    fn status(&self) -> TimerStatus {
        TimerStatus::Stopped
    }

    fn interval(&self) -> Option<ReminderInterval> {
        None
    }

    fn remaining(&self, _now: Instant) -> Option<Duration> {
        None
    }
}

/// A live countdown with a pending wake-up. `epoch` identifies the wake-up
/// so that a fire which raced with a cancellation can be recognised.
#[derive(Debug)]
pub struct ActiveTimer {
    fire_at: Instant,
    interval: ReminderInterval,
    epoch: u64,
    _guard: TimerGuard,
}

impl TimerPhase for ActiveTimer {
    fn status(&self) -> TimerStatus {
        TimerStatus::Running
    }

    fn interval(&self) -> Option<ReminderInterval> {
        Some(self.interval)
    }

    fn remaining(&self, now: Instant) -> Option<Duration> {
        self.fire_at
            .checked_duration_since(now)
            .filter(|remaining| !remaining.is_zero())
    }
}

/// A suspended countdown. `remaining` is frozen at the moment of pausing.
#[derive(Debug)]
pub struct PausedTimer {
    interval: ReminderInterval,
    remaining: Duration,
}

impl TimerPhase for PausedTimer {
    fn status(&self) -> TimerStatus {
        TimerStatus::Paused
    }

    fn interval(&self) -> Option<ReminderInterval> {
        Some(self.interval)
    }

    fn remaining(&self, _now: Instant) -> Option<Duration> {
        Some(self.remaining)
    }
}

/// Outcome of comparing the timers with new settings. Both lists are in
/// catalog order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigurePlan {
    pub stop: Vec<ReminderKind>,
    pub start: Vec<(ReminderKind, ReminderInterval)>,
}

impl ConfigurePlan {
    /// Extra delay of the first fire of the `index`th started timer.
    pub fn stagger(index: usize) -> Duration {
        STAGGER_STEP.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

/// One timer per reminder kind, exclusively owned by the scheduler routine.
#[derive(Debug)]
pub struct TimerTable {
    timers: BTreeMap<ReminderKind, TimerState>,
    next_epoch: u64,
    events: UnboundedSender<Event>,
}

impl TimerTable {
    /// Creates a new [`TimerTable`] with every kind stopped. Wake-ups are
    /// reported through `events`.
    pub fn new(events: UnboundedSender<Event>) -> Self {
        Self {
            timers: ReminderKind::ALL
                .into_iter()
                .map(|kind| (kind, StoppedTimer.into()))
                .collect(),
            next_epoch: 0,
            events,
        }
    }

    pub fn status(&self, kind: ReminderKind) -> TimerStatus {
        self.timers
            .get(&kind)
            .map_or(TimerStatus::Stopped, TimerPhase::status)
    }

    pub fn interval(&self, kind: ReminderKind) -> Option<ReminderInterval> {
        self.timers.get(&kind).and_then(TimerPhase::interval)
    }

    pub fn remaining(&self, kind: ReminderKind, now: Instant) -> Option<Duration> {
        self.timers
            .get(&kind)
            .and_then(|timer| timer.remaining(now))
    }

    /// Absolute time of the next fire, only known while running.
    pub fn fire_at(&self, kind: ReminderKind) -> Option<Instant> {
        match self.timers.get(&kind) {
            Some(TimerState::Active(active)) => Some(active.fire_at),
            _ => None,
        }
    }

    pub fn is_paused(&self, kind: ReminderKind) -> bool {
        self.status(kind) == TimerStatus::Paused
    }

    pub fn is_all_paused(&self) -> bool {
        all_paused(self.timers.values().map(TimerPhase::status))
    }

    /// Decide which timers `settings` stops and which it (re)starts. A running
    /// timer whose interval did not change is left alone.
    pub fn plan(&self, settings: &AppSettings) -> ConfigurePlan {
        let mut plan = ConfigurePlan::default();

        for kind in ReminderKind::ALL {
            let wanted = settings.reminder(kind);

            if !wanted.enabled {
                plan.stop.push(kind);
                continue;
            }

            let unchanged = self.status(kind) == TimerStatus::Running
                && self.interval(kind) == Some(wanted.interval);

            if !unchanged {
                plan.start.push((kind, wanted.interval));
            }
        }

        plan
    }

    /// Carry out a [`ConfigurePlan`], staggering the first fire of the
    /// started timers.
    pub fn apply(&mut self, plan: &ConfigurePlan, now: Instant) {
        for &kind in &plan.stop {
            self.stop(kind);
        }

        for (index, &(kind, interval)) in plan.start.iter().enumerate() {
            let delay = interval
                .as_duration()
                .saturating_add(ConfigurePlan::stagger(index));
            self.start(kind, interval, deadline(now, delay));
        }
    }

    /// Replace whatever timer `kind` had with one firing at `deadline`.
    pub fn start(&mut self, kind: ReminderKind, interval: ReminderInterval, deadline: Instant) {
        let epoch = self.next_epoch;
        self.next_epoch = self.next_epoch.wrapping_add(1);

        let guard = timer::arm(kind, epoch, deadline, self.events.clone());
        let active = ActiveTimer {
            fire_at: deadline,
            interval,
            epoch,
            _guard: guard,
        };

        self.timers.insert(kind, active.into());
    }

    /// Return `kind` to stopped, cancelling its pending wake-up.
    pub fn stop(&mut self, kind: ReminderKind) {
        self.timers.insert(kind, StoppedTimer.into());
    }

    pub fn stop_all(&mut self) {
        for kind in ReminderKind::ALL {
            self.stop(kind);
        }
    }

    /// Freeze the countdown of a running timer. Returns `false` and changes
    /// nothing otherwise.
    pub fn pause(&mut self, kind: ReminderKind, now: Instant) -> bool {
        let paused = match self.timers.get(&kind) {
            Some(TimerState::Active(active)) => PausedTimer {
                interval: active.interval,
                remaining: active.fire_at.saturating_duration_since(now),
            },
            _ => return false,
        };

        self.timers.insert(kind, paused.into());
        true
    }

    /// Continue a paused countdown with the time that was left. Returns
    /// `false` and changes nothing unless the timer is paused.
    pub fn resume(&mut self, kind: ReminderKind, now: Instant) -> bool {
        let (interval, remaining) = match self.timers.get(&kind) {
            Some(TimerState::Paused(paused)) => (paused.interval, paused.remaining),
            _ => return false,
        };

        self.start(kind, interval, deadline(now, remaining));
        true
    }

    /// Restart a live countdown from a full interval, without stagger.
    /// Stopped timers are left alone.
    pub fn skip(&mut self, kind: ReminderKind, now: Instant) -> bool {
        let Some(interval) = self.interval(kind) else {
            return false;
        };

        self.start(kind, interval, deadline(now, interval.as_duration()));
        true
    }

    /// Handle a wake-up of `kind`. A current wake-up rearms the timer with the
    /// plain interval measured from `now` and returns `true`; a stale one is
    /// ignored.
    pub fn fire(&mut self, kind: ReminderKind, epoch: u64, now: Instant) -> bool {
        let interval = match self.timers.get(&kind) {
            Some(TimerState::Active(active)) if active.epoch == epoch => active.interval,
            _ => return false,
        };

        self.start(kind, interval, deadline(now, interval.as_duration()));
        true
    }
}

/// The instant `after` from `now`, pushed to a far future when the sum
/// overflows.
pub fn deadline(now: Instant, after: Duration) -> Instant {
    now.checked_add(after)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

/// Global pause flag: at least one timer is live and every live timer is
/// paused.
pub fn all_paused<I>(statuses: I) -> bool
where
    I: IntoIterator<Item = TimerStatus>,
{
    let mut live = statuses
        .into_iter()
        .filter(|status| status.is_live())
        .peekable();

    live.peek().is_some() && live.all(|status| status == TimerStatus::Paused)
}
