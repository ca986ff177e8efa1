//! Async host for a single [`TimerEngine`].
//!
//! The session owns the engine, its [`TickSubscription`], the display
//! observer and the alert. Commands arrive over an `mpsc` channel and are
//! applied one at a time inside a `select!` loop, so the engine never sees
//! interleaved mutations and needs no lock.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::engine::TimerEngine;
use super::messages::MessagePicker;
use super::mode::{Category, Preset};
use super::subscription::{Pulse, TickSubscription, ROTATE_PERIOD, TICK_PERIOD};
use super::traits::{AlertTone, ExpiryAlert, TimerObserver};
use crate::error::ValidationError;
use crate::events::Event;

/// Commands a host can send to a running session.
#[derive(Debug)]
pub enum SessionCommand {
    Start,
    Pause,
    Reset,
    SetMode(Preset),
    SetCategory(Category),
    SetCustomDuration { minutes: u32, seconds: u32 },
    /// Reply with a `StateSnapshot` event.
    Status(oneshot::Sender<Event>),
    Shutdown,
}

/// Tunables derived from configuration.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub tick_period: Duration,
    pub rotate_period: Duration,
    pub tone: AlertTone,
    pub alert_enabled: bool,
    pub message_seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_period: TICK_PERIOD,
            rotate_period: ROTATE_PERIOD,
            tone: AlertTone::default(),
            alert_enabled: true,
            message_seed: None,
        }
    }
}

pub struct TimerSession<O, A> {
    engine: TimerEngine,
    subscription: Option<TickSubscription>,
    observer: O,
    alert: A,
    picker: MessagePicker,
    settings: SessionSettings,
}

impl<O: TimerObserver, A: ExpiryAlert> TimerSession<O, A> {
    pub fn new(engine: TimerEngine, observer: O, alert: A, settings: SessionSettings) -> Self {
        Self {
            engine,
            subscription: None,
            observer,
            alert,
            picker: MessagePicker::from_seed(settings.message_seed),
            settings,
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn alert(&self) -> &A {
        &self.alert
    }

    /// Whether periodic sources are currently scheduled.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Push the current state to the observer, e.g. right after creation.
    pub fn refresh(&mut self) {
        self.observer.on_display(&self.engine.frame());
    }

    /// Apply one command to completion.
    ///
    /// Synchronous and runtime-free: a start only records a subscription,
    /// whose timers are armed once [`run`](Self::run) polls it.
    pub fn handle(&mut self, command: SessionCommand) {
        debug!(?command, "session command");
        let events = match command {
            SessionCommand::Start => self.engine.start(),
            SessionCommand::Pause => self.engine.pause(),
            SessionCommand::Reset => self.engine.reset(),
            SessionCommand::SetMode(preset) => self.engine.set_mode(preset),
            SessionCommand::SetCategory(category) => self.engine.set_category(category),
            SessionCommand::SetCustomDuration { minutes, seconds } => {
                match self.engine.set_custom_duration(minutes, seconds) {
                    Ok(events) => events,
                    Err(err) => {
                        self.reject(&err);
                        return;
                    }
                }
            }
            SessionCommand::Status(reply) => {
                if reply.send(self.engine.snapshot()).is_err() {
                    debug!("status requester went away");
                }
                return;
            }
            // The run loop stops on Shutdown; handled here it only pauses.
            SessionCommand::Shutdown => self.engine.pause(),
        };
        self.dispatch(events);
    }

    /// Apply one pulse from the subscription.
    pub fn on_pulse(&mut self, pulse: Pulse) {
        match pulse {
            Pulse::Tick => {
                let events = self.engine.tick();
                self.dispatch(events);
            }
            Pulse::Rotate => self.rotate_message(),
        }
    }

    /// Drive the session until `commands` closes or `Shutdown` arrives.
    /// Returns the session so the host can inspect its final state.
    pub async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>) -> Self {
        self.refresh();
        loop {
            tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                pulse = next_pulse(&mut self.subscription) => self.on_pulse(pulse),
            }
        }
        self.subscription = None;
        info!("timer session stopped");
        self
    }

    fn dispatch(&mut self, events: Vec<Event>) {
        for event in events {
            match event {
                Event::DisplayUpdated { frame } => self.observer.on_display(&frame),
                Event::ModeChanged { mode, .. } => self.observer.on_mode_changed(mode),
                Event::CategoryChanged { category, .. } => {
                    self.observer.on_category_changed(category);
                    self.rotate_message();
                }
                Event::CustomDurationApplied { label, .. } => self.observer.on_custom_label(&label),
                Event::TimerReset { .. } => self.observer.on_reset(),
                Event::TimerExpired { .. } => {
                    if self.settings.alert_enabled {
                        self.alert.play(&self.settings.tone);
                    }
                }
                Event::TimerStarted { .. } | Event::TimerPaused { .. } | Event::StateSnapshot { .. } => {}
            }
        }
        self.sync_subscription();
    }

    // Subscriptions follow the engine's run state: created on the first
    // dispatch after a start, dropped on the first dispatch after a stop.
    fn sync_subscription(&mut self) {
        match (self.engine.is_running(), self.subscription.is_some()) {
            (true, false) => {
                self.subscription = Some(TickSubscription::new(
                    self.settings.tick_period,
                    self.settings.rotate_period,
                ));
                self.rotate_message();
            }
            (false, true) => self.subscription = None,
            _ => {}
        }
    }

    fn rotate_message(&mut self) {
        let category = self.engine.category();
        let message = self.picker.select(category);
        self.observer.on_message(category, message);
    }

    fn reject(&mut self, err: &ValidationError) {
        warn!("custom duration rejected: {err}");
        self.observer.on_validation_error(err);
    }
}

async fn next_pulse(subscription: &mut Option<TickSubscription>) -> Pulse {
    match subscription {
        Some(subscription) => subscription.next().await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::display::DisplayFrame;
    use crate::timer::messages::{REST_MESSAGES, WORK_MESSAGES};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        frames: Arc<Mutex<Vec<DisplayFrame>>>,
        messages: Arc<Mutex<Vec<(Category, String)>>>,
        errors: Arc<Mutex<Vec<String>>>,
        labels: Arc<Mutex<Vec<String>>>,
    }

    impl TimerObserver for Recorder {
        fn on_display(&mut self, frame: &DisplayFrame) {
            self.frames.lock().unwrap().push(frame.clone());
        }

        fn on_message(&mut self, category: Category, message: &str) {
            self.messages
                .lock()
                .unwrap()
                .push((category, message.to_string()));
        }

        fn on_custom_label(&mut self, label: &str) {
            self.labels.lock().unwrap().push(label.to_string());
        }

        fn on_validation_error(&mut self, err: &ValidationError) {
            self.errors.lock().unwrap().push(err.to_string());
        }
    }

    #[derive(Clone, Default)]
    struct CountingAlert {
        plays: Arc<Mutex<Vec<AlertTone>>>,
    }

    impl ExpiryAlert for CountingAlert {
        fn play(&mut self, tone: &AlertTone) {
            self.plays.lock().unwrap().push(*tone);
        }
    }

    fn session() -> TimerSession<Recorder, CountingAlert> {
        let settings = SessionSettings {
            message_seed: Some(9),
            ..SessionSettings::default()
        };
        TimerSession::new(
            TimerEngine::new(),
            Recorder::default(),
            CountingAlert::default(),
            settings,
        )
    }

    #[test]
    fn start_subscribes_and_pause_cancels() {
        let mut s = session();
        assert!(!s.is_subscribed());
        s.handle(SessionCommand::Start);
        assert!(s.is_subscribed());
        s.handle(SessionCommand::Pause);
        assert!(!s.is_subscribed());
        s.handle(SessionCommand::Pause);
        assert!(!s.is_subscribed());
    }

    #[test]
    fn commands_and_pulses_need_no_runtime() {
        let mut s = session();
        s.handle(SessionCommand::Start);
        s.on_pulse(Pulse::Tick);
        s.on_pulse(Pulse::Rotate);
        assert!(s.is_subscribed());
        assert_eq!(s.engine().remaining_secs(), 1499);
        assert_eq!(s.observer().messages.lock().unwrap().len(), 2);
        s.handle(SessionCommand::Reset);
        assert!(!s.is_subscribed());
    }

    #[test]
    fn start_shows_a_work_message() {
        let mut s = session();
        s.handle(SessionCommand::Start);
        let messages = s.observer().messages.lock().unwrap().clone();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, Category::Work);
        assert!(WORK_MESSAGES.contains(&messages[0].1.as_str()));
    }

    #[test]
    fn rest_toggle_picks_rest_message() {
        let mut s = session();
        s.handle(SessionCommand::SetCategory(Category::Rest));
        let messages = s.observer().messages.lock().unwrap().clone();
        assert_eq!(messages.last().unwrap().0, Category::Rest);
        assert!(REST_MESSAGES.contains(&messages.last().unwrap().1.as_str()));
    }

    #[test]
    fn expiry_plays_alert_once_and_unsubscribes() {
        let mut s = session();
        s.handle(SessionCommand::SetCustomDuration {
            minutes: 0,
            seconds: 30,
        });
        s.handle(SessionCommand::Start);
        for _ in 0..40 {
            s.on_pulse(Pulse::Tick);
        }
        assert_eq!(s.alert().plays.lock().unwrap().len(), 1);
        assert_eq!(s.alert().plays.lock().unwrap()[0].frequency_hz, 440);
        assert!(!s.is_subscribed());
        assert_eq!(s.engine().remaining_secs(), 0);
    }

    #[test]
    fn disabled_alert_stays_silent() {
        let settings = SessionSettings {
            alert_enabled: false,
            ..SessionSettings::default()
        };
        let mut s = TimerSession::new(
            TimerEngine::new(),
            Recorder::default(),
            CountingAlert::default(),
            settings,
        );
        s.handle(SessionCommand::SetCustomDuration {
            minutes: 0,
            seconds: 0,
        });
        s.handle(SessionCommand::Start);
        s.on_pulse(Pulse::Tick);
        assert!(s.alert().plays.lock().unwrap().is_empty());
        assert!(!s.engine().is_running());
    }

    #[test]
    fn invalid_custom_duration_reaches_observer() {
        let mut s = session();
        s.handle(SessionCommand::SetCustomDuration {
            minutes: 70,
            seconds: 0,
        });
        assert_eq!(s.engine().remaining_secs(), 1500);
        assert_eq!(
            s.observer().errors.lock().unwrap().as_slice(),
            ["Please enter valid time values: Minutes: 0-60, Seconds: 0 or 30"]
        );
    }

    #[test]
    fn custom_duration_relabels_selector() {
        let mut s = session();
        s.handle(SessionCommand::SetCustomDuration {
            minutes: 10,
            seconds: 30,
        });
        assert_eq!(s.observer().labels.lock().unwrap().as_slice(), ["10:30"]);
        assert_eq!(s.engine().remaining_secs(), 630);
    }

    #[tokio::test(start_paused = true)]
    async fn runs_on_virtual_time() {
        let recorder = Recorder::default();
        let frames = recorder.frames.clone();
        let s = TimerSession::new(
            TimerEngine::new(),
            recorder,
            CountingAlert::default(),
            SessionSettings::default(),
        );
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(s.run(rx));

        tx.send(SessionCommand::SetMode(Preset::ShortBreak)).await.unwrap();
        tx.send(SessionCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10_500)).await;
        tx.send(SessionCommand::Pause).await.unwrap();

        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(SessionCommand::Status(reply_tx)).await.unwrap();
        match reply_rx.await.unwrap() {
            Event::StateSnapshot { remaining_secs, .. } => assert_eq!(remaining_secs, 290),
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }

        // No tick-driven updates once paused.
        let seen = frames.lock().unwrap().len();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(frames.lock().unwrap().len(), seen);

        tx.send(SessionCommand::Shutdown).await.unwrap();
        let s = task.await.unwrap();
        assert!(!s.engine().is_running());
        assert!(!s.is_subscribed());
    }

    #[tokio::test(start_paused = true)]
    async fn rotates_messages_while_running() {
        let recorder = Recorder::default();
        let messages = recorder.messages.clone();
        let s = TimerSession::new(
            TimerEngine::new(),
            recorder,
            CountingAlert::default(),
            SessionSettings::default(),
        );
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(s.run(rx));

        tx.send(SessionCommand::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(61_000 + 500)).await;
        // One on start plus one every thirty seconds.
        assert_eq!(messages.lock().unwrap().len(), 3);

        drop(tx);
        let s = task.await.unwrap();
        assert_eq!(s.engine().remaining_secs(), 1500 - 61);
    }
}
