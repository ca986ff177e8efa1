mod display;
mod engine;
mod messages;
mod mode;
mod session;
mod subscription;
mod traits;

pub use display::{format_clock, DisplayFrame, DEFAULT_TITLE};
pub use engine::{TimerEngine, TimerState};
pub use messages::{pool, select_random_message, MessagePicker, REST_MESSAGES, WORK_MESSAGES};
pub use mode::{
    Category, CustomDuration, Mode, Preset, LONG_BREAK_SECS, MAX_DURATION_SECS, POMODORO_SECS,
    SHORT_BREAK_SECS,
};
pub use session::{SessionCommand, SessionSettings, TimerSession};
pub use subscription::{Pulse, TickSubscription, ROTATE_PERIOD, TICK_PERIOD};
pub use traits::{AlertTone, ExpiryAlert, SilentAlert, TimerObserver};
