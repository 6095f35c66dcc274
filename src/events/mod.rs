//! # Change Notification
//!
//! The notification spine between the model and everything derived from
//! it. The model is always mutated first and the payload describing the
//! change is emitted afterward, so no listener ever sees a notification
//! before the state it describes exists.
//!
//! ## Key Components
//!
//! - [`ChangeBus`] - Typed publish/subscribe with per-kind debouncing
//! - [`ChangePayload`] - The closed set of model change messages
//! - [`Debouncer`] - Arm/cancel one deferred payload per key
//! - [`Clock`] - Time source for debounce windows

pub mod bus;
pub mod clock;
pub mod debounce;
pub mod payload;

pub use bus::{ChangeBus, EmitReport, Listener, ListenerId, UpdateOptions};
pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::Debouncer;
pub use payload::{ChangeKind, ChangePayload, NodeChanges, Payload};
