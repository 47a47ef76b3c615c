//! Text-to-reaction core: validation, planning, dispatch, availability
//! lookup, the dialog state machine and the Discord REST client.

pub mod cache;
pub mod classify;
pub mod clock;
pub mod config;
pub mod dialog;
pub mod dispatcher;
pub mod entry;
pub mod error;
pub mod host;
pub mod mock;
pub mod planner;
pub mod rest;
pub mod validator;

pub use cache::AvailabilityCache;
pub use clock::{Clock, MockClock, SystemClock};
pub use config::RestConfig;
pub use dialog::{DialogController, DialogEffect, DialogHandle, DialogInput, DialogState};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use entry::{ClickOutcome, EntryPoint};
pub use error::{Error, Result};
pub use host::{Directory, PermissionQuery, ReactionSink};
pub use planner::plan;
pub use rest::RestClient;
pub use validator::validate;
