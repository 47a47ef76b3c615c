//! Entry point: the affordance that opens and closes the dialog.
//!
//! Holds the last accepted click and the handle of the open dialog, if any.
//! One instance per user; the host owns it.

use std::time::Duration;

use reactext_types::{Notice, Permissions};
use tokio::time::Instant;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::dialog::DialogHandle;
use crate::host::PermissionQuery;

/// Clicks closer together than this are dropped
pub const CLICK_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Debounced,
    /// The open dialog should be torn down
    Closed(DialogHandle),
    Blocked(Notice),
    /// A new dialog should be opened under this handle
    Open(DialogHandle),
}

pub struct EntryPoint<C: Clock = SystemClock> {
    clock: C,
    last_click: Option<Instant>,
    open: Option<DialogHandle>,
    issued: u64,
}

impl Default for EntryPoint<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> EntryPoint<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            last_click: None,
            open: None,
            issued: 0,
        }
    }

    /// The affordance is only shown to users who can react at all.
    pub fn is_visible(&self, permissions: Permissions) -> bool {
        permissions.contains(Permissions::ADD_REACTIONS)
    }

    pub fn open_dialog(&self) -> Option<DialogHandle> {
        self.open
    }

    pub fn click<P: PermissionQuery>(&mut self, permissions: &P, channel_id: u64) -> ClickOutcome {
        let now = self.clock.now();
        if let Some(last) = self.last_click {
            if now.saturating_duration_since(last) < CLICK_DEBOUNCE {
                debug!("Click debounced");
                return ClickOutcome::Debounced;
            }
        }
        self.last_click = Some(now);

        if let Some(handle) = self.open.take() {
            return ClickOutcome::Closed(handle);
        }

        if !permissions.has_permission(Permissions::ADD_REACTIONS, channel_id) {
            return ClickOutcome::Blocked(Notice::NoReactPermission);
        }
        if !permissions.has_permission(Permissions::USE_EXTERNAL_EMOJIS, channel_id) {
            return ClickOutcome::Blocked(Notice::NoExternalEmojiPermission);
        }

        self.issued += 1;
        let handle = DialogHandle(self.issued);
        self.open = Some(handle);
        ClickOutcome::Open(handle)
    }

    /// Forget the open dialog if it is `handle`.
    pub fn dialog_closed(&mut self, handle: DialogHandle) {
        if self.open == Some(handle) {
            self.open = None;
        }
    }
}
