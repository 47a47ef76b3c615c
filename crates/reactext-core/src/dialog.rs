//! Dialog state machine.
//!
//! ```text
//! Loading ──▶ Idle ◀──────────────┐
//!    │         │ Confirm          │ FlashExpired / edit
//!    │         ├──(invalid)──▶ ErrorFlash
//!    │         └──(valid)───▶ Processing ──(task failed)──▶ ErrorFlash
//!    │                            │ done
//!    └──(no spaces)──────────────▶ Closed ◀── Exit / OutsideClick (any state)
//! ```
//!
//! The controller never performs I/O besides the initial availability
//! lookup. Inputs come back as [`DialogEffect`]s the host carries out:
//! redraw, schedule a flash expiry, run the dispatcher, or close.

use std::time::Duration;

use reactext_types::{
    Notice, ReactionDirective, SpaceMembership, SpaceRegistry, TargetMessage,
};
use tracing::{debug, info, warn};

use crate::cache::AvailabilityCache;
use crate::dispatcher::DispatchReport;
use crate::host::Directory;
use crate::planner::plan;
use crate::validator::validate;

/// How long an inline error stays visible
pub const FLASH_DURATION: Duration = Duration::from_secs(3);

/// Shown when the dispatch task itself fails
pub const GENERIC_FAILURE: &str = "Something went wrong while adding the reactions.";

/// Identifies one open dialog; issued by the entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogHandle(pub u64);

/// Identifies one error flash so a stale expiry cannot clear a newer error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlashToken(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Loading,
    Idle {
        text: String,
        spaces: Vec<SpaceMembership>,
    },
    ErrorFlash {
        text: String,
        spaces: Vec<SpaceMembership>,
        message: String,
        token: FlashToken,
    },
    Processing {
        text: String,
        spaces: Vec<SpaceMembership>,
    },
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogInput {
    TextChanged(String),
    Clear,
    Confirm,
    Exit,
    OutsideClick,
    FlashExpired(FlashToken),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEffect {
    /// Input ignored in the current state
    None,
    /// Redraw the dialog
    Render,
    /// Redraw, then send `FlashExpired(token)` after `after`
    Flash { token: FlashToken, after: Duration },
    /// Redraw as busy, then dispatch and report back via `finish_processing`
    Dispatch(Vec<ReactionDirective>),
    /// Tear the dialog down
    Close,
}

/// What the host should draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView<'a> {
    pub text: &'a str,
    pub error: Option<&'a str>,
    pub loading: bool,
    pub busy: bool,
    pub confirm_enabled: bool,
}

pub struct DialogController {
    handle: DialogHandle,
    target: TargetMessage,
    state: DialogState,
    next_token: u64,
}

impl DialogController {
    /// A new dialog starts out loading.
    pub fn new(handle: DialogHandle, target: TargetMessage) -> Self {
        Self {
            handle,
            target,
            state: DialogState::Loading,
            next_token: 0,
        }
    }

    pub fn handle(&self) -> DialogHandle {
        self.handle
    }

    pub fn target(&self) -> TargetMessage {
        self.target
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, DialogState::Closed)
    }

    /// Resolve the available guilds and leave `Loading`.
    pub async fn load<D: Directory>(
        &mut self,
        cache: &mut AvailabilityCache,
        directory: &D,
        registry: &SpaceRegistry,
    ) -> Result<(), Notice> {
        let spaces = cache.get_user_spaces(directory, registry).await;
        self.loaded(spaces, registry)
    }

    /// Finish loading with an already resolved membership list.
    pub fn loaded(
        &mut self,
        mut spaces: Vec<SpaceMembership>,
        registry: &SpaceRegistry,
    ) -> Result<(), Notice> {
        if !matches!(self.state, DialogState::Loading) {
            return Ok(());
        }
        if spaces.is_empty() {
            info!("Dialog {:?}: no registry guild joined, closing", self.handle);
            self.state = DialogState::Closed;
            return Err(Notice::NotInRequiredSpace);
        }
        registry.sort_by_priority(&mut spaces);
        debug!(
            "Dialog {:?} ready with {} guilds",
            self.handle,
            spaces.len()
        );
        self.state = DialogState::Idle {
            text: String::new(),
            spaces,
        };
        Ok(())
    }

    /// Feed one user or timer input through the state machine.
    pub fn apply(&mut self, input: DialogInput) -> DialogEffect {
        match input {
            DialogInput::Exit | DialogInput::OutsideClick => self.close(),
            DialogInput::TextChanged(text) => self.edit(text),
            DialogInput::Clear => self.edit(String::new()),
            DialogInput::Confirm => self.confirm(),
            DialogInput::FlashExpired(token) => self.expire_flash(token),
        }
    }

    /// Report how the dispatch started by [`DialogEffect::Dispatch`] ended.
    /// `Err` means the dispatch task itself broke, not a single reaction.
    pub fn finish_processing(&mut self, outcome: Result<DispatchReport, String>) -> DialogEffect {
        let DialogState::Processing { .. } = self.state else {
            return DialogEffect::None;
        };
        match outcome {
            Ok(report) => {
                info!(
                    "Dialog {:?}: {} reactions added, {} failed",
                    self.handle,
                    report.succeeded,
                    report.failures.len()
                );
                self.state = DialogState::Closed;
                DialogEffect::Close
            }
            Err(reason) => {
                warn!("Dialog {:?}: dispatch failed: {}", self.handle, reason);
                let (text, spaces) = self.take_payload();
                self.flash(text, spaces, GENERIC_FAILURE.to_string())
            }
        }
    }

    pub fn view(&self) -> DialogView<'_> {
        match &self.state {
            DialogState::Loading | DialogState::Closed => DialogView {
                text: "",
                error: None,
                loading: matches!(self.state, DialogState::Loading),
                busy: false,
                confirm_enabled: false,
            },
            DialogState::Idle { text, .. } => DialogView {
                text,
                error: None,
                loading: false,
                busy: false,
                confirm_enabled: !text.trim().is_empty(),
            },
            DialogState::ErrorFlash { text, message, .. } => DialogView {
                text,
                error: Some(message),
                loading: false,
                busy: false,
                confirm_enabled: !text.trim().is_empty(),
            },
            DialogState::Processing { text, .. } => DialogView {
                text,
                error: None,
                loading: false,
                busy: true,
                confirm_enabled: false,
            },
        }
    }

    fn close(&mut self) -> DialogEffect {
        if !self.is_open() {
            return DialogEffect::None;
        }
        self.state = DialogState::Closed;
        DialogEffect::Close
    }

    fn edit(&mut self, new_text: String) -> DialogEffect {
        if !matches!(
            self.state,
            DialogState::Idle { .. } | DialogState::ErrorFlash { .. }
        ) {
            return DialogEffect::None;
        }
        let (_, spaces) = self.take_payload();
        self.state = DialogState::Idle {
            text: new_text,
            spaces,
        };
        DialogEffect::Render
    }

    fn confirm(&mut self) -> DialogEffect {
        if !self.view().confirm_enabled {
            return DialogEffect::None;
        }
        let (text, spaces) = self.take_payload();
        let upper = text.to_ascii_uppercase();

        if let Err(e) = validate(&upper, spaces.len()) {
            debug!("Dialog {:?}: rejected {:?}: {}", self.handle, text, e);
            return self.flash(text, spaces, e.to_string());
        }

        let directives = plan(&upper, &spaces);
        info!(
            "Dialog {:?}: {:?} planned as {} reactions",
            self.handle,
            upper,
            directives.len()
        );
        self.state = DialogState::Processing { text, spaces };
        DialogEffect::Dispatch(directives)
    }

    fn expire_flash(&mut self, expired: FlashToken) -> DialogEffect {
        match &self.state {
            DialogState::ErrorFlash { token, .. } if *token == expired => {
                let (text, spaces) = self.take_payload();
                self.state = DialogState::Idle { text, spaces };
                DialogEffect::Render
            }
            _ => DialogEffect::None,
        }
    }

    fn flash(
        &mut self,
        text: String,
        spaces: Vec<SpaceMembership>,
        message: String,
    ) -> DialogEffect {
        self.next_token += 1;
        let token = FlashToken(self.next_token);
        self.state = DialogState::ErrorFlash {
            text,
            spaces,
            message,
            token,
        };
        DialogEffect::Flash {
            token,
            after: FLASH_DURATION,
        }
    }

    /// Move text and guilds out of the current state, leaving `Loading` as
    /// a placeholder the caller overwrites.
    fn take_payload(&mut self) -> (String, Vec<SpaceMembership>) {
        match std::mem::replace(&mut self.state, DialogState::Loading) {
            DialogState::Idle { text, spaces }
            | DialogState::ErrorFlash { text, spaces, .. }
            | DialogState::Processing { text, spaces } => (text, spaces),
            other => {
                self.state = other;
                (String::new(), Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockDirectory;
    use reactext_types::{charmap, EmojiRecord};

    fn full_space(space_id: u64) -> SpaceMembership {
        let emojis = charmap::CHARACTER_MAP
            .iter()
            .map(|(_, name)| EmojiRecord::new(*name, space_id))
            .collect();
        SpaceMembership::new(space_id, emojis)
    }

    fn registry() -> SpaceRegistry {
        SpaceRegistry::new([1, 2, 3])
    }

    fn idle_dialog(space_ids: &[u64]) -> DialogController {
        let mut dialog = DialogController::new(DialogHandle(1), TargetMessage::new(10, 20));
        let spaces = space_ids.iter().map(|id| full_space(*id)).collect();
        dialog.loaded(spaces, &registry()).unwrap();
        dialog
    }

    fn flash_token(effect: &DialogEffect) -> FlashToken {
        match effect {
            DialogEffect::Flash { token, after } => {
                assert_eq!(*after, FLASH_DURATION);
                *token
            }
            other => panic!("expected a flash, got {other:?}"),
        }
    }

    // ── loading ───────────────────────────────────────────────────────────────

    #[test]
    fn test_new_dialog_is_loading() {
        let dialog = DialogController::new(DialogHandle(7), TargetMessage::new(1, 2));
        assert_eq!(dialog.state(), &DialogState::Loading);
        assert!(dialog.view().loading);
        assert!(dialog.is_open());
    }

    #[test]
    fn test_loaded_sorts_by_registry_priority() {
        let dialog = idle_dialog(&[3, 1, 2]);
        let DialogState::Idle { spaces, .. } = dialog.state() else {
            panic!("expected idle");
        };
        let ids: Vec<u64> = spaces.iter().map(|s| s.space_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_loaded_empty_closes_with_notice() {
        let mut dialog = DialogController::new(DialogHandle(1), TargetMessage::new(1, 2));
        assert_eq!(
            dialog.loaded(vec![], &registry()),
            Err(Notice::NotInRequiredSpace)
        );
        assert!(!dialog.is_open());
    }

    #[tokio::test]
    async fn test_load_through_cache() {
        let dir = MockDirectory::new()
            .with_guild(2, full_space(2).emojis)
            .with_guild(1, full_space(1).emojis);
        let mut cache = AvailabilityCache::new();
        let mut dialog = DialogController::new(DialogHandle(1), TargetMessage::new(1, 2));

        dialog.load(&mut cache, &dir, &registry()).await.unwrap();

        let DialogState::Idle { spaces, .. } = dialog.state() else {
            panic!("expected idle");
        };
        assert_eq!(spaces[0].space_id, 1);
    }

    #[tokio::test]
    async fn test_load_with_failing_directory_closes() {
        let dir = MockDirectory::new();
        dir.fail_guild_list(true);
        let mut cache = AvailabilityCache::new();
        let mut dialog = DialogController::new(DialogHandle(1), TargetMessage::new(1, 2));

        let result = dialog.load(&mut cache, &dir, &registry()).await;
        assert_eq!(result, Err(Notice::NotInRequiredSpace));
        assert_eq!(dialog.state(), &DialogState::Closed);
    }

    #[test]
    fn test_inputs_ignored_while_loading() {
        let mut dialog = DialogController::new(DialogHandle(1), TargetMessage::new(1, 2));
        assert_eq!(
            dialog.apply(DialogInput::TextChanged("HI".into())),
            DialogEffect::None
        );
        assert_eq!(dialog.apply(DialogInput::Confirm), DialogEffect::None);
    }

    // ── idle ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_confirm_enabled_only_for_non_blank_text() {
        let mut dialog = idle_dialog(&[1]);
        assert!(!dialog.view().confirm_enabled);
        dialog.apply(DialogInput::TextChanged("   ".into()));
        assert!(!dialog.view().confirm_enabled);
        assert_eq!(dialog.apply(DialogInput::Confirm), DialogEffect::None);
        dialog.apply(DialogInput::TextChanged("hi".into()));
        assert!(dialog.view().confirm_enabled);
    }

    #[test]
    fn test_clear_empties_text() {
        let mut dialog = idle_dialog(&[1]);
        dialog.apply(DialogInput::TextChanged("hello".into()));
        assert_eq!(dialog.apply(DialogInput::Clear), DialogEffect::Render);
        assert_eq!(dialog.view().text, "");
    }

    #[test]
    fn test_exit_and_outside_click_close() {
        let mut dialog = idle_dialog(&[1]);
        assert_eq!(dialog.apply(DialogInput::OutsideClick), DialogEffect::Close);
        assert!(!dialog.is_open());
        assert_eq!(dialog.apply(DialogInput::Exit), DialogEffect::None);

        let mut dialog = idle_dialog(&[1]);
        assert_eq!(dialog.apply(DialogInput::Exit), DialogEffect::Close);
    }

    // ── confirm ───────────────────────────────────────────────────────────────

    #[test]
    fn test_valid_confirm_dispatches_uppercased_plan() {
        let mut dialog = idle_dialog(&[1, 2]);
        dialog.apply(DialogInput::TextChanged("hi".into()));

        let DialogEffect::Dispatch(directives) = dialog.apply(DialogInput::Confirm) else {
            panic!("expected dispatch");
        };
        let chars: Vec<char> = directives.iter().map(|d| d.character).collect();
        assert_eq!(chars, vec!['H', 'I']);
        assert!(dialog.view().busy);
        assert!(matches!(dialog.state(), DialogState::Processing { .. }));
    }

    #[test]
    fn test_busy_dialog_ignores_edits_and_confirm() {
        let mut dialog = idle_dialog(&[1]);
        dialog.apply(DialogInput::TextChanged("hi".into()));
        dialog.apply(DialogInput::Confirm);

        assert_eq!(
            dialog.apply(DialogInput::TextChanged("other".into())),
            DialogEffect::None
        );
        assert_eq!(dialog.apply(DialogInput::Confirm), DialogEffect::None);
        assert_eq!(dialog.view().text, "hi");
    }

    #[test]
    fn test_invalid_confirm_flashes_and_stays_open() {
        let mut dialog = idle_dialog(&[1, 2]);
        dialog.apply(DialogInput::TextChanged("aaa".into()));

        let effect = dialog.apply(DialogInput::Confirm);
        flash_token(&effect);

        let view = dialog.view();
        assert_eq!(view.text, "aaa");
        assert!(view.error.unwrap().contains("'A'"));
        assert!(dialog.is_open());
    }

    #[test]
    fn test_flash_expiry_returns_to_idle() {
        let mut dialog = idle_dialog(&[1]);
        dialog.apply(DialogInput::TextChanged("hi?".into()));
        let token = flash_token(&dialog.apply(DialogInput::Confirm));

        assert_eq!(
            dialog.apply(DialogInput::FlashExpired(token)),
            DialogEffect::Render
        );
        assert!(matches!(dialog.state(), DialogState::Idle { .. }));
        assert_eq!(dialog.view().text, "hi?");
        assert!(dialog.view().error.is_none());
    }

    #[test]
    fn test_stale_flash_expiry_is_ignored() {
        let mut dialog = idle_dialog(&[1]);
        dialog.apply(DialogInput::TextChanged("hi?".into()));
        let first = flash_token(&dialog.apply(DialogInput::Confirm));
        let second = flash_token(&dialog.apply(DialogInput::Confirm));
        assert_ne!(first, second);

        assert_eq!(
            dialog.apply(DialogInput::FlashExpired(first)),
            DialogEffect::None
        );
        assert!(dialog.view().error.is_some());
    }

    #[test]
    fn test_edit_clears_error() {
        let mut dialog = idle_dialog(&[1]);
        dialog.apply(DialogInput::TextChanged("??".into()));
        dialog.apply(DialogInput::Confirm);
        assert!(dialog.view().error.is_some());

        dialog.apply(DialogInput::TextChanged("ok".into()));
        assert!(dialog.view().error.is_none());
    }

    // ── processing ────────────────────────────────────────────────────────────

    #[test]
    fn test_successful_dispatch_closes() {
        let mut dialog = idle_dialog(&[1]);
        dialog.apply(DialogInput::TextChanged("hi".into()));
        dialog.apply(DialogInput::Confirm);

        let effect = dialog.finish_processing(Ok(DispatchReport::default()));
        assert_eq!(effect, DialogEffect::Close);
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_failed_dispatch_task_flashes_generic_error() {
        let mut dialog = idle_dialog(&[1]);
        dialog.apply(DialogInput::TextChanged("hi".into()));
        dialog.apply(DialogInput::Confirm);

        let effect = dialog.finish_processing(Err("task panicked".into()));
        flash_token(&effect);

        let view = dialog.view();
        assert_eq!(view.error, Some(GENERIC_FAILURE));
        assert!(!view.busy);
        assert_eq!(view.text, "hi");
        assert!(dialog.is_open());
    }

    #[test]
    fn test_exit_while_processing_then_finish_is_noop() {
        let mut dialog = idle_dialog(&[1]);
        dialog.apply(DialogInput::TextChanged("hi".into()));
        dialog.apply(DialogInput::Confirm);

        assert_eq!(dialog.apply(DialogInput::Exit), DialogEffect::Close);
        assert_eq!(
            dialog.finish_processing(Ok(DispatchReport::default())),
            DialogEffect::None
        );
    }
}
