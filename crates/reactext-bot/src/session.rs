//! Per-user dialog sessions and the interaction flow around them.
//!
//! Each user gets an entry point and at most one open dialog. The dialog is
//! drawn as an ephemeral message; every interaction on it refreshes the token
//! used for later background edits (flash expiry, dispatch outcome).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reactext_core::{
    AvailabilityCache, ClickOutcome, DialogController, DialogEffect, DialogHandle, DialogInput,
    DispatchReport, Dispatcher, EntryPoint, RestClient,
};
use reactext_core::dialog::FlashToken;
use reactext_types::{Permissions, ReactionDirective, SpaceRegistry, TargetMessage};
use serenity::builder::{
    CreateInteractionResponse, CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::http::Http;
use serenity::model::application::{
    ActionRowComponent, CommandInteraction, ComponentInteraction, ModalInteraction,
};
use serenity::prelude::TypeMapKey;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::errors::log_error;
use crate::view::{self, DialogAction};

/// State kept for one user
pub struct Session {
    entry: EntryPoint,
    dialog: Option<DialogController>,
    /// Token of the latest interaction on the open dialog's message
    token: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            entry: EntryPoint::default(),
            dialog: None,
            token: None,
        }
    }

    /// The open dialog, if it is `handle`
    fn dialog_mut(&mut self, handle: DialogHandle) -> Option<&mut DialogController> {
        self.dialog.as_mut().filter(|d| d.handle() == handle)
    }

    fn close(&mut self, handle: DialogHandle) {
        self.entry.dialog_closed(handle);
        if self.dialog.as_ref().is_some_and(|d| d.handle() == handle) {
            self.dialog = None;
            self.token = None;
        }
    }

    /// Feed a flash timeout to dialog `handle`. Yields the message token and
    /// the redraw when the dialog actually left its error flash.
    fn flash_expired(
        &mut self,
        handle: DialogHandle,
        token: FlashToken,
    ) -> Option<(String, EditInteractionResponse)> {
        let dialog = self.dialog_mut(handle)?;
        if dialog.apply(DialogInput::FlashExpired(token)) != DialogEffect::Render {
            return None;
        }
        let edit = view::dialog_edit(&dialog.view(), handle);
        Some((self.token.clone()?, edit))
    }

    /// Hand a finished dispatch back to dialog `handle`. `None` when the
    /// dialog was closed or replaced in the meantime.
    fn dispatch_finished(
        &mut self,
        handle: DialogHandle,
        outcome: Result<DispatchReport, String>,
    ) -> Option<(String, DispatchFollowUp)> {
        let summary = outcome.as_ref().ok().map(view::summary_content);
        let message_token = self.token.clone();
        let Some(dialog) = self.dialog_mut(handle) else {
            debug!("Dialog {:?} closed before dispatch finished", handle);
            return None;
        };
        match dialog.finish_processing(outcome) {
            DialogEffect::Close => {
                self.close(handle);
                let text = summary.unwrap_or_else(|| view::CLOSED_CONTENT.to_string());
                Some((message_token?, DispatchFollowUp::Final(text)))
            }
            DialogEffect::Flash { token, after } => {
                let edit = view::dialog_edit(&dialog.view(), handle);
                Some((message_token?, DispatchFollowUp::Flash { edit, token, after }))
            }
            _ => None,
        }
    }
}

/// Message edit owed to the user once a dispatch has ended
enum DispatchFollowUp {
    /// Strip the dialog down to a closing line
    Final(String),
    /// Redraw with the error and expire it later
    Flash {
        edit: EditInteractionResponse,
        token: FlashToken,
        after: Duration,
    },
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the interaction handlers share
pub struct AppContext {
    rest: RestClient,
    registry: SpaceRegistry,
    command_name: String,
    dispatcher: Dispatcher,
    cache: Mutex<AvailabilityCache>,
    sessions: Mutex<HashMap<u64, Arc<Mutex<Session>>>>,
}

impl TypeMapKey for AppContext {
    type Value = Arc<AppContext>;
}

impl AppContext {
    pub fn new(rest: RestClient, registry: SpaceRegistry, command_name: String) -> Self {
        Self {
            rest,
            registry,
            command_name,
            dispatcher: Dispatcher::default(),
            cache: Mutex::new(AvailabilityCache::new()),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    async fn session(&self, user_id: u64) -> Arc<Mutex<Session>> {
        self.sessions
            .lock()
            .await
            .entry(user_id)
            .or_default()
            .clone()
    }

    // ── entry point ───────────────────────────────────────────────────────────

    /// The message context-menu command: open, toggle closed, or refuse.
    pub async fn handle_command(self: &Arc<Self>, http: &Arc<Http>, cmd: &CommandInteraction) {
        if cmd.data.name != self.command_name {
            debug!("Ignoring unknown command {}", cmd.data.name);
            return;
        }
        let Some(message_id) = cmd.data.target_id.map(|id| id.get()) else {
            warn!("Command {} invoked without a target message", cmd.data.name);
            return;
        };
        let channel_id = cmd.channel_id.get();
        let target = TargetMessage::new(channel_id, message_id);
        let permissions = resolve_permissions(
            cmd.member.as_ref().and_then(|m| m.permissions).map(|p| p.bits()),
            cmd.app_permissions.map(|p| p.bits()),
        );

        let session = self.session(cmd.user.id.get()).await;
        let mut guard = session.lock().await;
        let s = &mut *guard;

        match s.entry.click(&permissions, channel_id) {
            ClickOutcome::Debounced => dismiss(http, cmd).await,
            ClickOutcome::Closed(handle) => {
                info!("User {} toggled dialog {:?} closed", cmd.user.id, handle);
                if let Some(token) = s.token.clone() {
                    edit_message(http, &token, view::final_edit(view::CLOSED_CONTENT)).await;
                }
                s.close(handle);
                dismiss(http, cmd).await;
            }
            ClickOutcome::Blocked(notice) => {
                info!("User {} blocked: {:?}", cmd.user.id, notice);
                let reply = CreateInteractionResponseMessage::new()
                    .content(view::notice_content(notice))
                    .ephemeral(true);
                if let Err(e) = cmd
                    .create_response(&**http, CreateInteractionResponse::Message(reply))
                    .await
                {
                    log_error("Failed to send notice", &e);
                }
            }
            ClickOutcome::Open(handle) => {
                let mut dialog = DialogController::new(handle, target);
                let loading = CreateInteractionResponseMessage::new()
                    .content(view::content(&dialog.view()))
                    .ephemeral(true);
                if let Err(e) = cmd
                    .create_response(&**http, CreateInteractionResponse::Message(loading))
                    .await
                {
                    log_error("Failed to open dialog", &e);
                    s.entry.dialog_closed(handle);
                    return;
                }

                let loaded = {
                    let mut cache = self.cache.lock().await;
                    dialog.load(&mut cache, &self.rest, &self.registry).await
                };
                match loaded {
                    Ok(()) => {
                        let edit = view::dialog_edit(&dialog.view(), handle);
                        if let Err(e) = cmd.edit_response(&**http, edit).await {
                            log_error("Failed to draw dialog", &e);
                        }
                        s.dialog = Some(dialog);
                        s.token = Some(cmd.token.clone());
                    }
                    Err(notice) => {
                        s.entry.dialog_closed(handle);
                        let edit = view::final_edit(view::notice_content(notice));
                        if let Err(e) = cmd.edit_response(&**http, edit).await {
                            log_error("Failed to send notice", &e);
                        }
                    }
                }
            }
        }
    }

    // ── dialog inputs ─────────────────────────────────────────────────────────

    /// Button clicks on the dialog message.
    pub async fn handle_component(self: &Arc<Self>, http: &Arc<Http>, comp: &ComponentInteraction) {
        let Some((action, handle)) = view::parse_custom_id(&comp.data.custom_id) else {
            return;
        };
        let user_id = comp.user.id.get();
        let session = self.session(user_id).await;
        let mut guard = session.lock().await;
        let s = &mut *guard;

        let Some(dialog) = s.dialog_mut(handle) else {
            respond(comp.create_response(&**http, stale_response())).await;
            return;
        };

        let input = match action {
            DialogAction::Edit => {
                let current = dialog.view();
                let response = if current.busy || current.loading {
                    CreateInteractionResponse::Acknowledge
                } else {
                    CreateInteractionResponse::Modal(view::text_modal(handle, current.text))
                };
                // the modal submission brings its own token
                respond(comp.create_response(&**http, response)).await;
                return;
            }
            DialogAction::Clear => DialogInput::Clear,
            DialogAction::Confirm => DialogInput::Confirm,
            DialogAction::Exit => DialogInput::Exit,
            DialogAction::SubmitText => return,
        };

        let effect = dialog.apply(input);
        s.token = Some(comp.token.clone());
        let response = self.carry_out(http, s, user_id, handle, effect);
        respond(comp.create_response(&**http, response)).await;
    }

    /// Submission of the edit-text modal.
    pub async fn handle_modal(self: &Arc<Self>, http: &Arc<Http>, modal: &ModalInteraction) {
        let Some((DialogAction::SubmitText, handle)) = view::parse_custom_id(&modal.data.custom_id)
        else {
            return;
        };
        let text = modal
            .data
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .find_map(|component| match component {
                ActionRowComponent::InputText(input) if input.custom_id == view::TEXT_INPUT_ID => {
                    Some(input.value.clone().unwrap_or_default())
                }
                _ => None,
            })
            .unwrap_or_default();

        let user_id = modal.user.id.get();
        let session = self.session(user_id).await;
        let mut guard = session.lock().await;
        let s = &mut *guard;

        let Some(dialog) = s.dialog_mut(handle) else {
            respond(modal.create_response(&**http, stale_response())).await;
            return;
        };

        let effect = dialog.apply(DialogInput::TextChanged(text));
        s.token = Some(modal.token.clone());
        let response = self.carry_out(http, s, user_id, handle, effect);
        respond(modal.create_response(&**http, response)).await;
    }

    // ── effects ───────────────────────────────────────────────────────────────

    /// Perform a dialog effect and build the interaction response for it.
    fn carry_out(
        self: &Arc<Self>,
        http: &Arc<Http>,
        s: &mut Session,
        user_id: u64,
        handle: DialogHandle,
        effect: DialogEffect,
    ) -> CreateInteractionResponse {
        let Some(dialog) = s.dialog_mut(handle) else {
            return stale_response();
        };
        match effect {
            DialogEffect::None => CreateInteractionResponse::Acknowledge,
            DialogEffect::Render => update_response(dialog, handle),
            DialogEffect::Flash { token, after } => {
                self.schedule_flash_expiry(http.clone(), user_id, handle, token, after);
                update_response(dialog, handle)
            }
            DialogEffect::Dispatch(directives) => {
                let target = dialog.target();
                let response = update_response(dialog, handle);
                self.spawn_dispatch(http.clone(), user_id, handle, target, directives);
                response
            }
            DialogEffect::Close => {
                s.close(handle);
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new()
                        .content(view::CLOSED_CONTENT)
                        .components(Vec::new()),
                )
            }
        }
    }

    fn schedule_flash_expiry(
        self: &Arc<Self>,
        http: Arc<Http>,
        user_id: u64,
        handle: DialogHandle,
        token: FlashToken,
        after: Duration,
    ) {
        let ctx = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let session = ctx.session(user_id).await;
            let mut guard = session.lock().await;
            if let Some((message_token, edit)) = guard.flash_expired(handle, token) {
                edit_message(&http, &message_token, edit).await;
            }
        });
    }

    /// Run the dispatcher on its own task, then report back to the dialog.
    fn spawn_dispatch(
        self: &Arc<Self>,
        http: Arc<Http>,
        user_id: u64,
        handle: DialogHandle,
        target: TargetMessage,
        directives: Vec<ReactionDirective>,
    ) {
        let ctx = Arc::clone(self);
        tokio::spawn(async move {
            let worker = Arc::clone(&ctx);
            let outcome: Result<DispatchReport, String> = tokio::spawn(async move {
                worker
                    .dispatcher
                    .dispatch(&worker.rest, &directives, target)
                    .await
            })
            .await
            .map_err(|e| e.to_string());

            let session = ctx.session(user_id).await;
            let mut guard = session.lock().await;
            let Some((message_token, follow_up)) = guard.dispatch_finished(handle, outcome) else {
                return;
            };
            match follow_up {
                DispatchFollowUp::Final(text) => {
                    edit_message(&http, &message_token, view::final_edit(text)).await;
                }
                DispatchFollowUp::Flash { edit, token, after } => {
                    ctx.schedule_flash_expiry(http.clone(), user_id, handle, token, after);
                    edit_message(&http, &message_token, edit).await;
                }
            }
        });
    }
}

/// Bits held by both the invoking member and the bot in the channel. The
/// reactions go out under the bot's identity, so a bit missing on either
/// side blocks the dialog. A side with no resolved permissions (DMs) holds
/// both bits.
pub fn resolve_permissions(member_bits: Option<u64>, app_bits: Option<u64>) -> Permissions {
    let resolve = |bits: Option<u64>| {
        bits.map(Permissions::from_bits)
            .unwrap_or(Permissions::ADD_REACTIONS | Permissions::USE_EXTERNAL_EMOJIS)
    };
    resolve(member_bits) & resolve(app_bits)
}

fn update_response(dialog: &DialogController, handle: DialogHandle) -> CreateInteractionResponse {
    let current = dialog.view();
    CreateInteractionResponse::UpdateMessage(
        CreateInteractionResponseMessage::new()
            .content(view::content(&current))
            .components(view::components(&current, handle)),
    )
}

fn stale_response() -> CreateInteractionResponse {
    CreateInteractionResponse::UpdateMessage(
        CreateInteractionResponseMessage::new()
            .content(view::CLOSED_CONTENT)
            .components(Vec::new()),
    )
}

async fn respond(response: impl std::future::Future<Output = serenity::Result<()>>) {
    if let Err(e) = response.await {
        log_error("Failed to answer interaction", &e);
    }
}

/// Acknowledge a command without leaving a message behind.
async fn dismiss(http: &Http, cmd: &CommandInteraction) {
    if let Err(e) = cmd.defer_ephemeral(http).await {
        log_error("Failed to acknowledge command", &e);
        return;
    }
    if let Err(e) = cmd.delete_response(http).await {
        log_error("Failed to remove acknowledgement", &e);
    }
}

async fn edit_message(http: &Http, token: &str, edit: EditInteractionResponse) {
    if let Err(e) = http
        .edit_original_interaction_response(token, &edit, Vec::new())
        .await
    {
        log_error("Failed to update dialog message", &e);
    }
}
