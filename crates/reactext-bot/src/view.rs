//! Rendering of the dialog as an ephemeral interaction message.
//!
//! Custom ids carry the dialog handle (`reactext:<action>:<handle>`) so a
//! click on a stale message can be told apart from one on the open dialog.

use reactext_core::dialog::DialogView;
use reactext_core::{DialogHandle, DispatchReport};
use reactext_types::{Notice, Severity};
use serenity::builder::{
    CreateActionRow, CreateButton, CreateInputText, CreateModal, EditInteractionResponse,
};
use serenity::model::application::{ButtonStyle, InputTextStyle};
use serenity::utils::MessageBuilder;

const ID_PREFIX: &str = "reactext";

/// Custom id of the text input inside the modal
pub const TEXT_INPUT_ID: &str = "text";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    Edit,
    Clear,
    Confirm,
    Exit,
    /// Submission of the edit-text modal
    SubmitText,
}

impl DialogAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Clear => "clear",
            Self::Confirm => "confirm",
            Self::Exit => "exit",
            Self::SubmitText => "text",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "edit" => Self::Edit,
            "clear" => Self::Clear,
            "confirm" => Self::Confirm,
            "exit" => Self::Exit,
            "text" => Self::SubmitText,
            _ => return None,
        })
    }
}

pub fn custom_id(action: DialogAction, handle: DialogHandle) -> String {
    format!("{}:{}:{}", ID_PREFIX, action.as_str(), handle.0)
}

/// Inverse of [`custom_id`]; `None` for ids this bot did not issue.
pub fn parse_custom_id(id: &str) -> Option<(DialogAction, DialogHandle)> {
    let mut parts = id.splitn(3, ':');
    if parts.next()? != ID_PREFIX {
        return None;
    }
    let action = DialogAction::parse(parts.next()?)?;
    let handle = parts.next()?.parse().ok()?;
    Some((action, DialogHandle(handle)))
}

/// One button as drawn for a given view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub action: DialogAction,
    pub label: &'static str,
    pub disabled: bool,
}

pub fn buttons(view: &DialogView<'_>) -> Vec<ButtonState> {
    let idle = !view.loading && !view.busy;
    vec![
        ButtonState {
            action: DialogAction::Edit,
            label: "Edit text",
            disabled: !idle,
        },
        ButtonState {
            action: DialogAction::Clear,
            label: "Clear",
            disabled: !idle || view.text.is_empty(),
        },
        ButtonState {
            action: DialogAction::Confirm,
            label: "Confirm",
            disabled: !view.confirm_enabled,
        },
        ButtonState {
            action: DialogAction::Exit,
            label: "Exit",
            disabled: false,
        },
    ]
}

pub fn content(view: &DialogView<'_>) -> String {
    if view.loading {
        return "⏳ Looking up your emoji servers…".to_string();
    }
    let mut out = String::from("**React with text**\n");
    if view.text.is_empty() {
        out.push_str("Text: _empty_, press **Edit text** to type something");
    } else {
        // backticks in the text would end the code span early
        let line = MessageBuilder::new()
            .push("Text: ")
            .push_mono_safe(view.text)
            .build();
        out.push_str(&line);
    }
    if let Some(error) = view.error {
        out.push_str(&format!("\n⚠️ {}", error));
    }
    if view.busy {
        out.push_str("\n⏳ Adding reactions…");
    }
    out
}

pub fn notice_content(notice: Notice) -> String {
    let icon = match notice.severity() {
        Severity::Info => "ℹ️",
        Severity::Warning => "⚠️",
        Severity::Failure => "⛔",
    };
    format!("{} {}", icon, notice.message())
}

pub fn summary_content(report: &DispatchReport) -> String {
    match report.failures.len() {
        0 => format!("✅ Added {} reactions.", report.succeeded),
        failed => format!(
            "Added {} reactions, {} could not be added.",
            report.succeeded, failed
        ),
    }
}

pub const CLOSED_CONTENT: &str = "Dialog closed.";

pub fn components(view: &DialogView<'_>, handle: DialogHandle) -> Vec<CreateActionRow> {
    let row = buttons(view)
        .into_iter()
        .map(|button| {
            let style = match button.action {
                DialogAction::Confirm => ButtonStyle::Success,
                DialogAction::Exit => ButtonStyle::Danger,
                DialogAction::Edit => ButtonStyle::Primary,
                DialogAction::Clear | DialogAction::SubmitText => ButtonStyle::Secondary,
            };
            CreateButton::new(custom_id(button.action, handle))
                .label(button.label)
                .style(style)
                .disabled(button.disabled)
        })
        .collect();
    vec![CreateActionRow::Buttons(row)]
}

/// Full edit for the dialog message
pub fn dialog_edit(view: &DialogView<'_>, handle: DialogHandle) -> EditInteractionResponse {
    EditInteractionResponse::new()
        .content(content(view))
        .components(components(view, handle))
}

/// Edit that strips the buttons and leaves a final line of text
pub fn final_edit(text: impl Into<String>) -> EditInteractionResponse {
    EditInteractionResponse::new()
        .content(text)
        .components(Vec::new())
}

pub fn text_modal(handle: DialogHandle, current: &str) -> CreateModal {
    let mut input = CreateInputText::new(InputTextStyle::Short, "Text", TEXT_INPUT_ID)
        .placeholder("Letters, digits, spaces and !")
        .required(false);
    if !current.is_empty() {
        input = input.value(current);
    }
    CreateModal::new(custom_id(DialogAction::SubmitText, handle), "React with text")
        .components(vec![CreateActionRow::InputText(input)])
}
