//! Flat command table behind a dialog's delegated click handler.

use crate::constants::{
    DATA_TYPE_CANCEL, DATA_TYPE_CANCEL_DELETE, DATA_TYPE_CANCEL_REPLY, DATA_TYPE_CONFIRM_DELETE,
    DATA_TYPE_DELETE, DATA_TYPE_DELETE_DRAWING, DATA_TYPE_POST, DATA_TYPE_POST_DRAWING,
    DATA_TYPE_POST_REPLY, DATA_TYPE_REPLY_TEXTAREA,
};

/// A `data-type` value a dialog reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogCommand {
    PostAnnotation,
    CancelAnnotation,
    ReplyTextarea,
    CancelReply,
    PostReply,
    ShowDeleteConfirmation,
    CancelDelete,
    ConfirmDelete,
    PostDrawing,
    DeleteDrawing,
}

impl DialogCommand {
    /// Every command, in table order.
    pub const ALL: [DialogCommand; 10] = [
        DialogCommand::PostAnnotation,
        DialogCommand::CancelAnnotation,
        DialogCommand::ReplyTextarea,
        DialogCommand::CancelReply,
        DialogCommand::PostReply,
        DialogCommand::ShowDeleteConfirmation,
        DialogCommand::CancelDelete,
        DialogCommand::ConfirmDelete,
        DialogCommand::PostDrawing,
        DialogCommand::DeleteDrawing,
    ];

    /// Look up a command; unknown values map to `None` and are ignored.
    pub fn from_data_type(data_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_data_type() == data_type)
    }

    pub fn as_data_type(&self) -> &'static str {
        match self {
            DialogCommand::PostAnnotation => DATA_TYPE_POST,
            DialogCommand::CancelAnnotation => DATA_TYPE_CANCEL,
            DialogCommand::ReplyTextarea => DATA_TYPE_REPLY_TEXTAREA,
            DialogCommand::CancelReply => DATA_TYPE_CANCEL_REPLY,
            DialogCommand::PostReply => DATA_TYPE_POST_REPLY,
            DialogCommand::ShowDeleteConfirmation => DATA_TYPE_DELETE,
            DialogCommand::CancelDelete => DATA_TYPE_CANCEL_DELETE,
            DialogCommand::ConfirmDelete => DATA_TYPE_CONFIRM_DELETE,
            DialogCommand::PostDrawing => DATA_TYPE_POST_DRAWING,
            DialogCommand::DeleteDrawing => DATA_TYPE_DELETE_DRAWING,
        }
    }

    /// Whether the command refers to one comment and needs its annotation id.
    pub fn targets_comment(&self) -> bool {
        matches!(
            self,
            DialogCommand::ShowDeleteConfirmation
                | DialogCommand::CancelDelete
                | DialogCommand::ConfirmDelete
        )
    }
}
