//! View models shared by the store and components.

/// Visual flavour of a toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    /// Neutral notice.
    Info,
    /// Completed action.
    Success,
    /// Failed action.
    Error,
}

/// A transient notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    /// Identifier used to dismiss the toast.
    pub id: u64,
    /// Text shown to the user.
    pub message: String,
    /// Visual flavour.
    pub kind: ToastKind,
}

impl ToastKind {
    /// CSS modifier class.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}
