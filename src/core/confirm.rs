//! Confirmation gate for destructive actions.
//!
//! A view asks the gate to open a prompt for an action kind; nothing runs
//! until the user confirms. The prompt closes as soon as it is confirmed or
//! cancelled, and the gate then refuses new prompts until the caller reports
//! that the confirmed action has finished.

/// A prompt waiting for the user's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction<K> {
    pub kind: K,
    pub message: String,
    pub button_label: String,
}

#[derive(Debug, Clone)]
pub struct ConfirmGate<K> {
    pending: Option<PendingAction<K>>,
    in_flight: bool,
}

impl<K> Default for ConfirmGate<K> {
    fn default() -> Self {
        Self {
            pending: None,
            in_flight: false,
        }
    }
}

impl<K: Clone> ConfirmGate<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a prompt. Returns `false` when a prompt is already open or a
    /// previously confirmed action has not finished.
    pub fn request(
        &mut self,
        kind: K,
        message: impl Into<String>,
        button_label: impl Into<String>,
    ) -> bool {
        if self.pending.is_some() || self.in_flight {
            return false;
        }
        self.pending = Some(PendingAction {
            kind,
            message: message.into(),
            button_label: button_label.into(),
        });
        true
    }

    pub fn pending(&self) -> Option<&PendingAction<K>> {
        self.pending.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Close the prompt and hand back the action to execute. The gate stays
    /// busy until [`finish`](Self::finish).
    pub fn confirm(&mut self) -> Option<K> {
        if self.in_flight {
            return None;
        }
        let action = self.pending.take()?;
        self.in_flight = true;
        Some(action.kind)
    }

    /// Close the prompt without running anything.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// The confirmed action completed, successfully or not.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }
}
