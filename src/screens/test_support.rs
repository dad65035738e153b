//! Confirm double shared by the screen tests.

use std::sync::Mutex;

use super::Confirm;

/// Gives a fixed answer and records every prompt it was shown.
pub(crate) struct ScriptedConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirm {
    pub(crate) fn yes() -> Self {
        Self { answer: true, prompts: Mutex::new(Vec::new()) }
    }

    pub(crate) fn no() -> Self {
        Self { answer: false, prompts: Mutex::new(Vec::new()) }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.answer
    }
}
