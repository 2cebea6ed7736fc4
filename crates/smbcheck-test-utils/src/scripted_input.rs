// SPDX-FileCopyrightText: 2026 smbcheck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted console input for workflow tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use smbcheck_core::{InputProvider, SmbError};

/// One queued reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    /// Behave as if the operator pressed Ctrl-C at this prompt.
    Interrupt,
}

/// A prompt that was shown, and whether input was masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPrompt {
    pub prompt: String,
    pub secret: bool,
}

/// Answers prompts in the order they are asked, masked or not.
///
/// Running out of answers is an input error, so a test that asks more
/// questions than expected fails loudly.
pub struct ScriptedInput {
    answers: Arc<Mutex<VecDeque<Answer>>>,
    prompts: Arc<Mutex<Vec<RecordedPrompt>>>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-load text answers.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue = answers
            .into_iter()
            .map(|a| Answer::Text(a.into()))
            .collect();
        Self {
            answers: Arc::new(Mutex::new(queue)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn push(&self, answer: Answer) {
        self.answers.lock().await.push_back(answer);
    }

    /// Prompts shown so far, in order.
    pub async fn prompts(&self) -> Vec<RecordedPrompt> {
        self.prompts.lock().await.clone()
    }

    /// Answers not consumed.
    pub async fn remaining(&self) -> usize {
        self.answers.lock().await.len()
    }

    async fn answer(&self, prompt: &str, secret: bool) -> Result<String, SmbError> {
        self.prompts.lock().await.push(RecordedPrompt {
            prompt: prompt.to_string(),
            secret,
        });
        match self.answers.lock().await.pop_front() {
            Some(Answer::Text(text)) => Ok(text),
            Some(Answer::Interrupt) => Err(SmbError::Cancelled),
            None => Err(SmbError::Input(format!("no scripted answer for `{prompt}`"))),
        }
    }
}

impl Default for ScriptedInput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InputProvider for ScriptedInput {
    async fn read_line(&self, prompt: &str) -> Result<String, SmbError> {
        self.answer(prompt, false).await
    }

    async fn read_secret(&self, prompt: &str) -> Result<String, SmbError> {
        self.answer(prompt, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answers_in_order_and_records_masking() {
        let input = ScriptedInput::with_answers(["nas", "hunter2"]);
        assert_eq!(input.read_line("Server: ").await.unwrap(), "nas");
        assert_eq!(input.read_secret("Password: ").await.unwrap(), "hunter2");

        let prompts = input.prompts().await;
        assert!(!prompts[0].secret);
        assert!(prompts[1].secret);
    }

    #[tokio::test]
    async fn interrupt_and_exhaustion() {
        let input = ScriptedInput::new();
        input.push(Answer::Interrupt).await;
        assert!(matches!(
            input.read_line("Share: ").await,
            Err(SmbError::Cancelled)
        ));
        assert!(matches!(
            input.read_line("Share: ").await,
            Err(SmbError::Input(_))
        ));
    }
}
