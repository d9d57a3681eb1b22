//! Terminal-backed secret prompt.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};

use coursework_core::{CredentialError, Secret, SecretPrompt};

/// Asks for secrets on stderr; keys are read without echo.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl SecretPrompt for TerminalPrompt {
    fn prompt(&self, secret: Secret) -> Result<String, CredentialError> {
        let theme = ColorfulTheme::default();
        let answer = if secret.is_sensitive() {
            Password::with_theme(&theme)
                .with_prompt(secret.label())
                .interact()
        } else {
            Input::<String>::with_theme(&theme)
                .with_prompt(secret.label())
                .interact_text()
        };
        answer.map_err(|e| CredentialError::PromptCancelled {
            secret,
            reason: e.to_string(),
        })
    }
}
