//! Login command - sign in to an existing account

use anyhow::Result;
use bazar_core::services::LogEvent;
use bazar_core::{Error, SessionError};
use dialoguer::{Input, Password};

use super::{friendly_message, get_context, get_logger, log_event, reason_code};
use crate::output;

pub fn run(email: Option<String>, federated: bool) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    if let Some(user) = ctx.session.current_user() {
        output::warning(&format!(
            "Already signed in as {}. Run 'bz logout' first.",
            user.email
        ));
        return Ok(());
    }

    let result = if federated {
        let bar = super::spinner("Signing in...");
        let result = ctx.session.sign_in_federated();
        bar.finish_and_clear();
        result
    } else {
        let email: String = match email {
            Some(email) => email,
            None => Input::new().with_prompt("Email").interact_text()?,
        };
        let password = Password::new().with_prompt("Password").interact()?;

        let bar = super::spinner("Signing in...");
        let result = ctx.session.sign_in(&email, &password);
        bar.finish_and_clear();
        result
    };

    match result {
        Ok(user) => {
            output::success(&format!("Signed in as {}.", user.email));
            log_event(&logger, LogEvent::new("sign_in").with_command("login"));
            Ok(())
        }
        // Closing the federated sign-in prompt is a cancellation, not a failure
        Err(Error::Session(SessionError::PopupClosed)) => Ok(()),
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("sign_in_failed")
                    .with_command("login")
                    .with_reason(reason_code(&e)),
            );
            output::error(&friendly_message(&e));
            std::process::exit(1);
        }
    }
}
