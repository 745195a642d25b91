//! Signup command - create an account and sign in

use anyhow::Result;
use bazar_core::services::LogEvent;
use dialoguer::{Input, Password};

use super::{friendly_message, get_context, get_logger, log_event, reason_code};
use crate::output;

pub fn run(email: Option<String>, name: Option<String>) -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    if let Some(user) = ctx.session.current_user() {
        output::warning(&format!(
            "Already signed in as {}. Run 'bz logout' first.",
            user.email
        ));
        return Ok(());
    }

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let name: String = match name {
        Some(name) => name,
        None => Input::new()
            .with_prompt("Display name")
            .allow_empty(true)
            .interact_text()?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()?;

    let bar = super::spinner("Creating account...");
    let result = ctx.session.sign_up(&email, &password, &name);
    bar.finish_and_clear();

    match result {
        Ok(user) => {
            output::success(&format!("Account created. Signed in as {}.", user.email));
            log_event(&logger, LogEvent::new("sign_up").with_command("signup"));
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("sign_up_failed")
                    .with_command("signup")
                    .with_reason(reason_code(&e)),
            );
            output::error(&friendly_message(&e));
            std::process::exit(1);
        }
    }
}
