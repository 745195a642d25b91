//! Logout command - end the current session

use anyhow::Result;
use bazar_core::services::LogEvent;

use super::{friendly_message, get_context, get_logger, log_event, reason_code};
use crate::output;

pub fn run() -> Result<()> {
    let logger = get_logger();
    let ctx = get_context()?;

    if !ctx.session.is_signed_in() {
        output::info("Not signed in.");
        return Ok(());
    }

    match ctx.sign_out() {
        Ok(()) => {
            output::success("Signed out.");
            log_event(&logger, LogEvent::new("sign_out").with_command("logout"));
            Ok(())
        }
        Err(e) => {
            log_event(
                &logger,
                LogEvent::new("sign_out_failed")
                    .with_command("logout")
                    .with_reason(reason_code(&e)),
            );
            output::error(&friendly_message(&e));
            std::process::exit(1);
        }
    }
}
