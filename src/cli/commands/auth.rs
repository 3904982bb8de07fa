//! Login, logout and whoami

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{MasteryError, Result};

/// Log in; prompts for the password when it is not given
pub fn login(username: &str, password: Option<String>) -> Result<()> {
    let ctx = CommandContext::load()?;

    let password = match password {
        Some(password) => password,
        None => console::Term::stderr()
            .read_secure_line()
            .map_err(MasteryError::Io)?,
    };

    let session = ctx.sessions().login(username, &password)?;
    Output::new().success(&format!("Welcome back, {}!", session.username));
    Ok(())
}

pub fn logout() -> Result<()> {
    let ctx = CommandContext::load()?;
    ctx.sessions().logout()?;
    Output::new().success("Logged out");
    Ok(())
}

pub fn whoami() -> Result<()> {
    let ctx = CommandContext::load()?;
    let output = Output::new();
    match ctx.sessions().current()? {
        Some(session) => output.info(&format!(
            "{} (user id: {})",
            session.username, session.user_id
        )),
        None => output.warning("Not logged in"),
    }
    Ok(())
}
