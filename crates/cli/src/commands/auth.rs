//! Session commands: `login`, `logout`, `whoami`.

use std::io::{self, BufRead, Write};

use medishop_client::filters;
use medishop_client::state::AppState;
use medishop_client::views::{Activation, LoginSubmission};
use secrecy::SecretString;

use super::CommandError;

/// Log in, prompting for the password when none was given.
pub async fn login(
    state: &AppState,
    username: &str,
    password: Option<String>,
    out: &mut impl Write,
) -> Result<(), CommandError> {
    let view = state.login_view();

    if let Activation::Redirect(_) = view.activate() {
        let user = state.session().current_user();
        writeln!(out, "Already logged in as {}.", user.username)?;
        return Ok(());
    }

    let password = match password {
        Some(password) => SecretString::from(password),
        None => prompt_password()?,
    };

    match view.submit(username, &password).await? {
        LoginSubmission::Redirect(_) => writeln!(out, "{}", filters::greeting(username))?,
        LoginSubmission::Rejected(notice) => writeln!(out, "{notice}")?,
    }
    Ok(())
}

/// Clear the stored session.
pub fn logout(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    state.login_view().logout()?;
    writeln!(out, "Logged out.")?;
    Ok(())
}

/// Show who is logged in.
pub fn whoami(state: &AppState, out: &mut impl Write) -> Result<(), CommandError> {
    let session = state.session();
    if session.is_authenticated() {
        let user = session.current_user();
        writeln!(
            out,
            "[{}] {} (user {})",
            user.initial(),
            user.username,
            user.user_id
        )?;
    } else {
        writeln!(out, "Not logged in.")?;
    }
    Ok(())
}

fn prompt_password() -> io::Result<SecretString> {
    let mut stderr = io::stderr();
    write!(stderr, "Password: ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::from(password))
}
