//! Persisted session state
//!
//! Both session providers persist the signed-in user to
//! `session.json` in the bazar directory so `current_user` survives
//! across invocations. Sign-out deletes the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::User;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    user: User,
    /// Remote provider session token; unused by the local provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

pub fn path(bazar_dir: &Path) -> PathBuf {
    bazar_dir.join("session.json")
}

pub fn read(path: &Path) -> Result<Option<User>> {
    read_with_token(path).map(|opt| opt.map(|(user, _)| user))
}

pub fn read_with_token(path: &Path) -> Result<Option<(User, Option<String>)>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    // A corrupt session file means no session, not a crash
    match serde_json::from_str::<SessionFile>(&content) {
        Ok(session) => Ok(Some((session.user, session.token))),
        Err(_) => Ok(None),
    }
}

pub fn write(path: &Path, user: &User) -> Result<()> {
    write_with_token(path, user, None)
}

pub fn write_with_token(path: &Path, user: &User, token: Option<String>) -> Result<()> {
    let session = SessionFile {
        user: user.clone(),
        token,
    };
    std::fs::write(path, serde_json::to_string_pretty(&session)?)?;
    Ok(())
}

pub fn remove(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}
