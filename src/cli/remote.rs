//! A [`JarRemote`] backed by JSON response files in a directory.
//!
//! The directory mirrors the backend's endpoints: `jar-division.json` holds
//! the profile response and `balance.json` the balance response. Saving
//! rewrites `jar-division.json` as the backend would.

use std::{
    fs,
    path::{Path, PathBuf},
};

use jar_core::{JarRemote, RemoteError};
use jar_domain::{ApiResponse, Balance, JarInfo, UpdateJarPercentagesRequest};
use serde::de::DeserializeOwned;

pub const PROFILE_FILE: &str = "jar-division.json";
pub const BALANCE_FILE: &str = "balance.json";

#[derive(Debug, Clone)]
pub struct JsonDirRemote {
    dir: PathBuf,
}

impl JsonDirRemote {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn profile_path(&self) -> PathBuf {
        self.dir.join(PROFILE_FILE)
    }

    pub fn balance_path(&self) -> PathBuf {
        self.dir.join(BALANCE_FILE)
    }

    fn write_profile(&self, response: &ApiResponse<JarInfo>) -> Result<(), RemoteError> {
        let path = self.profile_path();
        let json = serde_json::to_string_pretty(response)
            .map_err(|err| RemoteError::Transport(err.to_string()))?;
        fs::create_dir_all(&self.dir).map_err(|err| transport(&self.dir, err))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|err| transport(&tmp, err))?;
        fs::rename(&tmp, &path).map_err(|err| transport(&path, err))
    }
}

/// Reads one response file.
pub fn read_response<T: DeserializeOwned>(path: &Path) -> Result<ApiResponse<T>, RemoteError> {
    let data = fs::read_to_string(path).map_err(|err| transport(path, err))?;
    serde_json::from_str(&data).map_err(|err| transport(path, err))
}

fn transport(path: &Path, err: impl std::fmt::Display) -> RemoteError {
    RemoteError::Transport(format!("{}: {err}", path.display()))
}

impl JarRemote for JsonDirRemote {
    fn fetch_jar_info(&self) -> Result<ApiResponse<JarInfo>, RemoteError> {
        read_response(&self.profile_path())
    }

    fn fetch_balance(&self) -> Result<ApiResponse<Balance>, RemoteError> {
        read_response(&self.balance_path())
    }

    fn update_jar_percentages(
        &self,
        request: &UpdateJarPercentagesRequest,
    ) -> Result<ApiResponse<JarInfo>, RemoteError> {
        let mut info = JarInfo::from(*request);
        // Keep the owner of an existing profile.
        if let Ok(ApiResponse {
            result: Some(existing),
            ..
        }) = read_response::<JarInfo>(&self.profile_path())
        {
            info.user_id = existing.user_id;
        }
        let response = ApiResponse::success(info);
        self.write_profile(&response)?;
        tracing::info!(path = %self.profile_path().display(), "jar division saved");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jar_domain::{default_percentages, JarCategory};
    use tempfile::TempDir;

    #[test]
    fn update_keeps_user_id_and_round_trips() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PROFILE_FILE),
            r#"{"code":1000,"result":{"userId":"u-9","necessitiesPercentage":100,
            "educationPercentage":0,"savingsPercentage":0,"entertainmentPercentage":0,
            "givingPercentage":0,"investmentPercentage":0}}"#,
        )
        .unwrap();
        let remote = JsonDirRemote::new(dir.path());

        let request = UpdateJarPercentagesRequest::from(default_percentages());
        remote.update_jar_percentages(&request).unwrap();

        let stored = remote.fetch_jar_info().unwrap().result.unwrap();
        assert_eq!(stored.user_id, "u-9");
        assert_eq!(stored.percentages().get(JarCategory::Necessities), 55.0);
    }

    #[test]
    fn missing_files_are_transport_errors() {
        let dir = TempDir::new().unwrap();
        let remote = JsonDirRemote::new(dir.path());
        let err = remote.fetch_balance().unwrap_err();
        assert!(matches!(err, RemoteError::Transport(message) if message.contains(BALANCE_FILE)));
    }
}
