use crate::{error::FileError, fs::write_atomically};
use std::{
    io,
    path::{Path, PathBuf},
};
use tripsplit_application::{MemberRegistry, RegistryError};
use tripsplit_domain::MemberName;

/// Member list stored as a JSON array of names.
#[derive(Debug, Clone)]
pub struct JsonMemberRegistry {
    path: PathBuf,
}

impl JsonMemberRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<MemberName>, FileError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(FileError::io(&self.path, err)),
        };
        let names: Vec<String> =
            serde_json::from_slice(&bytes).map_err(|source| FileError::Json {
                path: self.path.clone(),
                source,
            })?;
        Ok(names.into_iter().map(MemberName::from).collect())
    }

    fn store(&self, members: &[MemberName]) -> Result<(), FileError> {
        let names: Vec<&str> = members.iter().map(MemberName::as_str).collect();
        let json = serde_json::to_vec_pretty(&names).map_err(|source| FileError::Json {
            path: self.path.clone(),
            source,
        })?;
        write_atomically(&self.path, &json)
    }
}

impl MemberRegistry for JsonMemberRegistry {
    fn members(&self) -> Result<Vec<MemberName>, RegistryError> {
        Ok(self.load()?)
    }

    fn save_members(&self, members: &[MemberName]) -> Result<(), RegistryError> {
        self.store(members)?;
        tracing::debug!(
            path = %self.path.display(),
            member_count = members.len(),
            "Saved member registry"
        );
        Ok(())
    }
}
