use crate::error::FileError;
use std::path::Path;

/// Writes through a temporary sibling and renames it over `path`.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), FileError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|err| FileError::io(parent, err))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);
    std::fs::write(tmp, bytes).map_err(|err| FileError::io(tmp, err))?;
    std::fs::rename(tmp, path).map_err(|err| FileError::io(path, err))
}
