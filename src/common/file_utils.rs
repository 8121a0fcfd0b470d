use crate::error::{GeneratorError, LambdaForgeError};
use std::fs;
use std::path::Path;

/// Largest handler or template file accepted as input
pub const MAX_SOURCE_SIZE: usize = 1024 * 1024;

/// Reads file content safely with size limits
pub fn read_file_safe(path: &Path, max_size: usize) -> Result<String, LambdaForgeError> {
    let metadata = fs::metadata(path)?;

    if metadata.len() > max_size as u64 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("File too large: {}", path.display()),
        )
        .into());
    }

    Ok(fs::read_to_string(path)?)
}

/// Fail on the first path that already exists, unless `force`.
pub fn ensure_writable(paths: &[&Path], force: bool) -> Result<(), LambdaForgeError> {
    if force {
        return Ok(());
    }
    match paths.iter().find(|path| path.exists()) {
        Some(path) => Err(GeneratorError::OutputExists {
            path: path.to_path_buf(),
        }
        .into()),
        None => Ok(()),
    }
}

/// Write a generated artifact, refusing to clobber an existing file unless `force`.
pub fn write_artifact(path: &Path, content: &str, force: bool) -> Result<(), LambdaForgeError> {
    ensure_writable(&[path], force)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut content = content.to_string();
    if !content.ends_with('\n') {
        content.push('\n');
    }
    fs::write(path, content)?;
    log::debug!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_artifact_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("template.yaml");

        write_artifact(&path, "Transform: x", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "Transform: x\n");
    }

    #[test]
    fn test_write_artifact_respects_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("handler.py");
        fs::write(&path, "old").unwrap();

        let result = write_artifact(&path, "new", false);
        assert!(matches!(
            result,
            Err(LambdaForgeError::Generation(GeneratorError::OutputExists { .. }))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");

        write_artifact(&path, "new", true).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_read_file_safe_limits_size() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("handler.py");
        fs::write(&path, "x".repeat(32)).unwrap();

        assert_eq!(read_file_safe(&path, 64).unwrap().len(), 32);
        assert!(read_file_safe(&path, 16).is_err());
    }

    #[test]
    fn test_ensure_writable_checks_every_path() {
        let temp_dir = TempDir::new().unwrap();
        let handler = temp_dir.path().join("handler.py");
        let template = temp_dir.path().join("template.yaml");
        fs::write(&template, "existing").unwrap();

        let result = ensure_writable(&[handler.as_path(), template.as_path()], false);
        match result {
            Err(LambdaForgeError::Generation(GeneratorError::OutputExists { path })) => {
                assert_eq!(path, template)
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(ensure_writable(&[handler.as_path(), template.as_path()], true).is_ok());
        assert!(ensure_writable(&[handler.as_path()], false).is_ok());
    }
}
