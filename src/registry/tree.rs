//! Local filesystem operations on package trees

use crate::error::{RegistryError, RegistryResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Recursively remove a directory; a missing directory is not an error
pub async fn remove_tree(path: &Path) -> RegistryResult<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(RegistryError::io(format!("removing {}", path.display()), e)),
    }
}

/// Copy the contents of `src` into `dst`, creating `dst` as needed
///
/// Returns the number of files copied. Symlinks are recreated, not
/// followed.
pub async fn copy_tree(src: &Path, dst: &Path) -> RegistryResult<usize> {
    let mut copied = 0;
    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(src.to_path_buf(), dst.to_path_buf())];

    while let Some((from, to)) = pending.pop() {
        fs::create_dir_all(&to)
            .await
            .map_err(|e| RegistryError::io(format!("creating {}", to.display()), e))?;

        let mut entries = fs::read_dir(&from)
            .await
            .map_err(|e| RegistryError::io(format!("reading {}", from.display()), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RegistryError::io(format!("reading {}", from.display()), e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| RegistryError::io(format!("inspecting {}", entry.path().display()), e))?;
            let target = to.join(entry.file_name());

            if file_type.is_dir() {
                pending.push((entry.path(), target));
            } else if file_type.is_file() {
                fs::copy(entry.path(), &target).await.map_err(|e| {
                    RegistryError::io(format!("copying {}", entry.path().display()), e)
                })?;
                copied += 1;
            } else if file_type.is_symlink() {
                copy_symlink(&entry.path(), &target).await?;
                copied += 1;
            } else {
                warn!("Skipping special file {}", entry.path().display());
            }
        }
    }

    Ok(copied)
}

#[cfg(unix)]
async fn copy_symlink(src: &Path, dst: &Path) -> RegistryResult<()> {
    let link = fs::read_link(src)
        .await
        .map_err(|e| RegistryError::io(format!("reading link {}", src.display()), e))?;
    match fs::remove_file(dst).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(RegistryError::io(format!("replacing {}", dst.display()), e)),
    }
    fs::symlink(&link, dst)
        .await
        .map_err(|e| RegistryError::io(format!("linking {}", dst.display()), e))
}

#[cfg(not(unix))]
async fn copy_symlink(src: &Path, _dst: &Path) -> RegistryResult<()> {
    warn!("Skipping symlink {}", src.display());
    Ok(())
}

/// Clear write protection left on synced files under `root`
pub async fn make_writable(root: &Path) -> RegistryResult<()> {
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let mut entries = fs::read_dir(&dir)
            .await
            .map_err(|e| RegistryError::io(format!("reading {}", dir.display()), e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RegistryError::io(format!("reading {}", dir.display()), e))?
        {
            let path = entry.path();
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| RegistryError::io(format!("inspecting {}", path.display()), e))?;

            if metadata.file_type().is_symlink() {
                continue;
            }
            if metadata.is_dir() {
                pending.push(path.clone());
            }

            let mut perms = metadata.permissions();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                // Owner write, not "any write bit"
                if perms.mode() & 0o200 != 0 {
                    continue;
                }
                perms.set_mode(perms.mode() | 0o200);
            }
            #[cfg(not(unix))]
            {
                if !perms.readonly() {
                    continue;
                }
                perms.set_readonly(false);
            }

            fs::set_permissions(&path, perms)
                .await
                .map_err(|e| RegistryError::io(format!("making {} writable", path.display()), e))?;
        }
    }

    Ok(())
}
