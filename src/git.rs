// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Tag discovery through the `git` binary.
use std::{path::Path, process::Command};

use tracing::debug;

use crate::error::Error;

/// Lists the tags of the repository at `repository`.
///
/// # Arguments
///
/// * `repository` - Working tree or bare repository to inspect
///
/// # Returns
///
/// Raw `git tag` output, one tag per line.
///
/// # Errors
///
/// Returns [`Error::Git`] when git cannot be spawned or exits unsuccessfully.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use modbadge::{ModuleGroups, list_tags};
///
/// # fn example() -> Result<(), modbadge::Error> {
/// let listing = list_tags(Path::new("."))?;
/// let groups = ModuleGroups::from_listing(&listing);
/// println!("{} modules", groups.len());
/// # Ok(())
/// # }
/// ```
pub fn list_tags(repository: &Path,) -> Result<String, Error,>
{
    run_git(repository, &["tag",],)
}

fn run_git(repository: &Path, args: &[&str],) -> Result<String, Error,>
{
    debug!("Running git {} in {}", args.join(" "), repository.display());

    let output = Command::new("git",)
        .arg("-C",)
        .arg(repository,)
        .args(args,)
        .output()
        .map_err(|e| Error::Git {
            message: format!("failed to run git: {e}"),
        },)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr,);
        return Err(Error::Git {
            message: format!("git {} failed: {}", args.join(" "), stderr.trim()),
        },);
    }

    Ok(String::from_utf8_lossy(&output.stdout,).into_owned(),)
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn missing_repository_reports_git_error()
    {
        let dir = tempdir().expect("failed to create tempdir",);
        let missing = dir.path().join("does-not-exist",);

        let error = list_tags(&missing,).expect_err("expected git failure",);
        assert!(matches!(error, Error::Git { .. }));
    }
}
