use anyhow::{Context, Result};
use git2::{FetchOptions, Repository, build::RepoBuilder};
use std::path::Path;

/// Clone a repository with optional branch and depth
pub fn clone_repo(
    url: &str,
    target: &Path,
    branch: Option<&str>,
    depth: Option<i32>,
) -> Result<Repository> {
    let mut fetch_options = FetchOptions::new();

    if let Some(depth) = depth {
        fetch_options.depth(depth);
    }

    fetch_options.remote_callbacks(git2::RemoteCallbacks::new());

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options);

    if let Some(branch_name) = branch {
        builder.branch(branch_name);
    }

    let repo = builder
        .clone(url, target)
        .with_context(|| format!("Failed to clone {}", url))?;

    Ok(repo)
}

/// Shallow clone (depth 1) of the default branch into `target`.
///
/// libgit2's local transport cannot negotiate depth, so `file://` URLs get a
/// full clone.
pub fn shallow_clone(url: &str, target: &Path) -> Result<Repository> {
    let depth = (!url.starts_with("file://")).then_some(1);
    clone_repo(url, target, None, depth)
}
