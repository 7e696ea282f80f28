// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Release asset management on GitHub.
///
/// Badge images live as assets of a single, long-lived release. Publishing a
/// badge replaces any asset carrying the same name.
use async_trait::async_trait;
use masterror::AppError;
use octocrab::{Octocrab, models::repos::Release};
use tracing::{debug, info};

/// Name and identifier of an asset already attached to the release.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct ExistingAsset
{
    /// Host-assigned asset identifier.
    pub id:   u64,
    /// File name of the asset.
    pub name: String,
}

/// Operations on the assets of one release.
#[async_trait]
pub trait ReleaseAssets: Send + Sync
{
    /// Lists the assets currently attached to the release.
    async fn list_assets(&self,) -> Result<Vec<ExistingAsset,>, AppError,>;

    /// Deletes the asset with identifier `id`.
    async fn delete_asset(&self, id: u64,) -> Result<(), AppError,>;

    /// Uploads `body` as a new asset called `name`.
    async fn upload_asset(&self, name: &str, body: Vec<u8,>,) -> Result<ExistingAsset, AppError,>;
}

/// Replaces the asset called `name` with `body`.
///
/// Every existing asset with that name is deleted before the upload, since
/// GitHub rejects uploads that collide with an existing asset name.
///
/// # Errors
///
/// Returns the first [`AppError`] reported by `store`.
pub async fn replace_asset<S,>(
    store: &S,
    name: &str,
    body: Vec<u8,>,
) -> Result<ExistingAsset, AppError,>
where
    S: ReleaseAssets + ?Sized,
{
    let existing = store.list_assets().await?;

    for stale in existing.iter().filter(|asset| asset.name == name,) {
        info!("Deleting stale asset {} ({})", stale.name, stale.id);
        store.delete_asset(stale.id,).await?;
    }

    let uploaded = store.upload_asset(name, body,).await?;
    info!("Uploaded asset {} ({})", uploaded.name, uploaded.id);

    Ok(uploaded,)
}

/// A GitHub release addressed by repository and tag.
#[derive(Debug, Clone,)]
pub struct GitHubRelease
{
    octocrab:   Octocrab,
    owner:      String,
    repository: String,
    release_id: u64,
}

impl GitHubRelease
{
    /// Authenticates with `token` and resolves the release tagged `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the client cannot be built or the release
    /// does not exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use modbadge::GitHubRelease;
    ///
    /// # async fn example() -> Result<(), masterror::AppError> {
    /// let token = std::env::var("GITHUB_TOKEN").unwrap_or_default();
    /// let release = GitHubRelease::connect(&token, "octocat", "monorepo", "readmebadges").await?;
    /// println!("release id {}", release.release_id());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(
        token: &str,
        owner: &str,
        repository: &str,
        tag: &str,
    ) -> Result<Self, AppError,>
    {
        let octocrab = Octocrab::builder().personal_token(token.to_owned(),).build().map_err(|e| {
            AppError::unauthorized(format!("failed to initialize GitHub client: {e}"),)
        },)?;

        debug!("Resolving release {} of {}/{}", tag, owner, repository);
        let release: Release =
            octocrab.repos(owner, repository,).releases().get_by_tag(tag,).await.map_err(|e| {
                AppError::service(format!(
                    "failed to fetch release '{tag}' of {owner}/{repository}: {e}"
                ),)
            },)?;

        Ok(Self {
            octocrab,
            owner: owner.to_owned(),
            repository: repository.to_owned(),
            release_id: release.id.into_inner(),
        },)
    }

    /// Identifier of the resolved release.
    pub const fn release_id(&self,) -> u64
    {
        self.release_id
    }
}

#[async_trait]
impl ReleaseAssets for GitHubRelease
{
    async fn list_assets(&self,) -> Result<Vec<ExistingAsset,>, AppError,>
    {
        let release: Release = self
            .octocrab
            .repos(&self.owner, &self.repository,)
            .releases()
            .get(self.release_id,)
            .await
            .map_err(|e| AppError::service(format!("failed to list release assets: {e}"),),)?;

        Ok(release
            .assets
            .into_iter()
            .map(|asset| ExistingAsset {
                id:   asset.id.into_inner(),
                name: asset.name,
            },)
            .collect(),)
    }

    async fn delete_asset(&self, id: u64,) -> Result<(), AppError,>
    {
        self.octocrab
            .repos(&self.owner, &self.repository,)
            .release_assets()
            .delete(id,)
            .await
            .map_err(|e| AppError::service(format!("failed to delete asset {id}: {e}"),),)
    }

    async fn upload_asset(&self, name: &str, body: Vec<u8,>,) -> Result<ExistingAsset, AppError,>
    {
        let asset = self
            .octocrab
            .repos(&self.owner, &self.repository,)
            .releases()
            .upload_asset(self.release_id, name, body.into(),)
            .send()
            .await
            .map_err(|e| AppError::service(format!("failed to upload asset {name}: {e}"),),)?;

        Ok(ExistingAsset {
            id:   asset.id.into_inner(),
            name: asset.name,
        },)
    }
}
