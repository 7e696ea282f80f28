// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Badge planning and publishing.
//!
//! A run first turns the README's module list into [`BadgePlan`]s, one per
//! module: latest tag, colour, asset name and image URL. Plans are pure data
//! and can be printed as a dry run. Publishing then downloads each image,
//! stores it under the output directory and replaces the matching release
//! asset, one module at a time.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    colour::{Colour, colour_for},
    config::Settings,
    error::{self, Error},
    readme::asset_name,
    release::{ExistingAsset, ReleaseAssets, replace_asset},
    shields::{BadgeRequest, ShieldsClient, badge_url},
    tags::ModuleGroups,
    version::{Tag, Version, split_tag},
};

/// Everything needed to render and publish one module's badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct BadgePlan
{
    /// Module prefix as listed in the README.
    pub module:     String,
    /// Latest tag of the module.
    pub tag:        String,
    /// Version component of `tag`, without the leading `v`.
    #[serde(serialize_with = "serialize_display")]
    pub version:    Version,
    /// Badge colour.
    #[serde(serialize_with = "serialize_display")]
    pub colour:     Colour,
    /// Release asset and file name.
    pub asset_name: String,
    /// Image request URL.
    pub badge_url:  String,
}

/// Outcome of publishing one plan.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct PublishedBadge
{
    /// Module prefix.
    pub module: String,
    /// Local copy of the image.
    pub path:   PathBuf,
    /// Asset now attached to the release.
    pub asset:  ExistingAsset,
}

fn serialize_display<T, S,>(value: &T, serializer: S,) -> Result<S::Ok, S::Error,>
where
    T: std::fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value,)
}

/// Resolves a [`BadgePlan`] for every module prefix, preserving order.
///
/// # Errors
///
/// Returns [`Error::EmptyPrefix`] for the empty prefix, which groups tags
/// without a `/` and has no badge, [`Error::MissingModule`] for a prefix
/// without tags,
/// [`Error::MalformedVersion`] for an undecomposable tag in a listed module,
/// and [`Error::Service`] when the badge URL cannot be built.
///
/// # Example
///
/// ```
/// use modbadge::{BadgeConfig, ModuleGroups, Settings, plan_badges};
///
/// # fn main() -> Result<(), modbadge::Error> {
/// let settings = Settings::resolve(BadgeConfig {
///     owner: Some("octocat".to_owned()),
///     repository: Some("monorepo".to_owned()),
///     ..BadgeConfig::default()
/// })?;
/// let groups = ModuleGroups::from_listing("api/v1.9.0\napi/v1.10.0\n");
/// let plans = plan_badges(&groups, &["api".to_owned()], &settings)?;
/// assert_eq!(plans[0].tag, "api/v1.10.0");
/// assert_eq!(plans[0].asset_name, "api.png");
/// # Ok(())
/// # }
/// ```
pub fn plan_badges(
    groups: &ModuleGroups,
    prefixes: &[String],
    settings: &Settings,
) -> Result<Vec<BadgePlan,>, Error,>
{
    prefixes.iter().map(|prefix| plan_badge(groups, prefix, settings,),).collect()
}

fn plan_badge(groups: &ModuleGroups, prefix: &str, settings: &Settings,) -> Result<BadgePlan, Error,>
{
    if prefix.is_empty() {
        return Err(Error::EmptyPrefix,);
    }

    let latest = groups.latest(prefix,)?;
    let tag = Tag::parse(latest,)?;
    let (_, message,) = split_tag(latest,);
    let colour = colour_for(&settings.colour_identifier(prefix,),);

    let url = badge_url(
        &settings.endpoint,
        &BadgeRequest {
            label: prefix,
            message,
            colour,
            label_color: &settings.label_color,
            style: &settings.style,
        },
    )?;

    debug!("Planned badge for '{}': {} ({})", prefix, latest, colour);

    Ok(BadgePlan {
        module: prefix.to_owned(),
        tag: latest.to_owned(),
        version: tag.version,
        colour,
        asset_name: asset_name(prefix,),
        badge_url: url.into(),
    },)
}

/// Downloads, stores and publishes every plan in order.
///
/// The first failure aborts the run; earlier modules stay published.
///
/// # Errors
///
/// Returns [`Error::BadgeIo`] when an image cannot be written and
/// [`Error::Service`] for endpoint or release host failures.
pub async fn publish_badges<S,>(
    plans: &[BadgePlan],
    shields: &ShieldsClient,
    store: &S,
    output_dir: &Path,
) -> Result<Vec<PublishedBadge,>, Error,>
where
    S: ReleaseAssets + ?Sized,
{
    fs::create_dir_all(output_dir,).map_err(|source| error::badge_io_error(output_dir, source,),)?;

    let progress = ProgressBar::new(plans.len() as u64,);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{pos}/{len}] {msg}",)
            .unwrap_or_else(|_| ProgressStyle::default_bar(),),
    );

    let mut published = Vec::with_capacity(plans.len(),);
    for plan in plans {
        progress.set_message(format!("{} {}", plan.module, plan.tag),);

        let url = plan
            .badge_url
            .parse::<Url,>()
            .map_err(|e| Error::service(format!("invalid badge URL {}: {e}", plan.badge_url),),)?;
        let image = shields.fetch(&url,).await?;

        let path = output_dir.join(&plan.asset_name,);
        write_image(&path, &image,)?;

        let asset = replace_asset(store, &plan.asset_name, image,).await?;
        info!("Published {} for {}", asset.name, plan.tag);

        published.push(PublishedBadge {
            module: plan.module.clone(),
            path,
            asset,
        },);
        progress.inc(1,);
    }

    progress.finish_and_clear();
    Ok(published,)
}

fn write_image(path: &Path, image: &[u8],) -> Result<(), Error,>
{
    let file = File::create(path,).map_err(|source| error::badge_io_error(path, source,),)?;
    let mut writer = BufWriter::new(file,);
    writer.write_all(image,).map_err(|source| error::badge_io_error(path, source,),)?;
    writer.flush().map_err(|source| error::badge_io_error(path, source,),)
}

#[cfg(test)]
mod tests
{
    use tempfile::tempdir;

    use super::*;
    use crate::{config::BadgeConfig, release::tests::MemoryRelease};

    fn settings(endpoint: &str,) -> Settings
    {
        Settings::resolve(BadgeConfig {
            owner: Some("octocat".to_owned(),),
            repository: Some("monorepo".to_owned(),),
            endpoint: Some(endpoint.to_owned(),),
            ..BadgeConfig::default()
        },)
        .expect("valid settings",)
    }

    const LISTING: &str = "api/v1.0.0\napi/v1.10.0\napi/v1.2.0\ntools/lint/v0.3.1\n";

    #[test]
    fn plan_badges_resolves_latest_tags_in_table_order()
    {
        let groups = ModuleGroups::from_listing(LISTING,);
        let prefixes = vec!["tools/lint".to_owned(), "api".to_owned()];

        let plans =
            plan_badges(&groups, &prefixes, &settings("https://raster.shields.io",),).expect("plans",);

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].module, "tools/lint");
        assert_eq!(plans[0].tag, "tools/lint/v0.3.1");
        assert_eq!(plans[0].asset_name, "tools__lint.png");
        assert_eq!(plans[1].version, Version::new(1, 10, 0,));
        assert!(plans[1].badge_url.starts_with("https://raster.shields.io/badge/api-v1.10.0-"));
        assert_eq!(plans[1].colour, colour_for("github.com/octocat/monorepo/api",));
    }

    #[test]
    fn plan_badges_fails_for_unknown_module()
    {
        let groups = ModuleGroups::from_listing(LISTING,);
        let error = plan_badges(&groups, &["web".to_owned()], &settings("https://raster.shields.io",),)
            .expect_err("expected missing module",);
        assert!(matches!(error, Error::MissingModule { .. }));
    }

    #[test]
    fn plan_badges_rejects_the_empty_prefix()
    {
        let groups = ModuleGroups::from_listing("v1.0.0\napi/v1.0.0\n",);
        let error = plan_badges(&groups, &[String::new()], &settings("https://raster.shields.io",),)
            .expect_err("expected empty prefix error",);
        assert!(matches!(error, Error::EmptyPrefix));
    }

    #[test]
    fn plan_serializes_version_and_colour_as_text()
    {
        let groups = ModuleGroups::from_listing(LISTING,);
        let plans = plan_badges(&groups, &["api".to_owned()], &settings("https://raster.shields.io",),)
            .expect("plans",);

        let json = serde_json::to_value(&plans[0],).expect("serializable",);
        assert_eq!(json["version"], "1.10.0");
        assert_eq!(json["colour"], plans[0].colour.hex());
        assert_eq!(json["asset_name"], "api.png");
    }

    #[tokio::test]
    async fn publish_badges_writes_files_and_replaces_assets()
    {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Regex(r"^/badge/".to_owned(),),)
            .with_status(200,)
            .with_body(b"png-bytes",)
            .expect(2,)
            .create_async()
            .await;

        let groups = ModuleGroups::from_listing(LISTING,);
        let prefixes = vec!["api".to_owned(), "tools/lint".to_owned()];
        let plans = plan_badges(&groups, &prefixes, &settings(&server.url(),),).expect("plans",);

        let temp = tempdir().expect("failed to create tempdir",);
        let output = temp.path().join("badges",);
        let release = MemoryRelease::with_assets(&["api.png",],);
        let shields = ShieldsClient::new().expect("client",);

        let published =
            publish_badges(&plans, &shields, &release, &output,).await.expect("publish succeeds",);

        assert_eq!(published.len(), 2);
        assert_eq!(fs::read(output.join("api.png",),).expect("api image",), b"png-bytes");
        assert!(output.join("tools__lint.png",).exists());
        assert_eq!(release.count_named("api.png",), 1);
        assert_eq!(release.body_of("api.png",).as_deref(), Some(&b"png-bytes"[..]));
        assert_eq!(*release.deleted.lock().expect("lock",), vec![1]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn publish_badges_stops_at_first_failure()
    {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any,)
            .with_status(200,)
            .with_body(b"png",)
            .create_async()
            .await;

        let groups = ModuleGroups::from_listing(LISTING,);
        let prefixes = vec!["api".to_owned(), "tools/lint".to_owned()];
        let plans = plan_badges(&groups, &prefixes, &settings(&server.url(),),).expect("plans",);

        let temp = tempdir().expect("failed to create tempdir",);
        let release = MemoryRelease {
            fail_for: Some("api.png".to_owned(),),
            ..MemoryRelease::default()
        };
        let shields = ShieldsClient::new().expect("client",);

        let error = publish_badges(&plans, &shields, &release, temp.path(),)
            .await
            .expect_err("expected upload failure",);

        assert!(matches!(error, Error::Service { .. }));
        assert_eq!(release.count_named("tools__lint.png",), 0);
    }
}
