// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Configuration for a badge publishing run.
//!
//! Values come from an optional YAML document and from command-line
//! overrides. [`BadgeConfig`] mirrors the document with every field optional;
//! [`Settings::resolve`] merges it with overrides, applies defaults and checks
//! the values downstream code relies on.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{self, Error};

/// Release that receives one image per module listed in the README.
pub const DEFAULT_RELEASE_TAG: &str = "readmebadges";
/// Raster endpoint of shields.io.
pub const DEFAULT_ENDPOINT: &str = "https://raster.shields.io";
/// Default README location relative to the working directory.
pub const DEFAULT_README: &str = "README.md";
/// Default shields.io label colour.
pub const DEFAULT_LABEL_COLOR: &str = "informational";
/// Default shields.io badge style.
pub const DEFAULT_STYLE: &str = "flat-square";

/// Raw configuration document.
///
/// # Examples
///
/// ```
/// use modbadge::BadgeConfig;
///
/// let yaml = r#"
/// owner: octocat
/// repo: monorepo
/// release_tag: badges
/// "#;
/// let config: BadgeConfig = serde_yaml::from_str(yaml).expect("valid configuration");
/// assert_eq!(config.repository.as_deref(), Some("monorepo"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize,)]
pub struct BadgeConfig
{
    /// Account owning the repository that hosts the badges release.
    #[serde(default, alias = "user")]
    pub owner: Option<String,>,

    /// Repository hosting the badges release.
    #[serde(default, alias = "repo")]
    pub repository: Option<String,>,

    /// Tag of the release receiving badge assets.
    #[serde(default, alias = "release", alias = "release-tag", alias = "releaseTag")]
    pub release_tag: Option<String,>,

    /// Module path prepended to each module name before deriving its colour.
    #[serde(default, alias = "module-path", alias = "modulePath")]
    pub module_path: Option<String,>,

    /// README containing the badge table.
    #[serde(default)]
    pub readme: Option<PathBuf,>,

    /// Directory receiving downloaded badge images.
    #[serde(default, alias = "output", alias = "output-dir", alias = "outputDir")]
    pub output_dir: Option<PathBuf,>,

    /// Base URL of the badge rendering service.
    #[serde(default)]
    pub endpoint: Option<String,>,

    /// Colour of the badge's label half.
    #[serde(default, alias = "label-color", alias = "labelColor")]
    pub label_color: Option<String,>,

    /// shields.io style name.
    #[serde(default)]
    pub style: Option<String,>,
}

impl BadgeConfig
{
    /// Parses a YAML document.
    ///
    /// An empty document yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for invalid YAML.
    pub fn parse(source: &str,) -> Result<Self, Error,>
    {
        if source.trim().is_empty() {
            return Ok(Self::default(),);
        }

        Ok(serde_yaml::from_str(source,)?,)
    }

    /// Loads and parses the YAML document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and [`Error::Parse`]
    /// for invalid YAML.
    pub fn load(path: &Path,) -> Result<Self, Error,>
    {
        debug!("Loading configuration from {}", path.display());
        let source = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
        Self::parse(&source,)
    }

    /// Returns a copy where every value set in `overrides` replaces the
    /// document's value.
    pub fn merge(self, overrides: Self,) -> Self
    {
        Self {
            owner:       overrides.owner.or(self.owner,),
            repository:  overrides.repository.or(self.repository,),
            release_tag: overrides.release_tag.or(self.release_tag,),
            module_path: overrides.module_path.or(self.module_path,),
            readme:      overrides.readme.or(self.readme,),
            output_dir:  overrides.output_dir.or(self.output_dir,),
            endpoint:    overrides.endpoint.or(self.endpoint,),
            label_color: overrides.label_color.or(self.label_color,),
            style:       overrides.style.or(self.style,),
        }
    }
}

/// Validated settings for a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
pub struct Settings
{
    /// Account owning the release repository.
    pub owner:       String,
    /// Release repository name.
    pub repository:  String,
    /// Tag of the badges release.
    pub release_tag: String,
    /// Module path used as colour namespace.
    pub module_path: String,
    /// README containing the badge table.
    pub readme:      PathBuf,
    /// Directory receiving badge images.
    pub output_dir:  PathBuf,
    /// Badge rendering endpoint without trailing slash.
    pub endpoint:    String,
    /// Label colour passed to the badge endpoint.
    pub label_color: String,
    /// Badge style passed to the badge endpoint.
    pub style:       String,
}

impl Settings
{
    /// Applies defaults to `config` and validates the result.
    ///
    /// `module_path` defaults to `github.com/<owner>/<repository>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when owner or repository is missing or
    /// blank, or when any configured string is blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use modbadge::{BadgeConfig, Settings};
    ///
    /// let config = BadgeConfig {
    ///     owner: Some("octocat".to_owned()),
    ///     repository: Some("monorepo".to_owned()),
    ///     ..BadgeConfig::default()
    /// };
    /// let settings = Settings::resolve(config).unwrap();
    /// assert_eq!(settings.module_path, "github.com/octocat/monorepo");
    /// assert_eq!(settings.release_tag, "readmebadges");
    /// ```
    pub fn resolve(config: BadgeConfig,) -> Result<Self, Error,>
    {
        let owner = required(config.owner, "owner",)?;
        let repository = required(config.repository, "repository",)?;
        let module_path = optional(config.module_path, "module_path",)?
            .unwrap_or_else(|| format!("github.com/{owner}/{repository}"),);
        let endpoint = optional(config.endpoint, "endpoint",)?
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_owned(),)
            .trim_end_matches('/',)
            .to_owned();

        Ok(Self {
            release_tag: optional(config.release_tag, "release_tag",)?
                .unwrap_or_else(|| DEFAULT_RELEASE_TAG.to_owned(),),
            module_path: module_path.trim_end_matches('/',).to_owned(),
            readme: config.readme.unwrap_or_else(|| PathBuf::from(DEFAULT_README,),),
            output_dir: config.output_dir.unwrap_or_else(|| PathBuf::from(".",),),
            endpoint,
            label_color: optional(config.label_color, "label_color",)?
                .unwrap_or_else(|| DEFAULT_LABEL_COLOR.to_owned(),),
            style: optional(config.style, "style",)?.unwrap_or_else(|| DEFAULT_STYLE.to_owned(),),
            owner,
            repository,
        },)
    }

    /// Identifier whose hash picks the colour of `module`'s badge.
    pub fn colour_identifier(&self, module: &str,) -> String
    {
        if module.is_empty() {
            self.module_path.clone()
        } else {
            format!("{}/{module}", self.module_path)
        }
    }
}

fn required(value: Option<String,>, field: &str,) -> Result<String, Error,>
{
    optional(value, field,)?.ok_or_else(|| Error::validation(format!("missing required '{field}'"),),)
}

fn optional(value: Option<String,>, field: &str,) -> Result<Option<String,>, Error,>
{
    match value {
        Some(text,) if text.trim().is_empty() => {
            Err(Error::validation(format!("'{field}' must not be blank"),),)
        }
        Some(text,) => Ok(Some(text.trim().to_owned(),),),
        None => Ok(None,),
    }
}
