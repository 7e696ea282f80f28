//! Version badges for multi-module repositories.
//!
//! The library reads tags grouped by module prefix, learns from a README
//! table which modules need badges, resolves the latest semantic version per
//! module, and publishes one coloured badge image per module as an asset of a
//! fixed GitHub release. Ordering ([`latest_version`]) and colouring
//! ([`colour_for`]) are pure functions; the remaining modules wrap git, the
//! badge rendering endpoint and the release host.

mod badge;
mod colour;
mod config;
mod error;
mod git;
mod readme;
mod release;
mod shields;
mod tags;
mod version;

pub use badge::{BadgePlan, PublishedBadge, plan_badges, publish_badges};
pub use colour::{Colour, colour_for};
pub use config::{
    BadgeConfig, DEFAULT_ENDPOINT, DEFAULT_LABEL_COLOR, DEFAULT_README, DEFAULT_RELEASE_TAG,
    DEFAULT_STYLE, Settings,
};
pub use error::{Error, badge_io_error, io_error};
pub use git::list_tags;
pub use readme::{
    asset_name, escape_filename, extract_table, load_module_prefixes, module_prefixes,
    unescape_filename,
};
pub use release::{ExistingAsset, GitHubRelease, ReleaseAssets, replace_asset};
pub use shields::{BadgeRequest, ShieldsClient, badge_url, escape_badge_text};
pub use tags::ModuleGroups;
pub use version::{Tag, Version, latest_version, split_tag};
