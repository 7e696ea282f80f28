// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Grouping of discovered tags by module prefix.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    error::Error,
    version::{latest_version, split_tag},
};

/// Tags discovered in a repository, grouped by module prefix.
///
/// Built once from the output of `git tag` and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct ModuleGroups
{
    groups: BTreeMap<String, Vec<String,>,>,
}

impl ModuleGroups
{
    /// Groups newline-separated tags by their module prefix.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use modbadge::ModuleGroups;
    ///
    /// let groups = ModuleGroups::from_listing("api/v1.0.0\napi/v1.1.0\ncli/v0.3.0\n");
    /// assert_eq!(groups.len(), 2);
    /// assert_eq!(groups.tags("api").map(<[String]>::len), Some(2));
    /// ```
    pub fn from_listing(listing: &str,) -> Self
    {
        let mut groups: BTreeMap<String, Vec<String,>,> = BTreeMap::new();

        for tag in listing.lines().map(str::trim,).filter(|line| !line.is_empty(),) {
            let (prefix, _,) = split_tag(tag,);
            groups.entry(prefix.to_owned(),).or_default().push(tag.to_owned(),);
        }

        debug!("Grouped tags into {} module prefixes", groups.len());

        Self {
            groups,
        }
    }

    /// Returns the tags recorded for `prefix`.
    pub fn tags(&self, prefix: &str,) -> Option<&[String],>
    {
        self.groups.get(prefix,).map(Vec::as_slice,)
    }

    /// Iterates over the known module prefixes in sorted order.
    pub fn prefixes(&self,) -> impl Iterator<Item = &str,>
    {
        self.groups.keys().map(String::as_str,)
    }

    /// Number of distinct prefixes.
    pub fn len(&self,) -> usize
    {
        self.groups.len()
    }

    /// Returns `true` when no tags were discovered.
    pub fn is_empty(&self,) -> bool
    {
        self.groups.is_empty()
    }

    /// Resolves the latest tag for `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingModule`] when the prefix has no tags and
    /// [`Error::MalformedVersion`] when one of its tags cannot be decomposed.
    pub fn latest(&self, prefix: &str,) -> Result<&str, Error,>
    {
        let tags = self.tags(prefix,).ok_or_else(|| Error::MissingModule {
            prefix: prefix.to_owned(),
        },)?;

        latest_version(tags.iter().map(String::as_str,),)
    }
}
