// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Semantic version ordering for module tags.
//!
//! Tags have the shape `<prefix>/v<major>.<minor>.<patch>`. The prefix is the
//! text before the final `/` and may itself contain slashes, which is how
//! nested modules of a multi-module repository are tagged. Versions are
//! compared numerically, component by component, so `1.10.0` ranks above
//! `1.9.0`.

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::error::Error;

/// Three-component semantic version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash,)]
pub struct Version
{
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
}

impl Version
{
    /// Creates a version from its three components.
    pub const fn new(major: u64, minor: u64, patch: u64,) -> Self
    {
        Self {
            major,
            minor,
            patch,
        }
    }

    fn components(self,) -> [u64; 3]
    {
        [self.major, self.minor, self.patch,]
    }
}

impl Ord for Version
{
    fn cmp(&self, other: &Self,) -> Ordering
    {
        for (left, right,) in self.components().into_iter().zip(other.components(),) {
            match left.cmp(&right,) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }

        Ordering::Equal
    }
}

impl PartialOrd for Version
{
    fn partial_cmp(&self, other: &Self,) -> Option<Ordering,>
    {
        Some(self.cmp(other,),)
    }
}

impl fmt::Display for Version
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version
{
    type Err = String;

    /// Parses `MAJOR.MINOR.PATCH` with an optional leading `v`.
    ///
    /// The error is a reason string; [`Tag::parse`] attaches the offending
    /// tag when wrapping it into [`Error::MalformedVersion`].
    fn from_str(value: &str,) -> Result<Self, Self::Err,>
    {
        let trimmed = value.strip_prefix('v',).unwrap_or(value,);
        let parts: Vec<&str,> = trimmed.split('.',).collect();
        if parts.len() != 3 {
            return Err(format!("expected 3 components, found {}", parts.len()),);
        }

        let mut components = [0u64; 3];
        for (slot, part,) in components.iter_mut().zip(&parts,) {
            *slot = parse_component(part,)?;
        }

        let [major, minor, patch,] = components;
        Ok(Self::new(major, minor, patch,),)
    }
}

fn parse_component(part: &str,) -> Result<u64, String,>
{
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit(),) {
        return Err(format!("component '{part}' is not a non-negative integer"),);
    }

    part.parse::<u64,>().map_err(|error| format!("component '{part}' is out of range: {error}"),)
}

/// Splits a tag into its module prefix and version suffix.
///
/// A tag without any `/` belongs to the root module and yields an empty
/// prefix.
///
/// # Examples
///
/// ```
/// use modbadge::split_tag;
///
/// assert_eq!(split_tag("tools/lint/v1.2.3"), ("tools/lint", "v1.2.3"));
/// assert_eq!(split_tag("v0.1.0"), ("", "v0.1.0"));
/// ```
pub fn split_tag(tag: &str,) -> (&str, &str,)
{
    match tag.rsplit_once('/',) {
        Some((prefix, version,),) => (prefix, version,),
        None => ("", tag,),
    }
}

/// A tag decomposed into prefix and version.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct Tag<'a,>
{
    /// Tag exactly as discovered.
    pub raw:     &'a str,
    /// Module prefix before the final `/`.
    pub prefix:  &'a str,
    /// Parsed version suffix.
    pub version: Version,
}

impl<'a,> Tag<'a,>
{
    /// Parses a tag of the form `<prefix>/v<major>.<minor>.<patch>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedVersion`] when the suffix does not decompose
    /// into exactly three non-negative integers.
    pub fn parse(raw: &'a str,) -> Result<Self, Error,>
    {
        let (prefix, suffix,) = split_tag(raw,);
        let version =
            suffix.parse::<Version,>().map_err(|reason| Error::malformed_version(raw, reason,),)?;

        Ok(Self {
            raw,
            prefix,
            version,
        },)
    }
}

/// Returns the tag with the highest version from `tags`.
///
/// All tags are expected to share a module prefix. Every tag is validated, so
/// a single malformed entry fails the call even when it would not win. When
/// several tags carry an equal version the first one is returned.
///
/// # Errors
///
/// Returns [`Error::MalformedVersion`] for an undecomposable tag and
/// [`Error::NoTags`] when `tags` is empty.
///
/// # Examples
///
/// ```
/// use modbadge::latest_version;
///
/// let tags = ["moduleA/v1.0.0", "moduleA/v1.2.0", "moduleA/v1.10.0"];
/// assert_eq!(latest_version(tags).unwrap(), "moduleA/v1.10.0");
/// ```
pub fn latest_version<'a, I,>(tags: I,) -> Result<&'a str, Error,>
where
    I: IntoIterator<Item = &'a str,>,
{
    let mut latest: Option<Tag<'a,>,> = None;

    for raw in tags {
        let candidate = Tag::parse(raw,)?;
        let replace = match &latest {
            Some(current,) => candidate.version > current.version,
            None => true,
        };
        if replace {
            latest = Some(candidate,);
        }
    }

    latest.map(|tag| tag.raw,).ok_or(Error::NoTags,)
}
