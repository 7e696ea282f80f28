// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Reads the module badge table embedded in README.md.
///
/// The table is a Markdown table with a `Latest Tag` column whose cells embed
/// badge images served from the badges release, for example:
///
/// ```text
/// | Module     | Latest Tag                                                        |
/// |------------|-------------------------------------------------------------------|
/// | tools/lint | <img src="https://github.com/o/r/releases/download/readmebadges/tools__lint.png"> |
/// ```
///
/// The asset name in each cell identifies the module prefix to resolve.
use std::{fs, path::Path, sync::LazyLock};

use regex::Regex;
use tracing::{debug, info};

use crate::error::{self, Error};

const LATEST_TAG_HEADER: &str = "Latest Tag";

static HEADER_PATTERN: LazyLock<Regex,> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\|.*\bLatest Tag\b.*\|[ \t]*\r?$",).expect("valid header pattern",)
},);

/// Reads `readme_path` and returns the module prefixes listed in its badge
/// table, in table order.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and [`Error::Readme`]
/// when the table is missing or a row lacks a badge reference.
pub fn load_module_prefixes(readme_path: &Path, release_tag: &str,) -> Result<Vec<String,>, Error,>
{
    info!("Reading badge table from {}", readme_path.display());
    let contents =
        fs::read_to_string(readme_path,).map_err(|source| error::io_error(readme_path, source,),)?;

    module_prefixes(&contents, release_tag,)
}

/// Returns the first table whose header row has a `Latest Tag` column.
///
/// The returned slice spans the header, the separator row and every
/// consecutive row that starts with `|`.
///
/// # Errors
///
/// Returns [`Error::Readme`] when no such table exists.
pub fn extract_table(contents: &str,) -> Result<&str, Error,>
{
    let header = HEADER_PATTERN
        .find(contents,)
        .ok_or_else(|| Error::readme(format!("no table with a '{LATEST_TAG_HEADER}' column"),),)?;

    let mut end = header.end();
    let mut cursor =
        contents[end..].find('\n',).map_or(contents.len(), |newline| end + newline + 1,);

    for line in contents[cursor..].split_inclusive('\n',) {
        if !line.trim_start().starts_with('|',) {
            break;
        }
        cursor += line.len();
        end = cursor;
    }

    Ok(contents[header.start()..end].trim_end(),)
}

/// Extracts module prefixes from the badge table in `contents`.
///
/// # Errors
///
/// Returns [`Error::Readme`] when the table is missing, has no separator row,
/// or a data row has no badge pointing at `release_tag`.
///
/// # Examples
///
/// ```
/// use modbadge::module_prefixes;
///
/// let readme = "\
/// | Module | Latest Tag |
/// |--------|------------|
/// | api    | <img src=\"https://github.com/o/r/releases/download/readmebadges/api.png\"> |
/// | lint   | <img src=\"https://github.com/o/r/releases/download/readmebadges/tools__lint.png\"> |
/// ";
/// let prefixes = module_prefixes(readme, "readmebadges").unwrap();
/// assert_eq!(prefixes, vec!["api", "tools/lint"]);
/// ```
pub fn module_prefixes(contents: &str, release_tag: &str,) -> Result<Vec<String,>, Error,>
{
    let table = extract_table(contents,)?;
    let badge_pattern = badge_pattern(release_tag,)?;

    let mut lines = table.lines();
    let header = lines.next().map(split_row,).unwrap_or_default();
    let column = header
        .iter()
        .position(|cell| header_text(cell,) == LATEST_TAG_HEADER,)
        .ok_or_else(|| Error::readme(format!("header has no '{LATEST_TAG_HEADER}' cell"),),)?;

    if lines.next().is_none() {
        return Err(Error::readme("table has no separator row",),);
    }

    let mut prefixes = Vec::new();
    for (index, row,) in lines.enumerate() {
        let cells = split_row(row,);
        let cell = cells.get(column,).ok_or_else(|| {
            Error::readme(format!("row {} has no '{LATEST_TAG_HEADER}' cell", index + 1),)
        },)?;

        let escaped = badge_pattern
            .captures(cell,)
            .and_then(|captures| captures.get(1,),)
            .ok_or_else(|| {
                Error::readme(format!(
                    "row {} has no badge from release '{release_tag}': {}",
                    index + 1,
                    cell
                ),)
            },)?;

        let prefix = unescape_filename(escaped.as_str(),);
        debug!("Badge table lists module '{}'", prefix);
        prefixes.push(prefix,);
    }

    info!("Badge table lists {} modules", prefixes.len());
    Ok(prefixes,)
}

fn badge_pattern(release_tag: &str,) -> Result<Regex, Error,>
{
    let pattern = format!(r#"download/{}/([^"'()\s/]+)\.png"#, regex::escape(release_tag));
    Regex::new(&pattern,).map_err(|e| Error::readme(format!("invalid badge pattern: {e}"),),)
}

/// Header cell text with Markdown emphasis and code markers removed.
fn header_text(cell: &str,) -> &str
{
    cell.trim_matches(|ch| matches!(ch, '*' | '_' | '`'),).trim()
}

fn split_row(row: &str,) -> Vec<&str,>
{
    let trimmed = row.trim();
    let inner = trimmed.strip_prefix('|',).unwrap_or(trimmed,);
    let inner = inner.strip_suffix('|',).unwrap_or(inner,);
    inner.split('|',).map(str::trim,).collect()
}

/// Escapes a module prefix for use as a file or asset name (`/` becomes `__`).
pub fn escape_filename(prefix: &str,) -> String
{
    prefix.replace('/', "__",)
}

/// Reverses [`escape_filename`] (`__` becomes `/`).
pub fn unescape_filename(name: &str,) -> String
{
    name.replace("__", "/",)
}

/// Returns the release asset name for a module prefix.
///
/// The empty prefix maps to `.png`, which no badge table row can reference.
///
/// # Examples
///
/// ```
/// use modbadge::asset_name;
///
/// assert_eq!(asset_name("tools/lint"), "tools__lint.png");
/// ```
pub fn asset_name(prefix: &str,) -> String
{
    format!("{}.png", escape_filename(prefix,))
}
