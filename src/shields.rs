// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

/// Badge image requests against a shields.io compatible endpoint.
///
/// Requests use the static badge path form
/// `<endpoint>/badge/<label>-<message>-<colour>?labelColor=..&style=..`.
use std::time::Duration;

use masterror::AppError;
use reqwest::{Client, Url};
use tracing::debug;

use crate::colour::Colour;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30,);

/// Parameters of a single badge image.
#[derive(Debug, Clone, Copy,)]
pub struct BadgeRequest<'a,>
{
    /// Left-hand text (the module prefix).
    pub label:       &'a str,
    /// Right-hand text (the version, e.g. `v1.10.0`).
    pub message:     &'a str,
    /// Background colour of the message half.
    pub colour:      Colour,
    /// Colour of the label half.
    pub label_color: &'a str,
    /// Badge style name.
    pub style:       &'a str,
}

/// Escapes text for a static badge path segment.
///
/// Dashes and underscores are doubled and spaces become underscores; the URL
/// layer percent-encodes the rest.
///
/// # Examples
///
/// ```
/// use modbadge::escape_badge_text;
///
/// assert_eq!(escape_badge_text("my-mod_x y"), "my--mod__x_y");
/// ```
pub fn escape_badge_text(text: &str,) -> String
{
    let mut escaped = String::with_capacity(text.len() + 4,);
    for character in text.chars() {
        match character {
            '-' => escaped.push_str("--",),
            '_' => escaped.push_str("__",),
            ' ' => escaped.push('_',),
            other => escaped.push(other,),
        }
    }
    escaped
}

/// Builds the image URL for `request` under `endpoint`.
///
/// # Errors
///
/// Returns [`AppError`] when `endpoint` is not an absolute base URL.
pub fn badge_url(endpoint: &str, request: &BadgeRequest<'_,>,) -> Result<Url, AppError,>
{
    let mut url = Url::parse(endpoint,)
        .map_err(|e| AppError::validation(format!("invalid badge endpoint '{endpoint}': {e}"),),)?;

    let segment = format!(
        "{}-{}-{}",
        escape_badge_text(request.label,),
        escape_badge_text(request.message,),
        request.colour.hex()
    );

    url.path_segments_mut()
        .map_err(|()| AppError::validation(format!("badge endpoint '{endpoint}' cannot be a base"),),)?
        .pop_if_empty()
        .push("badge",)
        .push(&segment,);

    url.query_pairs_mut()
        .append_pair("labelColor", request.label_color,)
        .append_pair("style", request.style,);

    Ok(url,)
}

/// HTTP client downloading rendered badge images.
#[derive(Debug, Clone,)]
pub struct ShieldsClient
{
    client: Client,
}

impl ShieldsClient
{
    /// Creates a client with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] when the HTTP client cannot be initialised.
    pub fn new() -> Result<Self, AppError,>
    {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT,)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),)
            .build()
            .map_err(|e| AppError::internal(format!("failed to build HTTP client: {e}"),),)?;

        Ok(Self {
            client,
        },)
    }

    /// Downloads the image at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] on transport failures and non-success statuses.
    pub async fn fetch(&self, url: &Url,) -> Result<Vec<u8,>, AppError,>
    {
        debug!("Requesting badge {}", url);

        let response = self
            .client
            .get(url.clone(),)
            .send()
            .await
            .map_err(|e| AppError::service(format!("badge request failed: {e}"),),)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::service(format!("badge endpoint returned {status} for {url}"),),);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::service(format!("failed to read badge body: {e}"),),)?;

        Ok(body.to_vec(),)
    }
}
