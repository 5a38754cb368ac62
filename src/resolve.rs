//! Best-effort site metadata: given a raw URL string, guess a display name
//! and an icon, optionally inlining the icon as a `data:` URI.
//!
//! Every step degrades rather than fails: unparsable input yields no guess
//! (the caller keeps the typed value as the URL), and a failed icon fetch
//! falls back to the external lookup URL.

use crate::error::Result;
use base64::Engine;
use log::debug;
use std::time::{Duration, Instant};

/// Favicon lookup endpoint, parameterized by hostname. Single endpoint, no
/// fallback chain.
const FAVICON_ENDPOINT: &str = "https://www.google.com/s2/favicons";

/// Icon size requested from the lookup endpoint.
const FAVICON_SIZE: u32 = 256;

/// Delay between the last keystroke of an input session and the resolution
/// it triggers.
pub const RESOLVE_DEBOUNCE: Duration = Duration::from_secs(1);

/// Timeout for the optional icon fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Metadata guessed from a raw URL string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteGuess {
    pub name: String,
    pub url: String,
    pub icon: String,
}

pub fn favicon_url(host: &str) -> String {
    format!("{FAVICON_ENDPOINT}?domain={host}&sz={FAVICON_SIZE}")
}

/// Prepend `https://` unless the input already carries an http(s) scheme.
pub fn normalize_url(input: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

/// Pure part of the resolver: normalize, parse, and derive name and icon
/// guesses. `None` when the input does not parse as a URL with a hostname.
pub fn parse_site(input: &str) -> Option<SiteGuess> {
    if input.is_empty() {
        return None;
    }
    let normalized = normalize_url(input);
    let parsed = url::Url::parse(&normalized).ok()?;
    let host = parsed.host_str()?;
    Some(SiteGuess {
        name: site_name(host),
        url: normalized,
        icon: favicon_url(host),
    })
}

/// Hostname → display name: drop a leading `www.`, keep the first label,
/// capitalize its first letter.
fn site_name(host: &str) -> String {
    let stripped = host.strip_prefix("www.").unwrap_or(host);
    let label = stripped.split('.').next().unwrap_or(stripped);
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Fetch `icon_url` and inline it as a `data:` URI, using the response
/// content type (falling back to `image/png`).
pub fn embed_icon(icon_url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()?;
    let response = client.get(icon_url).send()?.error_for_status()?;
    let mime = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("image/png")
        .to_string();
    let bytes = response.bytes()?;
    let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
    Ok(format!("data:{mime};base64,{payload}"))
}

/// Full resolution: parse, and when `embed` is set try to inline the icon,
/// keeping the external URL on any fetch failure.
pub fn resolve(input: &str, embed: bool) -> Option<SiteGuess> {
    let mut guess = parse_site(input)?;
    if embed {
        match embed_icon(&guess.icon) {
            Ok(data_uri) => guess.icon = data_uri,
            Err(err) => debug!("icon fetch failed, keeping URL: {err}"),
        }
    }
    Some(guess)
}

/// Debounce gate for continuous-input surfaces (a URL field being typed
/// into). Each submission supersedes the previous pending one; completions
/// apply only while their generation is still current, so a superseded
/// in-flight resolution can never overwrite fields after a newer one starts.
pub struct Debouncer {
    generation: u64,
    pending: Option<Pending>,
}

struct Pending {
    generation: u64,
    input: String,
    due: Instant,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Debouncer {
    pub fn new() -> Self {
        Self { generation: 0, pending: None }
    }

    /// Record new input, cancelling any pending resolution. Returns the
    /// generation token for the new session.
    pub fn submit(&mut self, input: &str, now: Instant) -> u64 {
        self.generation += 1;
        self.pending = Some(Pending {
            generation: self.generation,
            input: input.to_string(),
            due: now + RESOLVE_DEBOUNCE,
        });
        self.generation
    }

    /// Take the pending input once its delay has elapsed. Returns the
    /// `(generation, input)` pair to resolve, at most once per submission.
    pub fn due(&mut self, now: Instant) -> Option<(u64, String)> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            let p = self.pending.take().unwrap();
            Some((p.generation, p.input))
        } else {
            None
        }
    }

    /// Whether a completed resolution for `generation` may still be applied.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }
}
