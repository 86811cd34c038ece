//! HTTP fetching over libcurl.
//!
//! Two kinds of request: the root document, whose body is kept for
//! scanning, and sub-resource probes, which only need the response headers
//! and abort the transfer as soon as the body starts. Both block the calling
//! thread; call them from `spawn_blocking` in async code.

mod parse;

pub use parse::ResponseHeaders;

use std::str;
use std::time::Duration;

use crate::error::FetchFailure;

/// Per-request limits and identity.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Upper bound on the whole transfer.
    pub timeout: Duration,
    /// Sub-resource fetches allowed in flight at once.
    pub max_concurrent_fetches: usize,
    pub max_redirects: u32,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        crate::config::FetchConfig::default().to_options()
    }
}

/// A fetched root document.
#[derive(Debug, Clone)]
pub struct Document {
    /// URL after redirects; the base for resolving references.
    pub effective_url: String,
    pub body: Vec<u8>,
}

fn configure(easy: &mut curl::easy::Easy, url: &str, opts: &FetchOptions) -> Result<(), curl::Error> {
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirects)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    easy.useragent(&opts.user_agent)?;
    // Ask for what a browser would get; the byte count is of the transfer as decoded.
    easy.accept_encoding("")?;
    Ok(())
}

fn check_status(easy: &mut curl::easy::Easy) -> Result<(), FetchFailure> {
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchFailure::Status(code));
    }
    Ok(())
}

/// GET `url` and keep the body.
pub fn fetch_document(url: &str, opts: &FetchOptions) -> Result<Document, FetchFailure> {
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    configure(&mut easy, url, opts)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    check_status(&mut easy)?;
    let effective_url = easy
        .effective_url()?
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string());

    Ok(Document {
        effective_url,
        body,
    })
}

/// GET `url` for its headers only.
///
/// The transfer is cut off when the first body bytes arrive, so large images
/// are not downloaded just to read their `Content-Length`.
pub fn probe_resource(url: &str, opts: &FetchOptions) -> Result<ResponseHeaders, FetchFailure> {
    let mut headers: Vec<String> = Vec::new();
    let mut cut_off = false;

    let mut easy = curl::easy::Easy::new();
    configure(&mut easy, url, opts)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                headers.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|_data| {
            cut_off = true;
            Ok(0)
        })?;
        transfer.perform()
    };

    match performed {
        Ok(()) => {}
        Err(e) if cut_off && e.is_write_error() => {}
        Err(e) => return Err(e.into()),
    }

    check_status(&mut easy)?;
    Ok(parse::parse_headers(&headers))
}
