use percent_encoding::percent_decode_str;
use std::path::Path;
use tracing::{info, warn};

/// Reads the named cookie from a cookie file written as a browser-style
/// cookie string (`name=value; name2=value2`). The token is read once at
/// startup and treated as immutable afterwards.
pub fn read_token(path: impl AsRef<Path>, name: &str) -> Option<String> {
    let path = path.as_ref();

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!("Cookie file {} unavailable: {}", path.display(), e);
            return None;
        }
    };

    let token = find_cookie(&contents, name);
    match &token {
        Some(_) => info!("Authentication token loaded from {}", path.display()),
        None => warn!("Cookie {} not found in {}", name, path.display()),
    }

    token
}

/// Scans a `k=v; k2=v2` cookie string for one named value. Values are
/// stored percent-encoded and decoded before use; a value that fails to
/// decode as UTF-8 is returned verbatim.
pub fn find_cookie(cookies: &str, name: &str) -> Option<String> {
    for cookie in cookies.split(';') {
        if let Some((key, value)) = cookie.trim().split_once('=') {
            if key.trim() == name {
                let value = value.trim();
                return Some(
                    percent_decode_str(value)
                        .decode_utf8()
                        .map(|decoded| decoded.into_owned())
                        .unwrap_or_else(|_| value.to_string()),
                );
            }
        }
    }

    None
}
