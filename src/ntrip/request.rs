//! NTRIP wire format.

use super::auth::AuthToken;
use crate::core::CRLF;

/// Build the NTRIP 1.0 stream request for `mountpoint`.
///
/// Layout:
///
/// ```text
/// GET /<mountpoint> HTTP/1.0\r\n
/// User-Agent: <user_agent>\r\n
/// Authorization: Basic <token>\r\n
/// Connection: close\r\n
/// \r\n
/// ```
pub fn build_request(mountpoint: &str, user_agent: &str, token: &AuthToken) -> String {
    let mountpoint = mountpoint.strip_prefix('/').unwrap_or(mountpoint);
    format!(
        "GET /{mountpoint} HTTP/1.0{CRLF}\
         User-Agent: {user_agent}{CRLF}\
         Authorization: Basic {token}{CRLF}\
         Connection: close{CRLF}\
         {CRLF}",
        token = token.as_str(),
    )
}

/// Frame a position sentence for the caster: the sentence followed by
/// exactly one CRLF.
pub fn position_report(sentence: &str) -> String {
    let sentence = sentence.trim_end_matches(['\r', '\n']);
    format!("{sentence}{CRLF}")
}
