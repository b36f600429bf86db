//! Location Matcher (§4.6). Implements nginx's modifier precedence: exact
//! match wins outright, `^~` prefix stops regex consideration, `~`/`~*`
//! patterns are accepted but evaluated as plain prefixes here (pattern
//! compilation is out of scope), and a bare prefix falls back to
//! longest-match.

use crate::config::{LocationBlock, Modifier, ServerConfig};

/// Finds the location block that should handle `uri`, applying nginx's
/// precedence order. Returns `None` if no block matches.
///
/// `RegexMatch` blocks are accepted by the parser but take no part in this
/// resolution: per §4.6/§9, regex location matching is parsed-but-not-
/// evaluated in this design, so matching falls through to the prefix
/// (`S`/`N`) comparison below exactly as if no regex blocks existed.
pub fn resolve<'a>(server: &'a ServerConfig, uri: &str) -> Option<&'a LocationBlock> {
    if let Some(exact) = server
        .locations_for(Modifier::ExactMatch)
        .iter()
        .find(|l| l.uri == uri)
    {
        return Some(exact);
    }

    let s = longest_prefix_match(server.locations_for(Modifier::PrefixStop), uri);
    let n = longest_prefix_match(server.locations_for(Modifier::NoModifier), uri);

    match (s, n) {
        (Some(s), Some(n)) => {
            if s.uri.len() >= n.uri.len() {
                Some(s)
            } else {
                Some(n)
            }
        }
        (Some(s), None) => Some(s),
        (None, Some(n)) => Some(n),
        (None, None) => None,
    }
}

fn longest_prefix_match<'a>(candidates: &'a [LocationBlock], uri: &str) -> Option<&'a LocationBlock> {
    candidates
        .iter()
        .filter(|l| uri.starts_with(&l.uri))
        .max_by_key(|l| l.uri.len())
}
