//! `nginxd`: an HTTP/1.1 and HTTPS static/dynamic web server driven by a
//! subset of the nginx configuration grammar. See `DESIGN.md` for the
//! module-by-module grounding of this rewrite.

pub mod analytics;
pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod limits;
pub mod listener;
pub mod location;
pub mod logging;
pub mod mime;
pub mod registry;
pub mod session;
pub mod signals;
pub mod tls;
