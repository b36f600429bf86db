//! Transport abstraction shared by plain TCP and TLS-over-TCP sessions,
//! grounded on `dabevlohn-cblt`'s `directive_process<S>(... where S:
//! AsyncReadExt + AsyncWriteExt + Unpin)` generic-stream pattern.

use tokio::io::{AsyncRead, AsyncWrite};

pub trait Transport: AsyncRead + AsyncWrite + Unpin + Send {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send> Transport for T {}
