use bytes::{Bytes, BytesMut};
use futures::stream::{Stream, StreamExt};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CollectError {
    /// The underlying stream yielded an error before completing
    #[error("stream failed after {received} bytes: {message}")]
    Stream { received: usize, message: String },

    /// More than `limit` bytes arrived
    #[error("stream exceeded {limit} byte limit")]
    Overflow { limit: usize },
}

/// Drain a byte stream into one buffer.
///
/// Resolves once the stream ends. Fails on the first stream error or as soon as
/// the accumulated size would pass `limit`; nothing partial is returned.
pub async fn collect_bounded<S, E>(stream: S, limit: usize) -> Result<Bytes, CollectError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::fmt::Display,
{
    futures::pin_mut!(stream);

    let mut buffer = BytesMut::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| CollectError::Stream {
            received: buffer.len(),
            message: e.to_string(),
        })?;

        if buffer.len() + chunk.len() > limit {
            return Err(CollectError::Overflow { limit });
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer.freeze())
}
