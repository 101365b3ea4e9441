use bytes::Bytes;
use futures::stream;
use tracing::debug;

use crate::errors::SploxError;
use crate::wait::WaitScope;

use super::event::StreamEvent;
use super::parser::EventParser;

/// Pull cursor over a listen stream.
///
/// Drive it with [`EventStream::advance`] and read the buffered event with
/// [`EventStream::event`]. When `advance` returns `false`, check
/// [`EventStream::error`]. Call [`EventStream::close`] once done (dropping the
/// cursor also releases the connection).
///
/// ```no_run
/// # use splox_client::prelude::*;
/// # async fn demo(client: Client) -> Result<(), SploxError> {
/// let mut stream = client.workflows().listen("req-1", WaitScope::unbounded()).await?;
/// while stream.advance().await {
///     if let Some(event) = stream.event() {
///         println!("{}", event.raw());
///     }
/// }
/// let result = stream.error().cloned();
/// stream.close();
/// result.map_or(Ok(()), Err)
/// # }
/// ```
pub struct EventStream {
    parser: Option<EventParser>,
    current: Option<StreamEvent>,
    error: Option<SploxError>,
    scope: WaitScope,
    ended: bool,
}

impl EventStream {
    pub(crate) fn new(parser: EventParser, scope: WaitScope) -> Self {
        Self {
            parser: Some(parser),
            current: None,
            error: None,
            scope,
            ended: false,
        }
    }

    /// Wraps any byte source, for custom transports or tests.
    pub fn from_bytes<S>(bytes: S, scope: WaitScope) -> Self
    where
        S: futures::Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static,
    {
        Self::new(EventParser::new(Box::pin(bytes)), scope)
    }

    /// Reads the next event. Returns `false` at end of stream, on error, on
    /// scope expiry, or after [`EventStream::close`].
    ///
    /// Scope expiry is reported as [`SploxError::Timeout`]; read failures as
    /// [`SploxError::Stream`].
    pub async fn advance(&mut self) -> bool {
        if self.ended {
            return false;
        }
        let Some(parser) = self.parser.as_mut() else {
            self.ended = true;
            return false;
        };

        match self.scope.bound(parser.next_event()).await {
            Some(Ok(Some(event))) => {
                self.current = Some(event);
                true
            }
            Some(Ok(None)) => {
                debug!("event stream closed by server");
                self.ended = true;
                false
            }
            Some(Err(err)) => {
                debug!(error = %err, "event stream read failed");
                self.error = Some(err);
                self.ended = true;
                false
            }
            None => {
                debug!(
                    timeout_ms = self.scope.timeout().map(|t| t.as_millis() as u64),
                    "event stream wait deadline exceeded"
                );
                self.error = Some(SploxError::Timeout {
                    timeout: self.scope.timeout().unwrap_or_default(),
                });
                self.ended = true;
                false
            }
        }
    }

    /// The event read by the most recent successful `advance`, if any.
    pub fn event(&self) -> Option<&StreamEvent> {
        self.current.as_ref()
    }

    /// The error that ended iteration, if any.
    pub fn error(&self) -> Option<&SploxError> {
        self.error.as_ref()
    }

    /// The scope bounding reads on this stream.
    pub fn scope(&self) -> &WaitScope {
        &self.scope
    }

    /// Releases the connection. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.parser.take().is_some() {
            debug!("event stream released");
        }
        self.ended = true;
    }

    pub fn is_closed(&self) -> bool {
        self.parser.is_none()
    }

    /// Adapts the cursor into a `futures::Stream`. Each poll advances once;
    /// nothing is read ahead. A terminal error is yielded as the last item.
    pub fn into_stream(self) -> impl futures::Stream<Item = Result<StreamEvent, SploxError>> + Send {
        stream::unfold(Some(self), |state| async move {
            let mut cursor = state?;
            if cursor.advance().await {
                let event = cursor.current.clone()?;
                return Some((Ok(event), Some(cursor)));
            }
            cursor.close();
            cursor.error.take().map(|err| (Err(err), None))
        })
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("closed", &self.is_closed())
            .field("ended", &self.ended)
            .field("error", &self.error)
            .field("scope", &self.scope)
            .finish()
    }
}
