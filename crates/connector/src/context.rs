//! Binding requests to the host message context.
//!
//! The hosting pipeline exposes one [`MessageContext`] per message. It
//! supplies the parameters and takes the finished envelope back; [`connect`]
//! runs a builder between the two.

use crate::error::{BoxError, ConnectorError, Result};
use crate::parameters::{ParameterSource, Parameters};
use crate::request::{Envelope, RequestBuilder};
use tracing::{debug, error};

/// A host message that provides parameters and receives the envelope.
pub trait MessageContext: ParameterSource {
    /// Replaces the message payload with `envelope`.
    fn set_envelope(&mut self, envelope: Envelope) -> std::result::Result<(), BoxError>;
}

/// Builds a request from `context`'s parameters and stores the envelope back
/// into it.
///
/// Failures are logged with their category before they are returned. The
/// context is left untouched when building fails.
pub fn connect<C: MessageContext>(builder: &dyn RequestBuilder, context: &mut C) -> Result<()> {
    let operation = builder.operation();

    let envelope = builder.build(&*context).inspect_err(|e| {
        error!(operation, kind = e.kind(), error = %e, "Couldn't transform message");
    })?;

    context.set_envelope(envelope).map_err(|source| {
        let e = ConnectorError::OutputBinding { source };
        error!(operation, kind = e.kind(), error = %e, "Couldn't set SOAP envelope on message context");
        e
    })?;

    debug!(operation, "envelope set on message context");
    Ok(())
}

/// A message context held in memory.
///
/// Used by the command line tool and by tests; hosts embedding the
/// connector implement [`MessageContext`] on their own message type.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContext {
    params: Parameters,
    envelope: Option<Envelope>,
}

impl InMemoryContext {
    /// Creates a context over `params`.
    pub fn new(params: Parameters) -> Self {
        Self {
            params,
            envelope: None,
        }
    }

    /// The parameters of the message.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// The envelope set by [`connect`], if any.
    pub fn envelope(&self) -> Option<&Envelope> {
        self.envelope.as_ref()
    }

    /// Takes the envelope out of the context.
    pub fn take_envelope(&mut self) -> Option<Envelope> {
        self.envelope.take()
    }
}

impl ParameterSource for InMemoryContext {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.params.lookup(name)
    }
}

impl MessageContext for InMemoryContext {
    fn set_envelope(&mut self, envelope: Envelope) -> std::result::Result<(), BoxError> {
        self.envelope = Some(envelope);
        Ok(())
    }
}
