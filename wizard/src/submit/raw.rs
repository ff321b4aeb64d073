//! Raw result backend: no I/O, hands the payload back

use async_trait::async_trait;

use crate::errors::WizardError;
use crate::submit::backend::{Backend, BackendId, WriteReceipt};
use crate::submit::payload::Payload;

#[derive(Debug, Clone, Default)]
pub struct RawBackend;

impl RawBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Backend for RawBackend {
    fn id(&self) -> BackendId {
        BackendId::Raw
    }

    async fn write(&self, payload: &Payload) -> Result<WriteReceipt, WizardError> {
        Ok(WriteReceipt {
            id: None,
            payload: Some(payload.to_json()),
        })
    }
}
