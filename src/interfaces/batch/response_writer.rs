use crate::error::{PaymentError, Result};
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

/// Response envelope, one per request.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(untagged)]
pub enum Response {
    Success { success: bool, data: Value },
    Failure {
        success: bool,
        error: String,
        code: &'static str,
    },
}

impl Response {
    pub fn ok<T: Serialize>(data: &T) -> Result<Self> {
        Ok(Self::Success {
            success: true,
            data: serde_json::to_value(data)?,
        })
    }

    pub fn failed(error: &PaymentError) -> Self {
        Self::Failure {
            success: false,
            error: error.to_string(),
            code: error.code(),
        }
    }
}

/// Writes responses as JSON lines.
pub struct ResponseWriter<W: Write> {
    sink: W,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write_response(&mut self, response: &Response) -> Result<()> {
        serde_json::to_writer(&mut self.sink, response)?;
        self.sink.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        Ok(self.sink.flush()?)
    }
}
