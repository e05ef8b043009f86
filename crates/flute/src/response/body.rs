// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Body-writing responses: JSON, XML, stream and empty.

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::ResponseMeta;
use crate::error::{FluteError, Result};

macro_rules! meta_builders {
    ($ty:ty) => {
        impl $ty {
            /// Adds a header (write-once per name).
            pub fn header<I, S>(mut self, name: &str, values: I) -> Result<Self>
            where
                I: IntoIterator<Item = S>,
                S: Into<String>,
            {
                self.meta.add_header(name, values)?;
                Ok(self)
            }

            /// Sets the HTTP status.
            pub fn http_status(mut self, status: u16) -> Self {
                self.meta.set_http_status(status);
                self
            }

            /// Registers a hook to run after the transaction commits.
            pub fn after_tx_commit<F>(mut self, hook: F) -> Self
            where
                F: FnOnce() + Send + Sync + 'static,
            {
                self.meta.set_after_tx_commit(Box::new(hook));
                self
            }

            /// Headers, status and hook.
            pub fn meta(&self) -> &ResponseMeta {
                &self.meta
            }
        }
    };
}

/// JSON body.
#[derive(Debug)]
pub struct JsonResponse {
    payload: JsonValue,
    pub(super) meta: ResponseMeta,
}

impl JsonResponse {
    /// Creates a JSON response carrying `payload`.
    pub fn new(payload: JsonValue) -> Self {
        Self {
            payload,
            meta: ResponseMeta::default(),
        }
    }

    /// Creates a JSON response from any serializable bean.
    pub fn from_bean<T: Serialize>(bean: &T) -> Result<Self> {
        let payload = serde_json::to_value(bean)
            .map_err(|e| FluteError::contract(format!("JSON bean is not serializable: {}", e)))?;
        Ok(Self::new(payload))
    }

    /// The payload.
    pub fn payload(&self) -> &JsonValue {
        &self.payload
    }
}

meta_builders!(JsonResponse);

/// XML body, already serialized by the application.
#[derive(Debug)]
pub struct XmlResponse {
    xml: String,
    encoding: String,
    pub(super) meta: ResponseMeta,
}

impl XmlResponse {
    /// Creates an XML response (UTF-8).
    pub fn new(xml: impl Into<String>) -> Self {
        Self {
            xml: xml.into(),
            encoding: "UTF-8".to_string(),
            meta: ResponseMeta::default(),
        }
    }

    /// Overrides the declared charset.
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// The XML text.
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Declared charset.
    pub fn charset(&self) -> &str {
        &self.encoding
    }
}

meta_builders!(XmlResponse);

/// Binary body, e.g. a CSV download.
#[derive(Debug)]
pub struct StreamResponse {
    content_type: String,
    data: Vec<u8>,
    file_name: Option<String>,
    pub(super) meta: ResponseMeta,
}

impl StreamResponse {
    /// Creates a stream response with the given content type.
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            data,
            file_name: None,
            meta: ResponseMeta::default(),
        }
    }

    /// Sends the body as an attachment with the given file name.
    pub fn attachment(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Content type of the body.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Body bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Attachment file name, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
}

meta_builders!(StreamResponse);

/// Response that is complete with headers and status only.
#[derive(Debug, Default)]
pub struct EmptyResponse {
    pub(super) meta: ResponseMeta,
}

impl EmptyResponse {
    /// Creates an empty-body response.
    pub fn new() -> Self {
        Self::default()
    }
}

meta_builders!(EmptyResponse);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct ProductBean {
        product_id: i64,
        product_name: String,
    }

    #[test]
    fn test_json_from_bean() {
        let bean = ProductBean {
            product_id: 3,
            product_name: "Flute".to_string(),
        };
        let json = JsonResponse::from_bean(&bean).unwrap();
        assert_eq!(json.payload()["product_id"], 3);
        assert_eq!(json.payload()["product_name"], "Flute");
    }

    #[test]
    fn test_stream_attachment() {
        let stream = StreamResponse::new("text/csv", b"a,b\n".to_vec()).attachment("products.csv");
        assert_eq!(stream.file_name(), Some("products.csv"));
        assert_eq!(stream.data(), b"a,b\n");
    }

    #[test]
    fn test_empty_builders() {
        let empty = EmptyResponse::new().http_status(204).header("X-A", ["1"]).unwrap();
        assert_eq!(empty.meta().http_status(), Some(204));
        assert_eq!(empty.meta().header("x-a"), Some(&["1".to_string()][..]));
    }
}
