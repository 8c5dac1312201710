//! A single dataset

use crate::models::attribute::{AttributeCollection, AttributeCollectionApi};
use crate::models::operation::{Operation, OperationApi, OperationOptions};
use crate::registry::{extension_point, FromParts};
use crate::resource::{Resource, ResourceParts};
use async_trait::async_trait;
use futures::{Stream, TryStreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::{json, Value};
use std::any::Any;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::io::StreamReader;
use tracing::warn;
use unify_foundation::{Error, Result};

/// Stream of records, one JSON value per line of the response
pub type RecordStream<'a> = Pin<Box<dyn Stream<Item = Result<Value>> + Send + 'a>>;

/// Join record commands into a newline-delimited JSON body
fn ndjson_body(commands: &[Value]) -> Result<String> {
    let lines = commands
        .iter()
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

#[async_trait]
pub trait DatasetApi: Resource {
    fn name(&self) -> Option<&str> {
        self.parts().str_field("name")
    }

    fn external_id(&self) -> Option<&str> {
        self.parts().str_field("externalId")
    }

    fn description(&self) -> Option<&str> {
        self.parts().str_field("description")
    }

    fn version(&self) -> Option<&str> {
        self.parts().str_field("version")
    }

    fn tags(&self) -> Vec<&str> {
        string_list(self.parts().field("tags"))
    }

    fn key_attribute_names(&self) -> Vec<&str> {
        string_list(self.parts().field("keyAttributeNames"))
    }

    fn attributes(&self) -> Arc<dyn AttributeCollectionApi> {
        self.context()
            .construct::<AttributeCollection>(None, self.parts().sub_path("attributes"))
    }

    /// Stream the dataset's records
    ///
    /// Lines that are not valid JSON are logged and skipped.
    fn records(&self) -> RecordStream<'_> {
        let context = self.context();
        let path = self.parts().sub_path("records");
        Box::pin(async_stream::stream! {
            let request = match context.request(Method::GET, &path) {
                Ok(request) => request,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };
            let response = match context.open_stream(request).await {
                Ok(response) => response,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let byte_stream = response.bytes_stream();
            let stream_reader = StreamReader::new(byte_stream.map_err(|e| {
                let kind = if e.is_timeout() {
                    io::ErrorKind::TimedOut
                } else {
                    io::ErrorKind::Other
                };
                io::Error::new(kind, e)
            }));
            let mut reader = BufReader::new(stream_reader);
            let mut line_buffer = String::new();

            loop {
                line_buffer.clear();
                match reader.read_line(&mut line_buffer).await {
                    Ok(0) => break,
                    Ok(_) => {
                        let line = line_buffer.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<Value>(line) {
                            Ok(record) => yield Ok(record),
                            Err(e) => warn!("Skipping malformed record in {}: {}", path, e),
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                        yield Err(Error::Timeout(format!("Reading records of {}: {}", path, e)));
                        break;
                    }
                    Err(e) => {
                        yield Err(Error::Io(e));
                        break;
                    }
                }
            }
        })
    }

    /// Send record commands (`{"action": "CREATE" | "DELETE", "recordId": ..}`)
    async fn update_records(&self, commands: &[Value]) -> Result<Value> {
        let endpoint = format!("{}:updateRecords", self.api_path());
        let body = ndjson_body(commands)?;
        let request = self
            .context()
            .request(Method::POST, &endpoint)?
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        self.context().send_json(request).await
    }

    /// Create or replace records keyed by `primary_key`
    async fn upsert_records(&self, records: &[Value], primary_key: &str) -> Result<Value> {
        let commands = records
            .iter()
            .map(|record| -> Result<Value> {
                let id = record.get(primary_key).ok_or_else(|| {
                    Error::InvalidInput(format!("record has no '{}' field", primary_key))
                })?;
                Ok(json!({"action": "CREATE", "recordId": id, "record": record}))
            })
            .collect::<Result<Vec<_>>>()?;
        self.update_records(&commands).await
    }

    async fn delete_records_by_id(&self, record_ids: &[Value]) -> Result<Value> {
        let commands: Vec<Value> = record_ids
            .iter()
            .map(|id| json!({"action": "DELETE", "recordId": id}))
            .collect();
        self.update_records(&commands).await
    }

    /// Materialize the dataset
    async fn refresh(&self, options: &OperationOptions) -> Result<Arc<dyn OperationApi>> {
        let endpoint = format!("{}:refresh", self.api_path());
        let op = Operation::trigger(self.context(), &endpoint).await?;
        options.apply(op).await
    }
}

fn string_list(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Default dataset wrapper
pub struct Dataset {
    parts: ResourceParts,
}

impl FromParts for Dataset {
    fn from_parts(parts: ResourceParts) -> Self {
        Self { parts }
    }
}

impl Resource for Dataset {
    fn parts(&self) -> &ResourceParts {
        &self.parts
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl DatasetApi for Dataset {}

extension_point!(Dataset => DatasetApi);


impl std::fmt::Debug for dyn DatasetApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DatasetApi").field(self.parts()).finish()
    }
}
