//! `create_object` and `list_objects` tools

use agent_tools::{ParameterSpec, Tool, ToolDescriptor, ToolRegistry, ValueType};
use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::{info, warn};

use crate::ObjectStore;

/// Name of the object creation tool
pub const CREATE_OBJECT: &str = "create_object";
/// Name of the object listing tool
pub const LIST_OBJECTS: &str = "list_objects";

fn str_arg<'a>(args: &'a Map<String, Value>, key: &str) -> &'a str {
    args.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn store_error(err: &crate::StorageError) -> Value {
    json!({"status": "error", "message": err.to_string()})
}

/// Writes a text object into a bucket
pub struct CreateObjectTool {
    descriptor: ToolDescriptor,
    store: Arc<dyn ObjectStore>,
}

impl CreateObjectTool {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        let descriptor = ToolDescriptor::new(
            CREATE_OBJECT,
            "Creates a new object in a storage bucket with the given content.",
        )
        .param(ParameterSpec::required(
            "bucket",
            ValueType::String,
            "Name of the bucket in which the object is created",
        ))
        .param(ParameterSpec::required("name", ValueType::String, "Name of the object"))
        .param(ParameterSpec::required("content", ValueType::String, "Contents of the object"))
        .returns(ValueType::Object);
        Self { descriptor, store }
    }
}

#[async_trait]
impl Tool for CreateObjectTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: Map<String, Value>) -> agent_tools::Result<Value> {
        let bucket = str_arg(&args, "bucket");
        let name = str_arg(&args, "name");
        info!(bucket, name, "creating object");

        Ok(match self.store.put_object(bucket, name, str_arg(&args, "content")).await {
            Ok(()) => json!({
                "status": "success",
                "message": format!("Object '{name}' created successfully in bucket '{bucket}'."),
            }),
            Err(e) => {
                warn!(bucket, name, error = %e, "create_object failed");
                store_error(&e)
            }
        })
    }
}

/// Lists the objects of a bucket
pub struct ListObjectsTool {
    descriptor: ToolDescriptor,
    store: Arc<dyn ObjectStore>,
}

impl ListObjectsTool {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        let descriptor = ToolDescriptor::new(
            LIST_OBJECTS,
            "Lists all objects in a storage bucket, optionally filtered by a prefix.",
        )
        .param(ParameterSpec::required("bucket", ValueType::String, "Name of the bucket"))
        .param(ParameterSpec::optional(
            "prefix",
            ValueType::String,
            "Only list objects whose names start with this",
        ))
        .returns(ValueType::Object);
        Self { descriptor, store }
    }
}

#[async_trait]
impl Tool for ListObjectsTool {
    fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    async fn execute(&self, args: Map<String, Value>) -> agent_tools::Result<Value> {
        let bucket = str_arg(&args, "bucket");
        let prefix = str_arg(&args, "prefix");
        info!(bucket, prefix, "listing objects");

        Ok(match self.store.list_objects(bucket, prefix).await {
            Ok(files) => json!({"status": "success", "files": files}),
            Err(e) => {
                warn!(bucket, error = %e, "list_objects failed");
                store_error(&e)
            }
        })
    }
}

/// Registry holding both storage tools over one store
pub fn storage_registry(store: Arc<dyn ObjectStore>) -> agent_core::Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(CreateObjectTool::new(Arc::clone(&store))))?;
    registry.register(Arc::new(ListObjectsTool::new(store)))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryObjectStore, Result, StorageError};
    use agent_tools::ToolError;
    use mockall::mock;

    mock! {
        pub Store {}

        #[async_trait]
        impl ObjectStore for Store {
            async fn put_object(&self, bucket: &str, name: &str, content: &str) -> Result<()>;
            async fn list_objects(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;
        }
    }

    #[tokio::test]
    async fn test_create_then_list_with_prefix() {
        let store: Arc<dyn ObjectStore> = Arc::new(InMemoryObjectStore::new().with_bucket("news"));
        let registry = storage_registry(store).unwrap();
        let create = registry.get("create_object").unwrap();
        let list = registry.get("list_objects").unwrap();

        let created = create
            .invoke(json!({"bucket": "news", "name": "summary-acme.txt", "content": "Acme cuts staff"}))
            .await
            .unwrap();
        assert_eq!(created["status"], "success");

        let listed = list
            .invoke(json!({"bucket": "news", "prefix": "summary-"}))
            .await
            .unwrap();
        assert_eq!(listed, json!({"status": "success", "files": ["summary-acme.txt"]}));

        let empty = list
            .invoke(json!({"bucket": "news", "prefix": "report-"}))
            .await
            .unwrap();
        assert_eq!(empty, json!({"status": "success", "files": []}));
    }

    #[tokio::test]
    async fn test_store_faults_are_error_payloads() {
        let mut store = MockStore::new();
        store
            .expect_put_object()
            .returning(|bucket, _, _| Err(StorageError::BucketNotFound(bucket.to_string())));
        store
            .expect_list_objects()
            .returning(|_, _| Err(StorageError::Io(std::io::Error::other("disk offline"))));
        let store: Arc<dyn ObjectStore> = Arc::new(store);

        let created = CreateObjectTool::new(Arc::clone(&store))
            .invoke(json!({"bucket": "gone", "name": "a", "content": "b"}))
            .await
            .unwrap();
        assert_eq!(
            created,
            json!({"status": "error", "message": "Bucket 'gone' not found"})
        );

        let listed = ListObjectsTool::new(store)
            .invoke(json!({"bucket": "news"}))
            .await
            .unwrap();
        assert_eq!(listed["status"], "error");
        assert!(listed["message"].as_str().unwrap().contains("disk offline"));
    }

    #[tokio::test]
    async fn test_missing_arguments_never_touch_the_store() {
        let mut store = MockStore::new();
        store.expect_put_object().times(0);
        let tool = CreateObjectTool::new(Arc::new(store));

        let err = tool
            .invoke(json!({"bucket": "news", "name": "a"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument { .. }));
    }
}
