//! Evaluation through custom collaborators

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use declapi_foundation::{Error, ErrorKind, HttpMethod, Payload, Result};
use declapi_runtime::{MemoryStorage, RequestDescriptor, Runtime, Storage, Transport};
use serde_json::{Value, json};

fn payload(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

#[derive(Debug, Clone, PartialEq)]
struct Sent {
    url: String,
    method: HttpMethod,
    body: Option<Payload>,
}

#[derive(Clone, Default)]
struct CapturingTransport {
    sent: Arc<Mutex<Vec<Sent>>>,
}

impl CapturingTransport {
    fn last(&self) -> Sent {
        self.sent.lock().unwrap().last().cloned().unwrap()
    }
}

impl Transport for CapturingTransport {
    fn send(&self, url: &str, method: HttpMethod, body: Option<&Payload>) -> Result<Value> {
        self.sent.lock().unwrap().push(Sent {
            url: url.to_string(),
            method,
            body: body.cloned(),
        });
        Ok(json!({"id": 234, "name": "himly", "age": "24"}))
    }
}

#[derive(Clone, Default)]
struct CapturingStorage {
    stored: Arc<Mutex<HashMap<String, Payload>>>,
}

impl Storage for CapturingStorage {
    fn store(&self, key: &str, data: &Payload) -> Result<()> {
        self.stored.lock().unwrap().insert(key.to_string(), data.clone());
        Ok(())
    }

    fn retrieve(&self, key: &str) -> Result<Value> {
        Ok(json!({"key": key, "test": true}))
    }
}

struct FailingTransport;

impl Transport for FailingTransport {
    fn send(&self, url: &str, _: HttpMethod, _: Option<&Payload>) -> Result<Value> {
        Err(Error::new(ErrorKind::Transport(format!("connection refused: {url}"))))
    }
}

fn runtime_with(transport: CapturingTransport, storage: CapturingStorage) -> Runtime {
    let runtime = Runtime::builder()
        .transport(transport)
        .storage(storage)
        .build()
        .unwrap();
    runtime
        .load_entries([
            (
                "(Rest/get /users/:id/posts?:deleted&:dateGreaterThan selfMappings)",
                fields(&["id", "deleted", "dateGreaterThan"]),
            ),
            (
                "(Rest/post /users/:id/posts {:id userId} asBody (Add post of the user))",
                fields(&["userId", "title", "content"]),
            ),
            ("(Local/get-in user-profile)", fields(&[])),
            ("(Local/set-in user-profile)", fields(&["id", "name", "age"])),
        ])
        .unwrap();
    runtime
}

#[test]
fn get_returns_the_transport_response() {
    let transport = CapturingTransport::default();
    let runtime = runtime_with(transport.clone(), CapturingStorage::default());

    let response = runtime
        .evaluate(
            "(Rest/get /users/:id/posts?:deleted&:dateGreaterThan selfMappings)",
            &payload(json!({"id": 234, "deleted": false, "dateGreaterThan": "test"})),
        )
        .unwrap();

    assert_eq!(response, Some(json!({"id": 234, "name": "himly", "age": "24"})));
    assert_eq!(
        transport.last(),
        Sent {
            url: "/users/234/posts?deleted=false&dateGreaterThan=test".to_string(),
            method: HttpMethod::Get,
            body: None,
        }
    );
}

#[test]
fn map_literal_reads_payload_by_placeholder_name() {
    let transport = CapturingTransport::default();
    let runtime = runtime_with(transport.clone(), CapturingStorage::default());

    runtime
        .evaluate(
            "(Rest/post /users/:id/posts {:id userId} asBody (Add post of the user))",
            &payload(json!({"id": 1, "userId": 2, "title": "t"})),
        )
        .unwrap();

    let sent = transport.last();
    assert_eq!(sent.url, "/users/1/posts");
    assert_eq!(sent.method, HttpMethod::Post);
    assert_eq!(sent.body, Some(payload(json!({"id": 1}))));
}

#[test]
fn missing_placeholder_value_is_not_sent() {
    let transport = CapturingTransport::default();
    let runtime = runtime_with(transport.clone(), CapturingStorage::default());

    let err = runtime
        .evaluate(
            "(Rest/get /users/:id/posts?:deleted&:dateGreaterThan selfMappings)",
            &payload(json!({"id": 234, "deleted": false})),
        )
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::MissingRequestData(ref f) if f == "dateGreaterThan"));
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[test]
fn storage_operations_use_the_key() {
    let storage = CapturingStorage::default();
    let runtime = runtime_with(CapturingTransport::default(), storage.clone());

    let read = runtime
        .evaluate("(Local/get-in user-profile)", &Payload::new())
        .unwrap();
    assert_eq!(read, Some(json!({"key": "user-profile", "test": true})));

    let written = runtime
        .evaluate(
            "(Local/set-in user-profile)",
            &payload(json!({"id": 234, "name": "himly", "age": 24})),
        )
        .unwrap();
    assert_eq!(written, None);
    assert_eq!(
        storage.stored.lock().unwrap().get("user-profile"),
        Some(&payload(json!({"id": 234, "name": "himly", "age": 24})))
    );
}

#[test]
fn set_in_without_data_stores_nothing() {
    let storage = CapturingStorage::default();
    let runtime = runtime_with(CapturingTransport::default(), storage.clone());

    let err = runtime
        .evaluate("(Local/set-in user-profile)", &Payload::new())
        .unwrap_err();

    assert!(matches!(err.kind, ErrorKind::EmptyStoreData));
    assert!(storage.stored.lock().unwrap().is_empty());
}

#[test]
fn transport_errors_propagate() {
    let runtime = Runtime::builder()
        .transport(FailingTransport)
        .storage(MemoryStorage::new())
        .build()
        .unwrap();
    runtime
        .load_entries([("(Rest/get /users selfMappings)", fields(&[]))])
        .unwrap();

    let err = runtime
        .evaluate("(Rest/get /users selfMappings)", &Payload::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "transport error: connection refused: /users");
}

#[test]
fn describe_does_not_dispatch() {
    let transport = CapturingTransport::default();
    let runtime = runtime_with(transport.clone(), CapturingStorage::default());

    let descriptor = runtime
        .describe("(Local/set-in user-profile)", &payload(json!({"id": 1})))
        .unwrap();

    assert!(matches!(descriptor, RequestDescriptor::Storage(ref op) if op.write && op.key == "user-profile"));
    assert!(transport.sent.lock().unwrap().is_empty());
}

#[test]
fn runtime_is_shared_across_threads() {
    let runtime = Arc::new(runtime_with(
        CapturingTransport::default(),
        CapturingStorage::default(),
    ));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let runtime = Arc::clone(&runtime);
            std::thread::spawn(move || {
                runtime
                    .evaluate(
                        "(Rest/get /users/:id/posts?:deleted&:dateGreaterThan selfMappings)",
                        &payload(json!({"id": i, "deleted": true, "dateGreaterThan": "x"})),
                    )
                    .unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_some());
    }
}
