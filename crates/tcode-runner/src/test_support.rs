//! Mock collaborators and a log capture shared by unit tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockall::mock;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use tcode_client::{TranscodeApi, TranscodeResult};
use tcode_models::{JobId, JobStatus, TranscodeRequest};
use tcode_storage::{BlobStore, StorageResult};

mock! {
    pub Api {}

    #[async_trait]
    impl TranscodeApi for Api {
        async fn submit(&self, request: &TranscodeRequest) -> TranscodeResult<JobId>;
        async fn fetch_status(&self, id: &JobId) -> TranscodeResult<JobStatus>;
    }
}

mock! {
    pub Store {}

    #[async_trait]
    impl BlobStore for Store {
        async fn upload(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> StorageResult<String>;
    }
}

/// One captured tracing event: its message plus the other fields, rendered.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl Visit for EventVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.fields.push((field.name().to_string(), rendered));
        }
    }
}

/// Layer that records every event emitted while it is the default subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<CapturedEvent>>>);

impl CapturedLogs {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.0.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }
}

impl<S: Subscriber> Layer<S> for CapturedLogs {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        self.0.lock().unwrap().push(CapturedEvent {
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

/// Route this thread's tracing events into a fresh capture until the guard drops.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(logs.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
