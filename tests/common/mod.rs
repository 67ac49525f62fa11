//! Shared MongoDB server for the integration tests.
//!
//! Each test binary starts one MongoDB 7.0 container on a parked background
//! thread, so it lives as long as the process rather than any single test's
//! runtime. The container is removed with `docker rm -f` from an `atexit` hook.
//!
//! Tests are plain `#[test]` functions. The library blocks on its own runtime,
//! which cannot be nested inside `#[tokio::test]`, so every [`TestServer`]
//! carries a separate runtime for seeding. Database names get a per-test suffix.

#![allow(dead_code)]

pub mod fixtures;

use std::future::Future;
use std::sync::{OnceLock, mpsc};

use mongodb::{Client, Collection, Database};
use testcontainers::ImageExt;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;
use tokio::runtime::{Builder, Runtime};

static SERVER_URI: OnceLock<String> = OnceLock::new();
static CONTAINER_ID: OnceLock<String> = OnceLock::new();

unsafe extern "C" {
    fn atexit(f: extern "C" fn()) -> i32;
}

extern "C" fn remove_container() {
    if let Some(id) = CONTAINER_ID.get() {
        let _ = std::process::Command::new("docker")
            .args(["rm", "-f", id])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status();
    }
}

fn runtime() -> Runtime {
    Builder::new_current_thread().enable_all().build().expect("Failed to create runtime")
}

/// Connection string of the shared container, started on first use.
fn server_uri() -> &'static str {
    SERVER_URI.get_or_init(|| {
        let (tx, rx) = mpsc::sync_channel(1);

        std::thread::spawn(move || {
            runtime().block_on(async move {
                let container = Mongo::default()
                    .with_tag("7.0")
                    .start()
                    .await
                    .expect("Failed to start MongoDB container");

                let _ = CONTAINER_ID.set(container.id().to_string());
                unsafe {
                    atexit(remove_container);
                }

                let host = container.get_host().await.expect("Failed to get host");
                let port = container.get_host_port_ipv4(27017).await.expect("Failed to get port");
                tx.send(format!("mongodb://{host}:{port}")).expect("Failed to send server URI");

                std::future::pending::<()>().await;
            });
        });

        rx.recv().expect("MongoDB container did not start")
    })
}

/// Per-test handle on the shared server.
pub struct TestServer {
    pub uri: String,
    client: Client,
    suffix: String,
    runtime: Runtime,
}

impl TestServer {
    pub fn start() -> Self {
        let uri = server_uri().to_string();
        let runtime = runtime();
        let client =
            runtime.block_on(Client::with_uri_str(&uri)).expect("Failed to create seed client");
        let suffix = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();

        Self { uri, client, suffix, runtime }
    }

    /// Run seeding code against the server.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// `name` with this test's suffix, as the collectors will see it.
    pub fn db_name(&self, name: &str) -> String {
        format!("{name}_{}", self.suffix)
    }

    pub fn database(&self, name: &str) -> Database {
        self.client.database(&self.db_name(name))
    }

    pub fn collection<T: Send + Sync>(&self, database: &str, collection: &str) -> Collection<T> {
        self.database(database).collection(collection)
    }
}
