use crate::errors::StoreError;
use crate::store::{IndexStore, MemoryStore};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};

/// Memory store that records every key read, in order.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    reads: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.inner.set(key, value);
    }

    pub fn reads(&self) -> Vec<String> {
        self.reads.lock().clone()
    }

    pub fn was_read(&self, key: &str) -> bool {
        self.reads.lock().iter().any(|k| k == key)
    }
}

#[async_trait]
impl IndexStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.reads.lock().push(key.to_string());
        self.inner.get(key).await
    }
}

enum Failure {
    Unavailable,
    Timeout,
}

/// Store whose every read fails.
pub struct FailingStore {
    failure: Failure,
}

impl FailingStore {
    pub fn unavailable() -> Self {
        FailingStore {
            failure: Failure::Unavailable,
        }
    }

    pub fn timing_out() -> Self {
        FailingStore {
            failure: Failure::Timeout,
        }
    }
}

#[async_trait]
impl IndexStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.failure {
            Failure::Unavailable => Err(StoreError::Redis(redis::RedisError::from((
                redis::ErrorKind::IoError,
                "connection refused",
            )))),
            Failure::Timeout => Err(StoreError::Timeout(key.to_string())),
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
pub enum FakeRedisMode {
    Serve,
    /// The first connection is closed right after answering one GET.
    DropFirstConnection,
    /// GETs are read but never answered.
    NeverAnswerGet,
}

/// Minimal RESP server on a local port. GETs are answered from `entries`;
/// every other command (connection setup) gets `+OK`.
pub struct FakeRedis {
    addr: SocketAddr,
    connections: Arc<AtomicUsize>,
}

impl FakeRedis {
    pub async fn start(entries: &[(&str, &str)], mode: FakeRedisMode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let entries: Arc<HashMap<String, String>> = Arc::new(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        );

        let accepted = connections.clone();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    return;
                };
                let index = accepted.fetch_add(1, Ordering::SeqCst);
                let drop_after_get = mode == FakeRedisMode::DropFirstConnection && index == 0;
                tokio::spawn(serve_connection(
                    socket,
                    entries.clone(),
                    mode,
                    drop_after_get,
                ));
            }
        });

        FakeRedis { addr, connections }
    }

    pub fn url(&self) -> String {
        format!("redis://{}", self.addr)
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

async fn serve_connection(
    socket: TcpStream,
    entries: Arc<HashMap<String, String>>,
    mode: FakeRedisMode,
    drop_after_get: bool,
) {
    let (read_half, mut write_half) = socket.into_split();
    let mut reader = BufReader::new(read_half);

    while let Some(command) = read_command(&mut reader).await {
        let is_get = command
            .first()
            .is_some_and(|name| name.eq_ignore_ascii_case("GET"));

        if !is_get {
            if write_half.write_all(b"+OK\r\n").await.is_err() {
                return;
            }
            continue;
        }

        if mode == FakeRedisMode::NeverAnswerGet {
            continue;
        }

        let reply = match command.get(1).and_then(|key| entries.get(key)) {
            Some(value) => format!("${}\r\n{}\r\n", value.len(), value),
            None => "$-1\r\n".to_string(),
        };
        if write_half.write_all(reply.as_bytes()).await.is_err() || drop_after_get {
            return;
        }
    }
}

/// Reads one command sent as a RESP array of bulk strings.
async fn read_command(reader: &mut BufReader<OwnedReadHalf>) -> Option<Vec<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line).await.ok()? == 0 {
        return None;
    }
    let count: usize = line.trim_end().strip_prefix('*')?.parse().ok()?;

    let mut args = Vec::with_capacity(count);
    for _ in 0..count {
        line.clear();
        reader.read_line(&mut line).await.ok()?;
        let len: usize = line.trim_end().strip_prefix('$')?.parse().ok()?;

        let mut buf = vec![0; len + 2];
        reader.read_exact(&mut buf).await.ok()?;
        buf.truncate(len);
        args.push(String::from_utf8_lossy(&buf).into_owned());
    }

    Some(args)
}
