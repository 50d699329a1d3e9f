//! In-memory cloud server used by the integration tests.
//!
//! Speaks just enough of the HTTP API for the client: login handshake, disk
//! usage, tariffs, shard dispatch, listings, entry mutations, history, sharing,
//! and both transfer directions.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream;
use parking_lot::Mutex;
use reqwest::Url;
use serde_json::{Value, json};
use tokio::sync::Notify;

use mailrulib::http::{HttpResponse, StreamingResponse, Transport};
use mailrulib::{CloudClient, CloudConfig, Result, SessionHandle};

pub const EMAIL: &str = "user@mail.ru";
pub const SECRET: &str = "secret";
pub const TOKEN: &str = "tok-1";
pub const DOWNLOAD_KEY: &str = "dl-1";
pub const MTIME: i64 = 1_700_000_000;

#[derive(Debug, Clone)]
struct Node {
    folder: bool,
    size: i64,
    hash: String,
    mtime: i64,
    weblink: Option<String>,
}

impl Node {
    fn folder() -> Self {
        Self {
            folder: true,
            size: 0,
            hash: String::new(),
            mtime: 0,
            weblink: None,
        }
    }
}

struct State {
    nodes: BTreeMap<String, Node>,
    blobs: HashMap<String, Bytes>,
    history: HashMap<String, Vec<Value>>,
    calls: HashMap<String, usize>,
    tariffs: Vec<(String, bool)>,
    usage_epoch: i64,
    next_link: u32,
    next_rev: i64,
    hold_uploads: bool,
    hold_downloads: bool,
    session_valid: bool,
    oversize: HashSet<String>,
}

/// Fake cloud answering through [`Transport`].
pub struct FakeCloud {
    state: Mutex<State>,
    upload_started: Notify,
    download_started: Notify,
}

impl FakeCloud {
    /// Empty cloud on the free tariff only.
    pub fn new() -> Arc<Self> {
        Self::with_tariffs(&[("ZERO", true)])
    }

    pub fn with_tariffs(tariffs: &[(&str, bool)]) -> Arc<Self> {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), Node::folder());
        Arc::new(Self {
            state: Mutex::new(State {
                nodes,
                blobs: HashMap::new(),
                history: HashMap::new(),
                calls: HashMap::new(),
                tariffs: tariffs
                    .iter()
                    .map(|(id, active)| (id.to_string(), *active))
                    .collect(),
                usage_epoch: 0,
                next_link: 0,
                next_rev: 0,
                hold_uploads: false,
                hold_downloads: false,
                session_valid: true,
                oversize: HashSet::new(),
            }),
            upload_started: Notify::new(),
            download_started: Notify::new(),
        })
    }

    /// Number of requests seen for a path (`/api/v2/folder`) or host (`upload.fake`).
    pub fn calls(&self, route: &str) -> usize {
        self.state.lock().calls.get(route).copied().unwrap_or(0)
    }

    pub fn exists(&self, path: &str) -> bool {
        self.state.lock().nodes.contains_key(&key(path))
    }

    pub fn is_published(&self, path: &str) -> bool {
        self.state
            .lock()
            .nodes
            .get(&key(path))
            .is_some_and(|node| node.weblink.is_some())
    }

    /// Create a folder and its parents without going through the API.
    pub fn seed_folder(&self, path: &str) {
        let mut state = self.state.lock();
        state.mkdir_all(&key(path));
    }

    /// Store a file directly, as if uploaded by another device.
    pub fn seed_file(&self, path: &str, content: &[u8]) {
        let mut state = self.state.lock();
        let hash = content_hash(content);
        state.blobs.insert(hash.clone(), Bytes::copy_from_slice(content));
        state.put_file(&key(path), &hash, content.len() as i64);
    }

    /// Change the account from another device, so disk usage moves.
    pub fn touch_usage(&self) {
        self.state.lock().usage_epoch += 1;
    }

    /// Keep the next uploads pending until the client gives up.
    pub fn hold_uploads(&self) {
        self.state.lock().hold_uploads = true;
    }

    /// Serve one chunk of each download, then stall.
    pub fn hold_downloads(&self) {
        self.state.lock().hold_downloads = true;
    }

    pub async fn upload_started(&self) {
        self.upload_started.notified().await;
    }

    pub async fn download_started(&self) {
        self.download_started.notified().await;
    }

    /// Answer downloads and zip requests touching `path` with the size-limit status.
    pub fn oversize(&self, path: &str) {
        self.state.lock().oversize.insert(key(path));
    }

    /// Make the server reject the session token from now on.
    pub fn expire_session(&self) {
        self.state.lock().session_valid = false;
    }

    fn record(&self, route: &str) {
        *self.state.lock().calls.entry(route.to_string()).or_default() += 1;
    }
}

/// Log into the fake cloud and wrap the session in a client.
pub async fn login(fake: &Arc<FakeCloud>) -> CloudClient {
    login_with_config(fake, CloudConfig::default()).await
}

pub async fn login_with_config(fake: &Arc<FakeCloud>, config: CloudConfig) -> CloudClient {
    let session = SessionHandle::login_with_transport(EMAIL, SECRET, fake.clone(), Arc::new(config))
        .await
        .unwrap();
    CloudClient::new(session).await.unwrap()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Hash the fake upload shard reports for `content`.
pub fn content_hash(content: &[u8]) -> String {
    let mut first = DefaultHasher::new();
    content.hash(&mut first);
    let mut second = DefaultHasher::new();
    (content.len(), content).hash(&mut second);
    format!("{:016X}{:016X}{:08X}", first.finish(), second.finish(), content.len() as u32)
}

fn key(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

fn parent_key(key: &str) -> String {
    match key.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => key[..idx].to_string(),
    }
}

fn base(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 3 <= bytes.len() {
            if let Ok(value) = u8::from_str_radix(&raw[i + 1..i + 3], 16) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn ok(body: Value) -> HttpResponse {
    HttpResponse::new(200, json!({ "body": body, "status": 200 }).to_string())
}

fn status(code: u16) -> HttpResponse {
    HttpResponse::new(code, json!({ "status": code }).to_string())
}

impl State {
    fn is_folder(&self, key: &str) -> bool {
        self.nodes.get(key).is_some_and(|node| node.folder)
    }

    fn mkdir_all(&mut self, key: &str) {
        if key != "/" {
            self.mkdir_all(&parent_key(key));
        }
        self.nodes.entry(key.to_string()).or_insert_with(Node::folder);
    }

    fn put_file(&mut self, key: &str, hash: &str, size: i64) {
        self.mkdir_all(&parent_key(key));
        self.nodes.insert(
            key.to_string(),
            Node {
                folder: false,
                size,
                hash: hash.to_string(),
                mtime: MTIME,
                weblink: None,
            },
        );
        self.next_rev += 1;
        let record = json!({
            "uid": 1,
            "rev": self.next_rev,
            "path": key,
            "name": base(key),
            "hash": hash,
            "size": size,
            "time": MTIME + self.next_rev,
        });
        self.history.entry(key.to_string()).or_default().insert(0, record);
        self.usage_epoch += 1;
    }

    /// First free name in the style of `a (1).txt`.
    fn free_name(&self, key: &str) -> String {
        if !self.nodes.contains_key(key) {
            return key.to_string();
        }
        let name = base(key);
        let (stem, ext) = match name.rfind('.') {
            Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
            _ => (name, ""),
        };
        let parent = parent_key(key);
        (1..)
            .map(|n| join(&parent, &format!("{stem} ({n}){ext}")))
            .find(|candidate| !self.nodes.contains_key(candidate))
            .unwrap_or_default()
    }

    fn subtree(&self, key: &str) -> Vec<String> {
        let prefix = format!("{key}/");
        self.nodes
            .keys()
            .filter(|k| *k == key || k.starts_with(&prefix))
            .cloned()
            .collect()
    }

    fn relocate(&mut self, from: &str, to: &str, keep_source: bool) {
        for old in self.subtree(from) {
            let Some(node) = self.nodes.get(&old).cloned() else {
                continue;
            };
            let new = format!("{to}{}", &old[from.len()..]);
            if !keep_source {
                self.nodes.remove(&old);
            }
            self.nodes.insert(new, node);
        }
        self.usage_epoch += 1;
    }

    fn folder_size(&self, key: &str) -> i64 {
        self.subtree(key)
            .iter()
            .filter_map(|k| self.nodes.get(k))
            .filter(|node| !node.folder)
            .map(|node| node.size)
            .sum()
    }

    fn item(&self, key: &str, node: &Node) -> Value {
        let kind = if node.folder { "folder" } else { "file" };
        let mut item = json!({
            "name": base(key),
            "home": key,
            "type": kind,
            "kind": kind,
        });
        if node.folder {
            let children = self.children(key);
            let files = children.iter().filter(|(_, n)| !n.folder).count();
            item["size"] = json!(self.folder_size(key));
            item["count"] = json!({ "folders": children.len() - files, "files": files });
        } else {
            item["size"] = json!(node.size);
            item["mtime"] = json!(node.mtime);
            item["hash"] = json!(node.hash);
            item["virus_scan"] = json!("pass");
        }
        if let Some(weblink) = &node.weblink {
            item["weblink"] = json!(weblink);
        }
        item
    }

    fn children(&self, key: &str) -> Vec<(String, Node)> {
        self.nodes
            .iter()
            .filter(|(k, _)| k.as_str() != "/" && parent_key(k) == key)
            .map(|(k, n)| (k.clone(), n.clone()))
            .collect()
    }

    fn listing(&self, key: &str) -> Value {
        let Some(node) = self.nodes.get(key) else {
            return Value::Null;
        };
        let mut listing = self.item(key, node);
        let list: Vec<Value> = self
            .children(key)
            .iter()
            .map(|(k, n)| self.item(k, n))
            .collect();
        listing["list"] = json!(list);
        listing["sort"] = json!({ "order": "asc", "type": "name" });
        listing
    }
}

fn params(url: &Url, form: &[(String, String)]) -> HashMap<String, String> {
    let mut params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    params.extend(form.iter().cloned());
    params
}

impl FakeCloud {
    fn authorized(&self, params: &HashMap<String, String>) -> bool {
        self.state.lock().session_valid && params.get("token").map(String::as_str) == Some(TOKEN)
    }

    fn route_get(&self, url: &Url) -> HttpResponse {
        let params = params(url, &[]);
        match (url.host_str().unwrap_or_default(), url.path()) {
            ("auth.mail.ru", "/sdc") => HttpResponse::new(200, ""),
            ("cloud.mail.ru", "/api/v2/tokens/csrf") => ok(json!({ "token": TOKEN })),
            ("cloud.mail.ru", _) if !self.authorized(&params) => status(403),
            ("cloud.mail.ru", "/api/v2/user/space") => {
                let state = self.state.lock();
                ok(json!({
                    "bytes_total": 8192,
                    "bytes_used": 100 + state.usage_epoch,
                    "overquota": false,
                }))
            }
            ("cloud.mail.ru", "/api/v2/billing/rates") => {
                let state = self.state.lock();
                let rates: Vec<Value> = state
                    .tariffs
                    .iter()
                    .map(|(id, active)| {
                        json!({
                            "id": id,
                            "name": format!("Tariff {id}"),
                            "active": active,
                            "available": true,
                            "size": 8_589_934_592_i64,
                            "cost": [],
                        })
                    })
                    .collect();
                ok(json!(rates))
            }
            ("cloud.mail.ru", "/api/v2/dispatcher") => ok(json!({
                "upload": [{ "url": "https://upload.fake/upload/", "count": "1" }],
                "get": [{ "url": "https://get.fake/get/", "count": "1" }],
                "weblink_get": [{ "url": "https://weblink.fake/get", "count": 1 }],
            })),
            ("cloud.mail.ru", "/api/v2/folder") => {
                let state = self.state.lock();
                let home = key(params.get("home").map(String::as_str).unwrap_or("/"));
                if state.is_folder(&home) {
                    ok(state.listing(&home))
                } else {
                    status(404)
                }
            }
            _ => status(404),
        }
    }

    fn route_post(&self, url: &Url, form: &[(String, String)]) -> HttpResponse {
        let params = params(url, form);
        let get = |name: &str| params.get(name).cloned().unwrap_or_default();
        if url.host_str() == Some("auth.mail.ru") {
            return if get("Login") == EMAIL && get("Password") == SECRET {
                HttpResponse::new(200, "")
            } else {
                status(403)
            };
        }
        if !self.authorized(&params) {
            return status(403);
        }

        let mut state = self.state.lock();
        let home = key(&get("home"));
        match url.path() {
            "/api/v2/folder/add" => {
                let target = if state.nodes.contains_key(&home) {
                    state.free_name(&home)
                } else {
                    home
                };
                state.mkdir_all(&target);
                ok(json!(target))
            }
            "/api/v2/file/add" => {
                let size: i64 = get("size").parse().unwrap_or(0);
                let hash = get("hash");
                if !state.is_folder(&parent_key(&home)) {
                    return status(400);
                }
                let target = match get("conflict").as_str() {
                    "rewrite" => home,
                    _ => state.free_name(&home),
                };
                state.put_file(&target, &hash, size);
                ok(json!(target))
            }
            "/api/v2/file/remove" => {
                for k in state.subtree(&home) {
                    state.nodes.remove(&k);
                }
                state.usage_epoch += 1;
                ok(json!(home))
            }
            "/api/v2/file/rename" => {
                if !state.nodes.contains_key(&home) {
                    return status(404);
                }
                let target = state.free_name(&join(&parent_key(&home), &get("name")));
                state.relocate(&home, &target, false);
                ok(json!(target))
            }
            path @ ("/api/v2/file/move" | "/api/v2/file/copy") => {
                let folder = key(&get("folder"));
                if !state.nodes.contains_key(&home) || !state.is_folder(&folder) {
                    return status(404);
                }
                let target = state.free_name(&join(&folder, base(&home)));
                state.relocate(&home, &target, path.ends_with("copy"));
                ok(json!(target))
            }
            "/api/v2/file/publish" => {
                if !state.nodes.contains_key(&home) {
                    return status(404);
                }
                state.next_link += 1;
                let weblink = format!("AbC{}/{}", state.next_link, base(&home));
                if let Some(node) = state.nodes.get_mut(&home) {
                    node.weblink = Some(weblink.clone());
                }
                ok(json!(weblink))
            }
            "/api/v2/file/unpublish" => {
                let weblink = get("weblink");
                let found = state
                    .nodes
                    .iter()
                    .find(|(_, node)| node.weblink.as_deref() == Some(weblink.as_str()))
                    .map(|(k, _)| k.clone());
                match found {
                    Some(k) => {
                        if let Some(node) = state.nodes.get_mut(&k) {
                            node.weblink = None;
                        }
                        ok(json!(k))
                    }
                    None => status(400),
                }
            }
            "/api/v2/file/history" => {
                if state.nodes.get(&home).is_none_or(|node| node.folder) {
                    return status(404);
                }
                ok(json!(state.history.get(&home).cloned().unwrap_or_default()))
            }
            "/api/v2/tokens/download" => ok(json!({ "token": DOWNLOAD_KEY })),
            "/api/v2/zip" => {
                let homes: Vec<String> = serde_json::from_str(&get("home_list")).unwrap_or_default();
                if homes.iter().any(|h| !state.nodes.contains_key(&key(h))) {
                    return status(400);
                }
                if homes.iter().any(|h| state.oversize.contains(&key(h))) {
                    return status(422);
                }
                ok(json!(format!("https://zip.fake/zip/{}", get("name"))))
            }
            _ => status(404),
        }
    }
}

#[async_trait]
impl Transport for FakeCloud {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        let url = Url::parse(url).unwrap();
        self.record(url.path());
        Ok(self.route_get(&url))
    }

    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<HttpResponse> {
        let url = Url::parse(url).unwrap();
        self.record(url.path());
        Ok(self.route_post(&url, form))
    }

    async fn put(&self, url: &str, body: Bytes) -> Result<HttpResponse> {
        let url = Url::parse(url).unwrap();
        let host = url.host_str().unwrap_or_default().to_string();
        self.record(&host);
        if host != "upload.fake" {
            return Ok(status(404));
        }
        if self.state.lock().hold_uploads {
            self.upload_started.notify_one();
            futures::future::pending::<()>().await;
        }
        let hash = content_hash(&body);
        self.state.lock().blobs.insert(hash.clone(), body);
        Ok(HttpResponse::new(200, format!("{hash}\n")))
    }

    async fn get_stream(&self, url: &str) -> Result<StreamingResponse> {
        let url = Url::parse(url).unwrap();
        let host = url.host_str().unwrap_or_default().to_string();
        self.record(&host);

        let content = match host.as_str() {
            "get.fake" => {
                let relative = url.path().strip_prefix("/get").unwrap_or_default();
                let state = self.state.lock();
                if state.oversize.contains(&key(&percent_decode(relative))) {
                    return Ok(StreamingResponse {
                        status: 422,
                        content_length: None,
                        body: stream::empty().boxed(),
                    });
                }
                state
                    .nodes
                    .get(&key(&percent_decode(relative)))
                    .filter(|node| !node.folder)
                    .and_then(|node| state.blobs.get(&node.hash).cloned())
            }
            "zip.fake" => Some(Bytes::from_static(b"PK\x03\x04fake-archive")),
            _ => None,
        };
        let Some(content) = content else {
            return Ok(StreamingResponse {
                status: 404,
                content_length: None,
                body: stream::empty().boxed(),
            });
        };

        let content_length = Some(content.len() as u64);
        let body = if self.state.lock().hold_downloads {
            self.download_started.notify_one();
            let half = content.len() / 2;
            stream::iter(vec![Ok::<_, mailrulib::CloudError>(content.slice(..half))])
                .chain(stream::pending())
                .boxed()
        } else {
            let chunks: Vec<Result<Bytes>> = content
                .chunks(4)
                .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
                .collect();
            stream::iter(chunks).boxed()
        };
        Ok(StreamingResponse {
            status: 200,
            content_length,
            body,
        })
    }
}
