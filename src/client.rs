use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};

use crate::diff::condition_events;
use crate::logger::{MessageLogMode, MessageLogger};
use crate::normalize::Normalizer;
use crate::protocol::{action_path, decode_document, Endpoints};
use crate::registry::DeviceRegistry;
use crate::translation::Tables;
use crate::types::*;
use crate::Result;

type EventCallback = Box<dyn Fn(&Event) + Send + Sync>;

/// Same bound the vendor's own tooling uses for one request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub struct PanelClientBuilder {
    address: String,
    protocol: String,
    generation: Generation,
    credentials: Option<(String, String)>,
    verify_tls: bool,
    timeout: Duration,
    history_endpoint: Option<String>,
    tables: Option<&'static Tables>,
    event_callbacks: Vec<EventCallback>,
    log_mode: Option<MessageLogMode>,
    log_path: Option<String>,
}

impl PanelClientBuilder {
    pub fn new(address: impl Into<String>, generation: Generation) -> Self {
        Self {
            address: address.into(),
            protocol: "https".to_string(),
            generation,
            credentials: None,
            verify_tls: true,
            timeout: DEFAULT_TIMEOUT,
            history_endpoint: None,
            tables: None,
            event_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    pub fn protocol(mut self, proto: &str) -> Self {
        self.protocol = proto.to_string();
        self
    }

    /// HTTP basic credentials sent with every request.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Panels usually ship self-signed certificates; pass `false` to accept them.
    pub fn verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Some firmware revisions serve the log under a different action name
    /// (e.g. `historyGet` on XT2).
    pub fn history_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.history_endpoint = Some(endpoint.into());
        self
    }

    /// Replace the built-in vocabulary for this generation.
    pub fn tables(mut self, tables: &'static Tables) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn on_event(mut self, f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.event_callbacks.push(Box::new(f));
        self
    }

    pub fn message_log(mut self, mode: MessageLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<PanelClient> {
        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(!self.verify_tls)
            .build()?;

        let logger = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(MessageLogger::new(mode, &path)?),
            _ => None,
        };

        let mut endpoints = Endpoints::for_generation(self.generation);
        if let Some(history) = self.history_endpoint {
            endpoints.history = history;
        }

        let normalizer = match self.tables {
            Some(tables) => Normalizer::with_tables(self.generation, tables),
            None => Normalizer::new(self.generation),
        };

        Ok(PanelClient {
            http,
            base_url: format!(
                "{}://{}",
                self.protocol,
                self.address.trim_end_matches('/')
            ),
            credentials: self.credentials,
            normalizer,
            endpoints,
            registry: DeviceRegistry::new(),
            history: Vec::new(),
            condition: PanelCondition::default(),
            event_callbacks: self.event_callbacks,
            logger,
        })
    }
}

/// One alarm panel: owns its device registry, history snapshot and latest
/// panel condition.
///
/// Refreshes take `&mut self`, so polls against one panel are serialized.
/// A failed fetch or decode leaves all state as it was.
pub struct PanelClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<(String, String)>,
    normalizer: Normalizer,
    endpoints: Endpoints,
    registry: DeviceRegistry,
    history: Vec<HistoryEntry>,
    condition: PanelCondition,
    event_callbacks: Vec<EventCallback>,
    logger: Option<MessageLogger>,
}

impl PanelClient {
    pub fn builder(address: impl Into<String>, generation: Generation) -> PanelClientBuilder {
        PanelClientBuilder::new(address, generation)
    }

    pub fn generation(&self) -> Generation {
        self.normalizer.generation()
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// GET `/action/<endpoint>` and decode the body.
    pub async fn fetch(&mut self, endpoint: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, action_path(endpoint));
        debug!(url = %url, "fetching panel document");
        if let Some(ref mut logger) = self.logger {
            logger.log_request(endpoint);
        }

        let result = self.get_document(&url).await;
        match result {
            Ok((status, doc)) => {
                if let Some(ref mut logger) = self.logger {
                    logger.log_document(endpoint, status, &doc);
                }
                Ok(doc)
            }
            Err(e) => {
                if let Some(ref mut logger) = self.logger {
                    logger.log_failure(endpoint, &e.to_string());
                }
                Err(e)
            }
        }
    }

    async fn get_document(&self, url: &str) -> Result<(u16, Value)> {
        let mut request = self.http.get(url);
        if let Some((ref user, ref password)) = self.credentials {
            request = request.basic_auth(user, Some(password));
        }
        let resp = request.send().await?.error_for_status()?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        trace!(status, len = body.len(), "panel response");
        Ok((status, decode_document(&body)?))
    }

    pub async fn refresh_condition(&mut self) -> Result<()> {
        let endpoint = self.endpoints.condition.clone();
        let doc = self.fetch(&endpoint).await?;

        let condition = self.normalizer.panel_condition(&doc);
        let events = condition_events(&self.condition, &condition);
        self.condition = condition;
        self.emit(&events);
        Ok(())
    }

    pub async fn refresh_sensors(&mut self) -> Result<()> {
        let endpoint = self.endpoints.devices.clone();
        let doc = self.fetch(&endpoint).await?;

        let events = self.normalizer.apply_device_list(&doc, &mut self.registry);
        debug!(devices = self.registry.len(), "device registry updated");
        self.emit(&events);
        Ok(())
    }

    /// Replaces the history snapshot wholesale.
    pub async fn refresh_history(&mut self) -> Result<()> {
        let endpoint = self.endpoints.history.clone();
        let doc = self.fetch(&endpoint).await?;

        self.history = self.normalizer.history(&doc);
        debug!(entries = self.history.len(), "history replaced");
        Ok(())
    }

    /// History, then sensors, then condition, so modes and panel health
    /// reflect the latest round-trip.
    pub async fn refresh_all(&mut self) -> Result<()> {
        self.refresh_history().await?;
        self.refresh_sensors().await?;
        self.refresh_condition().await
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.registry
    }

    pub fn device(&self, area: u8, zone: u16) -> Option<&Device> {
        self.registry.get(&DeviceKey::new(area, zone))
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn area_states(&self) -> &[AreaState] {
        &self.condition.areas
    }

    pub fn condition(&self) -> &PanelCondition {
        &self.condition
    }

    fn emit(&self, events: &[Event]) {
        for event in events {
            for cb in &self.event_callbacks {
                cb(event);
            }
        }
        if !events.is_empty() {
            debug!(count = events.len(), "processed events from refresh");
        }
    }
}
