//! # Example: Gateway behaviours
//!
//! Two behaviours listen to an in-process gateway hub:
//! - `audit` records every received or deleted message;
//! - `moderation` fails on a message containing "poison".
//!
//! Both are discovered through a catalog (which also lists an abstract type
//! that discovery skips). After the poison message the moderation behaviour
//! is reported as faulted while `audit` keeps running.
//!
//! Run with: `cargo run --example gateway --features logging`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;

use behaviourd::gateway::{
    Gateway, GatewayCategory, GatewayEvent, GatewayHandlers, Message, MessageRef,
};
use behaviourd::source::EventHub;
use behaviourd::{
    Behaviour, BehaviourCatalog, BehaviourRegistry, Config, EventBehaviour, Failure, LogWriter,
    Outcome, ProviderError, ServiceScope, Services, UnitOfWork,
};

type Hub = EventHub<GatewayEvent>;

#[derive(Default)]
struct AuditLog(Mutex<Vec<String>>);

impl AuditLog {
    fn record(&self, line: String) {
        self.0.lock().unwrap_or_else(|p| p.into_inner()).push(line);
    }
}

struct Audit {
    log: Arc<AuditLog>,
}

#[async_trait]
impl GatewayHandlers for Audit {
    fn categories(&self) -> Vec<GatewayCategory> {
        vec![GatewayCategory::MessageReceived, GatewayCategory::MessageDeleted]
    }

    async fn message_received(&self, _uow: UnitOfWork, m: Message) -> Outcome {
        let line = format!("#{} <{}> {}", m.channel_id, m.author_id, m.content);
        self.log.record(line);
        Ok(())
    }

    async fn message_deleted(&self, _uow: UnitOfWork, m: MessageRef) -> Outcome {
        self.log.record(format!("#{} message {} deleted", m.channel_id, m.id));
        Ok(())
    }
}

struct Moderation;

#[async_trait]
impl GatewayHandlers for Moderation {
    fn categories(&self) -> Vec<GatewayCategory> {
        vec![GatewayCategory::MessageReceived]
    }

    async fn message_received(&self, _uow: UnitOfWork, m: Message) -> Outcome {
        if m.content.contains("poison") {
            return Err(Failure::new(format!("poison message {}", m.id)));
        }
        Ok(())
    }
}

fn build_audit(scope: &dyn ServiceScope) -> Result<Arc<dyn Behaviour>, ProviderError> {
    let hub = scope.resolve::<Hub>()?;
    let cfg = scope.resolve::<Config>()?;
    let log = scope.resolve::<AuditLog>()?;
    let behaviour = EventBehaviour::new("audit", hub, Gateway::new(Audit { log }))
        .with_tick_interval(cfg.tick_interval_clamped());
    Ok(Arc::new(behaviour))
}

fn build_moderation(scope: &dyn ServiceScope) -> Result<Arc<dyn Behaviour>, ProviderError> {
    let hub = scope.resolve::<Hub>()?;
    let cfg = scope.resolve::<Config>()?;
    let behaviour = EventBehaviour::new("moderation", hub, Gateway::new(Moderation))
        .with_tick_interval(cfg.tick_interval_clamped());
    Ok(Arc::new(behaviour))
}

fn message(id: u64, content: &str) -> GatewayEvent {
    GatewayEvent::MessageReceived(Message {
        id,
        channel_id: 7,
        author_id: 42,
        content: content.to_string(),
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cfg = Config {
        tick_interval: Duration::from_millis(50),
        grace: Duration::from_secs(2),
        ..Config::default()
    };

    let hub = Arc::new(Hub::new());
    let log = Arc::new(AuditLog::default());
    let services = Services::new()
        .singleton_arc(hub.clone())
        .singleton_arc(log.clone())
        .singleton(cfg.clone());

    let registry = BehaviourRegistry::builder(cfg)
        .with_subscribers(vec![Arc::new(LogWriter::new())])
        .build();

    let catalog = BehaviourCatalog::new()
        .with_fn::<Audit>(build_audit)
        .with_non_instantiable::<dyn GatewayHandlers>()
        .with_fn::<Moderation>(build_moderation);

    registry.discover(&catalog, &services).await?;
    registry.start_all().await?;

    hub.publish(message(1, "hello there"));
    hub.publish(message(2, "this is a poison pill"));
    tokio::time::sleep(Duration::from_millis(300)).await;

    hub.publish(message(3, "still listening?"));
    hub.publish(GatewayEvent::MessageDeleted(MessageRef { id: 1, channel_id: 7 }));
    tokio::time::sleep(Duration::from_millis(300)).await;

    for (name, state) in registry.states().await {
        println!("{name:>12}: {state}");
    }
    if let Some(moderation) = registry.get("moderation").await {
        if let Some(failure) = moderation.last_failure() {
            println!("moderation failed: {failure}");
        }
    }

    registry.shutdown().await?;

    println!("audit log:");
    for line in log.0.lock().unwrap_or_else(|p| p.into_inner()).iter() {
        println!("  {line}");
    }
    Ok(())
}
