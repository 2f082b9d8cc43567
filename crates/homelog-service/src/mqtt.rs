//! MQTT transport loop.
//!
//! Connects to the configured broker, subscribes to the telemetry and
//! request topics, and feeds every inbound publish through a
//! single-consumer channel into the dispatch task. The dispatch task
//! owns the store handle, so all database writes are serialized
//! without explicit locking, and messages are processed strictly in
//! arrival order.
//!
//! Reconnection and redelivery are the broker client's concern; on
//! every (re)connect acknowledgment the subscription set is
//! re-established.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use homelog_core::router::{FINGERPRINT_TOPIC, POWER_TOPIC, TEMPERATURE_TOPIC};
use homelog_store::Store;

use crate::config::MqttConfig;
use crate::dispatch;

/// Topic filters the service subscribes to. The `+` wildcard stands
/// for the per-client id segment of the request topics.
const SUBSCRIPTIONS: [&str; 6] = [
    TEMPERATURE_TOPIC,
    POWER_TOPIC,
    FINGERPRINT_TOPIC,
    "home/gettemp/+",
    "home/getpower/+",
    "home/getfingerprint/+",
];

/// Capacity of the inbound message channel.
const INBOUND_CAPACITY: usize = 256;

/// Transport errors.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The configured broker URL did not parse.
    #[error("invalid MQTT broker URL: {0}")]
    InvalidBroker(String),

    /// The broker client rejected a request.
    #[error("MQTT client error: {0}")]
    Client(#[from] rumqttc::ClientError),
}

/// Run the transport loop until shutdown.
///
/// Takes ownership of the store; it moves into the dispatch task,
/// which is the only writer. Returns when a shutdown signal arrives.
pub async fn run(store: Store, config: MqttConfig) -> Result<(), MqttError> {
    let (host, port, use_tls) = parse_broker_url(&config.broker).map_err(MqttError::InvalidBroker)?;

    let mut mqtt_options = MqttOptions::new(&config.client_id, host, port);
    mqtt_options.set_keep_alive(Duration::from_secs(config.keep_alive));

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        mqtt_options.set_credentials(username, password);
    }

    if use_tls {
        mqtt_options.set_transport(rumqttc::Transport::tls_with_default_config());
    }

    let qos = match config.qos {
        0 => QoS::AtMostOnce,
        1 => QoS::AtLeastOnce,
        _ => QoS::ExactlyOnce,
    };

    let (client, mut eventloop) = AsyncClient::new(mqtt_options, 100);
    let (inbound_tx, mut inbound_rx) = mpsc::channel::<(String, Vec<u8>)>(INBOUND_CAPACITY);

    info!("Connecting to MQTT broker at {}", config.broker);

    // Dispatch task: the single consumer of the inbound stream and
    // the single owner of the store.
    let publisher = client.clone();
    let dispatcher = tokio::spawn(async move {
        while let Some((topic, payload)) = inbound_rx.recv().await {
            if let Some(instruction) = dispatch::handle_message(&store, &topic, &payload) {
                match publisher
                    .publish(instruction.topic.clone(), qos, false, instruction.payload)
                    .await
                {
                    Ok(()) => info!("Published response on {}", instruction.topic),
                    Err(e) => warn!("Failed to publish response on {}: {}", instruction.topic, e),
                }
            }
        }
    });

    loop {
        tokio::select! {
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to MQTT broker");
                    for filter in SUBSCRIPTIONS {
                        client.subscribe(filter, qos).await?;
                        debug!("Subscribed to {}", filter);
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let message = (publish.topic.clone(), publish.payload.to_vec());
                    if inbound_tx.send(message).await.is_err() {
                        warn!("Dispatch task stopped, shutting down");
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("MQTT connection error: {}. Reconnecting...", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    // Close the channel so the dispatcher drains and exits.
    drop(inbound_tx);
    let _ = dispatcher.await;

    if let Err(e) = client.disconnect().await {
        debug!("Error disconnecting MQTT client: {}", e);
    }

    info!("MQTT client disconnected");
    Ok(())
}

/// Parse an MQTT broker URL into (host, port, use_tls).
fn parse_broker_url(url: &str) -> Result<(String, u16, bool), String> {
    let (scheme, rest) = if let Some(stripped) = url.strip_prefix("mqtt://") {
        ("mqtt", stripped)
    } else if let Some(stripped) = url.strip_prefix("mqtts://") {
        ("mqtts", stripped)
    } else {
        return Err("Invalid scheme: URL must start with mqtt:// or mqtts://".to_string());
    };

    let use_tls = scheme == "mqtts";
    let default_port = if use_tls { 8883 } else { 1883 };

    let (host, port) = if let Some((h, p)) = rest.rsplit_once(':') {
        let port = p
            .parse::<u16>()
            .map_err(|_| format!("Invalid port: {}", p))?;
        (h.to_string(), port)
    } else {
        (rest.to_string(), default_port)
    };

    if host.is_empty() {
        return Err("Host cannot be empty".to_string());
    }

    Ok((host, port, use_tls))
}
