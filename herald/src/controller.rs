use std::sync::{Arc, LazyLock};

use herald_campaign::CampaignDispatcher;
use herald_common::{MessageTemplate, Signal, internal, logging};
use herald_http::HttpConfig;
use herald_transport::TransportConfig;
use serde::Deserialize;
use tokio::sync::broadcast;

/// The whole deployment, deserialized straight from the configuration file.
#[derive(Deserialize)]
pub struct Herald {
    #[serde(default)]
    http: HttpConfig,
    transport: TransportConfig,
    #[serde(default)]
    template: MessageTemplate,
}

pub static SHUTDOWN_BROADCAST: LazyLock<broadcast::Sender<Signal>> = LazyLock::new(|| {
    let (sender, _receiver) = broadcast::channel(64);
    sender
});

async fn shutdown() -> anyhow::Result<()> {
    let mut terminate = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            internal!("CTRL+C entered -- Enter it again to force shutdown");
        }
        _ = terminate.recv() => {
            internal!("Terminate Signal received, shutting down");
        }
    };

    let mut receiver = SHUTDOWN_BROADCAST.subscribe();

    SHUTDOWN_BROADCAST
        .send(Signal::Shutdown)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Interrupted, e.to_string()))?;

    loop {
        tokio::select! {
            sig = receiver.recv() => {
                match sig {
                    Ok(s) => tracing::debug!("Received {s:?}"),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(e) => tracing::debug!("Received: {e:?}"),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    Ok(())
}

impl Herald {
    /// Run this controller, and everything it controls
    ///
    /// # Errors
    ///
    /// This function will return an error if the transport cannot be
    /// constructed or the HTTP listener cannot be served.
    pub async fn run(self) -> anyhow::Result<()> {
        logging::init();

        let Self {
            http,
            transport,
            template,
        } = self;

        let transport = transport.into_transport()?;
        let dispatcher = Arc::new(CampaignDispatcher::new(transport, template));

        internal!("Controller running");

        let ret = tokio::select! {
            r = herald_http::serve(&http, dispatcher, SHUTDOWN_BROADCAST.subscribe()) => {
                r.map_err(anyhow::Error::from)
            }
            r = shutdown() => {
                r
            }
        };

        internal!("Shutting down...");

        ret
    }
}
