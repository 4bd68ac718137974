use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::warn;

use crate::config::{ConfigError, ServerConfig, config, set_config};
use crate::handler::DemoHandler;
use crate::logging;
use crate::net::{inspect, server::Server, udp};

#[derive(Parser, Debug)]
#[command(name = "rawhttp")]
#[command(about = "HTTP/1.1 server parsing requests straight off TCP")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short = 'c', long = "config", global = true)]
    #[arg(help = "TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long = "log-level", global = true)]
    #[arg(help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Start the server with the demo handler (default)")]
    Serve {
        #[arg(short = 'a', long = "address")]
        #[arg(help = "Address to bind")]
        address: Option<IpAddr>,

        #[arg(short = 'p', long = "port")]
        #[arg(help = "Port to listen on")]
        port: Option<u16>,
    },
    #[command(about = "Print every request received instead of answering it")]
    Inspect {
        #[arg(short = 'a', long = "address")]
        #[arg(help = "Address to bind")]
        address: Option<IpAddr>,

        #[arg(short = 'p', long = "port")]
        #[arg(help = "Port to listen on")]
        port: Option<u16>,
    },
    #[command(about = "Send stdin lines as UDP datagrams")]
    UdpSend {
        #[arg(short = 't', long = "target", default_value = "127.0.0.1:42069")]
        #[arg(help = "Destination address")]
        target: SocketAddr,
    },
}

impl Cli {
    /// File config with command line overrides applied on top.
    ///
    /// A config file that cannot be loaded is reported back instead of logged,
    /// since logging is only set up once the level is known.
    pub fn server_config(&self) -> (ServerConfig, Option<ConfigError>) {
        let (mut config, load_err) = match &self.config {
            Some(path) => match ServerConfig::try_from_file(path) {
                Ok(config) => (config, None),
                Err(err) => (ServerConfig::default(), Some(err)),
            },
            None => (ServerConfig::default(), None),
        };

        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }

        if let Some(Commands::Serve { address, port } | Commands::Inspect { address, port }) = &self.command {
            if let Some(address) = address {
                config.address = *address;
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }

        (config, load_err)
    }

    pub async fn run(self) -> Result<()> {
        let (cfg, load_err) = self.server_config();
        logging::init(&cfg.log_level);
        if let Some(err) = load_err {
            warn!("{err}, falling back to default config");
        }
        set_config(cfg);
        let config = config();

        match self.command {
            None | Some(Commands::Serve { .. }) => {
                let server = Server::bind(config, DemoHandler)
                    .await
                    .with_context(|| format!("Error starting server on {}", config.socket_addr()))?;
                server.run().await?;
            }
            Some(Commands::Inspect { .. }) => {
                inspect::run(config.socket_addr(), config.buffer_size).await?;
            }
            Some(Commands::UdpSend { target }) => {
                udp::run(target).await?;
            }
        }

        Ok(())
    }
}
