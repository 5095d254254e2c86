//! # Queue Client CLI
//!
//! Command-line tooling for confirm events.
//!
//! This module provides CLI commands for:
//! - Decoding and inspecting a confirm event blob
//! - Encoding a confirm event from a list of confirmations
//! - Printing the wire limits
//! - Generating shell completions

use clap::{CommandFactory, Parser, Subcommand};
use queue_client::protocol::{
    self, ConfirmBlob, CONFIRM_RECORD_SIZE, EMPTY_CONFIRM_EVENT_SIZE, MAX_CONFIRMATIONS_PER_BATCH,
    MAX_EVENT_SIZE, MAX_PAYLOAD_SIZE,
};
use queue_client::{
    ClientError, ConfigurationError, ConfirmBuilderConfig, ConfirmEventBuilder, CorrelationId,
    MessageConfirmationCookie, MessageGuid, QueueId, SerializationError, SubscriptionHandle,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

// ============================================================================
// CLI Structure
// ============================================================================

/// Queue Client CLI - confirm event tooling
#[derive(Parser)]
#[command(name = "queue-client")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and build message confirmation events")]
pub struct Cli {
    /// Builder configuration file path
    #[arg(short, long, env = "QUEUE_CLIENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Enable JSON logging
    #[arg(long)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Decode a confirm event and list its records
    Decode {
        /// Blob file to read, or '-' for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Input is hex text rather than raw bytes
        #[arg(long)]
        hex: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Build a confirm event from confirmations
    Encode {
        /// Confirmation as QUEUE/GUID[/SUBSCRIPTION]; QUEUE is a number or corr:NUMBER
        #[arg(short = 'm', long = "confirm")]
        confirmations: Vec<ConfirmationArg>,

        /// File with one confirmation per line
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the raw blob here instead of printing hex
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show wire limits
    Limits {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Output format options
#[derive(Clone, Debug, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// One confirmation given on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationArg {
    pub queue: QueueSelector,
    pub guid: MessageGuid,
    pub subscription: u32,
}

/// How a confirmation names its queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueSelector {
    Numeric(i64),
    Correlation(i64),
}

impl ConfirmationArg {
    pub fn to_cookie(&self) -> MessageConfirmationCookie {
        let queue_id = match self.queue {
            QueueSelector::Numeric(n) => QueueId::from_numeric(n),
            QueueSelector::Correlation(n) => {
                QueueId::from_correlation_id(CorrelationId::Numeric(n))
            }
        };
        MessageConfirmationCookie::new(
            queue_id,
            self.guid,
            SubscriptionHandle::new(self.subscription),
        )
    }
}

impl FromStr for ConfirmationArg {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| CliError::InvalidArgument {
            arg: s.to_string(),
            message,
        };

        let mut parts = s.trim().split('/');
        let (queue, guid) = match (parts.next(), parts.next()) {
            (Some(queue), Some(guid)) => (queue, guid),
            _ => return Err(invalid("expected QUEUE/GUID[/SUBSCRIPTION]".to_string())),
        };
        let subscription = match parts.next() {
            Some(id) => id
                .parse::<u32>()
                .map_err(|e| invalid(format!("bad subscription id: {}", e)))?,
            None => SubscriptionHandle::DEFAULT_ID,
        };
        if parts.next().is_some() {
            return Err(invalid("too many '/' separated fields".to_string()));
        }

        let queue = match queue.strip_prefix("corr:") {
            Some(n) => QueueSelector::Correlation(
                n.parse()
                    .map_err(|e| invalid(format!("bad correlation id: {}", e)))?,
            ),
            None => QueueSelector::Numeric(
                queue
                    .parse()
                    .map_err(|e| invalid(format!("bad queue id: {}", e)))?,
            ),
        };
        let guid = MessageGuid::from_hex(guid).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            queue,
            guid,
            subscription,
        })
    }
}

// ============================================================================
// CLI Error Types
// ============================================================================

/// CLI-specific errors
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Confirmation rejected: {0}")]
    Client(#[from] ClientError),

    #[error("Malformed confirm event: {0}")]
    Decode(#[from] SerializationError),

    #[error("Invalid argument: {arg} - {message}")]
    InvalidArgument { arg: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error("Command failed: {message}")]
    CommandFailed { message: String },
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 1,
            Self::Client(_) => 2,
            Self::Decode(_) => 3,
            Self::InvalidArgument { .. } => 4,
            Self::Io(_) => 5,
            Self::Output(_) => 6,
            Self::CommandFailed { .. } => 7,
        }
    }
}

// ============================================================================
// Output Types
// ============================================================================

/// Wire limits as reported by `limits`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Limits {
    pub max_event_size: usize,
    pub max_payload_size: usize,
    pub max_confirmations_per_batch: usize,
    pub record_size: usize,
    pub empty_event_size: usize,
}

impl Limits {
    pub fn current() -> Self {
        Self {
            max_event_size: MAX_EVENT_SIZE,
            max_payload_size: MAX_PAYLOAD_SIZE,
            max_confirmations_per_batch: MAX_CONFIRMATIONS_PER_BATCH,
            record_size: CONFIRM_RECORD_SIZE,
            empty_event_size: EMPTY_CONFIRM_EVENT_SIZE,
        }
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

/// Main CLI entry point
pub async fn run_cli() -> Result<(), CliError> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out).await
}

/// Execute a parsed command, writing results to `out`
pub async fn execute<W: Write>(cli: Cli, out: &mut W) -> Result<(), CliError> {
    match cli.command {
        Commands::Decode { input, hex, format } => {
            execute_decode_command(&input, hex, format, out).await
        }
        Commands::Encode {
            confirmations,
            input,
            output,
        } => {
            let config = ConfirmBuilderConfig::load(cli.config.as_deref())?;
            execute_encode_command(confirmations, input, output, config, out).await
        }
        Commands::Limits { format } => execute_limits_command(format, out),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "queue-client", out);
            Ok(())
        }
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

/// Initialize logging based on CLI arguments
fn initialize_logging(cli: &Cli) -> Result<(), CliError> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| CliError::CommandFailed {
        message: format!("failed to initialize logging: {}", e),
    })
}

async fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut tokio::io::stdin(), &mut buf).await?;
        Ok(buf)
    } else {
        Ok(tokio::fs::read(path).await?)
    }
}

/// Execute decode command
async fn execute_decode_command<W: Write>(
    input: &Path,
    hex_input: bool,
    format: OutputFormat,
    out: &mut W,
) -> Result<(), CliError> {
    let raw = read_input(input).await?;
    let bytes = if hex_input {
        let text: String = String::from_utf8_lossy(&raw)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        hex::decode(&text).map_err(|e| CliError::InvalidArgument {
            arg: input.display().to_string(),
            message: format!("invalid hex: {}", e),
        })?
    } else {
        raw
    };

    let blob = ConfirmBlob::decode(&bytes)?;
    debug!(records = blob.len(), size = bytes.len(), "Decoded confirm event");

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &blob)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(
                out,
                "confirm event: {} record(s), {} bytes",
                blob.len(),
                bytes.len()
            )?;
            for (index, record) in blob.records.iter().enumerate() {
                writeln!(
                    out,
                    "  #{} queue = {} subscription = {} guid = {}",
                    index,
                    record.queue_identity(),
                    record.subscription_id,
                    record.message_guid
                )?;
            }
        }
    }

    Ok(())
}

/// Execute encode command
async fn execute_encode_command<W: Write>(
    mut confirmations: Vec<ConfirmationArg>,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config: ConfirmBuilderConfig,
    out: &mut W,
) -> Result<(), CliError> {
    if let Some(path) = input {
        let text = tokio::fs::read_to_string(&path).await?;
        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            confirmations.push(line.parse()?);
        }
    }

    let mut builder = ConfirmEventBuilder::with_config(config)?;
    for confirmation in &confirmations {
        builder.add_message_confirmation_with_cookie(&confirmation.to_cookie())?;
    }
    let blob = builder.blob()?;

    info!(
        message_count = builder.message_count(),
        size = blob.len(),
        "Encoded confirm event"
    );

    match output {
        Some(path) => {
            tokio::fs::write(&path, &blob).await?;
            writeln!(
                out,
                "wrote {} record(s), {} bytes to {}",
                builder.message_count(),
                blob.len(),
                path.display()
            )?;
        }
        None => writeln!(out, "{}", hex::encode(&blob))?,
    }

    Ok(())
}

/// Execute limits command
fn execute_limits_command<W: Write>(format: OutputFormat, out: &mut W) -> Result<(), CliError> {
    let limits = Limits::current();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &limits)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(out, "max event size:              {}", limits.max_event_size)?;
            writeln!(out, "max payload size:            {}", limits.max_payload_size)?;
            writeln!(
                out,
                "max confirmations per batch: {}",
                limits.max_confirmations_per_batch
            )?;
            writeln!(out, "confirm record size:         {}", limits.record_size)?;
            writeln!(out, "empty confirm event size:    {}", limits.empty_event_size)?;
            writeln!(
                out,
                "size of one full batch:      {}",
                protocol::confirm_event_size(limits.max_confirmations_per_batch)
            )?;
        }
    }
    Ok(())
}
