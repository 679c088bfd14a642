use std::env;

use crate::error::AppError;
use crate::models::address::Address;

const DEFAULT_ORG_ADDRESS: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";
const DEFAULT_FIELD_ADDRESS: &str = "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc";

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub tx_queue_size: usize,
    pub event_buffer_size: usize,
    pub org_address: Address,
    pub field_address: Address,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let config = Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            tx_queue_size: parse_or_default("TX_QUEUE_SIZE", 1024)?,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", 1024)?,
            org_address: parse_or_default("ORG_ADDRESS", default_address(DEFAULT_ORG_ADDRESS)?)?,
            field_address: parse_or_default(
                "FIELD_ADDRESS",
                default_address(DEFAULT_FIELD_ADDRESS)?,
            )?,
        };

        if config.org_address == config.field_address {
            return Err(AppError::Internal(
                "ORG_ADDRESS and FIELD_ADDRESS must differ".to_string(),
            ));
        }
        if config.tx_queue_size == 0 || config.event_buffer_size == 0 {
            return Err(AppError::Internal(
                "TX_QUEUE_SIZE and EVENT_BUFFER_SIZE must be > 0".to_string(),
            ));
        }

        Ok(config)
    }
}

fn default_address(raw: &str) -> Result<Address, AppError> {
    raw.parse()
        .map_err(|err| AppError::Internal(format!("invalid default address: {err}")))
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
