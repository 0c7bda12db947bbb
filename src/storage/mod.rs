//! Greeting storage.
//!
//! The HTTP layer talks to the backing table only through [`GreetingStore`],
//! so the DynamoDB client and the in-memory backend are interchangeable.
//! Records are keyed by `id`, a DynamoDB Number sent in its string form, and
//! carry a single String attribute `greeting`. Writes are upserts.

mod dynamo;
mod memory;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::config::{StorageBackend, StorageConfig};

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

/// Errors surfaced by a greeting store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("No greeting stored for key {0:?}")]
    NotFound(String),

    #[error("Received unexpected type for {attribute} attribute: {found}")]
    UnexpectedType {
        attribute: &'static str,
        found: &'static str,
    },

    #[error("Key {0:?} is not a valid number")]
    InvalidKey(String),

    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    #[error("Failed to initialize storage client: {0}")]
    Init(String),
}

/// Read/write access to greeting records.
#[async_trait]
pub trait GreetingStore: Send + Sync {
    /// Create or overwrite the greeting stored under `key`.
    async fn write_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Fetch the greeting stored under `key`.
    async fn read_item(&self, key: &str) -> Result<String, StorageError>;
}

/// Build the store selected by `config`.
///
/// Construction happens once at startup; the returned handle is shared by
/// every request.
pub async fn connect(config: &StorageConfig) -> Result<Arc<dyn GreetingStore>, StorageError> {
    match config.backend {
        StorageBackend::Dynamodb => {
            let store = DynamoStore::connect(config).await?;
            tracing::info!(table = %store.table_name(), "Connected to DynamoDB");
            Ok(Arc::new(store))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, greetings are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Most significant digits a DynamoDB Number may carry
pub const NUMBER_MAX_PRECISION: u64 = 38;

/// Decimal exponent range of a non-zero DynamoDB Number (1E-130 to 9.99..E+125)
pub const NUMBER_MIN_EXPONENT: i64 = -130;
pub const NUMBER_MAX_EXPONENT: i64 = 125;

/// Canonical form of a numeric key, equal for every spelling of the same value.
///
/// DynamoDB compares Number keys by value, so `42`, `042`, `42.0` and `4.2e1`
/// address one record. Keys outside the Number grammar, with more than
/// [`NUMBER_MAX_PRECISION`] significant digits, or outside the exponent range
/// are rejected the way the table rejects them.
pub fn canonical_key(key: &str) -> Result<String, StorageError> {
    let invalid = || StorageError::InvalidKey(key.to_string());

    let parts = NumberParts::parse(key).ok_or_else(invalid)?;
    let exponent = parts
        .exponent
        .map_or(Ok(0), str::parse::<i64>)
        .ok()
        .and_then(|e| e.checked_sub(parts.fraction.len() as i64))
        .ok_or_else(invalid)?;

    let literal = format!("{}{}{}e{}", parts.sign, parts.integer, parts.fraction, exponent);
    let value = BigDecimal::from_str(&literal).map_err(|_| invalid())?.normalized();
    let (digits, scale) = value.as_bigint_and_exponent();

    if digits.bits() == 0 {
        return Ok("0".to_string());
    }

    if value.digits() > NUMBER_MAX_PRECISION {
        return Err(invalid());
    }
    let magnitude = value.digits() as i64 - 1 - scale;
    if !(NUMBER_MIN_EXPONENT..=NUMBER_MAX_EXPONENT).contains(&magnitude) {
        return Err(invalid());
    }

    Ok(format!("{}E{}", digits, -scale))
}

/// Lexical pieces of a Number literal: sign, digits around the point, exponent.
struct NumberParts<'a> {
    sign: &'a str,
    integer: &'a str,
    fraction: &'a str,
    exponent: Option<&'a str>,
}

impl<'a> NumberParts<'a> {
    fn parse(key: &'a str) -> Option<Self> {
        let (sign, body) = match key.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", key.strip_prefix('+').unwrap_or(key)),
        };
        let (mantissa, exponent) = match body.find(['e', 'E']) {
            Some(idx) => (&body[..idx], Some(&body[idx + 1..])),
            None => (body, None),
        };
        let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        let mantissa_ok = all_digits(integer)
            && all_digits(fraction)
            && !(integer.is_empty() && fraction.is_empty());
        let exponent_ok = exponent.is_none_or(|e| {
            let digits = e.strip_prefix(['-', '+']).unwrap_or(e);
            !digits.is_empty() && all_digits(digits)
        });

        (mantissa_ok && exponent_ok).then_some(Self {
            sign,
            integer,
            fraction,
            exponent,
        })
    }
}
