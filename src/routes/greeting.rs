//! Handlers for reading and writing greetings by key.
//!
//! The routes match `/greeting/` and everything below it; the last path
//! segment is the key and is passed to the store verbatim, so `/greeting/`
//! itself carries the empty key. Keys the table cannot accept fail at the
//! storage layer, not here.

use std::collections::HashMap;
use std::fmt;

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, FromRequestParts, Path, State},
    http::{request::Parts, Method},
};
use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;
use tracing::instrument;

use crate::config::{ATTR_GREETING, GREETING_PREFIX};
use crate::error::AppError;
use crate::state::AppState;

/// Route for the bare prefix, which carries the empty key
pub const ROOT_ROUTE: &str = "/greeting/";

/// Catch-all route for everything below the prefix
pub const KEY_ROUTE: &str = "/greeting/{*path}";

/// Name of the catch-all parameter in [`KEY_ROUTE`]
pub const PATH_PARAM: &str = "path";

/// JSON body accepted by `POST /greeting/{key}`
///
/// Field names match case-insensitively, a later `greeting` field replaces an
/// earlier one unless it is `null`, and anything after the first JSON value in
/// the body is ignored. Unknown fields are skipped.
#[derive(Debug, Default)]
pub struct GreetingPayload {
    pub greeting: Option<String>,
}

impl<'de> Deserialize<'de> for GreetingPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PayloadVisitor;

        impl<'de> Visitor<'de> for PayloadVisitor {
            type Value = GreetingPayload;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(GreetingPayload::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut payload = GreetingPayload::default();
                while let Some(field) = map.next_key::<String>()? {
                    if field.eq_ignore_ascii_case(ATTR_GREETING) {
                        if let Some(text) = map.next_value::<Option<String>>()? {
                            payload.greeting = Some(text);
                        }
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(payload)
            }
        }

        deserializer.deserialize_any(PayloadVisitor)
    }
}

impl GreetingPayload {
    /// Parse a request body, whatever its declared content type.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        let mut deserializer = serde_json::Deserializer::from_slice(body);
        Self::deserialize(&mut deserializer).map_err(|e| AppError::MalformedBody(e.to_string()))
    }

    /// The greeting text, rejecting a missing or empty field.
    pub fn into_greeting(self) -> Result<String, AppError> {
        self.greeting
            .filter(|g| !g.is_empty())
            .ok_or(AppError::MissingGreeting)
    }
}

/// Last `/`-separated segment of `path`.
pub fn key_from_path(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Greeting key taken from the request path; empty on `/greeting/`.
#[derive(Debug, Clone)]
pub struct GreetingKey(pub String);

impl<S: Send + Sync> FromRequestParts<S> for GreetingKey {
    type Rejection = PathRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params =
            Option::<Path<HashMap<String, String>>>::from_request_parts(parts, state).await?;
        let key = params
            .and_then(|Path(params)| params.get(PATH_PARAM).map(|path| key_from_path(path).to_string()))
            .unwrap_or_default();
        Ok(Self(key))
    }
}

/// `GET /greeting/{key}`
#[instrument(name = "greeting::read", skip(state))]
pub async fn read(
    State(state): State<AppState>,
    GreetingKey(key): GreetingKey,
) -> Result<String, AppError> {
    let greeting = state
        .store
        .read_item(&key)
        .await
        .map_err(|source| AppError::Read {
            key: key.clone(),
            source,
        })?;

    Ok(format!("{GREETING_PREFIX}{greeting}"))
}

/// `POST /greeting/{key}`
#[instrument(name = "greeting::write", skip(state, body))]
pub async fn write(
    State(state): State<AppState>,
    GreetingKey(key): GreetingKey,
    body: Bytes,
) -> Result<(), AppError> {
    let greeting = GreetingPayload::from_body(&body)?.into_greeting()?;

    state
        .store
        .write_item(&key, &greeting)
        .await
        .map_err(|source| AppError::Write {
            key: key.clone(),
            source,
        })?;

    tracing::info!("Stored greeting");
    Ok(())
}

/// Any other method on `/greeting/{key}`
pub async fn unsupported(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}
