//! Wire encoding for requests and outcomes.
//!
//! A request is a single JSON object: the command name under the reserved
//! `$cmd` key, merged with the command's options. The response is the
//! serialised [`Outcome`]. Everything that crosses the transport is an
//! untyped [`serde_json::Value`]; this module is where the typed surface
//! meets it.
//!
//! ```json
//! {"$cmd":"buy","item":"book"}
//! ```

mod errors;


use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::command::Command;
use crate::outcome::Outcome;

pub use self::errors::ProtocolError;

/// Reserved request key carrying the command name.
pub const COMMAND_KEY: &str = "$cmd";

/// Encodes typed options into a request for command `C`.
///
/// Options must serialise to a JSON object; `null` (unit options) becomes an
/// object holding only the command name.
///
/// # Errors
///
/// Returns [`ProtocolError::EncodeOptions`] if serialisation fails,
/// [`ProtocolError::OptionsNotObject`] for non-object options, and
/// [`ProtocolError::ReservedKey`] if the options already carry `$cmd`.
pub fn encode_request<C: Command>(options: &C::Opts) -> Result<Value, ProtocolError> {
    let encoded = serde_json::to_value(options)
        .map_err(|source| ProtocolError::encode_options(C::NAME, source))?;
    let mut fields = match encoded {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => return Err(ProtocolError::options_not_object(C::NAME, &other)),
    };
    if fields.contains_key(COMMAND_KEY) {
        return Err(ProtocolError::ReservedKey {
            command: C::NAME.to_owned(),
        });
    }
    fields.insert(COMMAND_KEY.to_owned(), Value::String(C::NAME.to_owned()));
    Ok(Value::Object(fields))
}

/// A parsed request: the command name split from its options.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    command: String,
    options: Map<String, Value>,
}

impl RequestEnvelope {
    /// Splits an incoming request into command name and options.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::NotAnObject`] for non-object requests,
    /// [`ProtocolError::MissingCommand`] when `$cmd` is absent,
    /// [`ProtocolError::CommandNotString`] when it is not a string, and
    /// [`ProtocolError::EmptyCommand`] when it is blank.
    pub fn parse(request: Value) -> Result<Self, ProtocolError> {
        let mut options = match request {
            Value::Object(options) => options,
            other => return Err(ProtocolError::not_an_object(&other)),
        };
        let command = match options.remove(COMMAND_KEY) {
            Some(Value::String(command)) => command,
            Some(other) => return Err(ProtocolError::command_not_string(&other)),
            None => return Err(ProtocolError::MissingCommand),
        };
        let trimmed = command.trim();
        if trimmed.is_empty() {
            return Err(ProtocolError::EmptyCommand);
        }
        Ok(Self {
            command: trimmed.to_owned(),
            options,
        })
    }

    /// Returns the normalised (trimmed) command name.
    #[must_use]
    pub fn command(&self) -> &str {
        self.command.as_str()
    }

    /// Returns the options without the `$cmd` key.
    #[must_use]
    pub const fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Consumes the envelope, returning the command name and options.
    #[must_use]
    pub fn into_parts(self) -> (String, Map<String, Value>) {
        (self.command, self.options)
    }
}

/// Decodes a command's options from the request fields.
///
/// An empty field map also decodes into unit-like option types such as `()`.
///
/// # Errors
///
/// Returns [`ProtocolError::DecodeOptions`] when the fields do not match `O`.
pub fn decode_options<O: DeserializeOwned>(
    command: &str,
    options: Map<String, Value>,
) -> Result<O, ProtocolError> {
    let was_empty = options.is_empty();
    match serde_json::from_value(Value::Object(options)) {
        Ok(decoded) => Ok(decoded),
        Err(source) if was_empty => serde_json::from_value(Value::Null)
            .map_err(|_| ProtocolError::decode_options(command, source)),
        Err(source) => Err(ProtocolError::decode_options(command, source)),
    }
}

/// Encodes a handler outcome for the response path.
///
/// # Errors
///
/// Returns [`ProtocolError::EncodeOutcome`] if serialisation fails.
pub fn encode_outcome<T: Serialize>(
    command: &str,
    outcome: &Outcome<T>,
) -> Result<Value, ProtocolError> {
    serde_json::to_value(outcome).map_err(|source| ProtocolError::EncodeOutcome {
        command: command.to_owned(),
        source,
    })
}

/// Decodes a response into a typed outcome.
///
/// # Errors
///
/// Returns [`ProtocolError::DecodeOutcome`] when the response does not
/// match `Outcome<T>`.
pub fn decode_outcome<T: DeserializeOwned>(
    command: &str,
    response: Value,
) -> Result<Outcome<T>, ProtocolError> {
    serde_json::from_value(response).map_err(|source| ProtocolError::DecodeOutcome {
        command: command.to_owned(),
        source,
    })
}

/// Names the JSON type of a value for diagnostics.
pub(crate) const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
