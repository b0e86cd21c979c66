//! Static command declarations.
//!
//! A command spec is a zero-sized marker implementing [`CommandSpec`]; every
//! command it declares is another zero-sized marker implementing [`Command`]
//! with its options and return types. Nothing here exists at runtime beyond
//! the names: the traits only parametrise the typed client and server
//! surfaces. Use [`define_commands!`](crate::define_commands) rather than
//! implementing the traits by hand.

mod macros;

#[cfg(test)]
mod tests;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A set of commands served together on one channel.
pub trait CommandSpec: Send + Sync + 'static {
    /// Name of the command spec, used in diagnostics.
    const NAME: &'static str;
    /// Names of every command the command spec declares.
    const COMMANDS: &'static [&'static str];
}

/// A single command: its wire name, options shape and return shape.
pub trait Command: Send + Sync + 'static {
    /// Spec this command belongs to.
    type Spec: CommandSpec;
    /// Options sent by the client alongside `$cmd`.
    type Opts: Serialize + DeserializeOwned + Send + 'static;
    /// Success value returned by the handler.
    type Ret: Serialize + DeserializeOwned + Send + 'static;
    /// Wire name carried in the `$cmd` field.
    const NAME: &'static str;
}

/// Options type for commands that take none.
///
/// Serialises as an empty object and accepts any object, so extra fields
/// sent by newer clients are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoOptions {}

/// Returns `true` when `name` is declared by the command spec `S`.
#[must_use]
pub fn declares<S: CommandSpec>(name: &str) -> bool {
    S::COMMANDS.contains(&name)
}
