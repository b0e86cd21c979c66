//! Unit tests for command declarations.

use futures::executor::block_on;
use rstest::rstest;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::*;
use crate::{HandlerResult, Outcome};

#[derive(Debug, Serialize, Deserialize)]
struct RenameOptions {
    from: String,
    to: String,
}

crate::define_commands! {
    /// Commands used by the declaration tests.
    Catalogue with CatalogueHandlers {
        ping => Ping { ret: String },
        /// Renames an entry.
        rename => Rename { opts: RenameOptions, ret: bool },
        count => Count { opts: NoOptions, ret: u64, },
    }
}

struct Ledger;

impl CatalogueHandlers<()> for Ledger {
    async fn ping(&self, _event: (), _options: NoOptions) -> HandlerResult<String> {
        Ok(Outcome::ok("pong".to_owned()))
    }

    async fn rename(&self, _event: (), options: RenameOptions) -> HandlerResult<bool> {
        Ok(Outcome::ok(options.from != options.to))
    }

    async fn count(&self, _event: (), _options: NoOptions) -> HandlerResult<u64> {
        Ok(Outcome::ok(3))
    }
}

#[test]
fn spec_lists_commands_in_declaration_order() {
    assert_eq!(Catalogue::NAME, "Catalogue");
    assert_eq!(Catalogue::COMMANDS, &["ping", "rename", "count"]);
}

#[rstest]
#[case::ping(Ping::NAME, "ping")]
#[case::rename(Rename::NAME, "rename")]
#[case::count(Count::NAME, "count")]
fn command_names_match_declarations(#[case] actual: &str, #[case] expected: &str) {
    assert_eq!(actual, expected);
}

#[rstest]
#[case::declared("rename", true)]
#[case::undeclared("delete", false)]
#[case::case_sensitive("Ping", false)]
fn declares_checks_membership(#[case] name: &str, #[case] expected: bool) {
    assert_eq!(declares::<Catalogue>(name), expected);
}

#[test]
fn omitted_options_default_to_no_options() {
    fn options_of<C: Command>() -> &'static str {
        std::any::type_name::<C::Opts>()
    }
    assert_eq!(options_of::<Ping>(), options_of::<Count>());
}

#[test]
fn no_options_accepts_any_object() {
    let decoded: NoOptions =
        serde_json::from_value(serde_json::json!({"extra": 1})).expect("decode");
    assert_eq!(decoded, NoOptions {});
    assert_eq!(
        serde_json::to_value(NoOptions {}).expect("encode"),
        serde_json::json!({})
    );
}

#[test]
fn generated_handlers_cover_every_command() {
    let dispatcher = Catalogue::define_handlers::<(), _>(Ledger);
    assert_eq!(dispatcher.commands(), vec!["count", "ping", "rename"]);

    let renamed = block_on(dispatcher.dispatch(
        (),
        json!({"$cmd": "rename", "from": "draft", "to": "final"}),
    ))
    .expect("dispatched");
    assert_eq!(renamed, json!({"ok": true, "value": true}));
}
