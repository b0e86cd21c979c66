//! Shared fixtures for unit and behaviour tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::{HandlerError, HandlerResult, NoOptions, Outcome, define_commands};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BuyOptions {
    pub(crate) item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) num: Option<u32>,
}

impl BuyOptions {
    pub(crate) fn new(item: &str, num: Option<u32>) -> Self {
        Self {
            item: item.to_owned(),
            num,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Purchase {
    pub(crate) item: String,
    pub(crate) num: u32,
}

define_commands! {
    pub(crate) Shop with ShopHandlers {
        hello => Hello { ret: String },
        buy => Buy { opts: BuyOptions, ret: Purchase },
        sold_out => SoldOut { opts: BuyOptions, ret: Purchase },
        explode => Explode { ret: () },
    }
}

/// Handlers counting how often any command ran.
///
/// `sold_out` always resolves to a failed outcome and `explode` always
/// rejects.
pub(crate) struct CountingShop {
    calls: Arc<AtomicUsize>,
}

impl CountingShop {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Self) {
        let calls = Arc::new(AtomicUsize::new(0));
        let shop = Self {
            calls: Arc::clone(&calls),
        };
        (calls, shop)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl<Ev: Send + 'static> ShopHandlers<Ev> for CountingShop {
    async fn hello(&self, _event: Ev, _options: NoOptions) -> HandlerResult<String> {
        self.record();
        Ok(Outcome::ok("hello".to_owned()))
    }

    async fn buy(&self, _event: Ev, options: BuyOptions) -> HandlerResult<Purchase> {
        self.record();
        Ok(Outcome::ok(Purchase {
            item: options.item,
            num: options.num.unwrap_or(1),
        }))
    }

    async fn sold_out(&self, _event: Ev, options: BuyOptions) -> HandlerResult<Purchase> {
        self.record();
        Ok(Outcome::caught(format!("{} is sold out", options.item)))
    }

    async fn explode(&self, _event: Ev, _options: NoOptions) -> HandlerResult<()> {
        self.record();
        Err(HandlerError::new("boom"))
    }
}
