//! The `define_commands!` declaration macro.

/// Declares a command spec, its command markers and its handlers trait.
///
/// Each entry `name => Marker { opts: O, ret: R }` declares a command whose
/// wire name is `name`. `opts:` may be omitted for commands without options
/// (they use [`NoOptions`](crate::NoOptions)). The generated handlers trait
/// has one required method per command, so a server that forgets a command
/// does not compile. `Spec::define_handlers` turns an implementation into a
/// [`Dispatcher`](crate::Dispatcher).
///
/// # Example
///
/// ```
/// use futures::executor::block_on;
/// use serde::{Deserialize, Serialize};
/// use switchyard::{
///     HandlerResult, InvokeEvent, LocalBus, NoOptions, Outcome, create_client, create_server,
///     define_commands,
/// };
///
/// #[derive(Debug, Serialize, Deserialize)]
/// pub struct BuyOptions {
///     pub item: String,
///     pub num: Option<u32>,
/// }
///
/// #[derive(Debug, PartialEq, Serialize, Deserialize)]
/// pub struct Purchase {
///     pub item: String,
///     pub num: u32,
/// }
///
/// define_commands! {
///     /// Commands served by the shop.
///     pub Shop with ShopHandlers {
///         hello => Hello { ret: String },
///         buy => Buy { opts: BuyOptions, ret: Purchase },
///     }
/// }
///
/// struct Counter;
///
/// impl ShopHandlers<InvokeEvent> for Counter {
///     async fn hello(&self, _event: InvokeEvent, _options: NoOptions) -> HandlerResult<String> {
///         Ok(Outcome::ok("hello".to_owned()))
///     }
///
///     async fn buy(&self, _event: InvokeEvent, options: BuyOptions) -> HandlerResult<Purchase> {
///         Ok(Outcome::ok(Purchase {
///             item: options.item,
///             num: options.num.unwrap_or(1),
///         }))
///     }
/// }
///
/// let bus = LocalBus::new();
/// let server = create_server::<Shop, _>("shop", bus.clone()).expect("server");
/// let client = create_client::<Shop, _>("shop", bus).expect("client");
/// server.handle(Shop::define_handlers(Counter)).expect("register");
///
/// let bought = block_on(client.invoke::<Buy>(BuyOptions {
///     item: "book".into(),
///     num: None,
/// }))
/// .expect("served");
/// assert_eq!(
///     bought,
///     Outcome::ok(Purchase {
///         item: "book".into(),
///         num: 1
///     })
/// );
/// ```
#[macro_export]
macro_rules! define_commands {
    (
        $(#[$spec_meta:meta])*
        $vis:vis $spec:ident with $handlers:ident {
            $(
                $(#[$cmd_meta:meta])*
                $name:ident => $cmd:ident { $(opts: $opts:ty,)? ret: $ret:ty $(,)? }
            ),* $(,)?
        }
    ) => {
        $(#[$spec_meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $spec;

        impl $crate::CommandSpec for $spec {
            const NAME: &'static str = stringify!($spec);
            const COMMANDS: &'static [&'static str] = &[$(stringify!($name)),*];
        }

        $(
            #[doc = concat!("Marker for the `", stringify!($name), "` command.")]
            $(#[$cmd_meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
            $vis struct $cmd;

            impl $crate::Command for $cmd {
                type Spec = $spec;
                type Opts = $crate::__command_options!($($opts)?);
                type Ret = $ret;
                const NAME: &'static str = stringify!($name);
            }
        )*

        #[doc = concat!("Handlers for every command of `", stringify!($spec), "`.")]
        $vis trait $handlers<Ev>: Send + Sync + 'static {
            $(
                #[doc = concat!("Handles the `", stringify!($name), "` command.")]
                fn $name(
                    &self,
                    event: Ev,
                    options: <$cmd as $crate::Command>::Opts,
                ) -> impl ::core::future::Future<
                    Output = $crate::HandlerResult<<$cmd as $crate::Command>::Ret>,
                > + Send;
            )*
        }

        impl $spec {
            /// Builds a dispatcher routing every command to `handlers`.
            pub fn define_handlers<Ev, H>(handlers: H) -> $crate::Dispatcher<$spec, Ev>
            where
                Ev: Send + 'static,
                H: $handlers<Ev>,
            {
                let shared = ::std::sync::Arc::new(handlers);
                $crate::HandlerSet::<$spec, Ev>::new()
                    $(
                        .on::<$cmd, _, _>({
                            let owner = ::std::sync::Arc::clone(&shared);
                            move |event, options| {
                                let target = ::std::sync::Arc::clone(&owner);
                                async move { target.$name(event, options).await }
                            }
                        })
                    )*
                    .into_dispatcher()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __command_options {
    () => {
        $crate::NoOptions
    };
    ($opts:ty) => {
        $opts
    };
}
