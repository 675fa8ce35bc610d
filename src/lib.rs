//! Triggers GitHub Actions workflows through the `workflow_dispatch` REST API.

pub mod actions;
pub mod config;
pub mod dispatcher;
pub mod env;
pub mod error;
pub mod github;
pub mod outcome;

pub use config::{AmbientContext, DispatchConfig, RawInputs};
pub use dispatcher::{Dispatcher, resolve_workflow, run};
pub use error::{DispatchError, ErrorKind, GitHubError};
pub use outcome::Outcome;

/// A shorthand to define a statically allocated variable using a [`std::sync::LazyLock`].
///
/// # Examples
///
/// ```rust
/// # use workflow_dispatch::static_lazy_lock;
/// # use std::sync::LazyLock;
/// static_lazy_lock!{
///     pub VAR_1: String = String::from("a static variable");
/// }
/// // ...equals to...
/// pub static VAR_2: LazyLock<String> = LazyLock::new(|| String::from("a static variable"));
/// ```
#[macro_export]
macro_rules! static_lazy_lock {
    ($(#[$meta:meta])* $vis:vis $name:ident: $type:ty = $expr:expr $(;)?) => {
        $(#[$meta])*
        $vis static $name: $crate::__priv_macro_use::LazyLock<$type> =
            $crate::__priv_macro_use::LazyLock::new(|| $expr);
    };
}

#[doc(hidden)]
pub mod __priv_macro_use {
    pub use std::sync::LazyLock;
}
