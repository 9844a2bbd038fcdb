//! cmdtree core - command trees and their dispatch engine
//!
//! This crate provides:
//! - Command nodes with child trees, sender restrictions, permissions,
//!   argument limits and help listings
//! - An argument cursor with three-tier typed accessors
//!   (nullable / optional / required)
//! - `Fail` / `Stop` signals resolved once at the dispatch boundary
//! - Tab completion providers
//! - A supervising scope for asynchronous handlers and a cooldown table
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use cmdtree_core::{CommandRegistry, CommandSpec, Principal, PrincipalKind};
//!
//! struct Console(Mutex<Vec<String>>);
//!
//! impl Principal for Console {
//!     fn name(&self) -> &str { "console" }
//!     fn kind(&self) -> PrincipalKind { PrincipalKind::Console }
//!     fn has_permission(&self, _permission: &str) -> bool { true }
//!     fn send_message(&self, message: &str) {
//!         self.0.lock().unwrap().push(message.to_string());
//!     }
//! }
//!
//! let mut registry = CommandRegistry::new();
//! registry
//!     .register(
//!         CommandSpec::new("give")
//!             .usage("<amount>")
//!             .performs(|inv| {
//!                 let amount = inv.required_i32()?;
//!                 inv.reply(format!("gave {}", amount));
//!                 Ok(())
//!             })
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let console = Arc::new(Console(Mutex::new(Vec::new())));
//! assert!(registry.dispatch_line(console.clone(), "/give 5"));
//! assert!(registry.dispatch_line(console.clone(), "give abc"));
//! assert_eq!(
//!     *console.0.lock().unwrap(),
//!     ["gave 5", "'abc' is not a valid integer."]
//! );
//! ```

pub mod args;
pub mod completion;
pub mod cooldown;
pub mod dispatch;
pub mod errors;
pub mod help;
pub mod invocation;
pub mod logging_facility;
pub mod messages;
pub mod node;
pub mod principal;
pub mod scope;
pub mod sender;

pub use cmdtree_core_types as core_types;

// Re-export commonly used types
pub use completion::{CompletionExt, CompletionProvider};
pub use cooldown::CooldownTable;
pub use dispatch::{tokenize, CommandRegistry};
pub use errors::{fail, stop, CommandError, CommandResult, ExError, ExErrorKind, OrFail, Result};
pub use invocation::Invocation;
pub use messages::{DispatchSettings, Messages};
pub use node::{CommandNode, CommandSpec, Outcome, Rejection};
pub use principal::{Principal, PrincipalKind};
pub use scope::HandlerScope;
pub use sender::SenderRestriction;
