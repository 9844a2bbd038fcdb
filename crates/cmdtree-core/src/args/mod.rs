//! Typed argument accessors
//!
//! Every value type exposes the same three reads, built on
//! [`Invocation::read`](crate::invocation::Invocation::read) and a textual
//! parser:
//!
//! | read       | token absent          | token fails to parse     |
//! |------------|-----------------------|--------------------------|
//! | `nullable` | `None`                | `None`                   |
//! | `optional` | `None`                | abort: invalid message   |
//! | `required` | abort: usage message  | abort: invalid message   |
//!
//! Reads start from [`Invocation::arg`](crate::invocation::Invocation::arg),
//! which allows an index override, a required permission and message
//! overrides before the terminal read:
//!
//! ```ignore
//! let target = inv.arg().permission("tp.others").required_lookup(&players)?;
//! let amount = inv.arg().at(2).invalid_message("bad amount: {arg}").optional_i32()?;
//! let note = inv.rest();
//! ```

pub mod lookup;
pub mod request;
pub mod slice;
pub mod value;

pub use lookup::{fn_lookup, EnumLookup, FnLookup, Lookup};
pub use request::ArgRequest;
pub use value::{parse_bool, parse_duration, ArgValue};
