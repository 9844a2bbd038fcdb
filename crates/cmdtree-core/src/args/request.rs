//! Argument read requests and the three-tier accessor family.

use std::time::Duration;

use uuid::Uuid;

use crate::args::lookup::Lookup;
use crate::args::value::ArgValue;
use crate::errors::{fail, CommandResult};
use crate::invocation::Invocation;
use crate::messages::{render, Messages};

/// Outcome of probing one slot
enum Probe<T> {
    Absent { empty: String },
    Invalid { message: String },
    Parsed(T),
}

/// A pending typed read against an [`Invocation`]
///
/// Created by [`Invocation::arg`]; consumed by one terminal read.
pub struct ArgRequest<'a> {
    inv: &'a mut Invocation,
    index: Option<usize>,
    permission: Option<String>,
    empty_message: Option<String>,
    invalid_message: Option<String>,
}

impl<'a> ArgRequest<'a> {
    pub(crate) fn new(inv: &'a mut Invocation) -> Self {
        Self {
            inv,
            index: None,
            permission: None,
            empty_message: None,
            invalid_message: None,
        }
    }

    /// Read slot `index` instead of the cursor
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Require `permission` when a token is present at the slot
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Message for a missing token (default: the node's usage line)
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = Some(message.into());
        self
    }

    /// Message for an invalid token; `{arg}` is replaced by the token
    pub fn invalid_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = Some(message.into());
        self
    }

    fn probe<T>(
        self,
        parse: impl FnOnce(&str) -> Option<T>,
        invalid: impl FnOnce(&Messages, &str) -> String,
    ) -> CommandResult<Probe<T>> {
        let ArgRequest {
            inv,
            index,
            permission,
            empty_message,
            invalid_message,
        } = self;

        let Some(raw) = inv.read(index, permission.as_deref())? else {
            let empty = empty_message.unwrap_or_else(|| inv.usage());
            return Ok(Probe::Absent { empty });
        };

        match parse(&raw) {
            Some(value) => Ok(Probe::Parsed(value)),
            None => {
                let message = match invalid_message {
                    Some(template) => render(&template, &[("arg", &raw)]),
                    None => invalid(inv.messages(), &raw),
                };
                Ok(Probe::Invalid { message })
            }
        }
    }

    fn probe_value<T: ArgValue>(self) -> CommandResult<Probe<T>> {
        self.probe(T::parse_arg, |messages, raw| {
            render(
                T::invalid_template(messages),
                &[("arg", raw), ("type", T::TYPE_NAME)],
            )
        })
    }

    fn probe_lookup<L: Lookup>(self, source: &L) -> CommandResult<Probe<L::Output>> {
        self.probe(
            |raw| source.lookup(raw),
            |messages, raw| source.invalid_message(raw, messages),
        )
    }

    /// Missing or invalid tokens both yield `None`
    ///
    /// # Errors
    ///
    /// Only the permission check can abort.
    pub fn nullable<T: ArgValue>(self) -> CommandResult<Option<T>> {
        Ok(nullable_of(self.probe_value()?))
    }

    /// Missing yields `None`; an invalid token aborts
    ///
    /// # Errors
    ///
    /// Aborts with the type's invalid message.
    pub fn optional<T: ArgValue>(self) -> CommandResult<Option<T>> {
        optional_of(self.probe_value()?)
    }

    /// Missing or invalid tokens abort
    ///
    /// # Errors
    ///
    /// Aborts with the empty message or the type's invalid message.
    pub fn required<T: ArgValue>(self) -> CommandResult<T> {
        required_of(self.probe_value()?)
    }

    /// Domain lookup; `None` when absent or not found
    ///
    /// # Errors
    ///
    /// Only the permission check can abort.
    pub fn nullable_lookup<L: Lookup>(self, source: &L) -> CommandResult<Option<L::Output>> {
        Ok(nullable_of(self.probe_lookup(source)?))
    }

    /// Domain lookup; `None` when absent, abort when not found
    ///
    /// # Errors
    ///
    /// Aborts with the lookup's invalid message.
    pub fn optional_lookup<L: Lookup>(self, source: &L) -> CommandResult<Option<L::Output>> {
        optional_of(self.probe_lookup(source)?)
    }

    /// Domain lookup; abort when absent or not found
    ///
    /// # Errors
    ///
    /// Aborts with the empty message or the lookup's invalid message.
    pub fn required_lookup<L: Lookup>(self, source: &L) -> CommandResult<L::Output> {
        required_of(self.probe_lookup(source)?)
    }
}

fn nullable_of<T>(probe: Probe<T>) -> Option<T> {
    match probe {
        Probe::Parsed(value) => Some(value),
        Probe::Absent { .. } | Probe::Invalid { .. } => None,
    }
}

fn optional_of<T>(probe: Probe<T>) -> CommandResult<Option<T>> {
    match probe {
        Probe::Parsed(value) => Ok(Some(value)),
        Probe::Absent { .. } => Ok(None),
        Probe::Invalid { message } => Err(fail(message)),
    }
}

fn required_of<T>(probe: Probe<T>) -> CommandResult<T> {
    match probe {
        Probe::Parsed(value) => Ok(value),
        Probe::Absent { empty } => Err(fail(empty)),
        Probe::Invalid { message } => Err(fail(message)),
    }
}

/// Generates `nullable_*`, `optional_*` and `required_*` for each value type,
/// on [`ArgRequest`] and as cursor-default shorthands on [`Invocation`].
macro_rules! typed_accessors {
    ($($ty:ty => $nullable:ident, $optional:ident, $required:ident;)*) => {
        impl ArgRequest<'_> {
            $(
                #[doc = concat!("Nullable `", stringify!($ty), "` read")]
                ///
                /// # Errors
                ///
                /// Only the permission check can abort.
                pub fn $nullable(self) -> CommandResult<Option<$ty>> {
                    self.nullable::<$ty>()
                }

                #[doc = concat!("Optional `", stringify!($ty), "` read")]
                ///
                /// # Errors
                ///
                /// Aborts when a token is present but invalid.
                pub fn $optional(self) -> CommandResult<Option<$ty>> {
                    self.optional::<$ty>()
                }

                #[doc = concat!("Required `", stringify!($ty), "` read")]
                ///
                /// # Errors
                ///
                /// Aborts when the token is missing or invalid.
                pub fn $required(self) -> CommandResult<$ty> {
                    self.required::<$ty>()
                }
            )*
        }

        impl Invocation {
            $(
                #[doc = concat!("Nullable `", stringify!($ty), "` read at the cursor")]
                ///
                /// # Errors
                ///
                /// Never aborts without a permission requirement.
                pub fn $nullable(&mut self) -> CommandResult<Option<$ty>> {
                    self.arg().$nullable()
                }

                #[doc = concat!("Optional `", stringify!($ty), "` read at the cursor")]
                ///
                /// # Errors
                ///
                /// Aborts when a token is present but invalid.
                pub fn $optional(&mut self) -> CommandResult<Option<$ty>> {
                    self.arg().$optional()
                }

                #[doc = concat!("Required `", stringify!($ty), "` read at the cursor")]
                ///
                /// # Errors
                ///
                /// Aborts when the token is missing or invalid.
                pub fn $required(&mut self) -> CommandResult<$ty> {
                    self.arg().$required()
                }
            )*
        }
    };
}

typed_accessors! {
    String => nullable_string, optional_string, required_string;
    char => nullable_char, optional_char, required_char;
    Vec<char> => nullable_chars, optional_chars, required_chars;
    bool => nullable_bool, optional_bool, required_bool;
    i8 => nullable_i8, optional_i8, required_i8;
    i16 => nullable_i16, optional_i16, required_i16;
    i32 => nullable_i32, optional_i32, required_i32;
    i64 => nullable_i64, optional_i64, required_i64;
    f32 => nullable_f32, optional_f32, required_f32;
    f64 => nullable_f64, optional_f64, required_f64;
    Uuid => nullable_uuid, optional_uuid, required_uuid;
    Duration => nullable_duration, optional_duration, required_duration;
}

impl Invocation {
    /// Nullable domain lookup at the cursor
    ///
    /// # Errors
    ///
    /// Never aborts without a permission requirement.
    pub fn nullable_lookup<L: Lookup>(&mut self, source: &L) -> CommandResult<Option<L::Output>> {
        self.arg().nullable_lookup(source)
    }

    /// Optional domain lookup at the cursor
    ///
    /// # Errors
    ///
    /// Aborts when a token is present but does not resolve.
    pub fn optional_lookup<L: Lookup>(&mut self, source: &L) -> CommandResult<Option<L::Output>> {
        self.arg().optional_lookup(source)
    }

    /// Required domain lookup at the cursor
    ///
    /// # Errors
    ///
    /// Aborts when the token is missing or does not resolve.
    pub fn required_lookup<L: Lookup>(&mut self, source: &L) -> CommandResult<L::Output> {
        self.arg().required_lookup(source)
    }
}
