#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use cmdtree_core::args::{ArgValue, EnumLookup};
use cmdtree_core::{CommandSpec, DispatchSettings, Invocation, Messages};
use common::RecordingPrincipal;
use proptest::prelude::*;

fn invocation(tokens: Vec<String>) -> Invocation {
    let node = CommandSpec::new("give").usage("<amount>").build();
    Invocation::new(
        RecordingPrincipal::player("Alice"),
        node,
        tokens,
        Arc::new(DispatchSettings::default()),
    )
}

fn token_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|n| n.to_string()),
        "[a-z]{1,6}",
        "-?[0-9]{1,12}",
    ]
}

fn tokens_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(token_strategy(), 0..6)
}

proptest! {
    #[test]
    fn prop_nullable_never_raises(tokens in tokens_strategy(), index in 0usize..8) {
        let expected = tokens.get(index).and_then(|t| i32::parse_arg(t));
        let mut inv = invocation(tokens);
        let result = inv.arg().at(index).nullable_i32();
        prop_assert!(result.is_ok());
        prop_assert_eq!(result.unwrap(), expected);
    }

    #[test]
    fn prop_optional_raises_only_on_present_invalid(tokens in tokens_strategy(), index in 0usize..8) {
        let token = tokens.get(index).cloned();
        let mut inv = invocation(tokens);
        let result = inv.arg().at(index).optional_i32();
        match token {
            None => prop_assert_eq!(result.unwrap(), None),
            Some(t) => match t.parse::<i32>() {
                Ok(n) => prop_assert_eq!(result.unwrap(), Some(n)),
                Err(_) => {
                    let err = result.unwrap_err();
                    let expected = format!("'{}' is not a valid integer.", t);
                    prop_assert_eq!(err.fail_message(), Some(expected.as_str()));
                }
            },
        }
    }

    #[test]
    fn prop_required_raises_on_absent_or_invalid(tokens in tokens_strategy(), index in 0usize..8) {
        let token = tokens.get(index).cloned();
        let mut inv = invocation(tokens);
        let result = inv.arg().at(index).required_i32();
        match token.as_deref().map(str::parse::<i32>) {
            None => {
                let err = result.unwrap_err();
                prop_assert_eq!(err.fail_message(), Some("Usage: /give <amount>"));
            }
            Some(Ok(n)) => prop_assert_eq!(result.unwrap(), n),
            Some(Err(_)) => {
                let err = result.unwrap_err();
                prop_assert!(err.fail_message().unwrap().contains("is not a valid integer"));
            }
        }
    }

    #[test]
    fn prop_cursor_advances_once_per_default_read(tokens in tokens_strategy(), reads in 0usize..12) {
        let mut inv = invocation(tokens);
        for i in 0..reads {
            // mix all three tiers; failures must still consume a slot
            let _ = match i % 3 {
                0 => inv.nullable_i32().map(|_| ()),
                1 => inv.optional_i32().map(|_| ()),
                _ => inv.required_i32().map(|_| ()),
            };
        }
        prop_assert_eq!(inv.cursor(), reads);
    }

    #[test]
    fn prop_explicit_index_never_moves_cursor(tokens in tokens_strategy(), index in 0usize..8) {
        let mut inv = invocation(tokens);
        let _ = inv.arg().at(index).required_string();
        let _ = inv.arg().at(index).nullable_bool();
        prop_assert_eq!(inv.cursor(), 0);
    }

    #[test]
    fn prop_bool_parser_round_trips_canonical_spellings(value in any::<bool>()) {
        let mut inv = invocation(vec![value.to_string().to_uppercase()]);
        prop_assert_eq!(inv.required_bool().unwrap(), value);
    }
}

#[test]
fn test_required_int_invalid_beats_empty_message() {
    let mut inv = invocation(vec!["abc".to_string()]);
    let err = inv.required_i32().unwrap_err();
    assert_eq!(err.fail_message(), Some("'abc' is not a valid integer."));
}

#[test]
fn test_optional_int_on_empty_tokens() {
    let mut inv = invocation(Vec::new());
    assert_eq!(inv.optional_i32().unwrap(), None);
}

#[test]
fn test_chained_optional_reads_do_not_stick() {
    let mut inv = invocation(vec!["5".to_string(), "x".to_string(), "7".to_string()]);
    assert_eq!(inv.optional_i32().unwrap(), Some(5));
    assert!(inv.optional_i32().is_err());
    assert_eq!(inv.optional_i32().unwrap(), Some(7));
    assert_eq!(inv.optional_i32().unwrap(), None);
    assert_eq!(inv.cursor(), 4);
}

#[test]
fn test_message_overrides() {
    let mut inv = invocation(vec!["abc".to_string()]);
    let err = inv
        .arg()
        .invalid_message("bad amount: {arg}")
        .required_i32()
        .unwrap_err();
    assert_eq!(err.fail_message(), Some("bad amount: abc"));

    let err = inv
        .arg()
        .empty_message("give me a number")
        .required_i32()
        .unwrap_err();
    assert_eq!(err.fail_message(), Some("give me a number"));
}

#[test]
fn test_permission_gated_argument() {
    let mut inv = invocation(vec!["Bob".to_string()]);
    let err = inv
        .arg()
        .permission("give.others")
        .optional_string()
        .unwrap_err();
    assert_eq!(err.fail_message(), Some(Messages::default().no_permission.as_str()));

    // absent token: the permission is never consulted
    assert_eq!(
        inv.arg().permission("give.others").optional_string().unwrap(),
        None
    );
}

#[test]
fn test_lookup_tiers() {
    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Mode {
        Survival,
        Creative,
    }

    let modes = EnumLookup::new("game mode")
        .entry(&["survival", "s", "0"], Mode::Survival)
        .entry(&["creative", "c", "1"], Mode::Creative);

    let mut inv = invocation(vec!["C".to_string(), "hardcore".to_string()]);
    assert_eq!(inv.required_lookup(&modes).unwrap(), Mode::Creative);
    assert_eq!(inv.arg().at(1).nullable_lookup(&modes).unwrap(), None);
    let err = inv.arg().at(1).optional_lookup(&modes).unwrap_err();
    assert_eq!(
        err.fail_message(),
        Some("'hardcore' is not a valid game mode.")
    );
    assert!(inv.optional_lookup(&modes).unwrap_err().is_fail());
    assert_eq!(inv.nullable_lookup(&modes).unwrap(), None);
}

#[test]
fn test_typed_family_values() {
    let mut inv = invocation(
        [
            "hello", "x", "abc", "yes", "-8", "300", "70000", "9000000000", "1.5", "2.25",
            "0192a0b4-7c3e-7000-8000-000000000001", "1h30m",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect(),
    );

    assert_eq!(inv.required_string().unwrap(), "hello");
    assert_eq!(inv.required_char().unwrap(), 'x');
    assert_eq!(inv.required_chars().unwrap(), vec!['a', 'b', 'c']);
    assert!(inv.required_bool().unwrap());
    assert_eq!(inv.required_i8().unwrap(), -8);
    assert_eq!(inv.required_i16().unwrap(), 300);
    assert_eq!(inv.required_i32().unwrap(), 70000);
    assert_eq!(inv.required_i64().unwrap(), 9_000_000_000);
    assert_eq!(inv.required_f32().unwrap(), 1.5);
    assert_eq!(inv.required_f64().unwrap(), 2.25);
    assert_eq!(
        inv.required_uuid().unwrap().to_string(),
        "0192a0b4-7c3e-7000-8000-000000000001"
    );
    assert_eq!(
        inv.required_duration().unwrap(),
        std::time::Duration::from_secs(5400)
    );
    assert_eq!(inv.cursor(), 12);
}

#[test]
fn test_out_of_range_byte_uses_byte_message() {
    let mut inv = invocation(vec!["300".to_string()]);
    let err = inv.required_i8().unwrap_err();
    assert_eq!(err.fail_message(), Some("'300' is not a valid byte."));
}
