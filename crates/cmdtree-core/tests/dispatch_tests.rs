#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cmdtree_core::{
    fail, stop, CommandError, CommandRegistry, CommandSpec, DispatchSettings, ExError,
    ExErrorKind, Messages, Outcome, PrincipalKind, Rejection,
};
use common::{registry_with_tp, tokens, RecordingPrincipal, Trace};

#[test]
fn test_child_dispatch_strips_matched_token() {
    // GIVEN tp with children here and all
    let trace = Trace::default();
    let registry = registry_with_tp(&trace);
    let alice = RecordingPrincipal::with("Alice", PrincipalKind::Player, &["tp.all"]);

    // WHEN dispatching ["all", "Bob"]
    let outcome = registry.execute(alice.clone(), "tp", &tokens(&["all", "Bob"]));

    // THEN child all runs with ["Bob"]
    assert_eq!(outcome, Some(Outcome::Success));
    assert_eq!(trace.calls(), vec![("all".to_string(), tokens(&["Bob"]))]);
    assert_eq!(
        alice.messages(),
        vec!["teleported everyone to Bob".to_string()]
    );
}

#[test]
fn test_child_match_is_case_insensitive_and_uses_aliases() {
    let trace = Trace::default();
    let registry = registry_with_tp(&trace);
    let alice = RecordingPrincipal::player("Alice");

    registry.execute(alice.clone(), "TELEPORT", &tokens(&["H", "Bob"]));
    registry.execute(alice, "tp", &tokens(&["Here", "Carol"]));

    let calls = trace.calls();
    assert_eq!(calls[0], ("here".to_string(), tokens(&["Bob"])));
    assert_eq!(calls[1], ("here".to_string(), tokens(&["Carol"])));
}

#[test]
fn test_unmatched_token_falls_through_to_own_handler() {
    let trace = Trace::default();
    let registry = registry_with_tp(&trace);

    let outcome = registry.execute(RecordingPrincipal::player("Alice"), "tp", &tokens(&["Bob"]));

    assert_eq!(outcome, Some(Outcome::Success));
    assert_eq!(trace.calls(), vec![("tp".to_string(), tokens(&["Bob"]))]);
}

#[test]
fn test_unknown_command_is_not_handled() {
    let trace = Trace::default();
    let registry = registry_with_tp(&trace);
    let alice = RecordingPrincipal::player("Alice");

    assert!(!registry.dispatch(alice.clone(), "fly", &[]));
    assert!(registry.execute(alice.clone(), "fly", &[]).is_none());
    assert!(alice.messages().is_empty());
}

#[test]
fn test_permission_denied_before_handler_runs() {
    // GIVEN a node whose handler would fault first
    let ran = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&ran);
    let mut registry = CommandRegistry::new();
    registry
        .register(
            CommandSpec::new("ban")
                .permission("mod.ban")
                .performs(move |_inv| {
                    flag.store(true, Ordering::SeqCst);
                    Err(CommandError::fault("handler should not run"))
                })
                .build(),
        )
        .unwrap();
    let alice = RecordingPrincipal::player("Alice");

    // WHEN a principal without the permission dispatches
    let outcome = registry.execute(alice.clone(), "ban", &tokens(&["Bob"]));

    // THEN the permission-denied message is sent and the handler never ran
    assert_eq!(outcome, Some(Outcome::Rejected(Rejection::NoPermission)));
    assert_eq!(alice.messages(), vec![Messages::default().unknown_command]);
    assert!(!ran.load(Ordering::SeqCst));
}

#[test]
fn test_max_args_rejects_before_accessors() {
    // GIVEN max_args = 1
    let trace = Trace::default();
    let inner = trace.clone();
    let mut registry = CommandRegistry::new();
    registry
        .register(
            CommandSpec::new("heal")
                .usage("[player]")
                .max_args(1)
                .performs(move |inv| {
                    inner.record("heal", inv.args());
                    inv.required_i32()?;
                    Ok(())
                })
                .build(),
        )
        .unwrap();
    let alice = RecordingPrincipal::player("Alice");

    // WHEN two tokens are given
    let outcome = registry.execute(alice.clone(), "heal", &tokens(&["Bob", "extra"]));

    // THEN the usage message is sent without running the handler
    assert_eq!(
        outcome,
        Some(Outcome::Rejected(Rejection::TooManyArguments))
    );
    assert_eq!(alice.messages(), vec!["Usage: /heal [player]".to_string()]);
    assert_eq!(trace.count(), 0);
}

#[test]
fn test_max_args_zero_and_unlimited() {
    let mut registry = CommandRegistry::new();
    registry
        .register(CommandSpec::new("ping").max_args(0).performs(|_| Ok(())).build())
        .unwrap();
    registry
        .register(CommandSpec::new("say").performs(|_| Ok(())).build())
        .unwrap();
    let alice = RecordingPrincipal::player("Alice");

    assert_eq!(registry.execute(alice.clone(), "ping", &[]), Some(Outcome::Success));
    assert_eq!(
        registry.execute(alice.clone(), "ping", &tokens(&["x"])),
        Some(Outcome::Rejected(Rejection::TooManyArguments))
    );
    let many: Vec<String> = (0..50).map(|i| i.to_string()).collect();
    assert_eq!(registry.execute(alice, "say", &many), Some(Outcome::Success));
}

#[test]
fn test_sender_restrictions() {
    let mut registry = CommandRegistry::new();
    registry
        .register(CommandSpec::new("fly").player_only().performs(|_| Ok(())).build())
        .unwrap();
    registry
        .register(CommandSpec::new("stop").console_only().performs(|_| Ok(())).build())
        .unwrap();
    let alice = RecordingPrincipal::player("Alice");
    let console = RecordingPrincipal::console();
    let messages = Messages::default();

    assert_eq!(
        registry.execute(console.clone(), "fly", &[]),
        Some(Outcome::Rejected(Rejection::WrongSender))
    );
    assert_eq!(console.last_message(), Some(messages.player_only.clone()));

    assert_eq!(
        registry.execute(alice.clone(), "stop", &[]),
        Some(Outcome::Rejected(Rejection::WrongSender))
    );
    assert_eq!(alice.last_message(), Some(messages.console_only.clone()));

    assert_eq!(registry.execute(alice, "fly", &[]), Some(Outcome::Success));
    assert_eq!(registry.execute(console, "stop", &[]), Some(Outcome::Success));
}

#[test]
fn test_sender_check_runs_before_permission_check() {
    let mut registry = CommandRegistry::new();
    registry
        .register(
            CommandSpec::new("home")
                .player_only()
                .permission("home.use")
                .performs(|_| Ok(()))
                .build(),
        )
        .unwrap();
    let console = RecordingPrincipal::console();

    assert_eq!(
        registry.execute(console, "home", &[]),
        Some(Outcome::Rejected(Rejection::WrongSender))
    );
}

#[test]
fn test_signals_resolved_at_boundary() {
    let mut registry = CommandRegistry::new();
    registry
        .register(
            CommandSpec::new("signal")
                .performs(|inv| match inv.required_string()?.as_str() {
                    "fail" => Err(fail("custom failure")),
                    "stop" => Err(stop()),
                    "fault" => Err(ExError::new(ExErrorKind::Internal)
                        .with_message("disk on fire")
                        .into()),
                    "panic" => panic!("handler exploded"),
                    _ => Ok(()),
                })
                .usage("<kind>")
                .build(),
        )
        .unwrap();
    let alice = RecordingPrincipal::player("Alice");
    let generic = Messages::default().internal_error;

    let run = |token: &str| registry.execute(alice.clone(), "signal", &tokens(&[token]));

    assert_eq!(run("ok"), Some(Outcome::Success));
    assert_eq!(run("fail"), Some(Outcome::Failed));
    assert_eq!(alice.last_message().as_deref(), Some("custom failure"));

    alice.clear();
    assert_eq!(run("stop"), Some(Outcome::Stopped));
    assert!(alice.messages().is_empty());

    assert_eq!(run("fault"), Some(Outcome::Faulted));
    assert_eq!(alice.last_message(), Some(generic.clone()));

    assert_eq!(run("panic"), Some(Outcome::Faulted));
    assert_eq!(alice.last_message(), Some(generic));

    // handled but unsuccessful still counts as recognized
    assert!(registry.dispatch(alice, "signal", &tokens(&["fail"])));
}

#[test]
fn test_privileged_principal_sees_fault_details() {
    let mut registry = CommandRegistry::new();
    registry
        .register(
            CommandSpec::new("crash")
                .performs(|_| Err(CommandError::fault("index out of bounds")))
                .build(),
        )
        .unwrap();
    let console = RecordingPrincipal::console();

    assert_eq!(registry.execute(console.clone(), "crash", &[]), Some(Outcome::Faulted));
    assert_eq!(
        console.last_message(),
        Some(format!(
            "{}: index out of bounds",
            Messages::default().internal_error
        ))
    );

    let quiet = {
        let mut settings = DispatchSettings::default();
        settings.show_fault_details = false;
        let mut registry = CommandRegistry::new().with_settings(settings);
        registry
            .register(
                CommandSpec::new("crash")
                    .performs(|_| Err(CommandError::fault("index out of bounds")))
                    .build(),
            )
            .unwrap();
        registry
    };
    quiet.execute(console.clone(), "crash", &[]);
    assert_eq!(console.last_message(), Some(Messages::default().internal_error));
}

#[test]
fn test_custom_messages_flow_into_rejections() {
    let messages = Messages::from_toml_str(
        r#"
unknown_command = "Nope."
usage = "Try: /{command} {args}"
"#,
    )
    .unwrap();
    let mut registry = CommandRegistry::new().with_settings(DispatchSettings::with_messages(messages));
    registry
        .register(
            CommandSpec::new("secret")
                .permission("secret.use")
                .performs(|_| Ok(()))
                .build(),
        )
        .unwrap();
    registry
        .register(
            CommandSpec::new("one")
                .usage("<x>")
                .max_args(1)
                .performs(|_| Ok(()))
                .build(),
        )
        .unwrap();
    let alice = RecordingPrincipal::player("Alice");

    registry.execute(alice.clone(), "secret", &[]);
    registry.execute(alice.clone(), "one", &tokens(&["a", "b"]));

    assert_eq!(alice.messages(), vec!["Nope.", "Try: /one <x>"]);
}

#[test]
fn test_resolution_is_idempotent() {
    let trace = Trace::default();
    let registry = registry_with_tp(&trace);
    let alice = RecordingPrincipal::player("Alice");
    let input = tokens(&["here", "Bob"]);

    let first = registry.execute(alice.clone(), "tp", &input);
    let second = registry.execute(alice.clone(), "tp", &input);

    assert_eq!(first, second);
    let calls = trace.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[test]
fn test_dispatch_line() {
    let trace = Trace::default();
    let registry = registry_with_tp(&trace);
    let alice = RecordingPrincipal::player("Alice");

    assert!(registry.dispatch_line(alice.clone(), "/tp here  Bob"));
    assert!(!registry.dispatch_line(alice.clone(), "/nothing"));
    assert!(!registry.dispatch_line(alice, "   "));
    assert_eq!(trace.calls(), vec![("here".to_string(), tokens(&["Bob"]))]);
}

#[test]
fn test_nested_dispatch_reaches_grandchild() {
    let mut registry = CommandRegistry::new();
    registry
        .register(
            CommandSpec::new("region")
                .child(
                    CommandSpec::new("flag").child(
                        CommandSpec::new("set")
                            .usage("<flag> <value>")
                            .performs(|inv| {
                                let flag = inv.required_string()?;
                                let value = inv.required_bool()?;
                                inv.reply(format!("{} = {}", flag, value));
                                Ok(())
                            }),
                    ),
                )
                .build(),
        )
        .unwrap();
    let alice = RecordingPrincipal::player("Alice");

    let outcome = registry.execute(alice.clone(), "region", &tokens(&["FLAG", "set", "pvp", "off"]));
    assert_eq!(outcome, Some(Outcome::Success));
    assert_eq!(alice.last_message().as_deref(), Some("pvp = false"));

    registry.execute(alice.clone(), "region", &tokens(&["flag", "set", "pvp"]));
    assert_eq!(
        alice.last_message().as_deref(),
        Some("Usage: /region flag set <flag> <value>")
    );
}
