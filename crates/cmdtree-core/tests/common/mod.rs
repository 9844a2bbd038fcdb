use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use cmdtree_core::{
    CommandNode, CommandRegistry, CommandSpec, OrFail, Principal, PrincipalKind,
};

/// Principal that records every message sent to it
pub struct RecordingPrincipal {
    name: String,
    kind: PrincipalKind,
    permissions: Vec<String>,
    messages: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingPrincipal {
    pub fn player(name: &str) -> Arc<Self> {
        Self::with(name, PrincipalKind::Player, &[])
    }

    pub fn console() -> Arc<Self> {
        Self::with("CONSOLE", PrincipalKind::Console, &[])
    }

    pub fn with(name: &str, kind: PrincipalKind, permissions: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            kind,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last_message(&self) -> Option<String> {
        self.messages.lock().unwrap().last().cloned()
    }

    pub fn clear(&self) {
        self.messages.lock().unwrap().clear();
    }
}

impl Principal for RecordingPrincipal {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PrincipalKind {
        self.kind
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.kind == PrincipalKind::Console || self.permissions.iter().any(|p| p == permission)
    }

    fn send_message(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Convert a token list
#[allow(dead_code)]
pub fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|t| t.to_string()).collect()
}

/// Records which handler ran and with which tokens
#[derive(Clone, Default)]
pub struct Trace {
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    count: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl Trace {
    pub fn record(&self, handler: &str, args: &[String]) {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((handler.to_string(), args.to_vec()));
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

/// `tp` with children `here` and `all`, each recording its tokens
#[allow(dead_code)]
pub fn tp_tree(trace: &Trace) -> Arc<CommandNode> {
    let root = trace.clone();
    let here = trace.clone();
    let all = trace.clone();
    CommandSpec::new("tp|teleport")
        .usage("<player>")
        .performs(move |inv| {
            root.record("tp", inv.args());
            Ok(())
        })
        .child(
            CommandSpec::new("here|h")
                .usage("<player>")
                .description("Bring a player to you")
                .performs(move |inv| {
                    here.record("here", inv.args());
                    Ok(())
                }),
        )
        .child(
            CommandSpec::new("all")
                .permission("tp.all")
                .performs(move |inv| {
                    all.record("all", inv.args());
                    let target = inv.nullable_string()?.or_fail("nobody to teleport")?;
                    inv.reply(format!("teleported everyone to {}", target));
                    Ok(())
                }),
        )
        .build()
}

/// Registry holding the `tp` tree
#[allow(dead_code)]
pub fn registry_with_tp(trace: &Trace) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(tp_tree(trace)).unwrap();
    registry
}
