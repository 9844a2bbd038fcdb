//! Demo command tree
//!
//! A small server-style command set exercising children, aliases, sender
//! restrictions, permissions, lookups, cooldowns and async handlers.
//!
//! Permissions are checked only on the node that runs, never inherited from
//! parents, so every child of a gated command carries its own permission.

use std::sync::Arc;
use std::time::Duration;

use cmdtree_core::args::{fn_lookup, EnumLookup, Lookup};
use cmdtree_core::completion::{ChildrenOr, LookupCompletion};
use cmdtree_core::{
    fail, CommandNode, CommandResult, CommandSpec, CompletionProvider, CooldownTable, Invocation,
    Principal, PrincipalKind,
};

pub const KIT_COOLDOWN: Duration = Duration::from_secs(30);
pub const COOLDOWN_SWEEP_EVERY: Duration = Duration::from_secs(60);

const MAX_STACK: i32 = 64;

/// Players the demo treats as online
pub const ONLINE_PLAYERS: [&str; 4] = ["Alice", "Bob", "Carol", "Steve"];

/// Principal printing replies to stdout
#[derive(Debug)]
pub struct CliPrincipal {
    name: String,
    kind: PrincipalKind,
    permissions: Vec<String>,
}

impl CliPrincipal {
    pub fn new(name: &str, kind: PrincipalKind, permissions: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            permissions,
        }
    }
}

impl Principal for CliPrincipal {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PrincipalKind {
        self.kind
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.kind == PrincipalKind::Console
            || self
                .permissions
                .iter()
                .any(|p| p == "*" || p == permission)
    }

    fn send_message(&self, message: &str) {
        println!("{}", message);
    }
}

/// Online player lookup, case-insensitive
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlinePlayers;

impl Lookup for OnlinePlayers {
    type Output = String;

    fn kind(&self) -> &str {
        "player"
    }

    fn lookup(&self, raw: &str) -> Option<String> {
        ONLINE_PLAYERS
            .iter()
            .find(|p| p.eq_ignore_ascii_case(raw))
            .map(|p| p.to_string())
    }

    fn invalid_message(&self, raw: &str, _messages: &cmdtree_core::Messages) -> String {
        format!("Player '{}' is not online.", raw)
    }

    fn candidates(&self) -> Vec<String> {
        ONLINE_PLAYERS.iter().map(|p| p.to_string()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Survival,
    Creative,
    Adventure,
    Spectator,
}

impl GameMode {
    fn as_str(&self) -> &'static str {
        match self {
            GameMode::Survival => "survival",
            GameMode::Creative => "creative",
            GameMode::Adventure => "adventure",
            GameMode::Spectator => "spectator",
        }
    }
}

fn game_modes() -> EnumLookup<GameMode> {
    EnumLookup::new("game mode")
        .entry(&["survival", "s", "0"], GameMode::Survival)
        .entry(&["creative", "c", "1"], GameMode::Creative)
        .entry(&["adventure", "a", "2"], GameMode::Adventure)
        .entry(&["spectator", "sp", "3"], GameMode::Spectator)
}

fn kits() -> EnumLookup<&'static str> {
    EnumLookup::new("kit")
        .entry(&["starter"], "starter")
        .entry(&["tools"], "tools")
}

const MATERIALS: [&str; 6] = ["stone", "dirt", "oak_log", "iron_ingot", "diamond", "bread"];

/// All demo root commands
pub fn commands(cooldowns: &CooldownTable) -> Vec<Arc<CommandNode>> {
    vec![
        teleport(),
        message(),
        give(),
        gamemode(),
        kit(cooldowns.clone()),
        broadcast(),
    ]
}

fn teleport() -> Arc<CommandNode> {
    CommandSpec::new("tp|teleport")
        .permission("cmdtree.tp")
        .usage("<player>")
        .description("Teleport to a player")
        .player_only()
        .suggests(ChildrenOr::new(LookupCompletion::new(OnlinePlayers)))
        .performs(|inv| {
            let target = inv.required_lookup(&OnlinePlayers)?;
            inv.reply(format!("Teleported {} to {}.", inv.principal().name(), target));
            Ok(())
        })
        .child(
            CommandSpec::new("here|h")
                .permission("cmdtree.tp.here")
                .usage("<player>")
                .description("Bring a player to you")
                .suggests(LookupCompletion::new(OnlinePlayers))
                .performs(|inv| {
                    let target = inv.required_lookup(&OnlinePlayers)?;
                    inv.reply(format!("Teleported {} to {}.", target, inv.principal().name()));
                    Ok(())
                }),
        )
        .child(
            CommandSpec::new("all")
                .permission("cmdtree.tp.all")
                .max_args(0)
                .description("Bring everyone to you")
                .performs(|inv| {
                    let me = inv.principal().name().to_string();
                    let moved = ONLINE_PLAYERS
                        .iter()
                        .filter(|p| !p.eq_ignore_ascii_case(&me))
                        .count();
                    inv.reply(format!("Teleported {} players to {}.", moved, me));
                    Ok(())
                }),
        )
        .build()
}

fn message() -> Arc<CommandNode> {
    CommandSpec::new("msg|tell|w")
        .usage("<player> <message>")
        .description("Send a private message")
        .suggests_with(|inv: &Invocation, current: &str| {
            if inv.len() > 1 {
                return Vec::new();
            }
            LookupCompletion::new(OnlinePlayers).complete(inv, current)
        })
        .performs(|inv| {
            let target = inv.required_lookup(&OnlinePlayers)?;
            let text = inv.required_rest()?;
            inv.reply(format!("[{} -> {}] {}", inv.principal().name(), target, text));
            Ok(())
        })
        .build()
}

fn give() -> Arc<CommandNode> {
    let materials = fn_lookup("item", |raw: &str| {
        MATERIALS
            .iter()
            .find(|m| m.eq_ignore_ascii_case(raw))
            .map(|m| m.to_string())
    });

    CommandSpec::new("give")
        .permission("cmdtree.give")
        .usage("<player> <item> [amount]")
        .max_args(3)
        .description("Give items to a player")
        .suggests_values(MATERIALS)
        .performs(move |inv| {
            let target = inv.required_lookup(&OnlinePlayers)?;
            let item = inv.required_lookup(&materials)?;
            let amount = inv.optional_i32()?.unwrap_or(1);
            if !(1..=MAX_STACK).contains(&amount) {
                return Err(fail(format!("Amount must be between 1 and {}.", MAX_STACK)));
            }
            inv.reply(format!("Gave {} x {} to {}.", amount, item, target));
            Ok(())
        })
        .build()
}

fn gamemode() -> Arc<CommandNode> {
    let modes = game_modes();

    CommandSpec::new("gamemode|gm")
        .usage("<mode> [player]")
        .max_args(2)
        .description("Change game mode")
        .suggests(LookupCompletion::new(game_modes()))
        .performs(move |inv| {
            let mode = inv.required_lookup(&modes)?;
            let other = inv
                .arg()
                .permission("cmdtree.gamemode.others")
                .optional_lookup(&OnlinePlayers)?;
            let target = match other {
                Some(target) => target,
                None if inv.principal().kind() == PrincipalKind::Player => {
                    inv.principal().name().to_string()
                }
                None => return Err(fail(inv.usage())),
            };
            inv.reply(format!("Set {}'s game mode to {}.", target, mode.as_str()));
            Ok(())
        })
        .build()
}

fn kit(cooldowns: CooldownTable) -> Arc<CommandNode> {
    let kits = kits();

    CommandSpec::new("kit")
        .player_only()
        .usage("<kit>")
        .max_args(1)
        .description("Claim a kit")
        .suggests(LookupCompletion::new(kits.clone()))
        .performs(move |inv| {
            let kit = inv.required_lookup(&kits)?;
            cooldowns.enforce(inv, KIT_COOLDOWN)?;
            inv.reply(format!("Received kit {}.", kit));
            Ok(())
        })
        .build()
}

async fn announce(mut inv: Invocation) -> CommandResult {
    let text = inv.required_rest()?;
    tokio::task::yield_now().await;
    inv.reply(format!("[Broadcast] {}", text));
    Ok(())
}

fn broadcast() -> Arc<CommandNode> {
    CommandSpec::new("broadcast|bc")
        .permission("cmdtree.broadcast")
        .usage("<message>")
        .description("Announce to everyone")
        .performs_async(announce)
        .build()
}
