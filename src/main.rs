//! Scavenge Demo
//!
//! Runs a complete hunt against in-memory fakes and logs every event.
//! Set `SCAVENGE_LOG` to adjust verbosity (default `info`).

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scavenge::{
    scavenge::{
        export_genesis, MsgCommitSolution, MsgCreateScavenge, MsgRevealSolution, ScavengeEngine,
    },
    AccountId, Coins, Ledger, MemoryLedger, MemoryStore, MsgRouter, ScavengeConfig, ScavengeError,
    ScavengeMsg, VERSION,
};

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_env("SCAVENGE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Scavenge demo v{}", VERSION);

    let config = ScavengeConfig::from_env().context("loading configuration")?;
    demo_hunt(config)
}

/// Demo: one puzzle, one honest solver, one copycat.
fn demo_hunt(config: ScavengeConfig) -> Result<()> {
    info!("=== Starting Demo Hunt ===");

    let alice = AccountId::from_label("alice");
    let bob = AccountId::from_label("bob");
    let carol = AccountId::from_label("carol");
    let reward: Coins = "100token".parse()?;

    let ledger = MemoryLedger::new().with_balance(alice, "1000token".parse::<Coins>()?);
    let mut engine = ScavengeEngine::new(MemoryStore::new(), ledger, config);
    let escrow = engine.escrow_account();

    info!("Creator: {}", alice);
    info!("Solver:  {}", bob);
    info!("Copycat: {}", carol);
    info!("Escrow:  {}", escrow);

    let answer = "x";
    let script: Vec<ScavengeMsg> = vec![
        MsgCreateScavenge::new(alice, "find X", scavenge::solution_hash(answer), reward).into(),
        MsgCommitSolution::from_solution(bob, answer).into(),
        // Carol saw Bob's pending commitment and replays it verbatim
        {
            let copied = MsgCommitSolution::from_solution(bob, answer);
            MsgCommitSolution::new(carol, copied.solution_hash, copied.binding_hash).into()
        },
        MsgRevealSolution::new(carol, answer).into(),
        MsgRevealSolution::new(bob, answer).into(),
        MsgRevealSolution::new(bob, answer).into(),
    ];

    let mut solved = 0;
    for msg in script {
        let msg_type = msg.msg_type();
        let signer = msg.signer();
        if let Err(e) = msg.validate_basic(engine.config()) {
            warn!("{} from {} failed validation: {}", msg_type, signer.short(), e);
            continue;
        }

        match engine.route(msg) {
            Ok(result) => {
                for event in &result.events {
                    info!("{} {}", event.action(), serde_json::to_string(&event.attributes())?);
                    if matches!(event, scavenge::ScavengeEvent::Solved { .. }) {
                        solved += 1;
                    }
                }
            }
            Err(ScavengeError::AlreadySolved { solution_hash }) => {
                info!("{} from {} rejected: {} already solved", msg_type, signer.short(), solution_hash);
            }
            Err(e) => {
                info!("{} from {} rejected: {}", msg_type, signer.short(), e);
            }
        }
    }

    info!("=== Balances ===");
    for (name, account) in [("alice", alice), ("bob", bob), ("carol", carol), ("escrow", escrow)] {
        info!("{:>6}: {}", name, display_balance(&engine.ledger().balance(&account)));
    }

    let snapshot = export_genesis(engine.keeper())?;
    info!("=== Final State ===\n{}", snapshot.to_json()?);

    if solved != 1 {
        bail!("expected exactly one payout, saw {}", solved);
    }
    info!("Reward paid exactly once");
    Ok(())
}

fn display_balance(coins: &Coins) -> String {
    if coins.is_zero() {
        "0".to_string()
    } else {
        coins.to_string()
    }
}
