use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::lock::FileLock;
use crate::io::state::{self, SessionState};
use crate::io::tree_io;
use crate::model::config::{Config, DropConfig};
use crate::ops::{check, reorder_ops, replay};
use crate::parse::{parse_gestures, parse_target};
use crate::tracker::{DragTracker, DropPolicy, TrackerOptions};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let mut ctx = Context::load(cli.dir.as_deref(), cli.json, cli.policy)?;

    match cli.command {
        Commands::Show(args) => cmd_show(&mut ctx, args),
        Commands::Check(args) => cmd_check(&mut ctx, args),
        Commands::Mv(args) => cmd_mv(&mut ctx, args),
        Commands::Replay(args) => cmd_replay(&mut ctx, args),
        Commands::Undo(args) => cmd_undo(&mut ctx, args),
        Commands::History => cmd_history(&ctx),
        Commands::Config(args) => cmd_config(&mut ctx, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Everything a command needs besides its own arguments
struct Context {
    dir: PathBuf,
    config: Config,
    json: bool,
    policy_override: Option<DropPolicy>,
    state_path: PathBuf,
    state: SessionState,
}

impl Context {
    fn load(
        dir: Option<&Path>,
        json: bool,
        policy_override: Option<DropPolicy>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = match dir {
            Some(d) => d.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let (config, _doc) = config_io::read_config(&dir)?;
        let state_path = dir.join(&config.state.file);
        let state = state::read_state(&state_path).unwrap_or_default();
        Ok(Context {
            dir,
            config,
            json,
            policy_override,
            state_path,
            state,
        })
    }

    fn tracker_options(&self) -> TrackerOptions {
        let mut options = self.config.drop.tracker_options();
        if let Some(policy) = self.policy_override {
            options.policy = policy;
        }
        options
    }

    /// Resolve the tree file for a command, falling back to the last one
    /// used, and remember it for next time.
    fn tree_path(&mut self, arg: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = arg
            .or_else(|| self.state.last_tree.clone())
            .ok_or("no tree file given and none used before")?;
        let path = fs::canonicalize(&path)
            .map_err(|e| format!("cannot resolve tree path '{}': {}", path.display(), e))?;
        self.state.last_tree = Some(path.clone());
        Ok(path)
    }

    /// Session state is best effort: a failed write never fails the command.
    fn save_state(&self) {
        if let Err(e) = state::write_state(&self.state_path, &self.state) {
            tracing::warn!(
                path = %self.state_path.display(),
                error = %e,
                "could not save session state"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_show(ctx: &mut Context, args: TreeArgs) -> CmdResult {
    let path = ctx.tree_path(args.tree)?;
    let project = tree_io::load_project(&path)?;
    ctx.save_state();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&project.to_document())?);
    } else {
        for line in format_outline(&project) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_check(ctx: &mut Context, args: TreeArgs) -> CmdResult {
    let path = ctx.tree_path(args.tree)?;
    let doc = tree_io::read_document(&path)?;
    ctx.save_state();
    let result = check::check_document(&doc);

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for line in format_check(&result) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_history(ctx: &Context) -> CmdResult {
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&ctx.state.history)?);
        return Ok(());
    }
    if ctx.state.history.is_empty() {
        println!("no moves recorded");
    }
    for entry in &ctx.state.history {
        println!(
            "{}  {}  {}",
            entry
                .applied_at
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            entry.tree.display(),
            entry.intent
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_mv(ctx: &mut Context, args: MvArgs) -> CmdResult {
    let path = ctx.tree_path(args.tree)?;
    let _lock = FileLock::acquire_default(&path)?;
    let mut project = tree_io::load_project(&path)?;

    let target = parse_target(&args.target);
    let mut tracker = DragTracker::new(ctx.tracker_options());
    if !tracker.start(&project.tree, &args.item) {
        return Err(format!("item not found: {}", args.item).into());
    }
    let valid = match args.offset {
        Some(o) => tracker.hover_at(&project.tree, target.clone(), o),
        None => tracker.hover(&project.tree, target.clone()),
    };
    if !valid {
        tracker.cancel();
        return Err(format!("cannot drop {} on {}", args.item, target).into());
    }
    let Some(intent) = tracker.drop(&project.tree, target) else {
        ctx.save_state();
        if ctx.json {
            let out = MoveJson {
                intent: None,
                applied: false,
                updates: &[],
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("{} is already there", args.item);
        }
        return Ok(());
    };

    let updates = if args.dry_run {
        Vec::new()
    } else {
        let updates = reorder_ops::apply_move(&mut project.tree, &intent)?;
        tree_io::save_project(&path, &project)?;
        ctx.state.record(&path, intent.clone(), ctx.config.state.history_limit);
        updates
    };
    ctx.save_state();

    if ctx.json {
        let out = MoveJson {
            intent: Some(&intent),
            applied: !args.dry_run,
            updates: &updates,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let verb = if args.dry_run { "would move" } else { "moved" };
        println!("{} {}", verb, intent);
        for update in &updates {
            println!("{}", format_update(update));
        }
    }
    Ok(())
}

fn cmd_replay(ctx: &mut Context, args: ReplayArgs) -> CmdResult {
    let script = if args.script == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.script)
            .map_err(|e| format!("could not read {}: {}", args.script, e))?
    };
    let gestures = parse_gestures(&script)?;

    let path = ctx.tree_path(args.tree)?;
    let _lock = if args.apply {
        Some(FileLock::acquire_default(&path)?)
    } else {
        None
    };
    let mut project = tree_io::load_project(&path)?;
    let mut tracker = DragTracker::new(ctx.tracker_options());
    let steps = replay::replay(&mut tracker, &mut project.tree, &gestures, args.apply)?;

    if args.apply {
        let intents: Vec<_> = steps.iter().filter_map(|s| s.intent().cloned()).collect();
        if !intents.is_empty() {
            tree_io::save_project(&path, &project)?;
        }
        for intent in intents {
            ctx.state.record(&path, intent, ctx.config.state.history_limit);
        }
    }
    ctx.save_state();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&steps)?);
    } else {
        for step in &steps {
            println!("{}", format_step(step));
        }
    }
    Ok(())
}

fn cmd_undo(ctx: &mut Context, args: TreeArgs) -> CmdResult {
    let path = ctx.tree_path(args.tree)?;
    let entry = ctx
        .state
        .pop_for(&path)
        .ok_or_else(|| format!("nothing to undo for {}", path.display()))?;

    let _lock = FileLock::acquire_default(&path)?;
    let mut project = tree_io::load_project(&path)?;
    let inverse = entry.intent.inverse();
    let updates = reorder_ops::apply_move(&mut project.tree, &inverse)?;
    tree_io::save_project(&path, &project)?;
    ctx.save_state();

    if ctx.json {
        let out = MoveJson {
            intent: Some(&inverse),
            applied: true,
            updates: &updates,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("undid {}", entry.intent);
        for update in &updates {
            println!("{}", format_update(update));
        }
    }
    Ok(())
}

fn cmd_config(ctx: &mut Context, args: ConfigArgs) -> CmdResult {
    if let Some(t) = args.threshold {
        if !DropConfig::threshold_in_range(t) {
            return Err(format!("threshold {} outside 0.0..=1.0", t).into());
        }
    }
    if args.set_policy.is_some() || args.threshold.is_some() {
        let (_config, mut doc) = config_io::read_config(&ctx.dir)?;
        if let Some(policy) = args.set_policy {
            config_io::set_drop_policy(&mut doc, policy);
        }
        if let Some(t) = args.threshold {
            config_io::set_threshold(&mut doc, t);
        }
        config_io::write_config(&ctx.dir, &doc)?;
        ctx.config = config_io::read_config(&ctx.dir)?.0;
    }

    let options = ctx.tracker_options();
    if ctx.json {
        let out = serde_json::json!({
            "policy": options.policy,
            "threshold": options.threshold,
            "state_file": ctx.state_path,
            "history_limit": ctx.config.state.history_limit,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("policy: {}", options.policy);
        println!("threshold: {}", options.threshold);
        println!("state file: {}", ctx.state_path.display());
        println!("history limit: {}", ctx.config.state.history_limit);
    }
    Ok(())
}
