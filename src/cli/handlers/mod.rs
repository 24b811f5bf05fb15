mod tracking;

use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, CONFIG_FILE};
use crate::io::{list_io, state_io};
use crate::model::config::Config;
use crate::model::node::{IdGen, NodeData, Tree};
use crate::ops::carry;
use crate::ops::side_tables::SideTables;
use crate::ops::tree_ops::Edit;
use crate::parse::{node_to_string_with, parse_md_with, parse_task};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let (list_path, config_path, config) = resolve_paths(&cli)?;

    match cli.command {
        Commands::Config(cmd) => cmd_config(cmd, &config_path, config, json),
        Commands::Fmt(args) => cmd_fmt(args, &list_path, &config),
        command => {
            let mut session = Session::load(list_path, config)?;
            match command {
                Commands::List => cmd_list(&session, json),
                Commands::Add(args) => cmd_add(&mut session, args),
                Commands::Insert(args) => cmd_insert(&mut session, args),
                Commands::Title(args) => cmd_title(&mut session, args),
                Commands::Rm(args) => cmd_rm(&mut session, args),
                Commands::Mv(args) => cmd_mv(&mut session, args),
                Commands::Indent(args) => cmd_indent(&mut session, args, true),
                Commands::Outdent(args) => cmd_indent(&mut session, args, false),
                Commands::Start(args) => tracking::cmd_start(&mut session, args, json),
                Commands::Stop(args) => tracking::cmd_stop(&mut session, args, json),
                Commands::Done(args) => tracking::cmd_done(&mut session, args),
                Commands::Alarm(args) => tracking::cmd_alarm(&mut session, args),
                Commands::Link(args) => tracking::cmd_link(&mut session, args),
                Commands::Carry(args) => cmd_carry(&mut session, args),
                Commands::Config(_) | Commands::Fmt(_) => Ok(()),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Work out the list file, the config file and the loaded config. Without
/// `-f` the config is looked up in the working directory and names the
/// default list file.
fn resolve_paths(cli: &Cli) -> Result<(PathBuf, PathBuf, Config), config_io::ConfigError> {
    let anchor = cli
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config_path = config_io::config_path(cli.config.as_deref(), &anchor);
    let config = config_io::read_config(&config_path)?;
    let list_path = cli
        .file
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.list.default_file));
    Ok((list_path, config_path, config))
}

/// A loaded list with its side tables, saved back as a unit
pub(crate) struct Session {
    pub list_path: PathBuf,
    pub state_path: PathBuf,
    pub config: Config,
    pub tree: Tree,
    pub tables: SideTables,
    pub ids: IdGen,
}

impl Session {
    fn load(list_path: PathBuf, config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let mut ids = IdGen::new();
        let tree = list_io::read_list(&list_path, config.indent_width(), &mut ids)?;
        let state_path = state_io::state_path(&list_path, &config);
        let mut tables = state_io::read_state(&state_path)?;
        tables.rebind(&tree);
        Ok(Session {
            list_path,
            state_path,
            config,
            tree,
            tables,
            ids,
        })
    }

    fn save(&self) -> CmdResult {
        list_io::write_list(&self.list_path, &self.tree, self.config.indent_width())?;
        state_io::write_state(&self.state_path, &self.tables)?;
        tracing::debug!(path = %self.list_path.display(), "saved list");
        Ok(())
    }

    /// Take the edited tree and move every side record along with it
    fn apply(&mut self, edit: Edit) {
        self.tables.follow(edit.line_move);
        self.tree = edit.tree;
    }

    pub fn title_at(&self, line: usize) -> String {
        self.tree
            .node_at_line(line)
            .and_then(|n| n.as_task())
            .map(|t| t.title.clone())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(session: &Session, json: bool) -> CmdResult {
    let list = list_to_json(&session.tree, &session.tables, &session.config);
    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        for line in format_listing(&list, &session.config) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_fmt(args: FmtArgs, list_path: &Path, config: &Config) -> CmdResult {
    let original = fs::read_to_string(list_path)
        .map_err(|e| format!("could not read {}: {}", list_path.display(), e))?;
    let mut ids = IdGen::new();
    let tree = parse_md_with(&original, config.indent_width(), &mut ids).normalized();
    let formatted = node_to_string_with(&tree, config.indent_width());

    if formatted == original {
        return Ok(());
    }
    if args.check {
        return Err(format!("{} is not formatted", list_path.display()).into());
    }
    list_io::write_list(list_path, &tree, config.indent_width())?;
    println!("formatted {}", list_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Structural commands
// ---------------------------------------------------------------------------

/// A new task from user input, picking up `~time` and `#tag` words
fn task_from_title(session: &mut Session, title: &str) -> Result<NodeData, Box<dyn std::error::Error>> {
    let line = format!("- [ ] {}", title.trim());
    let task = parse_task(&line, &mut session.ids).ok_or("task title must not be empty")?;
    Ok(NodeData::Task(task))
}

fn cmd_add(session: &mut Session, args: AddArgs) -> CmdResult {
    let data = task_from_title(session, &args.title)?;

    let edit = match args.under {
        Some(parent) => session.tree.append_to(parent, data, &mut session.ids)?,
        None => session.tree.append(data, &mut session.ids),
    };
    let inserted = edit.inserted_line();
    session.apply(edit);
    session.save()?;
    if let Some(line) = inserted {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_insert(session: &mut Session, args: InsertArgs) -> CmdResult {
    let edit = session.tree.insert_empty_task(args.line, &mut session.ids);
    let inserted = edit
        .inserted_line()
        .ok_or_else(|| format!("no line {}", args.line))?;
    session.apply(edit);
    if let Some(title) = args.title {
        let data = task_from_title(session, &title)?;
        let edit = session.tree.replace(|n| n.line == inserted, data, true);
        session.apply(edit);
    }
    session.save()?;
    println!("{}", inserted);
    Ok(())
}

fn cmd_title(session: &mut Session, args: TitleArgs) -> CmdResult {
    let title = args.title.trim().to_string();
    if title.is_empty() {
        return Err("task title must not be empty".into());
    }
    // An untitled `- [ ]` parses as plain text; titling it makes it a task
    if let Some(checkbox) = bare_checkbox(&session.tree, args.line) {
        let line = format!("{} {}", checkbox, title);
        let task = parse_task(&line, &mut session.ids).ok_or("task title must not be empty")?;
        session.tree = session.tree.with_data(args.line, NodeData::Task(task))?;
        return session.save();
    }
    let tree = session.tree.update_task(args.line, |task| task.set_title(title))?;
    session.tree = tree;
    session.save()
}

/// `- [ ]` or `- [x]` with nothing after it, as left by an untitled insert
fn bare_checkbox(tree: &Tree, line: usize) -> Option<&'static str> {
    if line == 0 {
        return None;
    }
    match &tree.node_at_line(line)?.data {
        NodeData::Other(text) => match text.trim_end() {
            "- [ ]" => Some("- [ ]"),
            "- [x]" => Some("- [x]"),
            _ => None,
        },
        _ => None,
    }
}

fn cmd_rm(session: &mut Session, args: LineArg) -> CmdResult {
    let edit = session.tree.remove(args.line)?;
    session.apply(edit);
    session.save()
}

fn cmd_mv(session: &mut Session, args: MvArgs) -> CmdResult {
    let edit = session.tree.move_block(args.from, args.to)?;
    session.apply(edit);
    session.save()
}

fn cmd_indent(session: &mut Session, args: RangeArgs, indent: bool) -> CmdResult {
    let last = args.last.unwrap_or(args.first);
    let tree = if indent {
        session.tree.indent(args.first, last)?
    } else {
        session.tree.outdent(args.first, last)?
    };
    session.tree = tree;
    session.save()
}

// ---------------------------------------------------------------------------
// Carry-over
// ---------------------------------------------------------------------------

fn cmd_carry(session: &mut Session, args: CarryArgs) -> CmdResult {
    let carried = if args.completed {
        carry::completed_log(&session.tree)
    } else {
        carry::carry_over(&session.tree, &session.config.carry)
    };

    match args.out {
        Some(out) => {
            list_io::write_list(&out, &carried, session.config.indent_width())?;
            println!("wrote {}", out.display());
            Ok(())
        }
        None => {
            session.tables.resync(&carried);
            session.tree = carried;
            session.save()
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(cmd: ConfigCmd, config_path: &Path, config: Config, json: bool) -> CmdResult {
    match cmd.action {
        ConfigAction::Set(args) => {
            config_io::update_config(config_path, &args.key, &args.value)?;
            Ok(())
        }
        ConfigAction::Show => {
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
            Ok(())
        }
    }
}
