use chrono::Utc;

use super::{CmdResult, Session};
use crate::cli::commands::{AlarmArgs, LineArg, LinkArgs};
use crate::cli::output::TrackingJson;
use crate::model::tracking::{AlarmError, AlarmRule, EventLine};
use crate::ops::tracking_ops;
use crate::ops::tree_ops::TreeError;

fn actual_at(session: &Session, line: usize) -> String {
    session
        .tree
        .node_at_line(line)
        .and_then(|n| n.as_task())
        .map(|t| t.actual.to_string())
        .unwrap_or_default()
}

pub(super) fn cmd_start(session: &mut Session, args: LineArg, json: bool) -> CmdResult {
    let tree = tracking_ops::start(&session.tree, &mut session.tables, args.line, Utc::now())?;
    session.tree = tree;
    session.save()?;

    let title = session.title_at(args.line);
    if json {
        let out = TrackingJson {
            line: args.line,
            title,
            tracking: true,
            added: None,
            actual: actual_at(session, args.line),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("started {}: {}", args.line, title);
    }
    Ok(())
}

pub(super) fn cmd_stop(session: &mut Session, args: LineArg, json: bool) -> CmdResult {
    let (tree, elapsed) =
        tracking_ops::stop(&session.tree, &mut session.tables, args.line, Utc::now())?;
    session.tree = tree;
    session.save()?;

    let title = session.title_at(args.line);
    let actual = actual_at(session, args.line);
    // seconds are not displayed
    let added = elapsed.to_string();
    if json {
        let out = TrackingJson {
            line: args.line,
            title,
            tracking: false,
            added: Some(added),
            actual,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if added.is_empty() {
        println!("stopped {}: {} (under a minute)", args.line, title);
    } else {
        println!("stopped {}: {} +{} = {}", args.line, title, added, actual);
    }
    Ok(())
}

pub(super) fn cmd_done(session: &mut Session, args: LineArg) -> CmdResult {
    let tree =
        tracking_ops::toggle_complete(&session.tree, &mut session.tables, args.line, Utc::now())?;
    session.tree = tree;
    session.save()
}

pub(super) fn cmd_alarm(session: &mut Session, args: AlarmArgs) -> CmdResult {
    let node_id = session
        .tree
        .node_at_line(args.line)
        .filter(|_| args.line > 0)
        .map(|n| n.id)
        .ok_or(TreeError::LineOutOfRange(args.line))?;

    let mut alarm = AlarmRule::new(args.line, args.in_minutes, args.at, Utc::now())?;
    alarm.node_id = Some(node_id);
    let fires_at = alarm.fires_at().ok_or(AlarmError::OutOfRange(args.line))?;
    session.tables.alarms.push(alarm);
    session.save()?;
    println!("alarm on line {} at {}", args.line, fires_at.to_rfc3339());
    Ok(())
}

pub(super) fn cmd_link(session: &mut Session, args: LinkArgs) -> CmdResult {
    let node_id = session
        .tree
        .node_at_line(args.line)
        .filter(|_| args.line > 0)
        .map(|n| n.id)
        .ok_or(TreeError::LineOutOfRange(args.line))?;

    session.tables.events.push(EventLine {
        line: args.line,
        node_id: Some(node_id),
        event_id: args.event_id,
    });
    session.save()
}
