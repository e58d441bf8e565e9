//! External MAPD solver exchange format.
//!
//! Grounded in `mca/preprocess.py` (`_create_map`/`_create_task`, writing
//! `storehouse.map`/`storehouse.task`) and `mca/postprocess.py`
//! (`_read_mca_output`/`_format_TA_output`/`_format_path_output`, reading
//! `storehouse.out`). We only model the exchange files as data — the
//! solver binary itself is out of scope.

use crate::error::{IoError, IoResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use stowswap_core::Position;
use stowswap_entities::{Action, Owner};
use stowswap_sim::World;

/// The original pads every cell with a two-row/column `@` border; decoded
/// coordinates subtract this back out.
pub const BORDER_OFFSET: i32 = 2;

pub const TIMEOUT_MAX: u32 = 5000;

/// Write the padded grid the solver expects: racks as `@`, agent start
/// cells as `r`, end points as `e`, everything else `.`.
pub fn write_storehouse_map(path: &Path, world: &World) -> IoResult<()> {
    let mut out = File::create(path)?;
    writeln!(out, "{},{}", world.height + BORDER_OFFSET, world.width + BORDER_OFFSET)?;
    writeln!(out, "{}", world.end_points.len())?;
    writeln!(out, "{}", world.agents.len())?;
    writeln!(out, "{TIMEOUT_MAX}")?;
    writeln!(out, "{}", "@".repeat((world.width + BORDER_OFFSET) as usize))?;

    for row in 0..world.height {
        let mut line = String::from("@");
        for col in 0..world.width {
            let pos = Position::new(row, col);
            let ch = if world.grid.is_blocked(&pos) {
                '@'
            } else if world.agents.values().any(|a| a.pos == pos) {
                'r'
            } else if world.end_points.values().any(|e| e.pos == pos) {
                'e'
            } else {
                '.'
            };
            line.push(ch);
        }
        line.push('@');
        writeln!(out, "{line}")?;
    }
    writeln!(out, "{}", "@".repeat((world.width + BORDER_OFFSET) as usize))?;
    Ok(())
}

/// Write the solver's task file: one `0<TAB>pickup_ep<TAB>dropoff_ep<TAB>0
/// <TAB>0<TAB>volume` line per task, in ascending `TaskId` order (the same
/// order a caller must use when indexing `task_id` back out of a
/// `storehouse.out`).
pub fn write_storehouse_task(path: &Path, world: &World) -> IoResult<()> {
    let mut out = File::create(path)?;
    let mut task_ids: Vec<_> = world.tasks.keys().copied().collect();
    task_ids.sort();
    writeln!(out, "{}", task_ids.len())?;
    for task_id in task_ids {
        let task = &world.tasks[&task_id];
        let item = &world.items[&task.item];
        let pickup_sp = match item.owner {
            Owner::StorePoint(sp) => sp,
            Owner::Agent(_) => {
                return Err(IoError::Malformed {
                    file: "storehouse.task",
                    reason: format!("item {} is already held, no pickup store point", item.name),
                })
            }
        };
        let pickup_ep = world.store_points[&pickup_sp]
            .end_point
            .ok_or_else(|| IoError::Malformed { file: "storehouse.task", reason: "pickup store point has no end point".into() })?;
        let dropoff_ep = world.store_points[&task.target_store_point]
            .end_point
            .ok_or_else(|| IoError::Malformed { file: "storehouse.task", reason: "dropoff store point has no end point".into() })?;
        writeln!(out, "0\t{}\t{}\t0\t0\t{}", pickup_ep.as_u32(), dropoff_ep.as_u32(), item.volume)?;
    }
    Ok(())
}

/// One decoded `task_assignment:` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskAssignmentEntry {
    pub ideal_step: u32,
    pub real_step: u32,
    pub task_id: i32,
    pub pos: Position,
    pub delay: u32,
    pub action: Action,
    pub release_time: u32,
}

/// A fully decoded `storehouse.out`: one task-assignment list and one path
/// per agent, in file order.
#[derive(Debug, Clone, Default)]
pub struct McaOutput {
    pub task_assignments: Vec<Vec<TaskAssignmentEntry>>,
    pub paths: Vec<Vec<Position>>,
}

fn action_from_code(code: u32) -> IoResult<Action> {
    match code {
        0 => Ok(Action::Start),
        1 => Ok(Action::PickUp),
        2 => Ok(Action::DropOff),
        3 => Ok(Action::Dock),
        other => Err(IoError::Malformed { file: "storehouse.out", reason: format!("unknown action code {other}") }),
    }
}

/// Split `s` on top-level commas, treating `(...)` as opaque so the
/// `(row,col)` pair inside an entry doesn't get split.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

fn strip_prefix_digits<'a>(s: &'a str, prefix: &str, file: &'static str) -> IoResult<u32> {
    s.strip_prefix(prefix)
        .and_then(|rest| rest.parse::<u32>().ok())
        .ok_or_else(|| IoError::Malformed { file, reason: format!("expected `{prefix}<digits>`, got `{s}`") })
}

/// Decode one `task_assignment:` line, e.g.
/// `<3(5),12,(10,11),delay2,act1,r0><0(0),-1,(2,2),delay0,act0,r0>`.
fn parse_task_assignment_line(line: &str) -> IoResult<Vec<TaskAssignmentEntry>> {
    let mut entries = Vec::new();
    let mut rest = line;
    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else { break };
        let inner = &rest[open + 1..open + close];
        rest = &rest[open + close + 1..];

        let fields = split_top_level(inner);
        if fields.len() != 6 {
            return Err(IoError::Malformed {
                file: "storehouse.out",
                reason: format!("expected 6 fields in task-assignment entry, got {}: `{inner}`", fields.len()),
            });
        }
        let (ideal_step, real_step) = {
            let f = fields[0];
            let open_paren = f
                .find('(')
                .ok_or_else(|| IoError::Malformed { file: "storehouse.out", reason: format!("missing `(` in `{f}`") })?;
            let ideal: u32 = f[..open_paren]
                .parse()
                .map_err(|_| IoError::Malformed { file: "storehouse.out", reason: format!("bad ideal step in `{f}`") })?;
            let real: u32 = f[open_paren + 1..f.len() - 1]
                .parse()
                .map_err(|_| IoError::Malformed { file: "storehouse.out", reason: format!("bad real step in `{f}`") })?;
            (ideal, real)
        };
        let task_id: i32 = fields[1]
            .parse()
            .map_err(|_| IoError::Malformed { file: "storehouse.out", reason: format!("bad task id `{}`", fields[1]) })?;
        let pos = {
            let f = fields[2].trim_start_matches('(').trim_end_matches(')');
            let mut xy = f.split(',');
            let row: i32 = xy.next().and_then(|v| v.parse().ok()).ok_or_else(|| IoError::Malformed {
                file: "storehouse.out",
                reason: format!("bad position `{f}`"),
            })?;
            let col: i32 = xy.next().and_then(|v| v.parse().ok()).ok_or_else(|| IoError::Malformed {
                file: "storehouse.out",
                reason: format!("bad position `{f}`"),
            })?;
            Position::new(row - BORDER_OFFSET, col - BORDER_OFFSET)
        };
        let delay = strip_prefix_digits(fields[3], "delay", "storehouse.out")?;
        let action = action_from_code(strip_prefix_digits(fields[4], "act", "storehouse.out")?)?;
        let release_time = strip_prefix_digits(fields[5], "r", "storehouse.out")?;

        entries.push(TaskAssignmentEntry { ideal_step, real_step, task_id, pos, delay, action, release_time });
    }
    Ok(entries)
}

/// Decode one `path_for_each_agent:` line: a run of `<step>(<row>,<col>)`
/// blocks with no separator between them.
fn parse_path_line(line: &str) -> IoResult<Vec<Position>> {
    let bytes = line.as_bytes();
    let mut i = 0usize;
    let mut path = Vec::new();
    while i < bytes.len() {
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return Err(IoError::Malformed { file: "storehouse.out", reason: format!("expected digit at byte {i} in `{line}`") });
        }
        i += 1; // skip '('
        let row_start = i;
        while i < bytes.len() && bytes[i] != b',' {
            i += 1;
        }
        let row: i32 = line[row_start..i]
            .parse()
            .map_err(|_| IoError::Malformed { file: "storehouse.out", reason: format!("bad row in `{line}`") })?;
        i += 1; // skip ','
        let col_start = i;
        while i < bytes.len() && bytes[i] != b')' {
            i += 1;
        }
        let col: i32 = line[col_start..i]
            .parse()
            .map_err(|_| IoError::Malformed { file: "storehouse.out", reason: format!("bad col in `{line}`") })?;
        i += 1; // skip ')'
        path.push(Position::new(row - BORDER_OFFSET, col - BORDER_OFFSET));
    }
    Ok(path)
}

/// Read a `storehouse.out` file, decoding both its `task_assignment:` and
/// `path_for_each_agent:` sections.
pub fn read_storehouse_out(path: &Path) -> IoResult<McaOutput> {
    let reader = BufReader::new(File::open(path)?);
    let lines: Vec<String> = reader.lines().collect::<std::io::Result<_>>()?;

    let ta_start = lines
        .iter()
        .position(|l| l.starts_with("task_assignment:"))
        .ok_or_else(|| IoError::Malformed { file: "storehouse.out", reason: "missing `task_assignment:` section".into() })?;
    let path_start = lines
        .iter()
        .position(|l| l.starts_with("path_for_each_agent:"))
        .ok_or_else(|| IoError::Malformed { file: "storehouse.out", reason: "missing `path_for_each_agent:` section".into() })?;
    if path_start <= ta_start {
        return Err(IoError::Malformed { file: "storehouse.out", reason: "`path_for_each_agent:` precedes `task_assignment:`".into() });
    }

    let n_agents = path_start - ta_start - 1;
    let mut task_assignments = Vec::with_capacity(n_agents);
    for line in &lines[ta_start + 1..ta_start + 1 + n_agents] {
        task_assignments.push(parse_task_assignment_line(line)?);
    }

    let mut paths = Vec::with_capacity(n_agents);
    for line in &lines[path_start + 1..path_start + 1 + n_agents] {
        paths.push(parse_path_line(line)?);
    }

    Ok(McaOutput { task_assignments, paths })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_single_task_assignment_entry() {
        let line = "<3(5),12,(10,11),delay2,act1,r0>";
        let entries = parse_task_assignment_line(line).unwrap();
        assert_eq!(entries.len(), 1);
        let e = entries[0];
        assert_eq!(e.ideal_step, 3);
        assert_eq!(e.real_step, 5);
        assert_eq!(e.task_id, 12);
        assert_eq!(e.pos, Position::new(8, 9));
        assert_eq!(e.delay, 2);
        assert_eq!(e.action, Action::PickUp);
        assert_eq!(e.release_time, 0);
    }

    #[test]
    fn decodes_a_concatenated_path_line() {
        let line = "0(2,3)1(2,4)2(3,4)";
        let path = parse_path_line(line).unwrap();
        assert_eq!(path, vec![Position::new(0, 1), Position::new(0, 2), Position::new(1, 2)]);
    }

    #[test]
    fn round_trips_a_full_output_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("storehouse.out");
        std::fs::write(
            &path,
            "task_assignment:\n<0(0),-1,(2,2),delay0,act0,r0>\npath_for_each_agent:\n0(2,2)1(2,3)\n",
        )
        .unwrap();

        let decoded = read_storehouse_out(&path).unwrap();
        assert_eq!(decoded.task_assignments.len(), 1);
        assert_eq!(decoded.paths, vec![vec![Position::new(0, 0), Position::new(0, 1)]]);
    }
}
