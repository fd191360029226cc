//! Canonical text encoding of perceived states.
//!
//! The encoding is a single line with five labelled fields:
//!
//! ```text
//! SelfPosition: (1, 1)~ NearbyAgents: []~ Walls: [(0, 0); (0, 1)]~ Doors: []~ Exit: (5, 9)
//! ```
//!
//! Walls and doors are written in set order, and the nearby-agents list is
//! always written empty, so equal states share one key. Decoding recovers
//! everything that was encoded; nearby agents are therefore lost on a round
//! trip.

use std::{collections::BTreeSet, fmt::Write};

use crate::{
    error::{Error, Result},
    identifiers::StateKey,
    perception::PerceivedState,
    types::Position,
};

const FIELD_SEPARATOR: &str = "~ ";
const LIST_SEPARATOR: &str = "; ";

const SELF_POSITION: &str = "SelfPosition";
const NEARBY_AGENTS: &str = "NearbyAgents";
const WALLS: &str = "Walls";
const DOORS: &str = "Doors";
const EXIT: &str = "Exit";

/// Encode a state into its canonical key.
pub fn encode(state: &PerceivedState) -> StateKey {
    let mut out = String::with_capacity(96 + 10 * (state.walls.len() + state.doors.len()));

    // Writing into a String cannot fail.
    let _ = write!(out, "{SELF_POSITION}: {}", state.self_position);
    out.push_str(FIELD_SEPARATOR);
    let _ = write!(out, "{NEARBY_AGENTS}: []");
    out.push_str(FIELD_SEPARATOR);
    write_list(&mut out, WALLS, &state.walls);
    out.push_str(FIELD_SEPARATOR);
    write_list(&mut out, DOORS, &state.doors);
    out.push_str(FIELD_SEPARATOR);
    let _ = write!(out, "{EXIT}: ");
    if let Some(exit) = state.exit {
        let _ = write!(out, "{exit}");
    }

    StateKey::new(out)
}

fn write_list(out: &mut String, label: &str, cells: &BTreeSet<Position>) {
    let _ = write!(out, "{label}: [");
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push_str(LIST_SEPARATOR);
        }
        let _ = write!(out, "{cell}");
    }
    out.push(']');
}

/// Decode a state previously produced by [`encode`].
///
/// # Errors
///
/// Returns [`Error::MalformedState`] if a field is missing, mislabelled, or
/// contains an unparseable coordinate.
pub fn decode(input: &str) -> Result<PerceivedState> {
    let malformed = |reason: String| Error::MalformedState {
        input: input.to_string(),
        reason,
    };

    let parts: Vec<&str> = input.split('~').collect();
    if parts.len() != 5 {
        return Err(malformed(format!("expected 5 fields, found {}", parts.len())));
    }

    let field = |index: usize, label: &'static str| {
        labelled(parts[index], label).ok_or_else(|| malformed(format!("missing field '{label}'")))
    };

    let self_position = Position::parse(field(0, SELF_POSITION)?)
        .map_err(|e| malformed(format!("{SELF_POSITION}: {e}")))?;
    let nearby_agents = parse_list(field(1, NEARBY_AGENTS)?)
        .map_err(|reason| malformed(format!("{NEARBY_AGENTS}: {reason}")))?;
    let walls = parse_list(field(2, WALLS)?)
        .map_err(|reason| malformed(format!("{WALLS}: {reason}")))?;
    let doors = parse_list(field(3, DOORS)?)
        .map_err(|reason| malformed(format!("{DOORS}: {reason}")))?;

    let exit_text = field(4, EXIT)?;
    let exit = if exit_text.is_empty() {
        None
    } else {
        Some(Position::parse(exit_text).map_err(|e| malformed(format!("{EXIT}: {e}")))?)
    };

    Ok(PerceivedState {
        self_position,
        nearby_agents,
        walls: walls.into_iter().collect(),
        doors: doors.into_iter().collect(),
        exit,
    })
}

fn labelled<'a>(part: &'a str, label: &str) -> Option<&'a str> {
    part.trim()
        .strip_prefix(label)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(str::trim)
}

fn parse_list(text: &str) -> std::result::Result<Vec<Position>, String> {
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| format!("expected a bracketed list, found '{text}'"))?;

    inner
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| Position::parse(item).map_err(|e| e.to_string()))
        .collect()
}
