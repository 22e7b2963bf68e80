//! Line commands understood by the interactive session.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use client_core::{EmployeeFormValues, SortField};
use shared::domain::EmployeeId;

pub const HELP: &str = "\
commands:
  search [text]            filter by name or email (empty clears)
  sort <field>             id, name, email, department or dob; repeat to flip
  page <n>                 jump to page n (1-based)
  next | prev              move one page
  size <n>                 rows per page, returns to the first page
  refresh                  reload the current page
  add key=value...         name=, email=, department=, dob=YYYY-MM-DD
  edit <id> key=value...   change fields of a row on the current page
  delete <id>              delete a row on the current page
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    Name,
    Email,
    Department,
    DateOfBirth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: FieldKey,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Search(String),
    Sort(SortField),
    Page(u32),
    Next,
    Prev,
    Size(u32),
    Refresh,
    Add(Vec<Assignment>),
    Edit {
        id: EmployeeId,
        assignments: Vec<Assignment>,
    },
    Delete(EmployeeId),
    Help,
    Quit,
}

/// Returns `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> anyhow::Result<Option<ConsoleCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => ConsoleCommand::Search(rest.to_string()),
        "sort" => ConsoleCommand::Sort(rest.parse::<SortField>()?),
        "page" | "p" => {
            let page: u32 = parse_number(rest, "page")?;
            if page == 0 {
                bail!("pages are numbered from 1");
            }
            ConsoleCommand::Page(page)
        }
        "next" | "n" => ConsoleCommand::Next,
        "prev" => ConsoleCommand::Prev,
        "size" => ConsoleCommand::Size(parse_number(rest, "size")?),
        "refresh" | "r" => ConsoleCommand::Refresh,
        "add" => ConsoleCommand::Add(parse_assignments(rest)?),
        "edit" => {
            let (id, rest) = split_id(rest, "edit")?;
            ConsoleCommand::Edit {
                id,
                assignments: parse_assignments(rest)?,
            }
        }
        "delete" | "del" => {
            let (id, rest) = split_id(rest, "delete")?;
            if !rest.is_empty() {
                bail!("delete takes a single id");
            }
            ConsoleCommand::Delete(id)
        }
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" | "q" => ConsoleCommand::Quit,
        other => bail!("unknown command `{other}`, try `help`"),
    };
    Ok(Some(command))
}

fn parse_number(raw: &str, what: &str) -> anyhow::Result<u32> {
    raw.parse()
        .with_context(|| format!("{what} needs a positive number, got `{raw}`"))
}

fn split_id<'a>(rest: &'a str, verb: &str) -> anyhow::Result<(EmployeeId, &'a str)> {
    let (id, rest) = rest
        .split_once(char::is_whitespace)
        .map(|(id, rest)| (id, rest.trim()))
        .unwrap_or((rest, ""));
    if id.is_empty() {
        bail!("{verb} needs an employee id");
    }
    Ok((EmployeeId::from(id), rest))
}

fn field_key(raw: &str) -> Option<FieldKey> {
    match raw.to_ascii_lowercase().as_str() {
        "name" => Some(FieldKey::Name),
        "email" => Some(FieldKey::Email),
        "department" | "dept" => Some(FieldKey::Department),
        "dob" | "birth" | "date_of_birth" => Some(FieldKey::DateOfBirth),
        _ => None,
    }
}

/// Splits `name=Ada Lovelace email=ada@example.com` into assignments.
/// Words without a recognised `key=` prefix continue the previous value.
pub fn parse_assignments(raw: &str) -> anyhow::Result<Vec<Assignment>> {
    let mut assignments: Vec<Assignment> = Vec::new();
    for word in raw.split_whitespace() {
        let key = word
            .split_once('=')
            .and_then(|(key, value)| field_key(key).map(|key| (key, value)));
        match (key, assignments.last_mut()) {
            (Some((key, value)), _) => assignments.push(Assignment {
                key,
                value: value.to_string(),
            }),
            (None, Some(last)) => {
                last.value.push(' ');
                last.value.push_str(word);
            }
            (None, None) => bail!("expected key=value, got `{word}`"),
        }
    }
    Ok(assignments)
}

pub fn parse_date_of_birth(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("dob must be YYYY-MM-DD, got `{raw}`"))
}

pub fn apply_assignments(
    values: &mut EmployeeFormValues,
    assignments: &[Assignment],
) -> anyhow::Result<()> {
    for assignment in assignments {
        match assignment.key {
            FieldKey::Name => values.name = assignment.value.clone(),
            FieldKey::Email => values.email = assignment.value.clone(),
            FieldKey::Department => values.department = assignment.value.clone(),
            FieldKey::DateOfBirth => {
                values.date_of_birth = if assignment.value.trim().is_empty() {
                    None
                } else {
                    Some(parse_date_of_birth(&assignment.value)?)
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
