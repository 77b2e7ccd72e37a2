//! Process list rendering
//!
//! Occupied slots are always listed in ascending id order with children in
//! creation order; only the surface syntax differs between formats.

use crate::core::process_table::ProcessTable;
use crate::error::PcbResult;
use clap::ValueEnum;
use prettytable::{format, Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Line-oriented listing
    #[default]
    Text,
    /// ASCII table, one row per process
    Table,
    /// Pretty-printed JSON snapshot
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        })
    }
}

pub fn render<W: Write>(table: &ProcessTable, format: OutputFormat, out: &mut W) -> PcbResult<()> {
    match format {
        OutputFormat::Text => render_text(table, out),
        OutputFormat::Table => render_table(table, out),
        OutputFormat::Json => render_json(table, out),
    }
}

pub fn render_text<W: Write>(table: &ProcessTable, out: &mut W) -> PcbResult<()> {
    writeln!(out, "Process list:")?;
    for (pid, pcb) in table.iter() {
        writeln!(out, "Process id: {}", pid)?;
        match pcb.parent {
            None => writeln!(out, "No parent process")?,
            Some(parent) => writeln!(out, "Parent process: {}", parent)?,
        }
        if pcb.children.is_empty() {
            writeln!(out, "No child processes")?;
        }
        for child in &pcb.children {
            writeln!(out, "Child process: {}", child)?;
        }
    }
    Ok(())
}

pub fn render_table<W: Write>(table: &ProcessTable, out: &mut W) -> PcbResult<()> {
    if table.is_empty() {
        writeln!(out, "No processes.")?;
        return Ok(());
    }

    let mut grid = Table::new();
    grid.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
    grid.set_titles(Row::new(vec![
        Cell::new("PID"),
        Cell::new("PARENT"),
        Cell::new("CHILDREN"),
    ]));

    for (pid, pcb) in table.iter() {
        let parent = pcb
            .parent
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let children = if pcb.children.is_empty() {
            "-".to_string()
        } else {
            pcb.children
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        grid.add_row(Row::new(vec![
            Cell::new(&pid.to_string()),
            Cell::new(&parent),
            Cell::new(&children),
        ]));
    }

    write!(out, "{}", grid)?;
    Ok(())
}

pub fn render_json<W: Write>(table: &ProcessTable, out: &mut W) -> PcbResult<()> {
    serde_json::to_writer_pretty(&mut *out, &table.snapshot()).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}
