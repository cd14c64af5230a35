//! Agent block extraction and field parsing.
//!
//! A report table is a run of agent blocks, each closed by the per-clerk
//! subtotal label. Inside a block the first non-blank line is the header
//! row (count, name, category + id, responsibility) and the following lines
//! up to the row separator are per-category operation rows.

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{Agent, Operation};

use super::aggregate::aggregate_operations;
use super::options::{ErrorMode, ReportMarkers};

/// Slice the text strictly between the start and end boundary markers.
///
/// The end boundary is searched after the start boundary.
pub fn table_region<'t>(text: &'t str, markers: &ReportMarkers) -> Result<&'t str> {
    let start = text
        .find(markers.start_boundary.as_str())
        .ok_or(Error::BoundaryMissing("start boundary"))?
        + markers.start_boundary.len();

    let rest = &text[start..];
    let end = rest
        .find(markers.end_boundary.as_str())
        .ok_or(Error::BoundaryMissing("end boundary"))?;

    Ok(&rest[..end])
}

/// Split a table region into candidate agent blocks.
///
/// The segment after the last splitter is not an agent and is dropped, as
/// are blocks carrying the exclusion token.
pub fn split_blocks<'t>(table: &'t str, markers: &ReportMarkers) -> Vec<&'t str> {
    let mut segments: Vec<&str> = table.split(markers.block_splitter.as_str()).collect();
    segments.pop();

    let exclude = markers.exclude_token.as_str();
    segments
        .into_iter()
        .filter(|segment| exclude.is_empty() || !segment.contains(exclude))
        .collect()
}

/// Parsed header row of an agent block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRow {
    pub count: u64,
    pub name: String,
    pub category: String,
    pub id: String,
    pub responsibility: String,
}

/// Parses agent blocks into [`Agent`] records.
pub struct BlockParser<'m> {
    markers: &'m ReportMarkers,
    mode: ErrorMode,
    columns: Regex,
}

impl<'m> BlockParser<'m> {
    pub fn new(markers: &'m ReportMarkers, mode: ErrorMode) -> Self {
        Self {
            markers,
            mode,
            // Columns are separated by two or more spaces
            columns: Regex::new(r" {2,}").expect("column delimiter pattern is valid"),
        }
    }

    /// Decode one block. Returns `None` when a malformed block is skipped in
    /// lenient mode.
    pub fn parse_block(&self, block: &str) -> Result<Option<Agent>> {
        let lines = self.header_lines(block);

        let Some((first, rows)) = lines.split_first() else {
            return self.malformed(format!("no header row in block {:?}", block.trim()));
        };

        let Some(header) = self.parse_header(first)? else {
            return Ok(None);
        };

        let mut operations = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(operation) = self.parse_row(row)? {
                operations.push(operation);
            }
        }

        let header_entry = Operation::new(header.category, header.count);
        let agent = Agent::new(header.id, header.name, header.responsibility)
            .with_operations(aggregate_operations(operations, header_entry));

        log::debug!(
            "Decoded agent {} with {} categories",
            agent.id,
            agent.operations.len()
        );
        Ok(Some(agent))
    }

    /// Non-blank header lines of a block, including the second location's
    /// lines for agents that work from two sites.
    pub fn header_lines(&self, block: &str) -> Vec<String> {
        let separator = self.markers.row_separator.as_str();
        let site_label = self.markers.total_for_site.as_str();

        // Drop the site subtotal computation that precedes the real header
        let formatted: String = if !site_label.is_empty() && block.contains(site_label) {
            let without_rule = block.replacen(separator, "", 1);
            match without_rule.rfind(site_label) {
                Some(pos) => without_rule[pos + site_label.len()..].to_string(),
                None => without_rule,
            }
        } else {
            block.to_string()
        };

        let header = up_to(&formatted, separator);
        let mut lines: Vec<String> = non_blank_lines(header).collect();

        if self.has_two_locations(block) {
            let prefix = self.markers.second_location_prefix.as_str();
            match formatted.find(prefix) {
                Some(pos) if !prefix.is_empty() => {
                    // The rest of the prefix line names the location, rows follow it
                    let after = &formatted[pos + prefix.len()..];
                    let rows = after.find('\n').map_or("", |nl| &after[nl + 1..]);
                    lines.extend(non_blank_lines(up_to(rows, separator)));
                }
                _ => log::debug!("Two-location block without a second location subtotal"),
            }
        }

        lines
    }

    fn has_two_locations(&self, block: &str) -> bool {
        let virtual_label = self.markers.virtual_label.as_str();
        let main_office = self.markers.main_office_label.as_str();
        !virtual_label.is_empty()
            && !main_office.is_empty()
            && block.contains(virtual_label)
            && block.contains(main_office)
    }

    /// Parse the header row: `count  name  category... id  [responsibility]`.
    pub fn parse_header(&self, line: &str) -> Result<Option<HeaderRow>> {
        let mut cleaned = line.to_string();
        for label in [&self.markers.virtual_label, &self.markers.main_office_label] {
            if !label.is_empty() {
                cleaned = cleaned.replace(label.as_str(), &" ".repeat(label.chars().count()));
            }
        }

        let fields = self.split_columns(&cleaned);
        if fields.len() < 3 {
            return self.malformed(format!("header row has {} fields: {:?}", fields.len(), line));
        }

        let count = self.parse_count(fields[0], line)?;
        let name = fields[1].to_string();

        let mut tokens: Vec<&str> = fields[2].split_whitespace().collect();
        let id = tokens.pop().unwrap_or_default().to_string();
        let category = tokens.join(" ");

        let responsibility = fields
            .get(3)
            .map(|s| s.to_string())
            .unwrap_or_else(|| self.markers.default_responsibility.clone());

        Ok(Some(HeaderRow {
            count,
            name,
            category,
            id,
            responsibility,
        }))
    }

    /// Parse an operation row: `repeated  category`.
    pub fn parse_row(&self, line: &str) -> Result<Option<Operation>> {
        let fields = self.split_columns(line);
        if fields.len() < 2 {
            return self.malformed(format!("operation row without a category: {:?}", line));
        }

        let repeated = self.parse_count(fields[0], line)?;
        Ok(Some(Operation::new(fields[1], repeated)))
    }

    fn split_columns<'l>(&self, line: &'l str) -> Vec<&'l str> {
        self.columns
            .split(line)
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect()
    }

    fn parse_count(&self, token: &str, row: &str) -> Result<u64> {
        match token.trim().parse::<u64>() {
            Ok(count) => Ok(count),
            Err(_) if self.mode == ErrorMode::Lenient => {
                log::warn!("Non-numeric count {:?} in row {:?}, using 0", token, row.trim());
                Ok(0)
            }
            Err(_) => Err(Error::InvalidCount {
                value: token.to_string(),
                row: row.trim().to_string(),
            }),
        }
    }

    fn malformed<T>(&self, message: String) -> Result<Option<T>> {
        match self.mode {
            ErrorMode::Strict => Err(Error::MalformedBlock(message)),
            ErrorMode::Lenient => {
                log::warn!("Skipping malformed input: {}", message);
                Ok(None)
            }
        }
    }
}

/// Text before the first occurrence of `separator`, or all of it.
fn up_to<'t>(text: &'t str, separator: &str) -> &'t str {
    match text.find(separator) {
        Some(pos) => &text[..pos],
        None => text,
    }
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = String> + '_ {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
}
