use crate::adapters::table::Table;
use crate::domain::model::{ColumnNames, Participant, PriorAssignments};
use crate::utils::error::{Result, SantaError};
use std::collections::HashSet;

const NAME_ALIASES: &[&str] = &["name", "participant"];
const ADDRESS_ALIASES: &[&str] = &["email", "address"];
const RECEIVER_ALIASES: &[&str] = &["receiver", "recipient"];

fn require_column(
    table: &Table,
    source_name: &str,
    configured: &str,
    aliases: &[&str],
) -> Result<usize> {
    let mut candidates = vec![configured];
    candidates.extend_from_slice(aliases);

    table
        .column_index(&candidates)
        .ok_or_else(|| SantaError::MissingColumnError {
            source_name: source_name.to_string(),
            column: configured.to_string(),
        })
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|s| s.trim()).unwrap_or("")
}

/// 解析參加者名單。空白列會略過；缺名字或地址、名字重複、名單為空都會報錯
pub fn parse_participants(
    table: &Table,
    source_name: &str,
    columns: &ColumnNames,
) -> Result<Vec<Participant>> {
    let name_idx = require_column(table, source_name, &columns.giver_name, NAME_ALIASES)?;
    let address_idx =
        require_column(table, source_name, &columns.giver_address, ADDRESS_ALIASES)?;

    let mut participants = Vec::with_capacity(table.rows().len());
    let mut seen = HashSet::new();

    for (i, row) in table.rows().iter().enumerate() {
        // 表頭佔第 1 列
        let row_number = i + 2;
        let name = cell(row, name_idx);
        let address = cell(row, address_idx);

        if name.is_empty() && address.is_empty() {
            continue;
        }
        if name.is_empty() {
            return Err(SantaError::InvalidParticipantError {
                source_name: source_name.to_string(),
                row: row_number,
                reason: "missing name".to_string(),
            });
        }
        if address.is_empty() {
            return Err(SantaError::InvalidParticipantError {
                source_name: source_name.to_string(),
                row: row_number,
                reason: format!("missing email address for '{}'", name),
            });
        }
        if !seen.insert(name.to_string()) {
            return Err(SantaError::DuplicateParticipantError {
                source_name: source_name.to_string(),
                name: name.to_string(),
            });
        }

        participants.push(Participant::new(name, address));
    }

    if participants.is_empty() {
        return Err(SantaError::EmptyRosterError {
            source_name: source_name.to_string(),
        });
    }

    Ok(participants)
}

/// 解析上一輪的抽籤結果。任一欄空白的列直接略過，同一位 giver 出現多次以最後一筆為準
pub fn parse_prior_assignments(
    table: &Table,
    source_name: &str,
    columns: &ColumnNames,
) -> Result<PriorAssignments> {
    let giver_idx = require_column(table, source_name, &columns.giver_name, NAME_ALIASES)?;
    let receiver_idx =
        require_column(table, source_name, &columns.receiver_name, RECEIVER_ALIASES)?;

    let mut prior = PriorAssignments::new();

    for (i, row) in table.rows().iter().enumerate() {
        let giver = cell(row, giver_idx);
        let receiver = cell(row, receiver_idx);

        if giver.is_empty() || receiver.is_empty() {
            tracing::debug!("Skipping incomplete row {} in {}", i + 2, source_name);
            continue;
        }
        if let Some(previous) = prior.receiver_for(giver) {
            tracing::warn!(
                "⚠️ '{}' appears more than once in {} ('{}' replaced by '{}')",
                giver,
                source_name,
                previous,
                receiver
            );
        }

        prior.insert(giver, receiver);
    }

    Ok(prior)
}
