// Beneficiary: the person who receives the service, who may differ from the
// paying customer. Bulk entry comes from the terminal as one line per person,
// "name, id-number".

use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub name: String,
    pub id_number: Option<String>,
}

impl Beneficiary {
    pub fn new(name: String, id_number: Option<String>) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Beneficiary name cannot be empty"));
        }

        Ok(Self {
            name: name.trim().to_string(),
            id_number: id_number
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }

    /// Parse bulk beneficiary input: one person per line, name and optional
    /// id number separated by a comma. Blank lines are dropped; lines with
    /// no name are excluded and do not count toward the beneficiary total.
    pub fn parse_bulk(input: &str) -> Vec<Beneficiary> {
        input
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() {
                    return None;
                }

                let (name, id_number) = match line.split_once(',') {
                    Some((name, id)) => (name.trim(), Some(id.trim())),
                    None => (line, None),
                };

                if name.is_empty() {
                    return None;
                }

                Some(Beneficiary {
                    name: name.to_string(),
                    id_number: id_number
                        .filter(|id| !id.is_empty())
                        .map(|id| id.to_string()),
                })
            })
            .collect()
    }
}
