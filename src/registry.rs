//! Static company registry.
//!
//! Maps each tracked company to the board it publishes on. The registry is
//! read once at startup, either from a TOML file or from the built-in list,
//! and is never mutated afterwards. Every entry is validated up front so a
//! bad board type fails the process before any upstream call is made.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use validator::Validate;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("company '{company}' uses unknown board type '{board}'")]
    UnknownBoardType { company: String, board: String },

    #[error("company '{company}' is invalid: {reason}")]
    Invalid { company: String, reason: String },

    #[error("company '{0}' duplicates an earlier registry entry")]
    Duplicate(String),

    #[error("failed to read registry file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse registry file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Upstream board flavors the tracker knows how to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardType {
    Greenhouse,
    Lever,
}

impl BoardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardType::Greenhouse => "greenhouse",
            BoardType::Lever => "lever",
        }
    }

    /// Prefix of the stable job ids produced for this board
    pub fn id_prefix(&self) -> &'static str {
        match self {
            BoardType::Greenhouse => "gh",
            BoardType::Lever => "lv",
        }
    }
}

impl fmt::Display for BoardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoardType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greenhouse" => Ok(BoardType::Greenhouse),
            "lever" => Ok(BoardType::Lever),
            other => Err(other.to_string()),
        }
    }
}

/// One tracked company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Validate)]
pub struct CompanyConfig {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    pub board: BoardType,
    #[validate(length(min = 1, message = "board_id must not be empty"))]
    pub board_id: String,
}

impl CompanyConfig {
    pub fn new(name: &str, board: BoardType, board_id: &str) -> Self {
        Self {
            name: name.to_string(),
            board,
            board_id: board_id.to_string(),
        }
    }
}

/// Registry entry as written in the TOML file, before validation
#[derive(Debug, Deserialize)]
struct RawCompany {
    name: String,
    board: String,
    board_id: String,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    companies: Vec<RawCompany>,
}

/// Validated, immutable list of companies in iteration order
#[derive(Debug, Clone, Default)]
pub struct CompanyRegistry {
    companies: Vec<CompanyConfig>,
}

impl CompanyRegistry {
    /// Registry used when no COMPANIES_FILE is configured
    pub fn builtin() -> Self {
        Self {
            companies: vec![
                CompanyConfig::new("Airbnb", BoardType::Greenhouse, "airbnb"),
                CompanyConfig::new("Stripe", BoardType::Greenhouse, "stripe"),
                CompanyConfig::new("Netflix", BoardType::Lever, "netflix"),
            ],
        }
    }

    /// Build a registry from already-typed entries, validating each one
    pub fn from_companies(companies: Vec<CompanyConfig>) -> Result<Self, RegistryError> {
        let mut names = HashSet::new();
        let mut boards = HashSet::new();
        for company in &companies {
            company.validate().map_err(|e| RegistryError::Invalid {
                company: company.name.clone(),
                reason: e.to_string(),
            })?;
            // Same board twice would yield colliding job ids
            if !names.insert(company.name.to_lowercase())
                || !boards.insert((company.board, company.board_id.trim().to_lowercase()))
            {
                return Err(RegistryError::Duplicate(company.name.clone()));
            }
        }
        Ok(Self { companies })
    }

    /// Parse a TOML registry:
    ///
    /// ```toml
    /// [[companies]]
    /// name = "Stripe"
    /// board = "greenhouse"
    /// board_id = "stripe"
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, RegistryError> {
        let file: RegistryFile = toml::from_str(source)?;

        let companies = file
            .companies
            .into_iter()
            .map(|raw| -> Result<CompanyConfig, RegistryError> {
                let board = raw.board.parse::<BoardType>().map_err(|board| {
                    RegistryError::UnknownBoardType {
                        company: raw.name.clone(),
                        board,
                    }
                })?;
                Ok(CompanyConfig {
                    name: raw.name,
                    board,
                    board_id: raw.board_id,
                })
            })
            .collect::<Result<Vec<_>, RegistryError>>()?;

        Self::from_companies(companies)
    }

    /// Load the registry from `path`, or fall back to the built-in list
    pub fn load(path: Option<&Path>) -> Result<Self, RegistryError> {
        let registry = match path {
            Some(path) => {
                debug!("Reading company registry from {}", path.display());
                let source = std::fs::read_to_string(path).map_err(|source| RegistryError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::from_toml_str(&source)?
            }
            None => Self::builtin(),
        };

        info!("Company registry loaded: {} companies", registry.len());
        Ok(registry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompanyConfig> {
        self.companies.iter()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_registry_in_order() {
        let registry = CompanyRegistry::from_toml_str(
            r#"
            [[companies]]
            name = "Stripe"
            board = "greenhouse"
            board_id = "stripe"

            [[companies]]
            name = "Netflix"
            board = "Lever"
            board_id = "netflix"
            "#,
        )
        .unwrap();

        let names: Vec<_> = registry.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Stripe", "Netflix"]);
        assert_eq!(registry.iter().nth(1).unwrap().board, BoardType::Lever);
    }

    #[test]
    fn unknown_board_type_is_rejected_at_load() {
        let err = CompanyRegistry::from_toml_str(
            r#"
            [[companies]]
            name = "Acme"
            board = "workday"
            board_id = "acme"
            "#,
        )
        .unwrap_err();

        match err {
            RegistryError::UnknownBoardType { company, board } => {
                assert_eq!(company, "Acme");
                assert_eq!(board, "workday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_board_id_is_invalid() {
        let err = CompanyRegistry::from_companies(vec![CompanyConfig::new(
            "Acme",
            BoardType::Lever,
            "",
        )])
        .unwrap_err();
        assert!(matches!(err, RegistryError::Invalid { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = CompanyRegistry::from_companies(vec![
            CompanyConfig::new("Acme", BoardType::Lever, "acme"),
            CompanyConfig::new("acme", BoardType::Greenhouse, "acme-inc"),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(_)));
    }

    #[test]
    fn same_board_under_two_names_is_rejected() {
        let err = CompanyRegistry::from_companies(vec![
            CompanyConfig::new("Stripe", BoardType::Greenhouse, "stripe"),
            CompanyConfig::new("Stripe Inc", BoardType::Greenhouse, "Stripe"),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(name) if name == "Stripe Inc"));
    }

    #[test]
    fn same_board_id_on_different_boards_is_allowed() {
        let registry = CompanyRegistry::from_companies(vec![
            CompanyConfig::new("Acme", BoardType::Greenhouse, "acme"),
            CompanyConfig::new("Acme Labs", BoardType::Lever, "acme"),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn empty_file_is_an_empty_registry() {
        let registry = CompanyRegistry::from_toml_str("").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn builtin_registry_is_valid() {
        let builtin = CompanyRegistry::builtin();
        let revalidated = CompanyRegistry::from_companies(builtin.iter().cloned().collect());
        assert!(revalidated.is_ok());
        assert_eq!(builtin.len(), 3);
    }
}
