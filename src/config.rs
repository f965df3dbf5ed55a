//! Lottery catalog configuration.
//!
//! The set of supported lotteries ships as builtin defaults and can be
//! extended or overridden through a `loterias.toml` file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::repository::RepositoryError;
use crate::models::{LotteryProfile, ModelError};

/// Catalog configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub lottery: Vec<LotteryDefinition>,
}

/// One lottery entry of the catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LotteryDefinition {
    pub name: String,
    pub slug: String,
    pub api_identifier: String,
    pub numbers_count: u8,
    pub min_number: u8,
    pub max_number: u8,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl LotteryDefinition {
    /// Build the validated domain profile for this entry.
    pub fn to_profile(&self) -> Result<LotteryProfile, ModelError> {
        let mut profile = LotteryProfile::new(
            self.name.clone(),
            self.slug.clone(),
            self.api_identifier.clone(),
            self.numbers_count,
            self.min_number,
            self.max_number,
        )?;
        profile.is_active = self.is_active;
        Ok(profile)
    }
}

/// Resolved lottery catalog.
#[derive(Debug, Clone)]
pub struct LotteryCatalog {
    profiles: Vec<LotteryProfile>,
}

impl LotteryCatalog {
    /// The builtin catalog: Mega-Sena, Quina and Lotofácil.
    pub fn builtin() -> Self {
        let builtin = |name, slug, api, count, min, max| {
            LotteryProfile::new(name, slug, api, count, min, max)
                .expect("builtin profile is valid")
        };
        Self {
            profiles: vec![
                builtin("Mega-Sena", "mega-sena", "megasena", 6, 1, 60),
                builtin("Quina", "quina", "quina", 5, 1, 80),
                builtin("Lotofácil", "lotofacil", "lotofacil", 15, 1, 25),
            ],
        }
    }

    /// Load the catalog from a TOML file. Entries with a slug already
    /// present replace the builtin profile; new slugs are appended.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("failed to read catalog file: {}", e))
        })?;
        Self::from_toml(&content)
    }

    /// Load the catalog from the default location.
    ///
    /// Searches for `loterias.toml` in the current directory, then in the
    /// parent directory. Falls back to the builtin catalog when no file
    /// exists.
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("loterias.toml"),
            PathBuf::from("../loterias.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::builtin())
    }

    /// Parse a catalog overlay from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, RepositoryError> {
        let config: CatalogConfig = toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("failed to parse catalog file: {}", e))
        })?;

        let mut catalog = Self::builtin();
        for entry in &config.lottery {
            let profile = entry.to_profile().map_err(|e| {
                RepositoryError::validation(format!("invalid lottery '{}': {}", entry.slug, e))
            })?;
            match catalog.profiles.iter_mut().find(|p| p.slug == profile.slug) {
                Some(existing) => *existing = profile,
                None => catalog.profiles.push(profile),
            }
        }
        Ok(catalog)
    }

    /// Look up a profile by slug.
    pub fn get(&self, slug: &str) -> Option<&LotteryProfile> {
        self.profiles.iter().find(|p| p.slug == slug)
    }

    /// All catalog profiles.
    pub fn profiles(&self) -> &[LotteryProfile] {
        &self.profiles
    }

    /// Profiles currently flagged active.
    pub fn active_profiles(&self) -> impl Iterator<Item = &LotteryProfile> {
        self.profiles.iter().filter(|p| p.is_active)
    }
}
