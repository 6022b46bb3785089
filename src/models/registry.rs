use crate::error::ConfigError;
use crate::models::Candidate;
use log::info;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Largest roster the dashboard can show. Each candidate takes one embed
/// field and one vote button, and Discord caps an embed at 25 fields and
/// 6000 characters alongside the rankings field.
pub const MAX_CANDIDATES: usize = 20;

/// Fixed roster of candidates, kept in registry order.
#[derive(Debug, Clone)]
pub struct CandidateRegistry {
    candidates: Vec<Candidate>,
}

impl CandidateRegistry {
    pub fn new(candidates: Vec<Candidate>) -> Result<Self, ConfigError> {
        if candidates.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        if candidates.len() > MAX_CANDIDATES {
            return Err(ConfigError::TooManyCandidates {
                count: candidates.len(),
                max: MAX_CANDIDATES,
            });
        }

        let mut seen = HashSet::new();
        for candidate in &candidates {
            if !seen.insert(candidate.name.as_str()) {
                return Err(ConfigError::DuplicateCandidate(candidate.name.clone()));
            }
        }

        Ok(Self { candidates })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let candidates: Vec<Candidate> = serde_json::from_str(json)?;
        Self::new(candidates)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::CandidateFile {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_json(&json)?;
        info!("Loaded {} candidates from {}", registry.len(), path.display());
        Ok(registry)
    }

    // Alliance members from the R4 promotion event
    pub fn default_roster() -> Self {
        let candidates = vec![
            roster_entry("Glizzy Gobbler", 2, 24, "🇺🇸", "113,987,059", "92.2M", "512.3K", 900, 4),
            roster_entry("SGunner", 4, 26, "🇦🇷", "99,337,084", "74.2M", "384.0K", 380, 6),
            roster_entry("Kduss", 11, 25, "🇺🇳", "71,907,600", "49.3M", "507.9K", 508, 6),
            roster_entry("GG7991", 12, 26, "🇺🇸", "71,338,969", "68.0M", "530.7K", 614, 4),
            roster_entry("MictlanTecuhtli", 13, 26, "🇲🇽", "70,365,788", "81.5M", "717.5K", 686, 6),
        ];
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, name: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

#[allow(clippy::too_many_arguments)]
fn roster_entry(
    name: &str,
    rank: u32,
    level: u32,
    country: &str,
    power: &str,
    kills: &str,
    deaths: &str,
    likes: u32,
    gift_level: u32,
) -> Candidate {
    Candidate {
        name: name.to_string(),
        rank,
        level,
        country: country.to_string(),
        power: power.to_string(),
        kills: kills.to_string(),
        deaths: deaths.to_string(),
        likes,
        gift_level,
    }
}
