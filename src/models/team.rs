use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: String,
    /// Badge image URL as reported by the API
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub score: i64,
    /// Local cache path for the badge, filled in after download
    #[serde(skip)]
    pub badge_path: Option<PathBuf>,
}

impl Team {
    /// Full display name: "Chicago Bears"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.location, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let team = Team {
            location: "Chicago".to_string(),
            name: "Bears".to_string(),
            ..Default::default()
        };
        assert_eq!(team.full_name(), "Chicago Bears");
    }

    #[test]
    fn test_deserialize_missing_fields_default() {
        let team: Team = serde_json::from_str("{}").unwrap();
        assert_eq!(team.id, "");
        assert_eq!(team.score, 0);
        assert!(team.badge_path.is_none());
    }
}
