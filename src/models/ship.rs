use serde::{Deserialize, Serialize};

/// A ship card with Engineering, Science and Tactical stats.
///
/// Ships go on maintenance (cooldown) after being assigned to a mission.
/// The board reader does not extract ships yet; the type fixes the output shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    pub name: String,
    pub engineering: u32,
    pub science: u32,
    pub tactical: u32,
    #[serde(default)]
    pub maintenance: bool,
    #[serde(default)]
    pub special_abilities: Vec<String>,
}

impl Ship {
    /// Sum of the three stat values.
    pub fn total_stats(&self) -> u32 {
        self.engineering + self.science + self.tactical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_stats() {
        let ship = Ship {
            name: "U.S.S. Example".to_string(),
            engineering: 10,
            science: 20,
            tactical: 30,
            ..Ship::default()
        };
        assert_eq!(ship.total_stats(), 60);
    }
}
