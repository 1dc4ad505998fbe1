use serde::{Deserialize, Serialize};

use super::{Assignment, Campaign, Ship};

/// Everything read from one board capture.
///
/// `errors` holds one message per card that failed extraction and is left
/// out of the serialized output when empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    pub assignments: Vec<Assignment>,
    pub ships: Vec<Ship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl BoardState {
    /// Returns this board with every assignment tagged with `campaign`.
    pub fn with_campaign(self, campaign: &Campaign) -> Self {
        Self {
            assignments: self
                .assignments
                .into_iter()
                .map(|a| a.with_campaign(campaign))
                .collect(),
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.ships.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(name: &str) -> Assignment {
        Assignment {
            name: name.to_string(),
            ..Assignment::default()
        }
    }

    #[test]
    fn test_errors_omitted_when_empty() {
        let board = BoardState {
            assignments: vec![assignment("Supply Run")],
            ..BoardState::default()
        };

        let value = serde_json::to_value(&board).unwrap();

        assert_eq!(value["assignments"][0]["name"], "Supply Run");
        assert_eq!(value["ships"], serde_json::json!([]));
        assert!(value.get("errors").is_none());
    }

    #[test]
    fn test_errors_present_when_cards_failed() {
        let board = BoardState {
            errors: vec!["Failed to extract assignment from card 1".to_string()],
            ..BoardState::default()
        };

        let value = serde_json::to_value(&board).unwrap();

        assert_eq!(value["errors"][0], "Failed to extract assignment from card 1");
    }

    #[test]
    fn test_round_trip_without_errors_field() {
        let json = r#"{ "assignments": [], "ships": [] }"#;
        let board: BoardState = serde_json::from_str(json).unwrap();
        assert!(board.is_empty());
        assert!(board.errors.is_empty());
    }

    #[test]
    fn test_with_campaign_tags_every_assignment() {
        let board = BoardState {
            assignments: vec![assignment("A"), assignment("B")],
            ..BoardState::default()
        };

        let tagged = board.with_campaign(&Campaign::new("Romulan"));

        assert!(tagged.assignments.iter().all(|a| a.campaign == "Romulan"));
    }
}
