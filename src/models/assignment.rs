use serde::{Deserialize, Serialize};

use super::Campaign;
use crate::ocr::RawAssignmentFields;

/// An admiralty mission with stat requirements and ship slots,
/// read from one assignment card.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub name: String,
    pub engineering: u32,
    pub science: u32,
    pub tactical: u32,
    pub ship_slots: u32,
    /// Selected by the user, never read from the card
    #[serde(default)]
    pub campaign: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub event_rewards: Vec<String>,
}

impl Assignment {
    pub fn from_fields(fields: RawAssignmentFields) -> Self {
        Self {
            name: fields.name,
            engineering: fields.engineering,
            science: fields.science,
            tactical: fields.tactical,
            ship_slots: fields.ship_slots,
            campaign: String::new(),
            duration: fields.duration,
            rarity: fields.rarity,
            event_rewards: fields.event_rewards,
        }
    }

    /// Returns this assignment tagged with `campaign`.
    pub fn with_campaign(self, campaign: &Campaign) -> Self {
        Self {
            campaign: campaign.name.clone(),
            ..self
        }
    }

    /// Sum of the three required stat values.
    pub fn total_required(&self) -> u32 {
        self.engineering + self.science + self.tactical
    }
}
