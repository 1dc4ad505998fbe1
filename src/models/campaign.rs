use serde::{Deserialize, Serialize};

/// An admiralty track (Klingon, Ferengi, Romulan, ...).
///
/// The campaign is user-selected, not extracted from assignment cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub name: String,
}

impl Campaign {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}
