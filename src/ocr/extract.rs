//! Assignment card text parsing.
//!
//! Best-effort: OCR output is noisy and partial, so any field that cannot be
//! found falls back to its default instead of failing the card.
//!
//! Expected card layout:
//! - Title on the first line
//! - Stats as "Engineering: N", "Sci: N", "Tac - N" or similar
//! - Ship slot count, duration, rarity
//! - Rewards on a "Rewards:" line or as standalone "500 Dilithium" items

use anyhow::Result;
use regex::{Captures, Regex};

use crate::log;

const ENGINEERING_PATTERN: &str = r"(?:eng(?:ineering)?)\s*[:\-]?\s*(\d+)";
const SCIENCE_PATTERN: &str = r"(?:sci(?:ence)?)\s*[:\-]?\s*(\d+)";
const TACTICAL_PATTERN: &str = r"(?:tac(?:tical)?)\s*[:\-]?\s*(\d+)";
const SHIP_SLOTS_PATTERN: &str = r"(?:slots?|ships?)\s*[:\-]?\s*(\d+)";

/// "4h", "4 hours", "1h 30m", "30m", "45 min"
const DURATION_PATTERN: &str = r"(\d+\s*h(?:ours?)?(?:\s*\d+\s*m(?:in)?)?|\d+\s*m(?:in)?)";

/// "Rewards: a, b" or "Event Reward - a; b"
const REWARD_LINE_PATTERN: &str = r"(?i)(?:event\s*rewards?|rewards?)\s*[:\-]\s*(.+)";

/// A quantity (optionally with an x multiplier) followed by a currency or material
const REWARD_ITEM_PATTERN: &str = r"(?i)(\d+[x×]?\s*(?:dilithium|dil|marks?|xp|experience|ec|energy credits|fleet credits|admiralty xp|campaign xp|tour of duty|r&d materials?|reputation marks?))";

const REWARD_SEPARATOR_PATTERN: &str = r"[,;]";

/// Checked in this order so "very rare" is not shadowed by "rare".
const RARITIES: [&str; 5] = ["epic", "very rare", "rare", "uncommon", "common"];

/// Fields parsed from one card's OCR text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawAssignmentFields {
    pub name: String,
    pub engineering: u32,
    pub science: u32,
    pub tactical: u32,
    pub ship_slots: u32,
    pub duration: String,
    pub rarity: String,
    pub event_rewards: Vec<String>,
}

/// Pattern-matching parser for assignment card text. Compile once, reuse per card.
pub struct AssignmentParser {
    engineering: Regex,
    science: Regex,
    tactical: Regex,
    ship_slots: Regex,
    duration: Regex,
    reward_line: Regex,
    reward_item: Regex,
    reward_separator: Regex,
}

impl AssignmentParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            engineering: Regex::new(ENGINEERING_PATTERN)?,
            science: Regex::new(SCIENCE_PATTERN)?,
            tactical: Regex::new(TACTICAL_PATTERN)?,
            ship_slots: Regex::new(SHIP_SLOTS_PATTERN)?,
            duration: Regex::new(DURATION_PATTERN)?,
            reward_line: Regex::new(REWARD_LINE_PATTERN)?,
            reward_item: Regex::new(REWARD_ITEM_PATTERN)?,
            reward_separator: Regex::new(REWARD_SEPARATOR_PATTERN)?,
        })
    }

    /// Parses raw OCR text from an assignment card into structured fields.
    ///
    /// The name is the first non-empty line verbatim. Stats, slots, duration
    /// and rarity are searched case-insensitively across the whole text; the
    /// first match wins. Rewards are collected line by line.
    pub fn parse(&self, raw_text: &str) -> RawAssignmentFields {
        let lines: Vec<&str> = raw_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let Some(first) = lines.first() else {
            return RawAssignmentFields::default();
        };

        let full_text = raw_text.to_lowercase();

        let duration = self
            .duration
            .captures(&full_text)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default();

        let rarity = RARITIES
            .iter()
            .find(|r| full_text.contains(*r))
            .map(|r| title_case(r))
            .unwrap_or_default();

        let fields = RawAssignmentFields {
            name: first.to_string(),
            engineering: first_number(&self.engineering, &full_text),
            science: first_number(&self.science, &full_text),
            tactical: first_number(&self.tactical, &full_text),
            ship_slots: first_number(&self.ship_slots, &full_text),
            duration,
            rarity,
            event_rewards: self.parse_rewards(&lines),
        };

        log(&format!("Parsed fields: {:?}", fields));
        fields
    }

    /// Collects rewards in encounter order without deduplication.
    ///
    /// A "Rewards:" line is split on commas/semicolons and is not also scanned
    /// for standalone items, so its entries are counted once.
    fn parse_rewards(&self, lines: &[&str]) -> Vec<String> {
        let mut rewards = Vec::new();

        for line in lines {
            if let Some(caps) = self.reward_line.captures(line) {
                let reward_text = caps[1].trim();
                for part in self.reward_separator.split(reward_text) {
                    let part = part.trim();
                    if !part.is_empty() {
                        rewards.push(part.to_string());
                    }
                }
            } else {
                for caps in self.reward_item.captures_iter(line) {
                    rewards.push(caps[1].trim().to_string());
                }
            }
        }

        rewards
    }
}

/// Integer from the first capture group of the first match, or 0.
fn first_number(re: &Regex, text: &str) -> u32 {
    re.captures(text)
        .and_then(|c: Captures| c[1].parse().ok())
        .unwrap_or(0)
}

/// "very rare" -> "Very Rare"
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
