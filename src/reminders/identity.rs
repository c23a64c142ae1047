//! Stable identifiers for scheduled reminders.
//!
//! An identifier is the decimal concatenation of the kind's three-digit tag, the tahara
//! event id (check reminders only) and the sequence index (check and flagged-period
//! reminders). The tag always occupies the leading three digits, check indices are a
//! single digit and flagged-period indices are the whole remainder, so every valid key
//! maps to a distinct identifier and [`ReminderKey::decode`] recovers it.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::errors::{ReminderError, ReminderResult};

/// Number of daily checks in the seven clean days.
pub const CHECK_DAYS: u8 = 7;
/// Highest sequence index a flagged-period reminder may occupy.
pub const FLAGGED_PERIOD_CAP: u8 = 24;
/// Every slot a flagged-period kind may hold, including slot 0 which is swept but never filled.
pub const FLAGGED_PERIOD_SLOTS: RangeInclusive<u8> = 0..=FLAGGED_PERIOD_CAP;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReminderKind {
    HefsekReminder,
    MorningCheckReminder,
    AfternoonCheckReminder,
    ImmersionReminder,
    FlaggedDayPeriod,
    FlaggedNightPeriod,
}

/// How a kind's identifiers are laid out after the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    /// At most one pending reminder; the tag alone is the identifier.
    Singleton,
    /// One reminder per day of a tahara cycle: event id, then a single-digit index.
    PerCycle,
    /// A capped pool of slots shared by every flagged period of the kind.
    Slotted,
}

impl ReminderKind {
    pub const ALL: [ReminderKind; 6] = [
        ReminderKind::HefsekReminder,
        ReminderKind::MorningCheckReminder,
        ReminderKind::AfternoonCheckReminder,
        ReminderKind::ImmersionReminder,
        ReminderKind::FlaggedDayPeriod,
        ReminderKind::FlaggedNightPeriod,
    ];

    /// Leading component of every identifier of this kind. Never reuse a retired tag.
    pub fn tag(&self) -> u16 {
        match self {
            ReminderKind::HefsekReminder => 101,
            ReminderKind::MorningCheckReminder => 102,
            ReminderKind::AfternoonCheckReminder => 103,
            ReminderKind::ImmersionReminder => 104,
            ReminderKind::FlaggedDayPeriod => 105,
            ReminderKind::FlaggedNightPeriod => 106,
        }
    }

    pub fn from_tag(tag: u16) -> Option<ReminderKind> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    pub fn shape(&self) -> KeyShape {
        match self {
            ReminderKind::HefsekReminder | ReminderKind::ImmersionReminder => KeyShape::Singleton,
            ReminderKind::MorningCheckReminder | ReminderKind::AfternoonCheckReminder => {
                KeyShape::PerCycle
            }
            ReminderKind::FlaggedDayPeriod | ReminderKind::FlaggedNightPeriod => {
                KeyShape::Slotted
            }
        }
    }

    /// Sequence indices a cancellation must sweep for this kind.
    pub fn sequence_range(&self) -> RangeInclusive<u8> {
        match self.shape() {
            KeyShape::Singleton => 0..=0,
            KeyShape::PerCycle => 0..=CHECK_DAYS - 1,
            KeyShape::Slotted => FLAGGED_PERIOD_SLOTS,
        }
    }
}

impl fmt::Display for ReminderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReminderKind::HefsekReminder => "hefsek",
            ReminderKind::MorningCheckReminder => "morning-check",
            ReminderKind::AfternoonCheckReminder => "afternoon-check",
            ReminderKind::ImmersionReminder => "immersion",
            ReminderKind::FlaggedDayPeriod => "flagged-day",
            ReminderKind::FlaggedNightPeriod => "flagged-night",
        };
        f.write_str(label)
    }
}

/// Identifier handed to the notification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReminderId(u64);

impl ReminderId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ReminderId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `(kind, event id, sequence index)` triple behind a [`ReminderId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReminderKey {
    kind: ReminderKind,
    event_id: Option<u32>,
    sequence: Option<u8>,
}

impl ReminderKey {
    pub fn singleton(kind: ReminderKind) -> ReminderResult<Self> {
        ensure_shape(kind, KeyShape::Singleton)?;
        Ok(Self {
            kind,
            event_id: None,
            sequence: None,
        })
    }

    pub fn per_cycle(kind: ReminderKind, event_id: u32, sequence: u8) -> ReminderResult<Self> {
        ensure_shape(kind, KeyShape::PerCycle)?;
        ensure_sequence(kind, sequence)?;
        Ok(Self {
            kind,
            event_id: Some(event_id),
            sequence: Some(sequence),
        })
    }

    pub fn slot(kind: ReminderKind, sequence: u8) -> ReminderResult<Self> {
        ensure_shape(kind, KeyShape::Slotted)?;
        ensure_sequence(kind, sequence)?;
        Ok(Self {
            kind,
            event_id: None,
            sequence: Some(sequence),
        })
    }

    /// Every key a kind can hold for one logical event, in sequence order.
    ///
    /// `event_id` is ignored for kinds that do not carry one.
    pub fn all_for(kind: ReminderKind, event_id: u32) -> Vec<ReminderKey> {
        match kind.shape() {
            KeyShape::Singleton => vec![Self {
                kind,
                event_id: None,
                sequence: None,
            }],
            KeyShape::PerCycle => kind
                .sequence_range()
                .map(|sequence| Self {
                    kind,
                    event_id: Some(event_id),
                    sequence: Some(sequence),
                })
                .collect(),
            KeyShape::Slotted => kind
                .sequence_range()
                .map(|sequence| Self {
                    kind,
                    event_id: None,
                    sequence: Some(sequence),
                })
                .collect(),
        }
    }

    pub fn kind(&self) -> ReminderKind {
        self.kind
    }

    pub fn event_id(&self) -> Option<u32> {
        self.event_id
    }

    pub fn sequence(&self) -> Option<u8> {
        self.sequence
    }

    pub fn encode(&self) -> ReminderId {
        let mut value = u64::from(self.kind.tag());
        if let Some(event_id) = self.event_id {
            value = append_digits(value, u64::from(event_id));
        }
        if let Some(sequence) = self.sequence {
            value = append_digits(value, u64::from(sequence));
        }
        ReminderId(value)
    }

    /// Recovers the key behind an identifier produced by [`ReminderKey::encode`].
    pub fn decode(id: ReminderId) -> Option<ReminderKey> {
        let digits = id.0.to_string();
        if digits.len() < 3 {
            return None;
        }
        let (tag, rest) = digits.split_at(3);
        let kind = ReminderKind::from_tag(tag.parse().ok()?)?;
        match kind.shape() {
            KeyShape::Singleton => rest.is_empty().then_some(Self {
                kind,
                event_id: None,
                sequence: None,
            }),
            KeyShape::PerCycle => {
                if rest.len() < 2 {
                    return None;
                }
                let (event, sequence) = rest.split_at(rest.len() - 1);
                let event_id = parse_canonical(event)?;
                Self::per_cycle(kind, u32::try_from(event_id).ok()?, sequence.parse().ok()?).ok()
            }
            KeyShape::Slotted => {
                let sequence = u8::try_from(parse_canonical(rest)?).ok()?;
                Self::slot(kind, sequence).ok()
            }
        }
    }
}

fn ensure_shape(kind: ReminderKind, expected: KeyShape) -> ReminderResult<()> {
    if kind.shape() == expected {
        Ok(())
    } else {
        Err(ReminderError::InvalidInput(format!(
            "{kind} reminders are not keyed as {expected:?}"
        )))
    }
}

fn ensure_sequence(kind: ReminderKind, sequence: u8) -> ReminderResult<()> {
    if kind.sequence_range().contains(&sequence) {
        Ok(())
    } else {
        Err(ReminderError::InvalidInput(format!(
            "sequence index {sequence} is outside the {kind} range"
        )))
    }
}

fn append_digits(prefix: u64, value: u64) -> u64 {
    let mut shift = 10u64;
    while shift <= value {
        shift *= 10;
    }
    prefix * shift + value
}

/// Parses a decimal field that `encode` could have written: non-empty, no leading zeros.
fn parse_canonical(field: &str) -> Option<u64> {
    if field.is_empty() || (field.len() > 1 && field.starts_with('0')) {
        return None;
    }
    field.parse().ok()
}
