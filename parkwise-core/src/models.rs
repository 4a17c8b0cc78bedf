use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timestamp;

/// A single parking space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: i64,
    pub label: String,
    pub occupied: bool,
}

impl Slot {
    pub fn label_for(number: i64) -> String {
        format!("Slot-{}", number)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Active,
    Closed,
}

/// One vehicle's stay, from entry to exit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub owner_name: Option<String>,
    pub vehicle_number: String,
    pub slot_id: i64,
    pub slot_label: String,
    #[serde(with = "timestamp::as_text")]
    pub entry_time: NaiveDateTime,
    #[serde(with = "timestamp::as_text::option")]
    pub exit_time: Option<NaiveDateTime>,
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        if self.exit_time.is_some() {
            SessionStatus::Closed
        } else {
            SessionStatus::Active
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == SessionStatus::Active
    }
}

/// A completed payment joined with the vehicle it was charged to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub session_id: i64,
    pub vehicle_number: String,
    pub amount: f64,
    #[serde(with = "timestamp::as_text")]
    pub paid_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkReceipt {
    pub session_id: i64,
    pub slot_label: String,
    #[serde(with = "timestamp::as_text")]
    pub entry_time: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitReceipt {
    pub session_id: i64,
    pub vehicle_number: String,
    pub slot_label: String,
    pub minutes: i64,
    pub amount: f64,
    #[serde(with = "timestamp::as_text")]
    pub exit_time: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancySummary {
    pub total_slots: i64,
    pub available: i64,
    pub occupied: i64,
    pub currently_parked: i64,
}

impl OccupancySummary {
    pub fn new(total_slots: i64, available: i64, currently_parked: i64) -> Self {
        Self {
            total_slots,
            available,
            occupied: total_slots - available,
            currently_parked,
        }
    }
}
