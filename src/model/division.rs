use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Division {
    Kapten,
    Cs,
    Kasir,
    CsLine,
}

impl Division {
    /// Approved leave slots per calendar month.
    pub fn monthly_limit(&self) -> u32 {
        match self {
            Division::Kapten => 1,
            Division::Cs => 2,
            Division::Kasir => 3,
            Division::CsLine => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Division::Kapten => "KAPTEN",
            Division::Cs => "CS",
            Division::Kasir => "KASIR",
            Division::CsLine => "CS LINE",
        }
    }
}
