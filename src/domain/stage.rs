// src/domain/stage.rs

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Position of a lead in the five-step sales pipeline.
///
/// Any stage may be reached from any other; there is no transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PipelineStage {
    #[serde(rename = "entrante")]
    Incoming,
    #[serde(rename = "primer-llamado")]
    FirstContactMade,
    #[serde(rename = "seguimiento")]
    FollowingUp,
    #[serde(rename = "ganado")]
    Won,
    #[serde(rename = "perdido")]
    Lost,
}

impl PipelineStage {
    /// Column order on the board.
    pub const ALL: [PipelineStage; 5] = [
        PipelineStage::Incoming,
        PipelineStage::FirstContactMade,
        PipelineStage::FollowingUp,
        PipelineStage::Won,
        PipelineStage::Lost,
    ];

    /// Wire / storage id.
    pub fn id(self) -> &'static str {
        match self {
            PipelineStage::Incoming => "entrante",
            PipelineStage::FirstContactMade => "primer-llamado",
            PipelineStage::FollowingUp => "seguimiento",
            PipelineStage::Won => "ganado",
            PipelineStage::Lost => "perdido",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PipelineStage::Incoming => "LEADS ENTRANTES",
            PipelineStage::FirstContactMade => "PRIMER LLAMADO REALIZADO",
            PipelineStage::FollowingUp => "HACER SEGUIMIENTO",
            PipelineStage::Won => "LEAD GANADO",
            PipelineStage::Lost => "LEAD PERDIDO",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            PipelineStage::Incoming => "📨",
            PipelineStage::FirstContactMade => "📞",
            PipelineStage::FollowingUp => "🔄",
            PipelineStage::Won => "🎉",
            PipelineStage::Lost => "❌",
        }
    }

    /// Bucket slot used by the board.
    pub fn index(self) -> usize {
        match self {
            PipelineStage::Incoming => 0,
            PipelineStage::FirstContactMade => 1,
            PipelineStage::FollowingUp => 2,
            PipelineStage::Won => 3,
            PipelineStage::Lost => 4,
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for PipelineStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PipelineStage::ALL
            .into_iter()
            .find(|stage| stage.id() == s.trim())
            .ok_or_else(|| format!("unknown pipeline stage '{s}'"))
    }
}

/// Buying-readiness answer captured once on the intake form.
/// Unknown answers are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeStage {
    ExploringOptions,
    StartingSoon,
    ReadyForFirstOrder,
    SeekingBetterSupplier,
    Other(String),
}

impl IntakeStage {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "buscando-opciones" => IntakeStage::ExploringOptions,
            "empezar-pronto" => IntakeStage::StartingSoon,
            "listo-primer-pedido" => IntakeStage::ReadyForFirstOrder,
            "busco-mejor-proveedor" => IntakeStage::SeekingBetterSupplier,
            other => IntakeStage::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IntakeStage::ExploringOptions => "buscando-opciones",
            IntakeStage::StartingSoon => "empezar-pronto",
            IntakeStage::ReadyForFirstOrder => "listo-primer-pedido",
            IntakeStage::SeekingBetterSupplier => "busco-mejor-proveedor",
            IntakeStage::Other(raw) => raw,
        }
    }

    /// Short badge text shown on lead cards.
    pub fn badge(&self) -> &str {
        match self {
            IntakeStage::ExploringOptions => "👀 Explora",
            IntakeStage::StartingSoon => "⚡ Pronto",
            IntakeStage::ReadyForFirstOrder => "🎯 Listo",
            IntakeStage::SeekingBetterSupplier => "🔍 Busca",
            IntakeStage::Other(raw) => raw,
        }
    }

    /// Options offered by the landing page form, in display order.
    pub fn form_options() -> [(IntakeStage, &'static str); 4] {
        [
            (IntakeStage::ExploringOptions, "Estoy buscando opciones, sin apuro"),
            (IntakeStage::StartingSoon, "Me interesa empezar pronto"),
            (IntakeStage::ReadyForFirstOrder, "Estoy listo para hacer mi primer pedido"),
            (
                IntakeStage::SeekingBetterSupplier,
                "Ya vendo alfajores y busco mejor proveedor",
            ),
        ]
    }
}

impl Serialize for IntakeStage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IntakeStage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(IntakeStage::parse(&raw))
    }
}

/// Estimated monthly purchase, in dozens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonthlyVolume {
    #[serde(rename = "menos-24")]
    UnderTwoDozen,
    #[serde(rename = "24-100")]
    TwoDozenToHundred,
    #[serde(rename = "mas-100")]
    OverHundred,
}

impl MonthlyVolume {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "menos-24" => Some(MonthlyVolume::UnderTwoDozen),
            "24-100" => Some(MonthlyVolume::TwoDozenToHundred),
            "mas-100" => Some(MonthlyVolume::OverHundred),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MonthlyVolume::UnderTwoDozen => "menos-24",
            MonthlyVolume::TwoDozenToHundred => "24-100",
            MonthlyVolume::OverHundred => "mas-100",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MonthlyVolume::UnderTwoDozen => "< 24 doc",
            MonthlyVolume::TwoDozenToHundred => "24-100 doc",
            MonthlyVolume::OverHundred => "> 100 doc",
        }
    }
}
