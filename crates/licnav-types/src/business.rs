//! Business type classification and rule-based business analysis.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Industry a business belongs to, as detected from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    FoodHospitality,
    FinancialServices,
    Education,
    Franchise,
    Construction,
    Healthcare,
    Technology,
    Cannabis,
    Transportation,
    Retail,
    Manufacturing,
    Entertainment,
    #[serde(rename = "general_business")]
    General,
}

impl BusinessType {
    /// Every specific type in detection priority order. `General` is excluded.
    pub const DETECTION_ORDER: [BusinessType; 12] = [
        BusinessType::FoodHospitality,
        BusinessType::FinancialServices,
        BusinessType::Education,
        BusinessType::Franchise,
        BusinessType::Construction,
        BusinessType::Healthcare,
        BusinessType::Technology,
        BusinessType::Cannabis,
        BusinessType::Transportation,
        BusinessType::Retail,
        BusinessType::Manufacturing,
        BusinessType::Entertainment,
    ];

    /// Stable key used in profile TOML files (`license_categories.<key>`).
    pub fn as_key(&self) -> &'static str {
        match self {
            BusinessType::FoodHospitality => "food_hospitality",
            BusinessType::FinancialServices => "financial_services",
            BusinessType::Education => "education",
            BusinessType::Franchise => "franchise",
            BusinessType::Construction => "construction",
            BusinessType::Healthcare => "healthcare",
            BusinessType::Technology => "technology",
            BusinessType::Cannabis => "cannabis",
            BusinessType::Transportation => "transportation",
            BusinessType::Retail => "retail",
            BusinessType::Manufacturing => "manufacturing",
            BusinessType::Entertainment => "entertainment",
            BusinessType::General => "general_business",
        }
    }

    /// Human-readable label (e.g. "Food & Hospitality").
    pub fn label(&self) -> &'static str {
        match self {
            BusinessType::FoodHospitality => "Food & Hospitality",
            BusinessType::FinancialServices => "Financial Services",
            BusinessType::Education => "Education",
            BusinessType::Franchise => "Franchise",
            BusinessType::Construction => "Construction & Trades",
            BusinessType::Healthcare => "Healthcare & Medical",
            BusinessType::Technology => "Technology & Software",
            BusinessType::Cannabis => "Cannabis & Hemp",
            BusinessType::Transportation => "Transportation & Logistics",
            BusinessType::Retail => "Retail & Sales",
            BusinessType::Manufacturing => "Manufacturing & Industrial",
            BusinessType::Entertainment => "Entertainment & Events",
            BusinessType::General => "General Business",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl FromStr for BusinessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        if key == "general" || key == "general_business" {
            return Ok(BusinessType::General);
        }
        BusinessType::DETECTION_ORDER
            .into_iter()
            .find(|t| t.as_key() == key)
            .ok_or_else(|| format!("invalid business type: '{s}'"))
    }
}

/// Rough cost ranges for getting licensed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub application_fee: String,
    pub license_fee: String,
    pub renewal_fee: String,
    pub total_initial: String,
}

impl Default for CostEstimate {
    fn default() -> Self {
        Self {
            application_fee: "$100-500".to_string(),
            license_fee: "$500-2,000".to_string(),
            renewal_fee: "$200-1,000".to_string(),
            total_initial: "$800-3,500".to_string(),
        }
    }
}

/// Result of analysing a free-text business description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessAnalysis {
    pub business_type: BusinessType,
    pub description: String,
    /// License names expected for this business in the detected jurisdiction.
    pub detected_licenses: Vec<String>,
    pub key_requirements: Vec<String>,
    pub estimated_costs: CostEstimate,
    pub timeline: String,
    pub special_considerations: Vec<String>,
}
