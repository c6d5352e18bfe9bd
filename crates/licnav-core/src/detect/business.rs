//! Rule-based business type detection and analysis.
//!
//! Each business type has an ordered keyword list; types are tried in
//! [`BusinessType::DETECTION_ORDER`] and the first type with any keyword
//! present in the input wins.

use licnav_types::business::{BusinessAnalysis, BusinessType, CostEstimate};
use licnav_types::jurisdiction::JurisdictionProfile;

use super::text::contains_phrase;

const FOOD_HOSPITALITY: &[&str] = &[
    "restaurant", "food", "catering", "hotel", "bar", "pub", "cafe", "bakery", "food truck",
    "food service", "hospitality", "tourism", "ice cream", "ice cream store", "pizza", "burger",
    "sandwich", "coffee", "tea", "juice", "smoothie", "dessert", "candy", "chocolate", "pastry",
    "donut", "cupcake", "cake", "bread", "deli", "grocery", "convenience store", "liquor", "wine",
    "beer", "brewery", "winery", "food market", "farmers market", "food court", "dining",
    "eatery", "bistro", "steakhouse", "seafood", "bbq", "grill", "diner", "fast food", "takeout",
    "delivery", "food delivery", "meal prep", "catering service",
];

const FINANCIAL_SERVICES: &[&str] = &[
    "financial", "banking", "investment", "insurance", "fintech", "wealth management",
    "portfolio", "trading", "broker", "trust", "money transfer", "payment", "lending", "mortgage",
    "consumer credit", "personal loans", "payday loans", "installment loans", "check cashing",
    "credit union", "savings", "checking", "loan", "finance", "financial planning",
    "investment advisory", "securities", "stock broker", "insurance agent", "insurance broker",
    "real estate", "mortgage broker", "payday lender", "money transmitter", "currency exchange",
    "financial advisor",
];

const EDUCATION: &[&str] = &[
    "education", "school", "training", "tutoring", "academy", "institute", "university",
    "college", "coaching", "educational", "learning", "certification", "vocational",
    "trade school", "driving school", "music school", "dance school", "art school",
    "language school", "test prep", "exam prep", "preschool", "kindergarten", "elementary",
    "middle school", "high school", "private school", "public school", "charter school",
    "homeschool", "online school", "distance learning", "continuing education",
    "professional development",
];

const FRANCHISE: &[&str] = &[
    "franchise", "franchising", "franchisor", "franchisee", "business opportunity",
    "multi-level marketing", "mlm", "network marketing", "direct sales", "business model",
    "licensing agreement", "territory", "royalty", "franchise fee", "franchise system",
    "franchise network", "franchise brand", "franchise concept",
];

const CONSTRUCTION: &[&str] = &[
    "construction", "contractor", "builder", "plumber", "electrician", "hvac", "roofer",
    "painter", "carpenter", "mason", "landscaper", "remodeling", "renovation",
    "home improvement", "repair", "installation", "welding", "concrete", "asphalt",
    "excavation", "demolition", "framing", "drywall", "flooring", "tile", "siding", "decking",
];

const HEALTHCARE: &[&str] = &[
    "medical", "healthcare", "doctor", "physician", "dentist", "pharmacy", "pharmacist", "nurse",
    "therapist", "chiropractor", "optometrist", "veterinary", "veterinarian", "clinic",
    "hospital", "laboratory", "diagnostic", "dental", "orthodontic", "physical therapy",
    "occupational therapy", "speech therapy", "mental health", "psychology", "psychiatry",
    "counseling", "wellness", "spa", "salon", "beauty", "cosmetic", "aesthetic", "massage",
    "acupuncture",
];

const TECHNOLOGY: &[&str] = &[
    "technology", "software", "computer", "internet", "web", "app", "mobile", "digital", "cyber",
    "data", "cloud", "saas", "startup", "tech", "programming", "coding", "website", "ecommerce",
    "online", "digital marketing", "social media", "ai", "artificial intelligence",
    "machine learning", "automation", "consulting", "hosting", "domain",
];

const CANNABIS: &[&str] = &[
    "cannabis", "marijuana", "hemp", "cbd", "dispensary", "cultivation", "weed", "thc",
    "medical marijuana", "recreational", "grow", "extract", "edible", "vape", "concentrate",
];

const TRANSPORTATION: &[&str] = &[
    "transportation", "trucking", "logistics", "shipping", "freight", "taxi", "limousine",
    "chauffeur", "driver", "warehouse", "storage", "moving", "relocation", "courier",
    "messenger", "parcel", "package", "air freight", "sea freight", "rail", "bus", "transit",
    "public transportation",
];

const RETAIL: &[&str] = &[
    "retail", "store", "shop", "sales", "wholesale", "distributor", "dealer", "merchant",
    "vendor", "market", "mall", "boutique", "outlet", "department store", "specialty store",
    "grocery store", "supermarket", "discount store", "thrift store", "pawn shop", "antique",
    "vintage", "collectible", "gift shop", "jewelry store", "clothing store", "shoe store",
    "bookstore", "electronics store", "hardware store", "furniture store",
];

const MANUFACTURING: &[&str] = &[
    "manufacturing", "factory", "industrial", "production", "assembly", "processing",
    "chemical", "hazardous", "waste", "environmental", "plant", "facility", "mill", "refinery",
    "foundry", "forge", "machining", "fabrication", "casting", "molding", "injection",
    "extrusion", "printing", "packaging", "labeling", "quality control", "inspection",
    "research", "r&d",
];

const ENTERTAINMENT: &[&str] = &[
    "entertainment", "events", "recreation", "gaming", "casino", "theater", "cinema",
    "amusement", "park", "fitness", "gym", "nightclub", "club", "venue", "concert",
    "performance", "show", "exhibition", "museum", "gallery", "art", "music", "dance", "comedy",
    "magic", "circus", "carnival", "fair", "festival", "party", "celebration", "wedding",
    "event planning", "ticketing",
];

fn keywords(business_type: BusinessType) -> &'static [&'static str] {
    match business_type {
        BusinessType::FoodHospitality => FOOD_HOSPITALITY,
        BusinessType::FinancialServices => FINANCIAL_SERVICES,
        BusinessType::Education => EDUCATION,
        BusinessType::Franchise => FRANCHISE,
        BusinessType::Construction => CONSTRUCTION,
        BusinessType::Healthcare => HEALTHCARE,
        BusinessType::Technology => TECHNOLOGY,
        BusinessType::Cannabis => CANNABIS,
        BusinessType::Transportation => TRANSPORTATION,
        BusinessType::Retail => RETAIL,
        BusinessType::Manufacturing => MANUFACTURING,
        BusinessType::Entertainment => ENTERTAINMENT,
        BusinessType::General => &[],
    }
}

/// Classify `input`; `General` when no keyword list matches.
pub fn detect_business_type(input: &str) -> BusinessType {
    BusinessType::DETECTION_ORDER
        .into_iter()
        .find(|t| keywords(*t).iter().any(|k| contains_phrase(input, k)))
        .unwrap_or(BusinessType::General)
}

/// License names assumed when the jurisdiction has none configured for the type.
pub fn default_licenses(business_type: BusinessType) -> Vec<String> {
    let names: &[&str] = match business_type {
        BusinessType::FinancialServices => &[
            "Money Transmitter License",
            "Investment Adviser License",
            "Securities Dealer License",
        ],
        BusinessType::Education => &[
            "Education License",
            "Private School License",
            "Training Center License",
        ],
        BusinessType::Franchise => &["Franchise Registration", "Business Opportunity License"],
        BusinessType::FoodHospitality => {
            &["Food Service License", "Restaurant License", "Liquor License"]
        }
        BusinessType::Construction => {
            &["Contractor License", "Electrical License", "Plumbing License"]
        }
        BusinessType::Healthcare => &["Medical License", "Healthcare License", "Pharmacy License"],
        BusinessType::Technology => &["Technology License", "Software License"],
        BusinessType::Cannabis => &["Cannabis License", "Dispensary License"],
        BusinessType::Transportation => &["Transportation License", "Trucking License"],
        BusinessType::Retail => &["Retail License", "Sales Tax License"],
        BusinessType::Manufacturing => &["Manufacturing License", "Industrial License"],
        BusinessType::Entertainment => &["Entertainment License", "Gaming License"],
        BusinessType::General => &["General Business License"],
    };
    names.iter().map(|s| s.to_string()).collect()
}

/// Build the rule-based analysis for `input` in the given jurisdiction.
pub fn analyze_business(input: &str, profile: Option<&JurisdictionProfile>) -> BusinessAnalysis {
    let business_type = detect_business_type(input);

    let configured = profile
        .map(|p| p.licenses_for(business_type).to_vec())
        .unwrap_or_default();
    let detected_licenses = if configured.is_empty() {
        default_licenses(business_type)
    } else {
        configured
    };

    BusinessAnalysis {
        business_type,
        description: input.to_string(),
        detected_licenses,
        key_requirements: vec![
            "Background check".to_string(),
            "Financial statements".to_string(),
            "Insurance/bond".to_string(),
            "Business registration".to_string(),
        ],
        estimated_costs: CostEstimate::default(),
        timeline: "4-8 weeks for complete licensing process".to_string(),
        special_considerations: vec![
            "State-specific requirements may apply".to_string(),
            "Additional permits may be needed".to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_each_type() {
        let cases = [
            ("I want to open a restaurant", BusinessType::FoodHospitality),
            ("starting a fintech company", BusinessType::FinancialServices),
            ("a tutoring center for kids", BusinessType::Education),
            ("buying a franchise", BusinessType::Franchise),
            ("licensed plumber", BusinessType::Construction),
            ("opening a dental clinic", BusinessType::Healthcare),
            ("a saas platform", BusinessType::Technology),
            ("cannabis dispensary", BusinessType::Cannabis),
            ("trucking logistics company", BusinessType::Transportation),
            ("a shoe boutique", BusinessType::Retail),
            ("small factory", BusinessType::Manufacturing),
            ("a comedy venue", BusinessType::Entertainment),
        ];
        for (input, expected) in cases {
            assert_eq!(detect_business_type(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_priority_order_first_type_wins() {
        // "coffee" (food) outranks "shop" (retail).
        assert_eq!(detect_business_type("a coffee shop"), BusinessType::FoodHospitality);
        // "payday loans" (financial) outranks "store" (retail).
        assert_eq!(detect_business_type("payday loans store"), BusinessType::FinancialServices);
    }

    #[test]
    fn test_word_boundaries_avoid_false_hits() {
        // "bar" inside "barber" and "tea" inside "team" must not match food.
        assert_eq!(detect_business_type("barber for my team"), BusinessType::General);
    }

    #[test]
    fn test_general_fallback() {
        assert_eq!(detect_business_type("something unusual"), BusinessType::General);
    }

    #[test]
    fn test_analysis_defaults() {
        let analysis = analyze_business("open a bakery", None);
        assert_eq!(analysis.business_type, BusinessType::FoodHospitality);
        assert_eq!(
            analysis.detected_licenses,
            vec!["Food Service License", "Restaurant License", "Liquor License"]
        );
        assert_eq!(analysis.key_requirements.len(), 4);
        assert_eq!(analysis.estimated_costs.renewal_fee, "$200-1,000");
        assert!(analysis.timeline.starts_with("4-8 weeks"));
        assert_eq!(analysis.special_considerations.len(), 2);
    }

    #[test]
    fn test_analysis_prefers_jurisdiction_licenses() {
        let profile: JurisdictionProfile = toml::from_str(
            r#"
code = "DE"
name = "Delaware"

[license_categories]
food_hospitality = ["Delaware Food Service License", "Delaware Catering License"]
"#,
        )
        .unwrap();
        let analysis = analyze_business("catering company", Some(&profile));
        assert_eq!(
            analysis.detected_licenses,
            vec!["Delaware Food Service License", "Delaware Catering License"]
        );

        let general = analyze_business("something unusual", Some(&profile));
        assert_eq!(general.detected_licenses, vec!["General Business License"]);
    }
}
