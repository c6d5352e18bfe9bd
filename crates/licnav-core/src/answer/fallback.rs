//! Built-in guidance used when no LLM is configured or the provider fails.

const FOOD_SERVICE: &str = "\
### Food Service Business License Requirements

**Required Licenses**
- **Food Service License**: required for restaurants, cafes and bakeries
  - Cost: $100-300 application fee
  - Due Date: apply 45 days before opening
  - Renewal: annual

**Requirements**
- Food safety training certification
- Health inspection approval
- Kitchen facility compliance
- Employee training records

**Application Process**
1. Complete food safety training
2. Pass the health inspection
3. Submit the application with fees
4. Wait for approval (2-4 weeks)

**Source**: State Department of Health";

const CONSTRUCTION: &str = "\
### Construction Business License Requirements

**Required Licenses**
- **General Contractor License**: required for construction work
  - Cost: $200-500 application fee
  - Due Date: apply 60 days before starting work
  - Renewal: annual

**Requirements**
- Experience verification (2-5 years)
- Background check
- Proof of financial responsibility
- Insurance coverage

**Application Process**
1. Verify experience requirements
2. Complete the background check
3. Submit the application with fees
4. Wait for approval (4-8 weeks)

**Source**: State Department of Professional Regulation";

const CANNABIS: &str = "\
### Cannabis Business License Requirements

**Required Licenses**
- **Cannabis Business License**: required for cannabis operations
  - Cost: $5,000-25,000 application fee
  - Due Date: apply 120 days before the planned opening
  - Renewal: annual

**Requirements**
- Comprehensive business plan
- Proof of financial solvency
- Security plan
- Background checks for all principals

**Application Process**
1. Complete background checks
2. Submit the security plan
3. Pay application fees
4. Wait for approval (6-12 months)

**Source**: State Cannabis Control Board";

const GENERAL: &str = "\
### General Business License Requirements

**Required Licenses**
- **General Business License**: basic business operations
  - Cost: $50-200 application fee
  - Due Date: apply before starting operations
  - Renewal: annual

**Requirements**
- Business registration
- Tax identification
- Local permits (if required)
- Insurance coverage

**Application Process**
1. Register the business entity
2. Obtain a tax identification number
3. Submit the application with fees
4. Wait for approval (2-4 weeks)

**Source**: State Department of Business Regulation

*This is general guidance. Check your state's requirements before applying.*";

/// Canned guidance chosen from keywords in the business description.
///
/// Case-insensitive substring matching, so "seafood" counts as food.
pub fn fallback_response(description: &str) -> &'static str {
    let lower = description.to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if any(&["restaurant", "food", "cafe", "bakery"]) {
        FOOD_SERVICE
    } else if any(&["construction", "contractor", "building"]) {
        CONSTRUCTION
    } else if any(&["cannabis", "marijuana", "dispensary"]) {
        CANNABIS
    } else {
        GENERAL
    }
}
