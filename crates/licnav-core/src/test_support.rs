//! In-crate fakes for orchestration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use licnav_types::error::RetrievalError;
use licnav_types::license::{IndexMatch, IndexPoint, LicenseRecord};
use licnav_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderType, Usage};

use crate::llm::provider::LlmProvider;
use crate::retrieval::embedder::Embedder;
use crate::retrieval::index::VectorIndex;

const VOCABULARY: [&str; 10] = [
    "money", "payment", "credit", "payday", "loans", "tax", "sales", "business", "restaurant",
    "food",
];

pub fn record(id: &str, title: &str, text: &str, license_type: Option<&str>) -> LicenseRecord {
    LicenseRecord {
        id: id.to_string(),
        title: title.to_string(),
        text: text.to_string(),
        category: "Financial Services".to_string(),
        license_type: license_type.map(str::to_string),
        keywords: vec![],
        requirements: vec!["Background check".to_string()],
        source_url: format!("https://example.gov/{id}"),
        application_fee: None,
        annual_fee: None,
    }
}

/// Bag-of-words embedder over a fixed vocabulary.
pub struct FakeEmbedder {
    fail: bool,
    model: &'static str,
}

impl FakeEmbedder {
    pub fn new() -> Self {
        Self {
            fail: false,
            model: "fake-bow",
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            model: "fake-bow",
        }
    }

    /// Same vectors, reported under a different model name.
    pub fn named(model: &'static str) -> Self {
        Self { fail: false, model }
    }
}

impl Embedder for FakeEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RetrievalError> {
        if self.fail {
            return Err(RetrievalError::Embedding("model not loaded".to_string()));
        }
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                VOCABULARY
                    .iter()
                    .map(|word| lower.matches(word).count() as f32 + 0.05)
                    .collect()
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        self.model
    }

    fn dimension(&self) -> usize {
        VOCABULARY.len()
    }
}

/// In-memory cosine index.
pub struct FakeIndex {
    collections: Mutex<HashMap<String, (String, Vec<IndexPoint>)>>,
    failing: Arc<AtomicBool>,
    rebuilds: Arc<AtomicUsize>,
}

impl FakeIndex {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            failing: Arc::new(AtomicBool::new(false)),
            rebuilds: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Set to `true` to make every subsequent call fail.
    pub fn failing_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.failing)
    }

    pub fn rebuild_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.rebuilds)
    }

    fn check(&self) -> Result<(), RetrievalError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RetrievalError::Index("injected failure".to_string()));
        }
        Ok(())
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na * nb)
}

impl VectorIndex for FakeIndex {
    async fn rebuild(
        &self,
        collection: &str,
        fingerprint: &str,
        points: &[IndexPoint],
    ) -> Result<usize, RetrievalError> {
        self.check()?;
        self.rebuilds.fetch_add(1, Ordering::SeqCst);
        self.collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), (fingerprint.to_string(), points.to_vec()));
        Ok(points.len())
    }

    async fn search(
        &self,
        collection: &str,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<IndexMatch>, RetrievalError> {
        self.check()?;
        let collections = self.collections.lock().unwrap();
        let (_, points) = collections
            .get(collection)
            .ok_or_else(|| RetrievalError::Index(format!("collection {collection} not found")))?;
        let mut matches: Vec<IndexMatch> = points
            .iter()
            .map(|p| IndexMatch {
                id: p.id.clone(),
                score: cosine(query, &p.vector),
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(limit);
        Ok(matches)
    }

    async fn count(&self, collection: &str) -> Result<usize, RetrievalError> {
        self.check()?;
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .map_or(0, |(_, points)| points.len()))
    }

    async fn fingerprint(&self, collection: &str) -> Result<Option<String>, RetrievalError> {
        self.check()?;
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .filter(|(_, points)| !points.is_empty())
            .map(|(fingerprint, _)| fingerprint.clone()))
    }
}

/// Provider returning a canned reply or a fixed error.
pub struct FakeProvider {
    reply: Result<String, String>,
    provider_type: ProviderType,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            provider_type: ProviderType::Gemini,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            provider_type: ProviderType::Ollama,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every prompt the provider has received.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl LlmProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn provider_type(&self) -> ProviderType {
        self.provider_type
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);

        match &self.reply {
            Ok(text) => Ok(CompletionResponse {
                content: text.clone(),
                model: request.model.clone(),
                usage: Usage {
                    input_tokens: 100,
                    output_tokens: 50,
                },
            }),
            Err(message) => Err(LlmError::Provider {
                message: message.clone(),
            }),
        }
    }
}

/// A small Delaware-like profile: three records, mappings, steps and resources.
pub fn sample_profile() -> licnav_types::jurisdiction::JurisdictionProfile {
    let mut profile: licnav_types::jurisdiction::JurisdictionProfile = toml::from_str(
        r#"
code = "DE"
name = "Delaware"
nicknames = ["First State"]
helpline = "1-800-292-7935"
general_requirements = ["Delaware Business Registration (required for all businesses)"]
next_steps = ["Register your business entity", "Apply for required licenses"]
official_links = ["https://firststeps.delaware.gov/"]
steps_total_cost = "$89+"

[[contacts]]
name = "Delaware Office of the State Bank Commissioner"
url = "https://banking.delaware.gov/"

[license_categories]
financial_services = ["Delaware Money Transmitter License"]

[[keyword_mappings]]
phrase = "fintech"
licenses = ["Money Transmitter License", "Investment Adviser License"]

[[steps]]
title = "Register Your Business"
description = "File with the Division of Corporations."
cost = "$89"

[[steps]]
title = "Get Your License"
description = "Apply for every required license."

[[resources]]
category = "main"
name = "Business First Steps"
url = "https://firststeps.delaware.gov/"

[[resources]]
category = "taxes"
name = "Division of Revenue"
url = "https://revenue.delaware.gov/"
"#,
    )
    .unwrap();

    profile.records = vec![
        record("de-money", "Money Transmitter License", "money transfer and payment services", Some("Money Transmitter License")),
        record("de-credit", "Consumer Credit License", "consumer credit and payday loans", Some("Consumer Credit License")),
        record("de-tax", "Tax Registration", "sales tax and withholding tax", Some("Tax Registration")),
    ];
    profile.records[2].category = "Tax Registration".to_string();
    profile
}
