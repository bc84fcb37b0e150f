//! Per-vertical keyword tables matched on word boundaries.

use async_trait::async_trait;
use ragline_core::errors::RagResult;
use ragline_core::models::Industry;
use ragline_core::traits::DomainClassifier;
use regex::Regex;

/// Keyword tables in priority order. Ties go to the earlier vertical.
const KEYWORD_TABLES: &[(&str, &[&str])] = &[
    (
        "ELEVATORS",
        &[
            "ascensor", "elevador", "lift", "hoistway", "maniobra", "botonera", "cabin",
            "shaft", "arca ii", "elevator", "escalator", "mantenimiento",
        ],
    ),
    (
        "LEGAL",
        &[
            "contract", "contrato", "clause", "jurisdiction", "liability", "indemnity",
            "agreement", "legal", "tribunal", "ley", "law", "lawsuit",
        ],
    ),
    (
        "BANKING",
        &[
            "balance", "asset", "liability", "ledger", "loan", "mortgage", "interest rate",
            "compliance", "swift", "iban", "banca", "bank", "credit",
        ],
    ),
    (
        "INSURANCE",
        &[
            "policy", "premium", "coverage", "claim", "underwriting", "deductible",
            "beneficiary", "póliza", "siniestro", "cobertura", "insurance", "seguro",
        ],
    ),
    (
        "REAL_ESTATE",
        &[
            "property", "real estate", "inmobiliaria", "piso", "casa", "local", "alquiler",
            "venta", "hipoteca", "nota simple", "catastro",
        ],
    ),
    (
        "IT",
        &[
            "code", "api", "server", "database", "frontend", "backend", "vulnerability",
            "deployment", "cloud", "software", "git", "bug",
        ],
    ),
    (
        "MEDICAL",
        &[
            "paciente", "historial", "diagnóstico", "receta", "tratamiento", "clínica",
            "hospital", "médico", "síntoma", "infection", "bacterial", "patient", "doctor",
            "treatment", "medical",
        ],
    ),
];

struct Vertical {
    industry: Industry,
    patterns: Vec<Regex>,
}

/// Scores each vertical by how many keyword occurrences a text contains.
pub struct KeywordDomainClassifier {
    verticals: Vec<Vertical>,
}

impl KeywordDomainClassifier {
    /// The built-in keyword tables.
    pub fn new() -> Self {
        Self::with_tables(KEYWORD_TABLES)
    }

    /// Custom tables, in priority order. Keywords are matched case-insensitively
    /// as whole words.
    pub fn with_tables(tables: &[(&str, &[&str])]) -> Self {
        let verticals = tables
            .iter()
            .map(|(label, keywords)| Vertical {
                industry: Industry::new(label),
                patterns: keywords
                    .iter()
                    .filter_map(|kw| {
                        Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw))).ok()
                    })
                    .collect(),
            })
            .collect();
        Self { verticals }
    }

    /// Keyword occurrences per vertical, in table order.
    pub fn scores(&self, text: &str) -> Vec<(Industry, usize)> {
        self.verticals
            .iter()
            .map(|v| {
                let count = v.patterns.iter().map(|p| p.find_iter(text).count()).sum();
                (v.industry.clone(), count)
            })
            .collect()
    }

    /// The best-scoring vertical, if any keyword matched.
    pub fn detect(&self, text: &str) -> Option<Industry> {
        let mut best: Option<(Industry, usize)> = None;
        for (industry, count) in self.scores(text) {
            if count > best.as_ref().map_or(0, |(_, c)| *c) {
                best = Some((industry, count));
            }
        }
        best.map(|(industry, _)| industry)
    }
}

impl Default for KeywordDomainClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DomainClassifier for KeywordDomainClassifier {
    async fn classify(&self, query: &str, _tenant: &str, _correlation: &str) -> RagResult<Industry> {
        Ok(self.detect(query).unwrap_or_else(Industry::generic))
    }
}
