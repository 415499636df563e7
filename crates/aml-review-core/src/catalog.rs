//! Rule Catalog: static registry of every AML rule-check.
//!
//! Pure lookup table. Defined once at process start, never mutated.
//! Node ownership lives in [`crate::topology`]; a catalog entry with no
//! owning node (the purpose-quality family) is legal and simply never
//! feeds a node status.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// External reference backing a rule-check (regulator notice, standard).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Reference {
    pub label: &'static str,
    pub url: &'static str,
}

/// Static metadata for one rule-check.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleCheckMeta {
    /// Globally unique id, e.g. `TR-001`.
    pub id: &'static str,
    /// Category label shared by the owning graph node.
    pub category: &'static str,
    pub title: &'static str,
    /// Markdown rule statement.
    pub description: &'static str,
    pub jurisdictions: &'static [&'static str],
    pub references: &'static [Reference],
}

const MAS_626: Reference = Reference {
    label: "sg.ccb.com",
    url: "https://sg.ccb.com/singapore/uploadfile/ggxx/201301251359094518/626RevisedNoticeBanks.pdf",
};

const SFC_SUITABILITY: Reference = Reference {
    label: "sfc.hk",
    url: "https://www.sfc.hk/en/Rules-and-standards/Suitability-requirement",
};

const HKMA_COVER_PAYMENTS: Reference = Reference {
    label: "brdr.hkma.gov.hk",
    url: "https://brdr.hkma.gov.hk/eng/doc-ldg/docId/getPdf/20100208-2-EN/20100208-2-EN.pdf",
};

const MAS_FAIR_DEALING: Reference = Reference {
    label: "Reed Smith",
    url: "https://www.reedsmith.com/en/perspectives/2024/06/mas-updates-guidelines-on-fair-dealing",
};

/// Every rule-check known to the system.
pub static CATALOG: &[RuleCheckMeta] = &[
    // A. Wire transparency & travel rule
    RuleCheckMeta {
        id: "TR-001",
        category: "A. Wire transparency & travel rule (SWIFT / cross-border)",
        title: "Travel Rule breach – missing originator info",
        description: "*If* `channel in {SWIFT, RTGS}` **AND** cross-border **AND** `amount > S$2,000` **AND** missing any of `originator_name`, `originator_account`, originator address/ID/DOB, *then* flag **Travel Rule breach**. **(MAS 626 §9.4)**",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    RuleCheckMeta {
        id: "TR-002",
        category: "A. Wire transparency & travel rule (SWIFT / cross-border)",
        title: "Incomplete SWIFT :50/:59 originator/beneficiary data",
        description: "*If* `swift_mt=TRUE` **AND** (`swift_f50_present=FALSE` **OR** `swift_f59_present=FALSE`), *then* flag **incomplete originator/beneficiary data**.",
        jurisdictions: &["SWIFT"],
        references: &[Reference {
            label: "Swift",
            url: "https://www.swift.com/sites/default/files/documents/pmpg_structured_customer_data_mpg.pdf",
        }],
    },
    RuleCheckMeta {
        id: "TR-003",
        category: "A. Wire transparency & travel rule (SWIFT / cross-border)",
        title: "Cover payment missing end-to-end originator data",
        description: "*If* `channel=SWIFT` **AND** MT202 COV cover payment is implied **AND** missing end-to-end originator data when reaching beneficiary, *then* flag **cover-payment transparency failure**. *(HKMA cover payments; BIS)*",
        jurisdictions: &["HKMA (Hong Kong)", "BIS"],
        references: &[HKMA_COVER_PAYMENTS],
    },
    RuleCheckMeta {
        id: "TR-004",
        category: "A. Wire transparency & travel rule (SWIFT / cross-border)",
        title: "Beneficiary-bank accepted incomplete originator data",
        description: "*If* `travel_rule_complete=FALSE` **AND** transaction credited anyway, *then* flag **beneficiary-bank control gap** (HKMA AML-2 on incoming payments lacking complete originator data).",
        jurisdictions: &["HKMA (Hong Kong)"],
        references: &[Reference {
            label: "Hong Kong Monetary Authority",
            url: "https://www.hkma.gov.hk/eng/key-functions/banking/anti-money-laundering-and-counter-financing-of-terrorism/ordinances-statutory-guidelines/",
        }],
    },
    // B. CDD / KYC freshness & EDD
    RuleCheckMeta {
        id: "CDD-005",
        category: "B. CDD / KYC freshness & EDD",
        title: "KYC overdue beyond due date",
        description: "*If* `booking_datetime > kyc_due_date`, *then* flag **KYC overdue** *(MAS CDD & ongoing review; similar under AMLO/AMLA)*.",
        jurisdictions: &["MAS (Singapore)", "AMLO (Hong Kong)", "AMLA (Malaysia)"],
        references: &[MAS_626],
    },
    RuleCheckMeta {
        id: "CDD-006",
        category: "B. CDD / KYC freshness & EDD",
        title: "PEP without required EDD",
        description: "*If* `customer_is_pep=TRUE` **AND** (`edd_required=FALSE` **OR** `edd_performed=FALSE`), *then* flag **PEP EDD deficiency**.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    RuleCheckMeta {
        id: "CDD-007",
        category: "B. CDD / KYC freshness & EDD",
        title: "High-risk customer overdue periodic review",
        description: "*If* `customer_risk_rating=High` **AND** `kyc_last_completed` older than the high-risk review cycle, *then* flag **overdue periodic review**.",
        jurisdictions: &["FINMA (Switzerland)"],
        references: &[Reference {
            label: "finma.ch",
            url: "https://www.finma.ch/en/documentation/finma-guidance/",
        }],
    },
    RuleCheckMeta {
        id: "CDD-008",
        category: "B. CDD / KYC freshness & EDD",
        title: "Missing SOW for PEP or high-risk entity",
        description: "*If* `sow_documented=FALSE` **AND** `customer_is_pep=TRUE` or `customer_type in {domiciliary_company, trust}`, *then* flag **SOW gap** *(EDD)*.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    // C. STR / Suspicion handling
    RuleCheckMeta {
        id: "STR-009",
        category: "C. STR / Suspicion handling",
        title: "Late STR filing beyond SLA",
        description: "*If* `suspicion_determined_datetime` exists **AND** `str_filed_datetime - suspicion_determined_datetime` exceeds the internal SLA (24–48h), *then* flag **late STR**.",
        jurisdictions: &["Singapore (STRO)", "Hong Kong (JFIU)", "Switzerland (MROS)"],
        references: &[Reference {
            label: "Singapore Police Force",
            url: "https://www.police.gov.sg/Advisories/Commercial-Crimes/Suspicious-Transaction-Reporting-Office",
        }],
    },
    RuleCheckMeta {
        id: "STR-010",
        category: "C. STR / Suspicion handling",
        title: "Sanctions potential hit executed without clearance",
        description: "*If* `sanctions_screening=\"potential\"` **AND** the transaction executed without clearing false positives, *then* flag **breach of sanctions controls**.",
        jurisdictions: &["FINMA/SECO (Switzerland)", "HKMA (Hong Kong)"],
        references: &[Reference {
            label: "finma.ch",
            url: "https://www.finma.ch/en/documentation/international-sanctions-and-combating-terrorism/",
        }],
    },
    // D. Sanctions & geography
    RuleCheckMeta {
        id: "SAN-011",
        category: "D. Sanctions & geography",
        title: "Counterparty in sanctioned country/list",
        description: "*If* `originator_country` **or** `beneficiary_country` is under Swiss/EU/UN sanctions **OR** counterparties match SECO lists, *then* **block/alert**.",
        jurisdictions: &["SECO (Switzerland)", "UN", "EU"],
        references: &[Reference {
            label: "seco.admin.ch",
            url: "https://www.seco.admin.ch/seco/en/home/Aussenwirtschaftspolitik_Wirtschaftliche_Zusammenarbeit/Wirtschaftsbeziehungen/exportkontrollen-und-sanktionen/sanktionen-embargos.html",
        }],
    },
    RuleCheckMeta {
        id: "SAN-012",
        category: "D. Sanctions & geography",
        title: "High-risk corridor with vague purpose",
        description: "*If* high-risk corridor **AND** `swift_f70_purpose` vague/empty, *then* **heightened alert** for potential sanctions evasion.",
        jurisdictions: &["HKMA (Hong Kong)", "MAS (Singapore)"],
        references: &[Reference {
            label: "Hong Kong Monetary Authority",
            url: "https://www.hkma.gov.hk/eng/regulatory-resources/regulatory-guides/by-subject-current/anti-money-laundering-and-counter-financing-of-terrorism/",
        }],
    },
    // E. Cash structuring & identification
    RuleCheckMeta {
        id: "CASH-013",
        category: "E. Cash structuring & identification",
        title: "Missing ID verification for cash transaction",
        description: "*If* `product_type in {cash_deposit, cash_withdrawal}` **AND** `cash_id_verified=FALSE`, *then* flag **ID verification failure**.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    RuleCheckMeta {
        id: "CASH-014",
        category: "E. Cash structuring & identification",
        title: "Structuring pattern below reporting thresholds",
        description: "*If* `daily_cash_total_customer` exceeds the internal threshold **OR** `daily_cash_txn_count` spikes just below reporting thresholds, *then* flag **structuring** *(626 §4.29–4.30 aggregation)*.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    // F. Purpose & narrative quality (catalog-only, no owning node)
    RuleCheckMeta {
        id: "PUR-015",
        category: "F. Purpose & narrative quality",
        title: "Generic or missing purpose in high-risk corridor",
        description: "*If* `swift_f70_purpose` is missing or generic in high-risk corridors or unusual amounts, *then* flag **insufficient purpose info** for EDD/STR consideration.",
        jurisdictions: &["MAS (Singapore)", "HKMA (Hong Kong)"],
        references: &[MAS_626],
    },
    RuleCheckMeta {
        id: "PUR-016",
        category: "F. Purpose & narrative quality",
        title: "Purpose code conflicts with narrative",
        description: "*If* `purpose_code` conflicts with the narrative (e.g. `EDU` but the narrative mentions copper cathodes), *then* flag **purpose inconsistency**.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    // G. FX reasonableness & fair dealing
    RuleCheckMeta {
        id: "FX-017",
        category: "G. FX reasonableness & fair dealing",
        title: "FX spread outlier for fairness review",
        description: "*If* `fx_indicator=TRUE` **AND** `abs(fx_spread_bps)` > policy threshold (150 bps for major pairs), *then* flag **spread outlier** *(MAS Fair Dealing)*.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_FAIR_DEALING],
    },
    RuleCheckMeta {
        id: "FX-018",
        category: "G. FX reasonableness & fair dealing",
        title: "Advised FX trade without suitability",
        description: "*If* `is_advised=TRUE` **AND** complex/leveraged FX but no `suitability_assessed`, *then* flag **advised FX w/o suitability** *(SFC 5.2; FINMA conduct)*.",
        jurisdictions: &["SFC (Hong Kong)", "FINMA (Switzerland)"],
        references: &[SFC_SUITABILITY],
    },
    // H. Suitability / appropriateness
    RuleCheckMeta {
        id: "SUIT-019",
        category: "H. Suitability / appropriateness (advised or complex products)",
        title: "Missing suitability for advised trade",
        description: "*If* `is_advised=TRUE` **AND** `suitability_assessed=FALSE`, *then* flag **missing suitability** *(SFC 5.2; FINMA circular)*.",
        jurisdictions: &["SFC (Hong Kong)", "FINMA (Switzerland)"],
        references: &[SFC_SUITABILITY],
    },
    RuleCheckMeta {
        id: "SUIT-020",
        category: "H. Suitability / appropriateness (advised or complex products)",
        title: "Override after mismatch without justification",
        description: "*If* `suitability_assessed=TRUE` **AND** `suitability_result=\"mismatch\"` **AND** the transaction proceeds, *then* flag **override w/o justification**.",
        jurisdictions: &["SFC (Hong Kong)"],
        references: &[SFC_SUITABILITY],
    },
    RuleCheckMeta {
        id: "SUIT-021",
        category: "H. Suitability / appropriateness (advised or complex products)",
        title: "Complex product sold to low-risk client",
        description: "*If* `product_complex=TRUE` **AND** `client_risk_profile=Low`, *then* flag **complex product to low-risk client** unless a risk acknowledgement is documented.",
        jurisdictions: &["SFC (Hong Kong)", "FinSA (Switzerland)"],
        references: &[SFC_SUITABILITY],
    },
    RuleCheckMeta {
        id: "SUIT-022",
        category: "H. Suitability / appropriateness (advised or complex products)",
        title: "VA exposure missing risk disclosure",
        description: "*If* `product_has_va_exposure=TRUE` **AND** `va_disclosure_provided=FALSE`, *then* flag **VA risk disclosure gap** *(MAS PSN08; SFC VASP)*.",
        jurisdictions: &["MAS (Singapore)", "SFC (Hong Kong)"],
        references: &[Reference {
            label: "Monetary Authority of Singapore",
            url: "https://www.mas.gov.sg/regulation/notices/psn08",
        }],
    },
    RuleCheckMeta {
        id: "SUIT-023",
        category: "H. Suitability / appropriateness (advised or complex products)",
        title: "Suggest PBA process for de facto portfolio advice",
        description: "*If* `is_advised=TRUE` **AND** not portfolio-based but many trades clearly pursue a portfolio outcome, suggest a **PBA** process per HKMA circular.",
        jurisdictions: &["HKMA (Hong Kong)"],
        references: &[HKMA_COVER_PAYMENTS],
    },
    // I. Virtual assets
    RuleCheckMeta {
        id: "VA-024",
        category: "I. Virtual assets (VA / DPT)",
        title: "VASP unlicensed/unauthorised",
        description: "*If* `product_has_va_exposure=TRUE` **AND** the counterparty is a VASP without proper licensing/registration, *then* **block/alert**.",
        jurisdictions: &["SFC (Hong Kong)", "MAS (Singapore)"],
        references: &[Reference {
            label: "sfc.hk",
            url: "https://www.sfc.hk/en/Rules-and-standards/Suitability-requirement",
        }],
    },
    RuleCheckMeta {
        id: "VA-025",
        category: "I. Virtual assets (VA / DPT)",
        title: "VA travel-rule breach for VA wire-like transfer",
        description: "*If* a VA transfer mimics a wire transfer **AND** originator/beneficiary info (name, wallet, address/ID) is missing, *then* flag **VA travel-rule breach** *(FINMA 02/2019; FATF; MAS PSN02)*.",
        jurisdictions: &["FINMA (Switzerland)", "FATF", "MAS (Singapore)"],
        references: &[Reference {
            label: "finma.ch",
            url: "https://www.finma.ch/en/documentation/finma-guidance/",
        }],
    },
    // J. Channel & field consistency
    RuleCheckMeta {
        id: "CON-026",
        category: "J. Channel & field consistency",
        title: "Incomplete SWIFT payment chain",
        description: "*If* `channel=SWIFT` **AND** `ordering_institution_bic` or `beneficiary_institution_bic` missing, *then* flag **incomplete payment chain**.",
        jurisdictions: &["HKMA (Hong Kong)"],
        references: &[HKMA_COVER_PAYMENTS],
    },
    RuleCheckMeta {
        id: "CON-027",
        category: "J. Channel & field consistency",
        title: "RTGS timing anomaly",
        description: "*If* `channel=RTGS` **AND** `value_date` far from `booking_datetime` (more than one business day), *then* flag **timing anomaly**.",
        jurisdictions: &[],
        references: &[],
    },
    RuleCheckMeta {
        id: "CON-028",
        category: "J. Channel & field consistency",
        title: "FAST/FPS used cross-border",
        description: "*If* `channel in {FAST, FPS}` **AND** cross-border countries detected, *then* flag **rail/jurisdiction inconsistency** (fast schemes are domestic).",
        jurisdictions: &["SG (FAST)", "HK (FPS)"],
        references: &[],
    },
    // K. Counterparty & correspondent banking
    RuleCheckMeta {
        id: "COR-029",
        category: "K. Counterparty & correspondent banking",
        title: "Shell bank / unsupervised correspondent",
        description: "*If* respondent/correspondent indicators suggest a **shell bank** or one not effectively supervised, *then* **block/alert** and escalate *(MAS 626 §8)*.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    RuleCheckMeta {
        id: "COR-030",
        category: "K. Counterparty & correspondent banking",
        title: "Payable-through w/o respondent assurance",
        description: "*If* payable-through account use is detected **AND** no assurance of respondent CDD/monitoring, *then* flag per **MAS 626 §8.4**.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    // L. Record-keeping & reconstruction
    RuleCheckMeta {
        id: "REC-031",
        category: "L. Record-keeping & reconstruction",
        title: "Record sufficiency breach",
        description: "*If* key reconstruction fields are missing (`value_date`, amount/currency, beneficiary details), *then* flag **record sufficiency breach** *(MAS 626 §9.3–§10)*.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    RuleCheckMeta {
        id: "REC-032",
        category: "L. Record-keeping & reconstruction",
        title: "Retention gap for STR-related transactions",
        description: "*If* STR-related transactions lack the extended retention flag (≥ 5 years or as required), *then* flag **retention gap** *(MAS 626 §10.4)*.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_626],
    },
    // M. Pricing & conflicts
    RuleCheckMeta {
        id: "PRC-033",
        category: "M. Pricing & conflicts",
        title: "Affiliate pricing worse than market",
        description: "*If* the FX counterparty is an affiliate **AND** pricing is consistently worse than market by > X bps vs peers, *then* flag for **conflict/fair dealing** review.",
        jurisdictions: &["MAS (Singapore)"],
        references: &[MAS_FAIR_DEALING],
    },
    RuleCheckMeta {
        id: "PRC-034",
        category: "M. Pricing & conflicts",
        title: "\u{201c}OUR\u{201d} charge pattern – heightened alert",
        description: "*If* `swift_f71_charges=\"OUR\"` **AND** the corridor is commonly used for sanctions-evasion typologies, *then* **heightened alert** (fees paid by sender to conceal deductions).",
        jurisdictions: &["BCBS/BIS (typologies)"],
        references: &[Reference {
            label: "bis.org",
            url: "https://www.bis.org/publ/bcbs154.htm",
        }],
    },
    // N. Behavioral / patterning
    RuleCheckMeta {
        id: "PAT-035",
        category: "N. Behavioral / patterning",
        title: "Layering via rapid in/out & redemption",
        description: "Rapid sequence of **fund_subscription → redemption → external wire** with minimal holding period → flag **layering typology** *(MROS typologies)*.",
        jurisdictions: &["Switzerland (MROS)", "National AML strategies"],
        references: &[Reference {
            label: "fedpol.admin.ch",
            url: "https://www.fedpol.admin.ch/fedpol/en/home/kriminalitaet/geldwaescherei/publikationen.html",
        }],
    },
    RuleCheckMeta {
        id: "PAT-036",
        category: "N. Behavioral / patterning",
        title: "Round-tripping via FX",
        description: "**Round-tripping**: incoming wires from Country A → FX → outgoing to the same party in Country A with a small residual → flag.",
        jurisdictions: &[],
        references: &[],
    },
    RuleCheckMeta {
        id: "PAT-037",
        category: "N. Behavioral / patterning",
        title: "Dormant customer sudden high-value SWIFT wires",
        description: "**Dormant** customer with sudden high-value SWIFT wires with vague purpose → flag.",
        jurisdictions: &[],
        references: &[],
    },
    // O. Data quality
    RuleCheckMeta {
        id: "DQ-038",
        category: "O. Data quality",
        title: "Invalid account number format (IBAN/BIC)",
        description: "*If* account numbers are not IBAN/BIC-valid where expected, *then* flag **format anomaly**.",
        jurisdictions: &[],
        references: &[],
    },
    RuleCheckMeta {
        id: "DQ-039",
        category: "O. Data quality",
        title: "Beneficiary type mismatch",
        description: "*If* `beneficiary_name` appears as a **company** but `beneficiary_account` is a **retail individual** (or vice versa), *then* flag **mismatch**.",
        jurisdictions: &[],
        references: &[],
    },
    RuleCheckMeta {
        id: "DQ-040",
        category: "O. Data quality",
        title: "Originator equals beneficiary with conflicting purpose",
        description: "*If* `originator_name == beneficiary_name` **AND** cross-border **AND** the purpose describes a third-party payment, *then* flag **name inconsistency**.",
        jurisdictions: &[],
        references: &[],
    },
];

static INDEX: LazyLock<BTreeMap<&'static str, &'static RuleCheckMeta>> =
    LazyLock::new(|| CATALOG.iter().map(|m| (m.id, m)).collect());

/// Look up a rule-check by id.
pub fn rule(id: &str) -> Option<&'static RuleCheckMeta> {
    INDEX.get(id).copied()
}
