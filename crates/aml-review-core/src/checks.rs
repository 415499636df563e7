//! Deterministic rule evaluators.
//!
//! These produce the per-category sections the flattener consumes:
//! `{ tests: {id: bool}, overall_status }`. The `data` payload is
//! free-form by contract, so evaluation duck-types over it instead of
//! forcing a schema; a missing or mistyped field reads as its zero
//! value, exactly like the producing side always treated it.
//!
//! Pricing/conflicts and behavioral/patterning have no deterministic
//! rules; their results arrive through `non_deterministic_tests`.

use crate::flatten::{truthy, DeterministicSection};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::BTreeMap;

/// Section-level verdict written by the producing side. Distinct from a
/// node's overall status: the aggregator never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionStatus {
    Pass,
    NeedsAdvice,
    Fail,
}

impl SectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionStatus::Pass => "pass",
            SectionStatus::NeedsAdvice => "needs_advice",
            SectionStatus::Fail => "fail",
        }
    }
}

/// All tests pass → pass; some pass → needs_advice; none pass → fail.
pub fn section_status(tests: &BTreeMap<String, bool>) -> SectionStatus {
    if tests.values().all(|v| *v) {
        SectionStatus::Pass
    } else if tests.values().any(|v| *v) {
        SectionStatus::NeedsAdvice
    } else {
        SectionStatus::Fail
    }
}

/// Duck-typed accessor over the free-form `data` payload.
#[derive(Debug, Clone, Copy)]
pub struct Data<'a> {
    raw: &'a Value,
}

impl<'a> Data<'a> {
    pub fn new(raw: &'a Value) -> Self {
        Self { raw }
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        self.raw.get(key)
    }

    /// String value, or `""` when absent or not a string.
    fn s(&self, key: &str) -> &'a str {
        self.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Truthiness of the field; absent is falsy.
    fn t(&self, key: &str) -> bool {
        self.get(key).is_some_and(truthy)
    }

    /// Truthiness with a default for an absent field.
    fn t_or(&self, key: &str, default: bool) -> bool {
        self.get(key).map_or(default, truthy)
    }

    /// Exactly JSON `false` (distinct from merely falsy).
    fn is_false(&self, key: &str) -> bool {
        self.get(key) == Some(&Value::Bool(false))
    }

    /// Numeric value, accepting numbers and numeric strings; 0 otherwise.
    fn f(&self, key: &str) -> f64 {
        match self.get(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Integer value, accepting numbers and integer strings; 0 otherwise.
    fn i(&self, key: &str) -> i64 {
        match self.get(key) {
            Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// `YYYY-MM-DDTHH:MM:SS` or bare `YYYY-MM-DD`.
    fn iso_datetime(&self, key: &str) -> Option<NaiveDateTime> {
        let s = self.s(key).trim();
        if s.is_empty() {
            return None;
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
            .ok()
            .or_else(|| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(|d| d.into()))
    }

    /// `DD/MM/YYYY`, the due-date format used by the KYC feed.
    fn dmy_date(&self, key: &str) -> Option<NaiveDate> {
        let s = self.s(key).trim();
        if s.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
    }
}

// A. Wire transparency & travel rule

fn tr_001(d: Data) -> bool {
    !(matches!(d.s("channel"), "SWIFT" | "RTGS")
        && d.s("originator_country") != d.s("beneficiary_country")
        && d.f("amount") > 2000.0
        && (!d.t("originator_name") || !d.t("originator_account")))
}

fn tr_002(d: Data) -> bool {
    !(d.t("swift_mt") && (!d.t("swift_f50_present") || !d.t("swift_f59_present")))
}

fn tr_003(d: Data) -> bool {
    !(d.s("channel") == "SWIFT" && d.t("ordering_institution_bic") && !d.t("originator_name"))
}

fn tr_004(d: Data) -> bool {
    !(d.is_false("travel_rule_complete") && d.t_or("transaction_executed", true))
}

// B. CDD / KYC freshness & EDD

fn cdd_005(d: Data) -> bool {
    let (Some(booking), Some(due)) = (d.iso_datetime("booking_datetime"), d.dmy_date("kyc_due_date"))
    else {
        return false;
    };
    booking <= due.into()
}

fn cdd_006(d: Data) -> bool {
    !(d.t("customer_is_pep") && (!d.t("edd_required") || !d.t("edd_performed")))
}

fn cdd_007(d: Data) -> bool {
    if d.s("customer_risk_rating") != "High" {
        return true;
    }
    let (Some(last), Some(due)) = (d.dmy_date("kyc_last_completed"), d.dmy_date("kyc_due_date"))
    else {
        return false;
    };
    last <= due
}

fn cdd_008(d: Data) -> bool {
    !(!d.t("sow_documented")
        && (d.t("customer_is_pep")
            || matches!(d.s("customer_type"), "domiciliary_company" | "trust")))
}

// C. STR / Suspicion handling

fn str_009(d: Data) -> bool {
    let determined = d.s("suspicion_determined_datetime").trim();
    let filed = d.s("str_filed_datetime").trim();
    if determined.is_empty() || filed.is_empty() {
        return true;
    }
    let parse = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S");
    match (parse(determined), parse(filed)) {
        // 48h filing SLA
        (Ok(determined), Ok(filed)) => (filed - determined).num_seconds() <= 172_800,
        _ => false,
    }
}

fn str_010(d: Data) -> bool {
    !(d.s("sanctions_screening") == "potential" && d.t_or("transaction_executed", true))
}

// D. Sanctions & geography

fn san_011(d: Data) -> bool {
    !(matches!(d.s("originator_country"), "IR" | "KP")
        || matches!(d.s("beneficiary_country"), "IR" | "KP"))
}

fn san_012(d: Data) -> bool {
    !(d.t("high_risk_corridor") && !d.t("swift_f70_purpose"))
}

// E. Cash structuring & identification

fn cash_013(d: Data) -> bool {
    !(matches!(d.s("product_type"), "cash_deposit" | "cash_withdrawal")
        && !d.t("cash_id_verified"))
}

fn cash_014(d: Data) -> bool {
    !(d.f("daily_cash_total_customer") > 20_000.0 || d.i("daily_cash_txn_count") >= 5)
}

// F. Purpose & narrative quality

fn pur_016(d: Data) -> bool {
    !(d.s("purpose_code").contains("EDU") && d.s("narrative").to_lowercase().contains("copper"))
}

// G. FX reasonableness & fair dealing

fn fx_017(d: Data) -> bool {
    !(d.t("fx_indicator") && d.i("fx_spread_bps").abs() > 150)
}

fn fx_018(d: Data) -> bool {
    !(d.t("is_advised") && d.t("product_complex") && !d.t("suitability_assessed"))
}

// H. Suitability / appropriateness

fn suit_019(d: Data) -> bool {
    !(d.t("is_advised") && !d.t("suitability_assessed"))
}

// The producing worker reads this flag through a concatenation typo
// ("suitability_assessedsuitability-checks"), so its SUIT-020 can never
// fire on a well-formed payload. We read the intended field; verdicts
// diverge from the worker's on assessed mismatches.
fn suit_020(d: Data) -> bool {
    !(d.t("suitability_assessed")
        && d.s("suitability_result") == "mismatch"
        && d.t_or("transaction_proceeds", true))
}

fn suit_021(d: Data) -> bool {
    !(d.t("product_complex")
        && d.s("client_risk_profile") == "Low"
        && !d.t_or("risk_acknowledgement", false))
}

fn suit_022(d: Data) -> bool {
    !(d.t("product_has_va_exposure") && !d.t("va_disclosure_provided"))
}

// I. Virtual assets

fn va_024(d: Data) -> bool {
    !(d.t("product_has_va_exposure") && d.s("counterparty").to_lowercase() == "unlicensed_vasp")
}

fn va_025(d: Data) -> bool {
    !(d.t("product_has_va_exposure")
        && ["originator_name", "beneficiary_name", "beneficiary_account"]
            .iter()
            .any(|f| !d.t(f)))
}

// J. Channel & field consistency

fn con_026(d: Data) -> bool {
    !(d.s("channel") == "SWIFT"
        && (!d.t("ordering_institution_bic") || !d.t("beneficiary_institution_bic")))
}

fn con_027(d: Data) -> bool {
    if d.s("channel") != "RTGS" {
        return true;
    }
    let (Some(value_date), Some(booking)) =
        (d.dmy_date("value_date"), d.iso_datetime("booking_datetime"))
    else {
        return false;
    };
    value_date <= booking.date()
}

fn con_028(d: Data) -> bool {
    !(matches!(d.s("channel"), "FAST" | "FPS")
        && d.s("originator_country") != d.s("beneficiary_country"))
}

// K. Counterparty & correspondent banking

fn cor_029(d: Data) -> bool {
    !d.t_or("respondent_shell_bank", false)
}

fn cor_030(d: Data) -> bool {
    !(d.t("payable_through") && !d.t("respondent_cdd_done"))
}

// L. Record-keeping & reconstruction

fn rec_031(d: Data) -> bool {
    ["value_date", "amount", "beneficiary_name"].iter().all(|f| d.t(f))
}

fn rec_032(d: Data) -> bool {
    !(d.t("is_str_related") && d.i("retention_years") < 5)
}

// O. Data quality

fn dq_038(d: Data) -> bool {
    let acct = d.s("beneficiary_account").trim();
    !acct.is_empty()
        && acct.chars().all(|c| c.is_ascii_alphanumeric())
        && (15..=34).contains(&acct.len())
}

fn dq_039(d: Data) -> bool {
    let name = d.s("beneficiary_name").to_lowercase();
    let name = name.trim();
    let acct = d.s("beneficiary_account").to_lowercase();
    let acct = acct.trim();
    if name.is_empty() || acct.is_empty() {
        return false;
    }

    let is_company = [" ltd", " inc", " co", " pty", " llc"].iter().any(|k| name.contains(k));
    let is_personal = name.chars().filter(|c| *c != ' ').all(|c| c.is_alphabetic())
        && !name.replace(' ', "").is_empty()
        && !is_company;

    let acct_personal_like = acct.starts_with("retail") || acct.starts_with("pers");
    let acct_business_like = acct.starts_with("biz") || acct.starts_with("corp");

    !((is_company && acct_personal_like) || (is_personal && acct_business_like))
}

fn dq_040(d: Data) -> bool {
    let originator = d.s("originator_name").trim();
    let beneficiary = d.s("beneficiary_name").trim();
    let orig_country = d.s("originator_country").trim();
    let bene_country = d.s("beneficiary_country").trim();
    let narrative = d.s("narrative").to_lowercase();

    let same_name = !originator.is_empty() && originator == beneficiary;
    let cross_border =
        !orig_country.is_empty() && !bene_country.is_empty() && orig_country != bene_country;
    let third_party = ["third", "on behalf", "obo"].iter().any(|k| narrative.contains(k));

    !(same_name && cross_border && third_party)
}

type Check = (&'static str, fn(Data) -> bool);

static SECTIONS: &[(&str, &[Check])] = &[
    ("wire", &[("TR-001", tr_001), ("TR-002", tr_002), ("TR-003", tr_003), ("TR-004", tr_004)]),
    ("cdd", &[("CDD-005", cdd_005), ("CDD-006", cdd_006), ("CDD-007", cdd_007), ("CDD-008", cdd_008)]),
    ("str", &[("STR-009", str_009), ("STR-010", str_010)]),
    ("sanctions", &[("SAN-011", san_011), ("SAN-012", san_012)]),
    ("cash", &[("CASH-013", cash_013), ("CASH-014", cash_014)]),
    ("purpose", &[("PUR-016", pur_016)]),
    ("fx", &[("FX-017", fx_017), ("FX-018", fx_018)]),
    ("suitability", &[("SUIT-019", suit_019), ("SUIT-020", suit_020), ("SUIT-021", suit_021), ("SUIT-022", suit_022)]),
    ("virtual", &[("VA-024", va_024), ("VA-025", va_025)]),
    ("channel", &[("CON-026", con_026), ("CON-027", con_027), ("CON-028", con_028)]),
    ("counterparty", &[("COR-029", cor_029), ("COR-030", cor_030)]),
    ("record", &[("REC-031", rec_031), ("REC-032", rec_032)]),
    ("dataquality", &[("DQ-038", dq_038), ("DQ-039", dq_039), ("DQ-040", dq_040)]),
];

/// Evaluate every deterministic section against a transaction's `data`
/// payload.
pub fn evaluate_sections(data: &Value) -> BTreeMap<String, DeterministicSection> {
    let d = Data::new(data);
    SECTIONS
        .iter()
        .map(|(name, checks)| {
            let tests: BTreeMap<String, bool> =
                checks.iter().map(|(id, f)| (id.to_string(), f(d))).collect();
            let overall_status = Some(section_status(&tests).as_str().to_string());
            (name.to_string(), DeterministicSection { tests, overall_status })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn travel_rule_fires_only_for_incomplete_cross_border_wires() {
        let breach = json!({
            "channel": "SWIFT",
            "originator_country": "SG",
            "beneficiary_country": "HK",
            "amount": "2500",
            "originator_name": "",
            "originator_account": "ACC-1",
        });
        assert!(!tr_001(Data::new(&breach)));

        let domestic = json!({
            "channel": "SWIFT",
            "originator_country": "SG",
            "beneficiary_country": "SG",
            "amount": "2500",
            "originator_name": "",
        });
        assert!(tr_001(Data::new(&domestic)));

        let below_threshold = json!({
            "channel": "RTGS",
            "originator_country": "SG",
            "beneficiary_country": "HK",
            "amount": 1500,
            "originator_name": "",
        });
        assert!(tr_001(Data::new(&below_threshold)));
    }

    #[test]
    fn travel_rule_completeness_needs_exact_false() {
        assert!(!tr_004(Data::new(&json!({"travel_rule_complete": false}))));
        // Absent or merely falsy is not a recorded breach.
        assert!(tr_004(Data::new(&json!({}))));
        assert!(tr_004(Data::new(&json!({"travel_rule_complete": ""}))));
    }

    #[test]
    fn kyc_overdue_compares_booking_against_due_date() {
        let fresh = json!({"booking_datetime": "2024-03-01T09:30:00", "kyc_due_date": "15/03/2024"});
        assert!(cdd_005(Data::new(&fresh)));

        let overdue = json!({"booking_datetime": "2024-03-20T09:30:00", "kyc_due_date": "15/03/2024"});
        assert!(!cdd_005(Data::new(&overdue)));

        // Unparseable dates cannot prove freshness.
        assert!(!cdd_005(Data::new(&json!({"booking_datetime": "soon"}))));
    }

    #[test]
    fn str_sla_allows_48_hours() {
        let on_time = json!({
            "suspicion_determined_datetime": "2024-01-01T00:00:00",
            "str_filed_datetime": "2024-01-02T23:00:00",
        });
        assert!(str_009(Data::new(&on_time)));

        let late = json!({
            "suspicion_determined_datetime": "2024-01-01T00:00:00",
            "str_filed_datetime": "2024-01-04T00:00:01",
        });
        assert!(!str_009(Data::new(&late)));

        // No suspicion recorded, nothing to file late.
        assert!(str_009(Data::new(&json!({}))));
    }

    #[test]
    fn suitability_mismatch_blocks_execution() {
        let mismatch = json!({
            "suitability_assessed": true,
            "suitability_result": "mismatch",
            "transaction_proceeds": true,
        });
        assert!(!suit_020(Data::new(&mismatch)));

        // The flag must come from the assessed field itself, not from
        // the result alone.
        let unassessed = json!({"suitability_result": "mismatch", "transaction_proceeds": true});
        assert!(suit_020(Data::new(&unassessed)));

        let halted = json!({
            "suitability_assessed": true,
            "suitability_result": "mismatch",
            "transaction_proceeds": false,
        });
        assert!(suit_020(Data::new(&halted)));
    }

    #[test]
    fn structuring_threshold_counts_and_totals() {
        assert!(!cash_014(Data::new(&json!({"daily_cash_total_customer": "25000"}))));
        assert!(!cash_014(Data::new(&json!({"daily_cash_txn_count": 5}))));
        assert!(cash_014(Data::new(&json!({"daily_cash_total_customer": 1000, "daily_cash_txn_count": 2}))));
    }

    #[test]
    fn beneficiary_type_mismatch() {
        let mismatch = json!({"beneficiary_name": "Acme Ltd", "beneficiary_account": "RETAIL-99887766554433"});
        assert!(!dq_039(Data::new(&mismatch)));

        let consistent = json!({"beneficiary_name": "Acme Ltd", "beneficiary_account": "CORP99887766554433"});
        assert!(dq_039(Data::new(&consistent)));

        assert!(!dq_039(Data::new(&json!({"beneficiary_name": "", "beneficiary_account": "x"}))));
    }

    #[test]
    fn section_status_thresholds() {
        let all = BTreeMap::from([("A".to_string(), true), ("B".to_string(), true)]);
        assert_eq!(section_status(&all), SectionStatus::Pass);

        let mixed = BTreeMap::from([("A".to_string(), true), ("B".to_string(), false)]);
        assert_eq!(section_status(&mixed), SectionStatus::NeedsAdvice);

        let none = BTreeMap::from([("A".to_string(), false)]);
        assert_eq!(section_status(&none), SectionStatus::Fail);
    }

    #[test]
    fn evaluated_sections_cover_every_deterministic_family() {
        let sections = evaluate_sections(&json!({}));
        for name in ["wire", "cdd", "str", "sanctions", "cash", "fx", "suitability",
                     "virtual", "channel", "counterparty", "record", "dataquality"] {
            assert!(sections.contains_key(name), "missing section {name}");
        }
        // Empty payload: REC-031 cannot reconstruct the transaction and
        // fails, REC-032 has no STR linkage and passes, so the section
        // verdict is mixed.
        assert_eq!(sections["record"].overall_status.as_deref(), Some("needs_advice"));
        assert!(!sections["record"].tests["REC-031"]);
        assert!(sections["record"].tests["REC-032"]);
    }
}
