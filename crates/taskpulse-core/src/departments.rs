use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Projects & Sales")]
    ProjectsSales,
    #[serde(rename = "Finance & Accounts")]
    FinanceAccounts,
    #[serde(rename = "HR & Payroll")]
    HrPayroll,
    #[serde(rename = "Procurement & Stores")]
    ProcurementStores,
    #[serde(rename = "Operations & Logistics")]
    OperationsLogistics,
    #[serde(rename = "IT & Admin")]
    ItAdmin,
    #[serde(rename = "General")]
    General,
}

impl Department {
    /// Keyword-bearing departments in table order.
    pub const DECLARED: [Department; 6] = [
        Department::ProjectsSales,
        Department::FinanceAccounts,
        Department::HrPayroll,
        Department::ProcurementStores,
        Department::OperationsLogistics,
        Department::ItAdmin,
    ];

    pub const CATCH_ALL: Department = Department::General;

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::ProjectsSales => "Projects & Sales",
            Department::FinanceAccounts => "Finance & Accounts",
            Department::HrPayroll => "HR & Payroll",
            Department::ProcurementStores => "Procurement & Stores",
            Department::OperationsLogistics => "Operations & Logistics",
            Department::ItAdmin => "IT & Admin",
            Department::General => "General",
        }
    }

    pub fn all() -> impl Iterator<Item = Department> {
        Self::DECLARED
            .into_iter()
            .chain(std::iter::once(Self::CATCH_ALL))
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ConfigError;

    /// Accepts the display name, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Department::all()
            .find(|d| d.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ConfigError::UnknownDepartment(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentRule {
    pub department: Department,
    keywords: Vec<String>,
}

impl DepartmentRule {
    pub fn new<I, S>(department: Department, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            department,
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    fn matches(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}

static DEFAULT_RULES: Lazy<Vec<DepartmentRule>> = Lazy::new(|| {
    vec![
        DepartmentRule::new(
            Department::ProjectsSales,
            [
                "tender",
                "quotation",
                "proposal",
                "bid",
                "client",
                "sales",
                "project",
                "order",
                "enquiry",
            ],
        ),
        DepartmentRule::new(
            Department::FinanceAccounts,
            [
                "invoice",
                "payment",
                "accounts",
                "ledger",
                "audit",
                "budget",
                "tax",
                "gst",
                "reconciliation",
            ],
        ),
        DepartmentRule::new(
            Department::HrPayroll,
            [
                "payroll",
                "salary",
                "recruit",
                "hiring",
                "onboarding",
                "employee",
                "attendance",
                "leave",
                "training",
            ],
        ),
        DepartmentRule::new(
            Department::ProcurementStores,
            [
                "purchase",
                "procurement",
                "vendor",
                "supplier",
                "stock",
                "inventory",
                "warehouse",
                "stores",
            ],
        ),
        DepartmentRule::new(
            Department::OperationsLogistics,
            [
                "maintenance",
                "repair",
                "installation",
                "dispatch",
                "delivery",
                "logistics",
                "transport",
                "service",
            ],
        ),
        DepartmentRule::new(
            Department::ItAdmin,
            [
                "software",
                "server",
                "network",
                "laptop",
                "email",
                "license",
                "compliance",
                "insurance",
                "admin",
            ],
        ),
    ]
});

/// First-match-wins keyword classifier. Rules are scanned in table order and the
/// first rule with any keyword contained in the description decides.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<DepartmentRule>,
}

impl Classifier {
    pub fn new(rules: Vec<DepartmentRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[DepartmentRule] {
        &self.rules
    }

    pub fn classify(&self, description: &str) -> Department {
        let haystack = description.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&haystack))
            .map(|rule| rule.department)
            .unwrap_or(Department::CATCH_ALL)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_rule_in_table_order_wins() {
        let classifier = Classifier::default();
        assert_eq!(
            classifier.classify("Tender for new warehouse racks"),
            Department::ProjectsSales
        );
        assert_eq!(
            classifier.classify("Process payroll adjustments"),
            Department::HrPayroll
        );
        assert_eq!(
            classifier.classify("Restock WAREHOUSE shelving"),
            Department::ProcurementStores
        );
    }

    #[test]
    fn unmatched_descriptions_fall_into_catch_all() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("Untitled Task"), Department::General);
        assert_eq!(classifier.classify(""), Department::General);
    }

    #[test]
    fn synthetic_tables_reorder_precedence() {
        let classifier = Classifier::new(vec![
            DepartmentRule::new(Department::ProcurementStores, ["Warehouse"]),
            DepartmentRule::new(Department::ProjectsSales, ["tender", "  "]),
        ]);
        assert_eq!(
            classifier.classify("Tender for new warehouse racks"),
            Department::ProcurementStores
        );
        assert_eq!(classifier.rules()[1].keywords(), ["tender"]);
    }

    #[test]
    fn parses_department_names_case_insensitively() {
        assert_eq!(
            "hr & payroll".parse::<Department>().expect("known"),
            Department::HrPayroll
        );
        assert_eq!(
            " General ".parse::<Department>().expect("known"),
            Department::General
        );
        let err = "Marketing".parse::<Department>().expect_err("unknown");
        assert_eq!(err.to_string(), "unknown department 'Marketing'");
    }

    #[test]
    fn serializes_display_names() {
        let json = serde_json::to_string(&Department::ItAdmin).expect("serialize");
        assert_eq!(json, "\"IT & Admin\"");
    }
}
