//! Per-business configuration stored in the `settings` jsonb columns.
//!
//! The columns are schemaless in the database. These types are what the
//! application agrees to read and write; unknown template keys survive a
//! round trip untouched.

use chrono::NaiveDate;
use ledgerly_shared::types::Rate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::DomainError;

/// Default document number prefix for invoices.
pub const DEFAULT_INVOICE_PREFIX: &str = "INV-";

/// Default zero padding of document numbers.
pub const DEFAULT_NUMBER_WIDTH: usize = 5;

/// Layout options for rendered invoices (`invoice_template`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTemplate {
    /// Prefix of generated invoice numbers.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Zero padding of the numeric part.
    #[serde(default = "default_width")]
    pub number_width: usize,
    /// Default payment terms in days, used to derive `due_date`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_terms_days: Option<u32>,
    /// Text printed under the totals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Keys this version does not interpret.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_prefix() -> String {
    DEFAULT_INVOICE_PREFIX.to_string()
}

const fn default_width() -> usize {
    DEFAULT_NUMBER_WIDTH
}

impl Default for InvoiceTemplate {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            number_width: DEFAULT_NUMBER_WIDTH,
            payment_terms_days: None,
            footer: None,
            extra: Map::new(),
        }
    }
}

impl InvoiceTemplate {
    /// Formats the `seq`-th invoice number, e.g. `INV-00042`.
    #[must_use]
    pub fn number_for(&self, seq: u32) -> String {
        format!("{}{:0width$}", self.prefix, seq, width = self.number_width)
    }

    /// Due date for an invoice issued on `date`, if terms are configured.
    #[must_use]
    pub fn due_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.payment_terms_days
            .and_then(|days| date.checked_add_days(chrono::Days::new(u64::from(days))))
    }
}

/// A named tax rate in percent (`tax_rates[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate {
    /// Display name, unique within a business.
    pub name: String,
    /// Percentage, e.g. `8.25`.
    pub rate: Rate,
    /// Applied to new lines unless overridden.
    #[serde(default)]
    pub is_default: bool,
}

/// A named accounting period (`reporting_periods[]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// Display name, e.g. `Q1 2026`.
    pub name: String,
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
}

impl ReportingPeriod {
    /// Returns true if `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The typed view of a `settings` row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessSettings {
    /// Invoice layout, absent until configured.
    #[serde(default)]
    pub invoice_template: Option<InvoiceTemplate>,
    /// Tax rates.
    #[serde(default)]
    pub tax_rates: Vec<TaxRate>,
    /// Reporting periods.
    #[serde(default)]
    pub reporting_periods: Vec<ReportingPeriod>,
}

/// JSON values for the three jsonb columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsColumns {
    /// `invoice_template`.
    pub invoice_template: Option<Value>,
    /// `tax_rates`.
    pub tax_rates: Option<Value>,
    /// `reporting_periods`.
    pub reporting_periods: Option<Value>,
}

impl BusinessSettings {
    /// Checks cross-field rules.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSettings`] describing the first broken
    /// rule: negative or duplicate tax rates, more than one default rate,
    /// or a reporting period that ends before it starts.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut names = std::collections::HashSet::new();
        for tax in &self.tax_rates {
            if tax.rate.is_negative() {
                return Err(DomainError::InvalidSettings(format!(
                    "tax rate '{}' is negative",
                    tax.name
                )));
            }
            if !names.insert(tax.name.as_str()) {
                return Err(DomainError::InvalidSettings(format!(
                    "tax rate '{}' is defined twice",
                    tax.name
                )));
            }
        }

        if self.tax_rates.iter().filter(|t| t.is_default).count() > 1 {
            return Err(DomainError::InvalidSettings(
                "more than one default tax rate".to_string(),
            ));
        }

        if let Some(period) = self.reporting_periods.iter().find(|p| p.end < p.start) {
            return Err(DomainError::InvalidSettings(format!(
                "reporting period '{}' ends before it starts",
                period.name
            )));
        }

        Ok(())
    }

    /// The rate flagged as default, if any.
    #[must_use]
    pub fn default_tax_rate(&self) -> Option<&TaxRate> {
        self.tax_rates.iter().find(|t| t.is_default)
    }

    /// The first reporting period containing `date`.
    #[must_use]
    pub fn period_for(&self, date: NaiveDate) -> Option<&ReportingPeriod> {
        self.reporting_periods.iter().find(|p| p.contains(date))
    }

    /// Serializes into column values. Empty lists are stored as `NULL`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSettings`] if validation fails.
    pub fn to_columns(&self) -> Result<SettingsColumns, DomainError> {
        self.validate()?;
        Ok(SettingsColumns {
            invoice_template: self.invoice_template.as_ref().map(to_json).transpose()?,
            tax_rates: non_empty(&self.tax_rates).map(to_json).transpose()?,
            reporting_periods: non_empty(&self.reporting_periods).map(to_json).transpose()?,
        })
    }

    /// Reads column values; `NULL` columns become defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidSettings`] if a column holds JSON of
    /// the wrong shape.
    pub fn from_columns(columns: SettingsColumns) -> Result<Self, DomainError> {
        Ok(Self {
            invoice_template: columns.invoice_template.map(from_json).transpose()?,
            tax_rates: columns.tax_rates.map(from_json).transpose()?.unwrap_or_default(),
            reporting_periods: columns
                .reporting_periods
                .map(from_json)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

fn non_empty<T>(items: &[T]) -> Option<&[T]> {
    if items.is_empty() { None } else { Some(items) }
}

fn to_json<T: Serialize>(value: T) -> Result<Value, DomainError> {
    serde_json::to_value(value).map_err(|e| DomainError::InvalidSettings(e.to_string()))
}

fn from_json<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, DomainError> {
    serde_json::from_value(value).map_err(|e| DomainError::InvalidSettings(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rate(name: &str, value: &str, is_default: bool) -> TaxRate {
        TaxRate {
            name: name.to_string(),
            rate: Rate::parse(value).unwrap(),
            is_default,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_number_for_pads() {
        let template = InvoiceTemplate::default();
        assert_eq!(template.number_for(42), "INV-00042");

        let custom = InvoiceTemplate {
            prefix: "A/".to_string(),
            number_width: 3,
            ..InvoiceTemplate::default()
        };
        assert_eq!(custom.number_for(1234), "A/1234");
    }

    #[test]
    fn test_due_date_from_terms() {
        let template = InvoiceTemplate {
            payment_terms_days: Some(30),
            ..InvoiceTemplate::default()
        };
        assert_eq!(template.due_date(date(2026, 1, 15)), Some(date(2026, 2, 14)));
        assert_eq!(InvoiceTemplate::default().due_date(date(2026, 1, 15)), None);
    }

    #[test]
    fn test_template_keeps_unknown_keys() {
        let raw = json!({"prefix": "F-", "logo_url": "https://example.test/logo.png"});
        let template: InvoiceTemplate = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(template.prefix, "F-");
        assert_eq!(template.number_width, DEFAULT_NUMBER_WIDTH);
        assert_eq!(serde_json::to_value(&template).unwrap()["logo_url"], raw["logo_url"]);
    }

    #[test]
    fn test_null_columns_are_defaults() {
        let settings = BusinessSettings::from_columns(SettingsColumns::default()).unwrap();
        assert_eq!(settings, BusinessSettings::default());
    }

    #[test]
    fn test_columns_round_trip() {
        let settings = BusinessSettings {
            invoice_template: Some(InvoiceTemplate::default()),
            tax_rates: vec![rate("Standard", "8.25", true), rate("Zero", "0", false)],
            reporting_periods: vec![ReportingPeriod {
                name: "Q1".to_string(),
                start: date(2026, 1, 1),
                end: date(2026, 3, 31),
            }],
        };
        let columns = settings.to_columns().unwrap();
        assert_eq!(columns.tax_rates.as_ref().unwrap()[0]["rate"], json!("8.25"));

        let back = BusinessSettings::from_columns(columns).unwrap();
        assert_eq!(back, settings);
        assert_eq!(back.default_tax_rate().unwrap().name, "Standard");
        assert_eq!(back.period_for(date(2026, 2, 10)).unwrap().name, "Q1");
        assert!(back.period_for(date(2026, 4, 1)).is_none());
    }

    #[test]
    fn test_empty_lists_stored_as_null() {
        let columns = BusinessSettings::default().to_columns().unwrap();
        assert_eq!(columns, SettingsColumns::default());
    }

    #[test]
    fn test_two_defaults_rejected() {
        let settings = BusinessSettings {
            tax_rates: vec![rate("A", "5", true), rate("B", "7", true)],
            ..BusinessSettings::default()
        };
        assert!(matches!(settings.validate(), Err(DomainError::InvalidSettings(_))));
    }

    #[test]
    fn test_duplicate_and_negative_rates_rejected() {
        let duplicate = BusinessSettings {
            tax_rates: vec![rate("A", "5", false), rate("A", "7", false)],
            ..BusinessSettings::default()
        };
        assert!(duplicate.to_columns().is_err());

        let negative = BusinessSettings {
            tax_rates: vec![rate("Refund", "-1", false)],
            ..BusinessSettings::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_inverted_period_rejected() {
        let settings = BusinessSettings {
            reporting_periods: vec![ReportingPeriod {
                name: "Backwards".to_string(),
                start: date(2026, 3, 1),
                end: date(2026, 1, 1),
            }],
            ..BusinessSettings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("Backwards"));
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let columns = SettingsColumns {
            tax_rates: Some(json!({"not": "a list"})),
            ..SettingsColumns::default()
        };
        assert!(matches!(
            BusinessSettings::from_columns(columns),
            Err(DomainError::InvalidSettings(_))
        ));
    }
}
