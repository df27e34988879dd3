//! Table rendering for analysed ledgers

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::loan::LoanTerms;
use crate::money::Money;
use crate::simulation::{Analysis, AnalysisRow};

/// One formatted table row. Column names and order match the ledger
/// layout: per-payment figures first, cumulative columns after.
#[derive(Tabled)]
struct DisplayRow {
    #[tabled(rename = "payment")]
    payment: u32,
    #[tabled(rename = "balance")]
    balance: String,
    #[tabled(rename = "rate")]
    rate: String,
    #[tabled(rename = "monthly")]
    monthly: String,
    #[tabled(rename = "interest")]
    interest: String,
    #[tabled(rename = "principal")]
    principal: String,
    #[tabled(rename = "overpayment")]
    overpayment: String,
    #[tabled(rename = "cum_interest")]
    cum_interest: String,
    #[tabled(rename = "cum_principal")]
    cum_principal: String,
    #[tabled(rename = "cum_overpayment")]
    cum_overpayment: String,
    #[tabled(rename = "cum_int_percent")]
    cum_int_percent: String,
    #[tabled(rename = "cum_principal_percent")]
    cum_principal_percent: String,
}

fn money_cell(value: &Money) -> String {
    format!("{:.2}", value.amount())
}

impl DisplayRow {
    fn from_analysis(row: &AnalysisRow) -> Self {
        Self {
            payment: row.payment_number,
            balance: money_cell(&row.balance),
            rate: format!("{:.4}", row.rate),
            monthly: money_cell(&row.total_monthly_payment),
            interest: money_cell(&row.interest_payment),
            principal: money_cell(&row.scheduled_principal_payment),
            overpayment: money_cell(&row.overpayment),
            cum_interest: money_cell(&row.cumulative_interest),
            cum_principal: money_cell(&row.cumulative_principal),
            cum_overpayment: money_cell(&row.cumulative_overpayment),
            cum_int_percent: format!("{:.2}", row.cumulative_interest_pct),
            cum_principal_percent: format!("{:.2}", row.cumulative_principal_pct),
        }
    }
}

/// Renders the full ledger as a psql-style table, one row per payment.
pub fn render_ledger(analysis: &Analysis) -> String {
    let rows: Vec<DisplayRow> = analysis.rows.iter().map(DisplayRow::from_analysis).collect();
    Table::new(rows).with(Style::psql()).to_string()
}

/// Renders the post-run summary block.
pub fn render_summary(analysis: &Analysis, terms: &LoanTerms) -> String {
    let mut out = String::from("Summary:\n");
    out.push_str(&format!("  Level payment: {}\n", terms.level_payment()));
    if let Some(payment) = analysis.rows.last().map(|row| row.payment_number) {
        out.push_str(&format!(
            "  Paid off at payment {} of {}\n",
            payment,
            terms.total_payments()
        ));
    }
    out.push_str(&format!("  Total interest: {}\n", analysis.total_interest));
    match &analysis.fixed_term_cost {
        Some(cost) => out.push_str(&format!("  Fixed-term cost: {cost}\n")),
        None => out.push_str("  Fixed-term cost: n/a\n"),
    }
    out.push_str(&format!("  Arrangement fee: {}\n", terms.fee()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use crate::simulation::SimulationEngine;
    use rust_decimal_macros::dec;

    fn small_analysis() -> (Analysis, LoanTerms) {
        let terms = LoanTerms::with_options(
            Money::new(dec!(12000), Currency::Gbp),
            dec!(0.05),
            1,
            1,
            Money::new(dec!(99), Currency::Gbp),
            None,
        )
        .unwrap();
        let result = SimulationEngine::new().simulate(&terms).unwrap();
        let analysis = result.analyse(&terms).unwrap();
        (analysis, terms)
    }

    #[test]
    fn test_ledger_columns_in_order() {
        let (analysis, _) = small_analysis();
        let table = render_ledger(&analysis);
        let header = table.lines().next().unwrap();

        let columns = [
            "payment",
            "balance",
            "rate",
            "monthly",
            "interest",
            "principal",
            "overpayment",
            "cum_interest",
            "cum_principal",
            "cum_overpayment",
            "cum_int_percent",
            "cum_principal_percent",
        ];
        let mut position = 0;
        for column in columns {
            let found = header[position..]
                .find(column)
                .unwrap_or_else(|| panic!("missing column {column}"));
            position += found + column.len();
        }

        // Header plus separator plus one line per payment.
        assert_eq!(table.lines().count(), 2 + analysis.rows.len());
    }

    #[test]
    fn test_summary_block() {
        let (analysis, terms) = small_analysis();
        let summary = render_summary(&analysis, &terms);

        assert!(summary.contains("Paid off at payment 12 of 12"));
        assert!(summary.contains("Total interest:"));
        assert!(summary.contains("Fixed-term cost:"));
        assert!(summary.contains("99.00 GBP"));
    }
}
