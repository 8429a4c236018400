//! Dashboard aggregation
//!
//! Pure, read-only derivations over a [`Workspace`]. Nothing here is
//! cached or stored: every query is recomputed from the current
//! collections, so calling a function twice on an unchanged workspace
//! always yields the same answer. Calendar-dependent queries take the
//! clock explicitly.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use super::models::{Deal, Project, TransactionKind};
use super::stages::{DealStage, ProjectStage};
use super::workspace::Workspace;

/// Count and summed value of the deals sitting in one funnel column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelEntry {
    pub stage: DealStage,
    pub count: usize,
    pub value: f64,
}

/// One month's summed income, labeled with the short month name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyIncomePoint {
    pub month: String,
    pub income: f64,
}

/// One month's income and expenses side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCashFlowPoint {
    pub month: String,
    pub income: f64,
    pub expense: f64,
}

/// Running signed balance after a transaction. The leading point of
/// the series carries no date and a zero balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetWorthPoint {
    pub date: Option<NaiveDate>,
    pub balance: f64,
}

/// Lifetime ledger totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

fn is_active_project(p: &Project) -> bool {
    !p.archived && !p.cancelled && p.stage != ProjectStage::Published
}

/// Sum of deal values still in play: neither dead (Rejected/Cancelled)
/// nor already converted (Upfront Received).
pub fn pipeline_value(ws: &Workspace) -> f64 {
    ws.deals
        .iter()
        .filter(|d| d.stage.is_open())
        .map(|d| d.value)
        .sum()
}

/// Deals still moving through the funnel.
pub fn active_deal_count(ws: &Workspace) -> usize {
    ws.deals.iter().filter(|d| d.stage.is_open()).count()
}

/// Projects on the active board: not archived, not cancelled, not yet
/// published.
pub fn active_project_count(ws: &Workspace) -> usize {
    ws.projects.iter().filter(|p| is_active_project(p)).count()
}

/// Items demanding attention right now: deals waiting on the upfront
/// payment, plus active projects that are past due or parked in
/// review. The two signals are independent and simply added; a deal
/// and its project can each contribute one.
pub fn action_required_count(ws: &Workspace, now: DateTime<Utc>) -> usize {
    let deals_waiting = ws
        .deals
        .iter()
        .filter(|d| d.stage == DealStage::AcceptedAwaitingUpfront)
        .count();

    let projects_action = ws
        .projects
        .iter()
        .filter(|p| is_active_project(p))
        .filter(|p| p.due_date < now || p.stage == ProjectStage::Review)
        .count();

    deals_waiting + projects_action
}

/// Per-stage count and value across the ordered funnel columns.
pub fn deal_funnel(ws: &Workspace) -> Vec<FunnelEntry> {
    DealStage::PIPELINE
        .iter()
        .map(|&stage| {
            let in_stage: Vec<&Deal> = ws.deals.iter().filter(|d| d.stage == stage).collect();
            FunnelEntry {
                stage,
                count: in_stage.len(),
                value: in_stage.iter().map(|d| d.value).sum(),
            }
        })
        .collect()
}

fn month_label(date: NaiveDate) -> String {
    date.format("%b").to_string()
}

/// Income grouped by calendar month, in chronological first-seen
/// order. With no income recorded yet, a fixed three-month placeholder
/// keeps the revenue chart populated.
pub fn monthly_income_series(ws: &Workspace) -> Vec<MonthlyIncomePoint> {
    let mut sorted: Vec<_> = ws
        .transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income)
        .collect();
    sorted.sort_by_key(|t| t.date);

    let mut series: Vec<MonthlyIncomePoint> = Vec::new();
    for txn in sorted {
        let label = month_label(txn.date);
        match series.iter_mut().find(|p| p.month == label) {
            Some(point) => point.income += txn.amount,
            None => series.push(MonthlyIncomePoint {
                month: label,
                income: txn.amount,
            }),
        }
    }

    if series.is_empty() {
        return ["Jan", "Feb", "Mar"]
            .into_iter()
            .map(|m| MonthlyIncomePoint {
                month: m.to_string(),
                income: 0.0,
            })
            .collect();
    }
    series
}

/// Income and expenses grouped by calendar month, chronological
/// first-seen order.
pub fn monthly_cash_flow_series(ws: &Workspace) -> Vec<MonthlyCashFlowPoint> {
    let mut sorted: Vec<_> = ws.transactions.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let mut series: Vec<MonthlyCashFlowPoint> = Vec::new();
    for txn in sorted {
        let label = month_label(txn.date);
        let idx = match series.iter().position(|p| p.month == label) {
            Some(idx) => idx,
            None => {
                series.push(MonthlyCashFlowPoint {
                    month: label,
                    income: 0.0,
                    expense: 0.0,
                });
                series.len() - 1
            }
        };
        match txn.kind {
            TransactionKind::Income => series[idx].income += txn.amount,
            TransactionKind::Expense => series[idx].expense += txn.amount,
        }
    }
    series
}

/// Running net-worth curve: transactions in date order, one point per
/// transaction plus a leading zero point. Income adds, expenses
/// subtract.
pub fn net_worth_series(ws: &Workspace) -> Vec<NetWorthPoint> {
    let mut sorted: Vec<_> = ws.transactions.iter().collect();
    sorted.sort_by_key(|t| t.date);

    let mut series = vec![NetWorthPoint {
        date: None,
        balance: 0.0,
    }];
    let mut balance = 0.0;
    for txn in sorted {
        match txn.kind {
            TransactionKind::Income => balance += txn.amount,
            TransactionKind::Expense => balance -= txn.amount,
        }
        series.push(NetWorthPoint {
            date: Some(txn.date),
            balance,
        });
    }
    series
}

/// Income recorded in the current calendar month and year.
pub fn current_month_income(ws: &Workspace, now: DateTime<Utc>) -> f64 {
    let today = now.date_naive();
    ws.transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income)
        .filter(|t| t.date.month() == today.month() && t.date.year() == today.year())
        .map(|t| t.amount)
        .sum()
}

/// Lifetime income, expenses and net profit.
pub fn ledger_totals(ws: &Workspace) -> LedgerTotals {
    let income: f64 = ws
        .transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income)
        .map(|t| t.amount)
        .sum();
    let expenses: f64 = ws
        .transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .map(|t| t.amount)
        .sum();
    LedgerTotals {
        income,
        expenses,
        net: income - expenses,
    }
}

/// Funnel-position progress for a deal's progress bar, if the deal is
/// in a funnel column.
pub fn deal_progress(deal: &Deal) -> Option<u8> {
    let position = deal.stage.pipeline_position()?;
    let total = DealStage::PIPELINE.len();
    Some((((position + 1) as f64 / total as f64) * 100.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::models::{NewDeal, NewTransaction, NewTutorial, TransactionCategory};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 25, 12, 0, 0).unwrap()
    }

    fn add_deal(ws: &mut Workspace, value: f64, stage: DealStage) -> String {
        let id = ws
            .create_deal(
                NewDeal {
                    brand_name: format!("Brand {value}"),
                    tool_name: format!("Tool {value}"),
                    contact_email: "hello@example.com".to_string(),
                    value,
                    expected_publish_date: None,
                    notes: None,
                },
                now(),
            )
            .unwrap()
            .id
            .clone();
        if stage != DealStage::NewInquiry {
            ws.move_deal(&id, stage, now()).unwrap();
        }
        id
    }

    fn add_income(ws: &mut Workspace, date: (i32, u32, u32), amount: f64) {
        ws.add_transaction(NewTransaction {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: "income".to_string(),
            amount,
            kind: TransactionKind::Income,
            category: TransactionCategory::Other,
        })
        .unwrap();
    }

    fn add_expense(ws: &mut Workspace, date: (i32, u32, u32), amount: f64) {
        ws.add_transaction(NewTransaction {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: "expense".to_string(),
            amount,
            kind: TransactionKind::Expense,
            category: TransactionCategory::Other,
        })
        .unwrap();
    }

    #[test]
    fn test_pipeline_value_excludes_converted_and_dead_deals() {
        let mut ws = Workspace::new();
        add_deal(&mut ws, 1000.0, DealStage::NewInquiry);
        add_deal(&mut ws, 2000.0, DealStage::Negotiation);
        add_deal(&mut ws, 400.0, DealStage::Rejected);
        add_deal(&mut ws, 800.0, DealStage::Cancelled);
        // Conversion spawns a project/transaction; the deal itself no
        // longer counts toward the open pipeline.
        add_deal(&mut ws, 5000.0, DealStage::UpfrontReceived);

        assert_eq!(pipeline_value(&ws), 3000.0);
        assert_eq!(active_deal_count(&ws), 2);
    }

    #[test]
    fn test_action_required_sums_both_signals() {
        let mut ws = Workspace::new();
        add_deal(&mut ws, 3000.0, DealStage::AcceptedAwaitingUpfront);

        // Overdue project.
        let overdue = ws
            .create_tutorial(NewTutorial {
                title: "Overdue".to_string(),
                brand_name: "Self".to_string(),
                due_date: now() - Duration::days(2),
            })
            .unwrap()
            .id
            .clone();

        // Sponsored project parked in review, not overdue.
        add_deal(&mut ws, 1500.0, DealStage::UpfrontReceived);
        let review = ws.projects.last().unwrap().id.clone();
        ws.move_project(&review, ProjectStage::Review).unwrap();

        // On-time project contributes nothing.
        ws.create_tutorial(NewTutorial {
            title: "On time".to_string(),
            brand_name: "Self".to_string(),
            due_date: now() + Duration::days(10),
        })
        .unwrap();

        assert_eq!(action_required_count(&ws, now()), 3);

        // Archival silences a project's signal.
        ws.move_project(&overdue, ProjectStage::Published).unwrap();
        ws.archive_project(&overdue).unwrap();
        assert_eq!(action_required_count(&ws, now()), 2);
    }

    #[test]
    fn test_deal_funnel_counts_and_values() {
        let mut ws = Workspace::new();
        add_deal(&mut ws, 1000.0, DealStage::NewInquiry);
        add_deal(&mut ws, 2500.0, DealStage::NewInquiry);
        add_deal(&mut ws, 4000.0, DealStage::Negotiation);

        let funnel = deal_funnel(&ws);
        assert_eq!(funnel.len(), DealStage::PIPELINE.len());
        assert_eq!(funnel[0].stage, DealStage::NewInquiry);
        assert_eq!(funnel[0].count, 2);
        assert_eq!(funnel[0].value, 3500.0);
        assert_eq!(funnel[2].count, 1);
        assert_eq!(funnel[2].value, 4000.0);
        assert_eq!(funnel[3].count, 0);
    }

    #[test]
    fn test_monthly_income_series_groups_chronologically() {
        let mut ws = Workspace::new();
        // Inserted out of order; grouping is by date, not entry order.
        add_income(&mut ws, (2024, 5, 3), 200.0);
        add_income(&mut ws, (2024, 4, 10), 100.0);
        add_income(&mut ws, (2024, 5, 20), 50.0);
        add_expense(&mut ws, (2024, 4, 15), 999.0); // expenses excluded

        let series = monthly_income_series(&ws);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].month, "Apr");
        assert_eq!(series[0].income, 100.0);
        assert_eq!(series[1].month, "May");
        assert_eq!(series[1].income, 250.0);
    }

    #[test]
    fn test_monthly_income_placeholder_when_empty() {
        let ws = Workspace::new();
        let series = monthly_income_series(&ws);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].month, "Jan");
        assert!(series.iter().all(|p| p.income == 0.0));
    }

    #[test]
    fn test_net_worth_series_runs_signed_balance() {
        let mut ws = Workspace::new();
        add_income(&mut ws, (2024, 5, 1), 1250.0);
        add_expense(&mut ws, (2024, 5, 3), 15.0);
        add_income(&mut ws, (2024, 5, 5), 750.0);

        let series = net_worth_series(&ws);
        assert_eq!(series.len(), 4);
        assert_eq!(series[0], NetWorthPoint { date: None, balance: 0.0 });
        assert_eq!(series[1].balance, 1250.0);
        assert_eq!(series[2].balance, 1235.0);
        assert_eq!(series[3].balance, 1985.0);
    }

    #[test]
    fn test_current_month_income_filters_month_and_year() {
        let mut ws = Workspace::new();
        add_income(&mut ws, (2024, 5, 1), 300.0);
        add_income(&mut ws, (2024, 5, 28), 200.0);
        add_income(&mut ws, (2023, 5, 10), 999.0); // same month, wrong year
        add_income(&mut ws, (2024, 4, 30), 999.0); // wrong month

        assert_eq!(current_month_income(&ws, now()), 500.0);
    }

    #[test]
    fn test_ledger_totals() {
        let mut ws = Workspace::new();
        add_income(&mut ws, (2024, 5, 1), 1000.0);
        add_expense(&mut ws, (2024, 5, 2), 300.0);

        let totals = ledger_totals(&ws);
        assert_eq!(totals.income, 1000.0);
        assert_eq!(totals.expenses, 300.0);
        assert_eq!(totals.net, 700.0);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let mut ws = Workspace::new();
        add_deal(&mut ws, 1800.0, DealStage::RateSent);
        add_income(&mut ws, (2024, 5, 1), 450.0);
        add_expense(&mut ws, (2024, 5, 6), 30.0);

        assert_eq!(pipeline_value(&ws), pipeline_value(&ws));
        assert_eq!(deal_funnel(&ws), deal_funnel(&ws));
        assert_eq!(monthly_income_series(&ws), monthly_income_series(&ws));
        assert_eq!(net_worth_series(&ws), net_worth_series(&ws));
        assert_eq!(ledger_totals(&ws), ledger_totals(&ws));
    }

    #[test]
    fn test_deal_progress_positional() {
        let mut ws = Workspace::new();
        let id = add_deal(&mut ws, 100.0, DealStage::Negotiation);
        // Third of five funnel columns => round(100 * 3/5) = 60
        assert_eq!(deal_progress(ws.deal(&id).unwrap()), Some(60));

        let id = add_deal(&mut ws, 100.0, DealStage::Rejected);
        assert_eq!(deal_progress(ws.deal(&id).unwrap()), None);
    }
}
