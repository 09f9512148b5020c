mod common;

use anyhow::Result;
use common::{StandardExpenses, amount, month, test_ledger};
use pocketspend::cli::{Outcome, Reply, Session, SessionConfig, Signal};

fn send(session: &mut Session<'_>, line: &str) -> Result<Reply> {
    match session.handle_line(line) {
        Outcome::Continue(reply) => Ok(reply),
        Outcome::Quit => panic!("unexpected quit for {:?}", line),
    }
}

#[test]
fn test_add_expense_reports_and_signals() -> Result<()> {
    let ledger = test_ledger();
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 1));

    let reply = send(&mut session, "add coffee 3.456 --date 2024-01-09")?;
    assert!(reply.body.contains("Added $3.46 to Coffee & Drinks"));
    assert_eq!(
        reply.signal,
        Some(Signal::ExpenseAdded {
            category: "coffee".to_string()
        })
    );
    assert_eq!(ledger.total_spent(month(2024, 1)), amount("3.46"));
    Ok(())
}

#[test]
fn test_add_non_positive_amount_shows_form_message() -> Result<()> {
    let ledger = test_ledger();
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 1));

    for line in ["add fun 0", "add fun -5"] {
        let reply = send(&mut session, line)?;
        assert!(reply.body.contains("Enter an amount above 0."), "{}", line);
        assert!(reply.body.contains("Fun"));
        assert!(reply.signal.is_none());
    }
    assert_eq!(ledger.expense_count(), 0);
    Ok(())
}

#[test]
fn test_add_unknown_category() -> Result<()> {
    let ledger = test_ledger();
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 1));

    let reply = send(&mut session, "add rent 900")?;
    assert_eq!(reply.body, "Unknown category: rent\n");
    assert!(reply.signal.is_none());
    assert_eq!(ledger.expense_count(), 0);
    Ok(())
}

#[test]
fn test_add_unreadable_amount() -> Result<()> {
    let ledger = test_ledger();
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 1));

    let reply = send(&mut session, "add home lots")?;
    assert!(reply.body.contains("Could not read amount"));
    assert_eq!(ledger.expense_count(), 0);
    Ok(())
}

#[test]
fn test_form_uses_configured_quick_amounts() -> Result<()> {
    let ledger = test_ledger();
    let config = SessionConfig {
        currency: "€".to_string(),
        quick_amounts: vec![amount("2"), amount("7.5")],
        emit_signals: false,
    };
    let mut session = Session::new(&ledger, config, month(2024, 1));

    let reply = send(&mut session, "form groceries")?;
    assert!(reply.body.contains("Groceries"));
    assert!(reply.body.contains("€2.00  €7.50"));

    let reply = send(&mut session, "form rent")?;
    assert_eq!(reply.body, "Unknown category: rent\n");
    Ok(())
}

#[test]
fn test_dashboard_and_summary() -> Result<()> {
    let ledger = test_ledger();
    StandardExpenses::record(&ledger);
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 1));

    let dashboard = send(&mut session, "dashboard")?.body;
    assert!(dashboard.contains("Categories"));
    assert!(dashboard.contains("Spending for January 2024"));
    assert!(dashboard.contains("$283.50"));

    let february = send(&mut session, "summary 2024-02")?.body;
    assert!(february.contains("Spending for February 2024"));
    assert!(february.contains("$105.00"));

    send(&mut session, "month 2024-02")?;
    assert_eq!(session.month(), month(2024, 2));

    let csv = send(&mut session, "summary --format csv")?.body;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("category,name,count,total"));
    assert_eq!(lines.next(), Some("groceries,Groceries,1,60.00"));
    assert_eq!(lines.next(), Some("car,Car & Gas,1,45.00"));
    assert_eq!(csv.lines().count(), 9);
    Ok(())
}

#[test]
fn test_summary_json() -> Result<()> {
    let ledger = test_ledger();
    StandardExpenses::record(&ledger);
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 1));

    let body = send(&mut session, "summary --format json")?.body;
    let value: serde_json::Value = serde_json::from_str(&body)?;
    assert_eq!(value["month"], "2024-01");
    assert_eq!(value["label"], "January 2024");
    assert_eq!(value["totals"].as_array().map(|t| t.len()), Some(8));
    assert_eq!(value["totals"][0]["category"]["id"], "groceries");
    Ok(())
}

#[test]
fn test_syntax_errors_keep_session_running() -> Result<()> {
    let ledger = test_ledger();
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 1));

    let body = send(&mut session, "spend 5")?.body;
    assert!(body.starts_with("Unknown command 'spend'"));

    let body = send(&mut session, "add coffee")?.body;
    assert!(body.starts_with("Usage: add"));

    assert_eq!(send(&mut session, "")?, Reply::default());
    assert_eq!(session.handle_line("quit"), Outcome::Quit);
    Ok(())
}

#[test]
fn test_add_with_configured_currency_symbol() -> Result<()> {
    let ledger = test_ledger();
    let config = SessionConfig {
        currency: "€".to_string(),
        ..SessionConfig::default()
    };
    let mut session = Session::new(&ledger, config, month(2024, 1));

    let reply = send(&mut session, "add coffee €5 --date 2024-01-03")?;
    assert!(reply.body.contains("Added €5.00 to Coffee & Drinks"), "{}", reply.body);
    assert_eq!(ledger.total_spent(month(2024, 1)), amount("5.00"));
    Ok(())
}

#[test]
fn test_add_amount_above_limit_shows_form_message() -> Result<()> {
    let ledger = test_ledger();
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 1));

    let reply = send(&mut session, "add car 50000000000000000000000000000")?;
    assert!(reply.body.contains("Amount must not exceed 1000000000.00"), "{}", reply.body);
    assert!(reply.signal.is_none());
    assert_eq!(ledger.expense_count(), 0);

    // Summaries keep working afterwards
    let body = send(&mut session, "summary")?.body;
    assert!(body.contains("$0.00"));
    Ok(())
}

#[test]
fn test_failed_export_keeps_session_running() -> Result<()> {
    let ledger = test_ledger();
    StandardExpenses::record(&ledger);
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 1));

    let body = send(&mut session, "export summary --output /nonexistent_dir/x.csv")?.body;
    assert!(body.starts_with("Error: Failed to create /nonexistent_dir/x.csv"), "{}", body);

    let body = send(&mut session, "summary")?.body;
    assert!(body.contains("$283.50"));
    Ok(())
}

#[tokio::test]
async fn test_interactive_run_survives_failed_command() -> Result<()> {
    let ledger = test_ledger();
    let mut session = Session::new(&ledger, SessionConfig::default(), month(2024, 5));

    let input: &[u8] =
        b"export expenses --output /nonexistent_dir/e.csv\nadd fun 10 --date 2024-05-04\nquit\n";
    let mut output = Vec::new();
    session.run(input, &mut output).await?;

    let output = String::from_utf8(output)?;
    assert!(output.contains("Error: Failed to create"));
    assert!(output.contains("Added $10.00 to Fun"));
    assert_eq!(ledger.expense_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_interactive_run() -> Result<()> {
    let ledger = test_ledger();
    let config = SessionConfig {
        emit_signals: true,
        ..SessionConfig::default()
    };
    let mut session = Session::new(&ledger, config, month(2024, 5));

    let input: &[u8] = b"add groceries 12.345 --date 2024-05-03\nsummary\nquit\nadd fun 100\n";
    let mut output = Vec::new();
    session.run(input, &mut output).await?;

    let output = String::from_utf8(output)?;
    assert!(output.contains("Added $12.35 to Groceries"));
    assert!(output.contains(r#"signal: {"expenseAdded":{"category":"groceries"}}"#));
    assert!(output.contains("Spending for May 2024"));

    // Input after quit is ignored
    assert_eq!(ledger.expense_count(), 1);
    Ok(())
}
