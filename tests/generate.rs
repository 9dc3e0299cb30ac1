use bill_of_exchange::catalog::ContractBook;
use bill_of_exchange::config::Config;
use bill_of_exchange::form::{Action, FormState, HeaderField, ItemField};
use bill_of_exchange::render::sheet::{
    CellValue, NumberFormat, SheetPlan, SheetRowKind, cell_style,
};
use bill_of_exchange::render::{ExportFormat, generate_reports};
use bill_of_exchange::report::Report;
use bill_of_exchange::{amount_to_words, compact_date_token, format_currency};
use lopdf::Document;
use std::path::{Path, PathBuf};

fn repo_file(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(rel)
}

fn sample_bill() -> Report {
    let text = std::fs::read_to_string(repo_file("demo/sample_bill.toml")).unwrap();
    Report::from_toml(&text).unwrap()
}

#[test]
fn sample_bill_totals() {
    let report = sample_bill();
    let totals = report.totals();
    assert_eq!(totals.total_invoice_qty, 17_300.0);
    assert_eq!(totals.total_rcvd_qty, 17_250.0);
    assert!(totals.has_qty_mismatch());
    assert_eq!(format_currency(totals.total_value), "$45,705.00");
    assert_eq!(
        amount_to_words(totals.total_value),
        "Forty-five thousand, seven hundred five dollars."
    );
    assert_eq!(
        report.base_filename(),
        "Bill of Buyer Primark Stores $45705.00 DATE-20.01.25"
    );
}

#[test]
fn sample_bill_renders_both_documents() {
    let cfg = Config::load(repo_file(".config/bill_report.toml")).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let outcomes = generate_reports(&sample_bill(), &cfg, dir.path()).unwrap();
    assert_eq!(outcomes.len(), 2);

    let pdf = outcomes
        .iter()
        .find(|o| o.format == ExportFormat::Pdf)
        .and_then(|o| o.result.as_ref().ok())
        .unwrap();
    let doc = Document::load(pdf).unwrap();
    assert_eq!(doc.get_pages().len(), 1);

    let sheet = outcomes
        .iter()
        .find(|o| o.format == ExportFormat::Sheet)
        .and_then(|o| o.result.as_ref().ok())
        .unwrap();
    assert_eq!(sheet.extension().and_then(|e| e.to_str()), Some("xlsx"));
    let bytes = std::fs::read(sheet).unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn sample_bill_sheet_plan() {
    let cfg = Config::load(repo_file(".config/bill_report.toml")).unwrap();
    let plan = SheetPlan::build(&sample_bill(), &cfg);

    let texts: Vec<&str> = plan
        .rows
        .iter()
        .flat_map(|r| &r.cells)
        .filter_map(|c| match c {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();
    assert!(texts.contains(&"ETL-D-4471"));
    assert!(texts.contains(&"98% Cotton 2% Elastane Denim (Indigo) (HS: 5209.42)"));

    let total = plan.row_index(SheetRowKind::Total).unwrap();
    match plan.rows[total].cells[9] {
        CellValue::Number(value) => assert!((value - 45_705.0).abs() < 1e-6),
        ref other => panic!("total value cell is {other:?}"),
    }
    assert_eq!(
        cell_style(SheetRowKind::Total, total, 9).number,
        Some(NumberFormat::Money)
    );
}

#[test]
fn form_flow_produces_a_renderable_bill() {
    let cfg = Config::default();
    let book = ContractBook::load(repo_file("data/contracts.csv")).unwrap();
    let apply = |state: &FormState, action| state.apply(action, &book, &cfg.file_no_prefix);

    let state = FormState::new("03/Feb/2025");
    let state = apply(&state, Action::SetHeader(HeaderField::FileNo, "205".into()));
    assert_eq!(state.header.file_no, "TTL-205");
    assert_eq!(state.header.buyer_name, "Marks & Spencer");

    let id = state.items[0].id;
    let state = apply(
        &state,
        Action::SetItem {
            id,
            field: ItemField::InvoiceQty,
            value: "1,000".into(),
        },
    );
    let state = apply(
        &state,
        Action::SetItem {
            id,
            field: ItemField::RcvdQty,
            value: "1000".into(),
        },
    );
    let state = apply(
        &state,
        Action::SetItem {
            id,
            field: ItemField::UnitPrice,
            value: "1.01".into(),
        },
    );

    let report = state.report();
    assert!(report.validate().is_ok());
    assert!(!report.totals().has_qty_mismatch());
    assert_eq!(
        amount_to_words(report.totals().total_value),
        "One thousand, ten dollars."
    );
    assert_eq!(compact_date_token(&report.header.billing_date), "03.02.25");

    let dir = tempfile::tempdir().unwrap();
    let outcomes = generate_reports(&report, &cfg, dir.path()).unwrap();
    assert!(outcomes.iter().all(|o| o.result.is_ok()));
}
