// src/form.rs

//! Form view-state. Every edit is an [`Action`] applied to an immutable
//! [`FormState`], which returns the next state.

use crate::catalog::ContractBook;
use crate::format::expand_two_digit_year;
use crate::report::{LineItem, Report, ReportHeader, Totals, calculate_totals, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    BuyerName,
    SupplierName,
    FileNo,
    InvoiceNo,
    LcNumber,
    InvoiceDate,
    BillingDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    FabricCode,
    ItemDescription,
    Color,
    HsCode,
    RcvdDate,
    ChallanNo,
    PiNumber,
    Unit,
    InvoiceQty,
    RcvdQty,
    UnitPrice,
    AppstremeNo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetHeader(HeaderField, String),
    SetItem {
        id: u64,
        field: ItemField,
        value: String,
    },
    /// A date field lost focus; two-digit years are expanded.
    LeaveDate(HeaderField),
    AddRow,
    RemoveRow(u64),
    ClearAll {
        today: String,
    },
    TogglePreview,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub header: ReportHeader,
    pub items: Vec<LineItem>,
    pub preview: bool,
    /// Bumped on every clear so input widgets can be rebuilt.
    pub reset_generation: u64,
    next_item_id: u64,
}

impl FormState {
    /// Empty form: blank header with `today` as billing date, one blank row.
    pub fn new(today: &str) -> Self {
        Self {
            header: blank_header(today),
            items: vec![LineItem::blank(1)],
            preview: false,
            reset_generation: 0,
            next_item_id: 2,
        }
    }

    pub fn apply(&self, action: Action, contracts: &ContractBook, file_no_prefix: &str) -> Self {
        let mut next = self.clone();
        match action {
            Action::SetHeader(HeaderField::FileNo, value) => {
                let resolved = contracts.resolve_file_no(&value, file_no_prefix);
                next.header.file_no = resolved.file_no;
                if self.header.buyer_name.is_empty() {
                    if let Some(buyer) = resolved.buyer {
                        next.header.buyer_name = buyer;
                    }
                }
            }
            Action::SetHeader(field, value) => {
                *header_slot(&mut next.header, field) = value;
            }
            Action::LeaveDate(field) => {
                let slot = header_slot(&mut next.header, field);
                *slot = expand_two_digit_year(slot);
            }
            Action::SetItem { id, field, value } => {
                if let Some(item) = next.items.iter_mut().find(|i| i.id == id) {
                    set_item_field(item, field, value);
                }
            }
            Action::AddRow => {
                next.items.push(LineItem::blank(next.next_item_id));
                next.next_item_id += 1;
            }
            Action::RemoveRow(id) => {
                if next.items.len() > 1 {
                    next.items.retain(|i| i.id != id);
                }
            }
            Action::ClearAll { today } => {
                next.header = blank_header(&today);
                next.items = vec![LineItem::blank(next.next_item_id)];
                next.next_item_id += 1;
                next.preview = false;
                next.reset_generation += 1;
            }
            Action::TogglePreview => next.preview = !next.preview,
        }
        next
    }

    pub fn totals(&self) -> Totals {
        calculate_totals(&self.items)
    }

    pub fn report(&self) -> Report {
        Report::new(self.header.clone(), self.items.clone())
    }
}

fn blank_header(today: &str) -> ReportHeader {
    ReportHeader {
        billing_date: today.to_string(),
        ..ReportHeader::default()
    }
}

fn header_slot(header: &mut ReportHeader, field: HeaderField) -> &mut String {
    match field {
        HeaderField::BuyerName => &mut header.buyer_name,
        HeaderField::SupplierName => &mut header.supplier_name,
        HeaderField::FileNo => &mut header.file_no,
        HeaderField::InvoiceNo => &mut header.invoice_no,
        HeaderField::LcNumber => &mut header.lc_number,
        HeaderField::InvoiceDate => &mut header.invoice_date,
        HeaderField::BillingDate => &mut header.billing_date,
    }
}

fn set_item_field(item: &mut LineItem, field: ItemField, value: String) {
    match field {
        ItemField::FabricCode => item.fabric_code = value,
        ItemField::ItemDescription => item.item_description = value,
        ItemField::Color => item.color = value,
        ItemField::HsCode => item.hs_code = value,
        ItemField::RcvdDate => item.rcvd_date = value,
        ItemField::ChallanNo => item.challan_no = value,
        ItemField::PiNumber => item.pi_number = value,
        ItemField::Unit => item.unit = value,
        ItemField::InvoiceQty => item.invoice_qty = parse_number(&value),
        ItemField::RcvdQty => item.rcvd_qty = parse_number(&value),
        ItemField::UnitPrice => item.unit_price = parse_number(&value),
        ItemField::AppstremeNo => item.appstreme_no = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TODAY: &str = "16/Oct/2026";

    fn book() -> ContractBook {
        ContractBook::from_csv("Contract,Customer\nTTL-12,ACME Apparel\nTTL-30,Blue Denim Co\n")
    }

    fn apply(state: &FormState, action: Action) -> FormState {
        state.apply(action, &book(), "TTL-")
    }

    #[test]
    fn test_new_form() {
        let state = FormState::new(TODAY);
        assert_eq!(state.header.billing_date, TODAY);
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].unit, "YDS");
        assert!(!state.preview);
    }

    #[test]
    fn test_apply_leaves_previous_state_untouched() {
        let state = FormState::new(TODAY);
        let next = apply(&state, Action::SetHeader(HeaderField::InvoiceNo, "INV-1".into()));
        assert_eq!(next.header.invoice_no, "INV-1");
        assert_eq!(state.header.invoice_no, "");
    }

    #[test]
    fn test_file_no_fills_empty_buyer() {
        let state = FormState::new(TODAY);
        let next = apply(&state, Action::SetHeader(HeaderField::FileNo, "12".into()));
        assert_eq!(next.header.file_no, "TTL-12");
        assert_eq!(next.header.buyer_name, "ACME Apparel");
    }

    #[test]
    fn test_file_no_keeps_typed_buyer() {
        let state = apply(
            &FormState::new(TODAY),
            Action::SetHeader(HeaderField::BuyerName, "Someone Else".into()),
        );
        let next = apply(&state, Action::SetHeader(HeaderField::FileNo, "ttl-30".into()));
        assert_eq!(next.header.file_no, "ttl-30");
        assert_eq!(next.header.buyer_name, "Someone Else");
    }

    #[test]
    fn test_leave_date_expands_year() {
        let state = apply(
            &FormState::new(TODAY),
            Action::SetHeader(HeaderField::InvoiceDate, "03/Feb/25".into()),
        );
        let next = apply(&state, Action::LeaveDate(HeaderField::InvoiceDate));
        assert_eq!(next.header.invoice_date, "03/Feb/2025");
    }

    #[test]
    fn test_item_edits_coerce_numbers() {
        let state = FormState::new(TODAY);
        let id = state.items[0].id;
        let state = apply(
            &state,
            Action::SetItem {
                id,
                field: ItemField::InvoiceQty,
                value: "120".into(),
            },
        );
        let state = apply(
            &state,
            Action::SetItem {
                id,
                field: ItemField::UnitPrice,
                value: "oops".into(),
            },
        );
        assert_eq!(state.items[0].invoice_qty, 120.0);
        assert_eq!(state.items[0].unit_price, 0.0);
        assert_eq!(state.totals().total_value, 0.0);
        assert!(state.totals().has_qty_mismatch());
    }

    #[test]
    fn test_add_and_remove_rows() {
        let state = FormState::new(TODAY);
        let state = apply(&state, Action::AddRow);
        let state = apply(&state, Action::AddRow);
        let ids: Vec<u64> = state.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let state = apply(&state, Action::RemoveRow(2));
        let ids: Vec<u64> = state.items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 3]);

        let state = apply(&state, Action::RemoveRow(1));
        let state = apply(&state, Action::RemoveRow(3));
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, 3);
    }

    #[test]
    fn test_clear_all() {
        let state = FormState::new(TODAY);
        let state = apply(&state, Action::SetHeader(HeaderField::BuyerName, "X".into()));
        let state = apply(&state, Action::AddRow);
        let state = apply(&state, Action::TogglePreview);
        assert!(state.preview);

        let cleared = apply(
            &state,
            Action::ClearAll {
                today: "17/Oct/2026".into(),
            },
        );
        assert_eq!(cleared.header, blank_header("17/Oct/2026"));
        assert_eq!(cleared.items.len(), 1);
        assert!(!state.items.iter().any(|i| i.id == cleared.items[0].id));
        assert!(!cleared.preview);
        assert_eq!(cleared.reset_generation, state.reset_generation + 1);
    }

    #[test]
    fn test_report_snapshot() {
        let state = apply(
            &FormState::new(TODAY),
            Action::SetHeader(HeaderField::BuyerName, "ACME".into()),
        );
        let report = state.report();
        assert_eq!(report.header.buyer_name, "ACME");
        assert_eq!(report.items, state.items);
    }
}
