//! Property-based tests for paged list navigation
//!
//! Tests invariants:
//! - Next then previous returns to the starting page
//! - Selecting the sorted column twice restores the original direction
//! - A fresh column always starts on page zero
//! - A failed fetch never drops the rows on screen

use proptest::prelude::*;

use crate::core::api::{ApiError, Page, SortDirection, SortSpec};
use crate::core::list_view::ListView;

// ============================================================================
// Strategies
// ============================================================================

const COLUMNS: [&str; 5] = ["id", "mrn", "createdAt", "validFrom", "validTo"];

fn arb_column() -> impl Strategy<Value = &'static str> {
    prop::sample::select(COLUMNS.to_vec())
}

fn arb_direction() -> impl Strategy<Value = SortDirection> {
    prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)]
}

/// A list of `total` numbered rows positioned on page `page`.
fn loaded(total: u32, size: u32, page: u32, sort: SortSpec) -> ListView<u32> {
    let list = ListView::new("datasets", size, sort);
    let request = list.refresh().with_page(page);
    let list = list.begin_load(request.clone());
    list.apply_page(Page::slice((0..total).collect(), &request))
}

fn arb_position() -> impl Strategy<Value = (u32, u32, u32)> {
    (1u32..300, 1u32..50).prop_flat_map(|(total, size)| {
        let pages = total.div_ceil(size);
        (Just(total), Just(size), 0..pages)
    })
}

proptest! {
    /// Property: next page followed by previous page is the identity
    #[test]
    fn prop_next_then_previous_round_trips(
        (total, size, page) in arb_position(),
        column in arb_column(),
        direction in arb_direction(),
    ) {
        let list = loaded(total, size, page, SortSpec::new(column, direction));
        if let Some(next) = list.next_page() {
            prop_assert_eq!(next.page, page + 1);
            let moved = list.begin_load(next.clone())
                .apply_page(Page::slice((0..total).collect(), &next));
            let back = moved.previous_page().expect("not on first page");
            prop_assert_eq!(back, list.refresh());
        } else {
            prop_assert_eq!(page + 1, list.total_pages());
        }
    }

    /// Property: toggling the same column twice restores the sort
    #[test]
    fn prop_double_toggle_restores_direction(
        (total, size, page) in arb_position(),
        column in arb_column(),
        direction in arb_direction(),
    ) {
        let sort = SortSpec::new(column, direction);
        let list = loaded(total, size, page, sort.clone());

        let once = list.sort_by(column);
        prop_assert_eq!(once.sort.direction, direction.toggled());
        prop_assert_eq!(once.page, 0);

        let twice = list.begin_load(once.clone()).sort_by(column);
        prop_assert_eq!(twice.sort, sort);
    }

    /// Property: switching columns resets to page zero with the column default
    #[test]
    fn prop_new_column_uses_default(
        (total, size, page) in arb_position(),
        from in arb_column(),
        to in arb_column(),
    ) {
        prop_assume!(from != to);
        let list = loaded(total, size, page, SortSpec::default_for(from));
        let request = list.sort_by(to);
        prop_assert_eq!(request.page, 0);
        prop_assert_eq!(request.size, size);
        prop_assert_eq!(request.sort, SortSpec::default_for(to));
    }

    /// Property: errors keep rows and totals intact
    #[test]
    fn prop_error_keeps_rows(
        (total, size, page) in arb_position(),
        status in 400u16..600,
    ) {
        let list = loaded(total, size, page, SortSpec::default_for("createdAt"));
        let failed = list
            .begin_load(list.refresh())
            .apply_error(&ApiError::Status { status, message: String::new() });

        prop_assert_eq!(failed.rows(), list.rows());
        prop_assert_eq!(failed.total_pages(), list.total_pages());
        prop_assert!(failed.error().is_some());
        prop_assert!(!failed.is_loading());
    }

    /// Property: the selection always points at an existing row
    #[test]
    fn prop_selection_in_bounds(
        (total, size, page) in arb_position(),
        moves in prop::collection::vec(any::<bool>(), 0..60),
    ) {
        let mut list = loaded(total, size, page, SortSpec::default_for("id"));
        for down in moves {
            list = if down { list.select_next() } else { list.select_prev() };
        }
        prop_assert!(list.selected() < list.rows().len());
        prop_assert!(list.selected_row().is_some());
    }
}
