//! Macro-generated test suite for `StateProvider` contract validation.
//!
//! The `state_provider_tests!` macro generates a test module that validates
//! any `StateProvider` implementation against the shared contract: filters,
//! sort, page, cursor and clearing.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod state_harness;
//!
//! use datagrid::state::InMemoryStateProvider;
//!
//! state_provider_tests!(InMemoryStateProvider::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Filters
//! - `test_filter_round_trip`: set then get returns the value
//! - `test_empty_filter_removes`: setting `""` is a clear
//! - `test_clear_filter`: only the named filter is removed
//! - `test_filters_lists_only_filters`: sort/page/cursor never show up as filters
//!
//! ## Sort
//! - `test_sort_round_trip`: both orders survive a round trip
//! - `test_sort_is_replaced`: one sort at a time
//!
//! ## Position
//! - `test_page_round_trip` / `test_cursor_round_trip`
//! - `test_empty_cursor_removes`
//!
//! ## Clear
//! - `test_clear_removes_everything`

/// Generate a `StateProvider` conformance test suite.
///
/// `$factory` must be an expression that evaluates to a fresh instance
/// implementing `StateProvider`. It is re-evaluated for each test.
#[macro_export]
macro_rules! state_provider_tests {
    ($factory:expr) => {
        mod state_provider_contract_tests {
            use super::*;
            use datagrid::core::query::{SortOrder, SortState};
            use datagrid::state::StateProvider;

            // ==================================================================
            // Filters
            // ==================================================================

            #[test]
            fn test_filter_round_trip() {
                let state = $factory;
                assert_eq!(state.filter("name"), None);

                state.set_filter("name", "alice");
                assert_eq!(state.filter("name").as_deref(), Some("alice"));

                state.set_filter("name", "bob");
                assert_eq!(state.filter("name").as_deref(), Some("bob"));
            }

            #[test]
            fn test_empty_filter_removes() {
                let state = $factory;
                state.set_filter("name", "alice");
                state.set_filter("name", "");
                assert_eq!(state.filter("name"), None);
                assert!(state.filters().is_empty());
            }

            #[test]
            fn test_clear_filter() {
                let state = $factory;
                state.set_filter("name", "alice");
                state.set_filter("city", "Paris");
                state.clear_filter("name");

                assert_eq!(state.filter("name"), None);
                assert_eq!(state.filter("city").as_deref(), Some("Paris"));
            }

            #[test]
            fn test_filters_lists_only_filters() {
                let state = $factory;
                state.set_filter("name", "alice");
                state.set_filter("age", "30");
                state.set_sort("age", SortOrder::Desc);
                state.set_page(2);
                state.set_cursor("abc");

                let filters = state.filters();
                assert_eq!(filters.len(), 2);
                assert_eq!(filters.get("name").map(String::as_str), Some("alice"));
                assert_eq!(filters.get("age").map(String::as_str), Some("30"));
            }

            // ==================================================================
            // Sort
            // ==================================================================

            #[test]
            fn test_sort_round_trip() {
                let state = $factory;
                assert_eq!(state.sort(), None);

                state.set_sort("name", SortOrder::Asc);
                assert_eq!(state.sort(), Some(SortState::asc("name")));

                state.set_sort("age", SortOrder::Desc);
                assert_eq!(state.sort(), Some(SortState::desc("age")));

                state.clear_sort();
                assert_eq!(state.sort(), None);
            }

            #[test]
            fn test_sort_is_replaced() {
                let state = $factory;
                state.set_sort("name", SortOrder::Desc);
                state.set_sort("age", SortOrder::Asc);
                assert_eq!(state.sort(), Some(SortState::asc("age")));
            }

            // ==================================================================
            // Position
            // ==================================================================

            #[test]
            fn test_page_round_trip() {
                let state = $factory;
                assert_eq!(state.page(), None);

                state.set_page(3);
                assert_eq!(state.page(), Some(3));

                state.clear_page();
                assert_eq!(state.page(), None);
            }

            #[test]
            fn test_cursor_round_trip() {
                let state = $factory;
                assert_eq!(state.cursor(), None);

                state.set_cursor("token-1");
                assert_eq!(state.cursor().as_deref(), Some("token-1"));

                state.clear_cursor();
                assert_eq!(state.cursor(), None);
            }

            #[test]
            fn test_empty_cursor_removes() {
                let state = $factory;
                state.set_cursor("token-1");
                state.set_cursor("");
                assert_eq!(state.cursor(), None);
            }

            // ==================================================================
            // Clear
            // ==================================================================

            #[test]
            fn test_clear_removes_everything() {
                let state = $factory;
                state.set_filter("name", "alice");
                state.set_sort("age", SortOrder::Desc);
                state.set_page(4);
                state.set_cursor("abc");

                state.clear();

                assert!(state.filters().is_empty());
                assert_eq!(state.sort(), None);
                assert_eq!(state.page(), None);
                assert_eq!(state.cursor(), None);
            }
        }
    };
}
