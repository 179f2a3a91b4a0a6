//! Screen view models: list state, pagination and table rendering

pub mod borrow_table;
pub mod catalog_table;
pub mod list_state;
pub mod overdue_table;
pub mod pagination;
pub mod table;

pub use list_state::{Keyed, ListState, LoadSequencer, Ticket};
pub use pagination::{PageButton, Pager};
pub use table::{RowAction, RowKind, Table, TableCell, TableRow};
