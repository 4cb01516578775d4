//! Core data models for decp-budget
//!
//! Generic tables and cell values, plus the column contracts of the budget
//! ledger, the procurement register and the derived installments.

pub mod budget;
pub mod buyer;
pub mod contract;
pub mod installment;
pub mod table;
pub mod value;

pub use budget::BudgetAccount;
pub use contract::{ContractTerms, TermColumns};
pub use installment::MonthlyInstallment;
pub use table::{Row, Table};
pub use value::{parse_date, ColumnType, NumberFormat, Value};
