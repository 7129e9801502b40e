pub mod history;
pub mod kpis;
pub mod today;
