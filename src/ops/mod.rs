pub mod check;
pub mod reorder_ops;
pub mod replay;
