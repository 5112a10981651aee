pub mod chart;
pub mod result_shape;
pub mod text_table;
