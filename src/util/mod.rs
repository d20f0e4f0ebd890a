pub mod dblclick;
