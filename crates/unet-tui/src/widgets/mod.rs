//! Small widgets shared by the screens.

pub mod field;
pub mod table;
