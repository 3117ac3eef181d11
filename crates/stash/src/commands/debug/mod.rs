pub mod list;
pub mod move_item;
pub mod sections;
