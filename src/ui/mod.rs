pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{header, info, section, status, success};
pub use table::{game_state_table, TableBuilder};
pub use theme::{theme, Theme};
