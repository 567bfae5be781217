mod state;
mod ui;

pub use state::{run, App};
pub use ui::draw_ui;
