pub mod dialects;
pub mod fallback;
pub mod status;
pub mod translate;

pub use dialects::list_dialects_handler;
pub use fallback::not_found_handler;
pub use status::{health_handler, keep_alive_handler, root_handler, stats_handler};
pub use translate::{batch_translate_handler, translate_handler};
