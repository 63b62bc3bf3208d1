mod hidden;
mod progress;
mod track;

pub use hidden::HiddenSet;
pub use progress::{position_to_save, ProgressRecord};
pub use track::{ImportedFile, Track};
