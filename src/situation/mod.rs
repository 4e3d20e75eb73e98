pub mod dataset;
pub mod state;
pub mod table;

pub use dataset::{load_dataset, Sport};
pub use state::{BaseState, GameState};
pub use table::{SituationTable, SituationTables, TableKind};
