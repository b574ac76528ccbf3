pub mod config;
pub mod content;
pub mod deck;
pub mod error;
pub mod ids;
pub mod relevance;
pub mod session;

pub use config::{Config, ConfigPaths};
pub use content::builtin_deck;
pub use deck::{Block, Chart, ChartKind, DataPoint, Deck, Page};
pub use error::CodePathError;
pub use ids::SessionId;
pub use relevance::{assess, band, score, Assessment, Band, ResponseSet, Score, Statement};
pub use session::{SessionState, Slider};
