pub mod types;

pub use types::{
    Advisory, DocumentContent, DocumentFormat, MatchGroup, MatchRecord, Paragraph, ScanResult,
    TextUnit, UnitKind,
};
