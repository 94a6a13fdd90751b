//! Hook discovery engine.
//!
//! Static discovery runs source text through the [`lexer`], finds literal
//! registration calls with the [`extractor`], and attributes each file with
//! the [`classifier`]; the [`scanner`] drives all three over the configured
//! roots. Runtime discovery samples live dispatches in [`runtime`].

pub mod classifier;
pub mod extractor;
pub mod lexer;
pub mod runtime;
pub mod scanner;

pub use classifier::{SourceClassifier, SourceRoot};
pub use extractor::{CallSiteExtractor, CalleeTable};
pub use lexer::{tokenize, LexOutput, Token, TokenKind};
pub use runtime::{HookBus, LocalHookBus, RuntimeSampler, SampleOutcome, ShadowStack};
pub use scanner::{ScanSummary, StaticScanner};
