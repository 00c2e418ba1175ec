//! Error type for engine configuration and control.
//!
//! ## Rust Lesson #20: Error Handling
//!
//! Rust uses `Result<T, E>` instead of exceptions. The per-frame path never
//! fails (a missed intersection is just `None`), so errors only come from
//! building an engine out of a bad configuration or from a bad control call.

/// Why a configuration or a control call was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Fewer than three vertices
    TooFewVertices(usize),
    /// More vertices than `MAX_VERTICES`
    TooManyVertices(usize),
    /// Vertex with a NaN or infinite coordinate
    NonFiniteVertex(usize),
    /// Explicit outline with no width or no height
    FlatOutline,
    /// Radius or half size is not a positive number
    InvalidSize(f64),
    /// Edge with zero length
    DegenerateEdge(usize),
    /// Oscillator refers to an edge the polygon doesn't have
    EdgeOutOfRange { oscillator: usize, edge: usize, edges: usize },
    /// Start position outside [0, 1]
    StartOutOfRange { oscillator: usize, start: f64 },
    /// Speed must be finite and > 0
    InvalidSpeed { oscillator: usize, speed: f64 },
    /// Oscillator index that does not exist
    NoSuchOscillator { index: usize, count: usize },
    /// Chord endpoint refers to a missing oscillator
    ChordOutOfRange { chord: usize, oscillator: usize },
    /// Pair refers to a missing line
    PairOutOfRange { pair: usize, index: usize, lines: usize },
    /// Pair intersects a line with itself
    SelfPair { pair: usize, index: usize },
    /// Chords strategy without chords, or normals strategy with chords
    StrategyMismatch(String),
    /// Trail length of zero
    ZeroTrailLength,
    /// Epsilon or acceptance bound is not a positive number
    InvalidTolerance { name: &'static str, value: f64 },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::TooFewVertices(n) => {
                write!(f, "polygon needs at least 3 vertices, got {}", n)
            }
            EngineError::TooManyVertices(n) => write!(
                f,
                "polygon has {} vertices, at most {} allowed",
                n,
                crate::config::MAX_VERTICES
            ),
            EngineError::NonFiniteVertex(i) => {
                write!(f, "vertex {} has a non-finite coordinate", i)
            }
            EngineError::FlatOutline => write!(f, "outline has no width or no height"),
            EngineError::InvalidSize(size) => {
                write!(f, "polygon size must be positive, got {}", size)
            }
            EngineError::DegenerateEdge(i) => write!(f, "edge {} has zero length", i),
            EngineError::EdgeOutOfRange { oscillator, edge, edges } => write!(
                f,
                "oscillator {} uses edge {} but the polygon has {} edges",
                oscillator, edge, edges
            ),
            EngineError::StartOutOfRange { oscillator, start } => write!(
                f,
                "oscillator {} starts at {} (must be within 0..=1)",
                oscillator, start
            ),
            EngineError::InvalidSpeed { oscillator, speed } => write!(
                f,
                "oscillator {} speed must be positive, got {}",
                oscillator, speed
            ),
            EngineError::NoSuchOscillator { index, count } => write!(
                f,
                "no oscillator {} (there are {})",
                index, count
            ),
            EngineError::ChordOutOfRange { chord, oscillator } => write!(
                f,
                "chord {} refers to missing oscillator {}",
                chord, oscillator
            ),
            EngineError::PairOutOfRange { pair, index, lines } => write!(
                f,
                "pair {} refers to line {} but there are {} lines",
                pair, index, lines
            ),
            EngineError::SelfPair { pair, index } => {
                write!(f, "pair {} intersects line {} with itself", pair, index)
            }
            EngineError::StrategyMismatch(msg) => write!(f, "strategy mismatch: {}", msg),
            EngineError::ZeroTrailLength => write!(f, "trail length must be at least 1"),
            EngineError::InvalidTolerance { name, value } => {
                write!(f, "{} must be positive, got {}", name, value)
            }
        }
    }
}

// Makes our error type work with the standard error trait
impl std::error::Error for EngineError {}
