//! Error taxonomy for the bundling pipeline
//!
//! Every variant is fatal to the run; non-fatal conditions (no inline main
//! script, no build-info annotation) are logged instead of raised.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions the pipeline can hit.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A required input file is missing or unreadable. Raised before any
    /// output is written: a silently dropped dependency would only fail at
    /// document-load time, far from the real fault.
    #[error("required input file is missing or unreadable: {path}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The host document lacks the closing body tag the merged script block
    /// is anchored to. A malformed host is never passed through unmodified.
    #[error("host document has no closing </body> tag to anchor the merged script")]
    AssemblyTargetMissing,

    /// The standalone output could not be persisted.
    #[error("failed to write standalone output: {path}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// More than one environment-conditional export guard was found in one
    /// auxiliary file. Only a single trailing guard is a well-formed input;
    /// removing the wrong block would silently corrupt user code.
    #[error(
        "found {count} environment-conditional export guards; well-formed auxiliary files carry \
         at most one, in final position"
    )]
    AmbiguousEnvGuard { count: usize },
}
