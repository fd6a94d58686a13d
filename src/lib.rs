pub mod error;
pub mod ffprobe;
pub mod redact;

pub use error::{ExecError, ProbeError, Result};
pub use ffprobe::{
    probe::{probe, Prober},
    runner::{CommandRunner, RunOutput, SystemRunner},
    FormatInfo, MetadataTags, ProbeResult, StreamInfo,
};
