use thiserror::Error;

/// Why the ffprobe process did not produce usable output.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to start process: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("process exited with code {0}")]
    Exit(i32),

    #[error("process terminated by signal")]
    Signal,
}

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to run ffprobe: {source}, stderr: {stderr}")]
    Invocation {
        #[source]
        source: ExecError,
        stderr: String,
    },

    #[error("failed to parse ffprobe output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no streams found with codec type {codec_type}")]
    NoStreams { codec_type: String },
}

pub type Result<T> = std::result::Result<T, ProbeError>;
