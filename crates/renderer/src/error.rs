use std::fmt;

/// Pipeline stage a compile diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStageKind {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStageKind::Vertex => f.write_str("vertex"),
            ShaderStageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// Shader program could not be built.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProgramError {
    #[error("{stage} shader failed to compile: {diagnostic}")]
    Compile {
        stage: ShaderStageKind,
        diagnostic: String,
    },
    #[error("shader program failed to link: {diagnostic}")]
    Link { diagnostic: String },
}

/// Reasons a canvas could not start rendering.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// No drawing context (GPU adapter, device or surface) is available.
    #[error("drawing context unavailable: {0}")]
    ContextUnavailable(String),
    #[error(transparent)]
    Program(#[from] ProgramError),
}

impl SetupError {
    pub fn context_unavailable(error: impl fmt::Display) -> Self {
        SetupError::ContextUnavailable(error.to_string())
    }
}
