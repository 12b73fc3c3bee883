use thiserror::Error;

/// Fatal failure while bringing a renderer up.
///
/// Every variant is terminal: no renderer handle is produced and resources created
/// before the failing step are released on return.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// No compatible adapter or presentation surface on this host.
    #[error("no compatible GPU device: {0}")]
    DeviceUnavailable(String),

    /// The adapter was found but refused to hand out a device/queue pair.
    #[error("failed to create command queue: {0}")]
    QueueCreationFailed(String),

    /// The shader library could not be loaded or validated.
    #[error("shader library `{library}` unavailable: {reason}")]
    ShaderLibraryUnavailable { library: String, reason: String },

    /// A named entry point is missing from the library (or has the wrong stage).
    #[error("shader function `{name}` not found in library `{library}`")]
    ShaderFunctionNotFound { library: String, name: String },

    /// Vertex layout or output format does not match the shader pair.
    #[error("pipeline `{label}` failed to link: {reason}")]
    PipelineLinkFailed { label: String, reason: String },

    #[error("failed to allocate buffer `{label}` ({size} bytes): {reason}")]
    BufferAllocationFailed {
        label: String,
        size: u64,
        reason: String,
    },

    #[error("failed to decode texture `{name}`: {reason}")]
    TextureDecodeFailed { name: String, reason: String },
}

/// Result type alias for initialization paths.
pub type InitResult<T> = std::result::Result<T, InitializationError>;

/// Geometry rejected at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("geometry has no vertices")]
    Empty,

    #[error("vertex {index} layout differs from vertex 0 (texture coordinates must be all present or all absent)")]
    MixedLayout { index: usize },

    #[error("vertex {index} texture coordinate out of [0, 1]")]
    TextureCoordinateOutOfRange { index: usize },

    #[error("index count {count} is not a non-zero multiple of 3")]
    IndexCountNotTriangles { count: usize },

    #[error("vertex count {count} is not a multiple of 3 for a non-indexed triangle list")]
    VertexCountNotTriangles { count: usize },

    #[error("index {value} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        value: u16,
        vertex_count: usize,
    },

    #[error("{count} vertices exceed the 16-bit index range")]
    TooManyVertices { count: usize },
}
