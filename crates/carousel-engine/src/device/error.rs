/// What the frame loop should do after failing to acquire a surface image.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost/outdated: the surface has been configured again; retry.
    Reconfigured,
    /// Timeout or other transient failure; drop this frame.
    SkipFrame,
    /// Out of memory. The loop stops.
    Fatal,
}
