/// Turns pointer positions into horizontal drag deltas.
///
/// The previous X is remembered on every pointer event; only moves while the
/// primary button (or a touch contact) is held yield a delta.
#[derive(Debug, Default, Clone)]
pub struct DragTracker {
    previous_x: Option<f32>,
    held: bool,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.held
    }

    pub fn pressed(&mut self, x: f32) {
        self.held = true;
        self.previous_x = Some(x);
    }

    /// Records a move; returns the X delta when a drag is in progress.
    pub fn moved(&mut self, x: f32) -> Option<f32> {
        let delta = match (self.held, self.previous_x) {
            (true, Some(prev)) => Some(x - prev),
            _ => None,
        };
        self.previous_x = Some(x);
        delta.filter(|d| *d != 0.0)
    }

    pub fn released(&mut self) {
        self.held = false;
    }

    /// Pointer left the surface; the next press starts fresh.
    pub fn cancel(&mut self) {
        self.held = false;
        self.previous_x = None;
    }
}
