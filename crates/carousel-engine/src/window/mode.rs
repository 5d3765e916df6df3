/// What drives redraws.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum RenderMode {
    /// Redraw on every display refresh, regardless of input.
    #[default]
    Continuous,
    /// Redraw only after an explicit request (input, resize, exposure).
    OnDemand,
}

impl RenderMode {
    /// Maps the "auto-rotation enabled" flag onto a render mode.
    #[inline]
    pub fn from_continuous(continuous: bool) -> Self {
        if continuous { Self::Continuous } else { Self::OnDemand }
    }

    #[inline]
    pub fn is_continuous(self) -> bool {
        self == Self::Continuous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_round_trips() {
        assert_eq!(RenderMode::from_continuous(true), RenderMode::Continuous);
        assert_eq!(RenderMode::from_continuous(false), RenderMode::OnDemand);
        assert!(RenderMode::Continuous.is_continuous());
        assert!(!RenderMode::OnDemand.is_continuous());
    }
}
